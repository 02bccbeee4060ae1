mod dummy_ground_truth_provider;
mod dummy_localization_error_publisher;

pub use dummy_ground_truth_provider::*;
pub use dummy_localization_error_publisher::*;
