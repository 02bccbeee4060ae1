mod ground_truth_provider;
mod localization_error_publisher;

pub use ground_truth_provider::*;
pub use localization_error_publisher::*;
