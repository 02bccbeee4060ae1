mod config;
mod error;
mod estimator;
mod session;
pub mod utils;

pub use config::*;
pub use error::*;
pub use estimator::*;
pub use session::*;
pub use utils::init_tracing;
