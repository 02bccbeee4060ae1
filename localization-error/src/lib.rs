pub mod angles;
mod clients;
mod error;
mod error_computer;
pub mod msg;
mod pose;
mod report;
mod statistics;
mod traits;

pub use clients::*;
pub use error::*;
pub use error_computer::*;
pub use pose::*;
pub use report::*;
pub use statistics::*;
pub use traits::*;

// re-export
pub use async_trait::async_trait;
pub use nalgebra::{Isometry3, Matrix6, Translation3, UnitQuaternion, Vector3};
