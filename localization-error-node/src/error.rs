use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("localization-error-node: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("localization-error-node: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("localization-error-node: Invalid parameter override {:?} : {}", .0, .1)]
    InvalidOverride(String, String),
    #[error("localization-error-node: localization-error: {:?}", .0)]
    LocalizationError(#[from] localization_error::Error),
    #[error("localization-error-node: Other: {:?}", .0)]
    Other(#[from] anyhow::Error),
}
