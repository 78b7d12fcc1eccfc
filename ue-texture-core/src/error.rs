//! Error types shared by the Unreal texture crates

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, UeAssetError>;

/// Errors raised by the core data structures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UeAssetError {
    /// Engine version string could not be parsed
    #[error("Invalid engine version: {version}")]
    InvalidVersion { version: String },
}

impl UeAssetError {
    /// Create an invalid version error
    pub fn invalid_version<S: Into<String>>(version: S) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }
}
