use thiserror::Error;

use super::ScanError;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("failed to resolve packages: {cause}")]
    PackageResolution { cause: String },

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("invalid test name selector '{pattern}': {message}")]
    InvalidNameSelector { pattern: String, message: String },
}

impl SelectionError {
    pub fn package_resolution(cause: impl Into<String>) -> Self {
        Self::PackageResolution {
            cause: cause.into(),
        }
    }

    pub fn invalid_name_selector(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNameSelector {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
