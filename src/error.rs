use crate::types::PermissionName;
use thiserror::Error;

/// Store-layer error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Store error wrapper.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
    /// Invalid subject input.
    #[error("invalid subject: {0}")]
    InvalidSubject(String),
    /// Invalid permission name input.
    #[error("invalid permission name: {0}")]
    InvalidPermissionName(String),
    /// A bulk operation received no permission names.
    #[error("at least one permission name is required")]
    EmptyPermissionNames,
    /// No permission list is registered under the name.
    #[error("permission not found: {0}")]
    PermissionNotFound(PermissionName),
}

impl Error {
    /// Returns whether the error came from argument validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubject(_) | Self::InvalidPermissionName(_) | Self::EmptyPermissionNames
        )
    }
}

impl From<StoreError> for Error {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}
