//! Error types for the fallible edges of toastkit.
//!
//! The store itself never fails: unknown ids are no-ops and message resolvers
//! are allowed to panic through. Only configuration can be rejected.

use thiserror::Error;

/// Errors raised while building a [`Toaster`](crate::Toaster).
#[derive(Debug, Error)]
pub enum ToastError {
    /// The configuration document was not valid JSON for `ToasterConfig`.
    #[error("failed to parse toaster config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid toaster config: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = ToastError> = std::result::Result<T, E>;
