//! Facade error model.
//!
//! Only [`ValidationError`] and [`AuthError::RequiresAuthentication`] originate in
//! the facade. Provider and storage failures pass through untouched.

use thiserror::Error;

use crate::Role;

/// Result type returned by every facade operation.
pub type AuthResult<T> = Result<T, AuthError>;

/// A required argument was missing (empty or blank).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email required")]
    EmailRequired,

    #[error("Password required")]
    PasswordRequired,

    #[error("Roles array required")]
    RolesRequired,

    #[error("Token required")]
    TokenRequired,

    #[error("Reset token required")]
    ResetTokenRequired,
}

/// Failure reported by an authentication provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("invalid reset token")]
    InvalidResetToken,

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("not authenticated")]
    NotAuthenticated,

    /// Also used when nobody is authenticated, so callers cannot tell the two apart.
    #[error("role not held: {0}")]
    RoleNotHeld(Role),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure reported by a record store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {kind}/{id}")]
    NotFound { kind: String, id: String },

    #[error("invalid record payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error surfaced by [`AuthService`](crate::AuthService) operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The operation needs an active local session.
    #[error("{0}")]
    RequiresAuthentication(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    pub fn requires_authentication(msg: impl Into<String>) -> Self {
        Self::RequiresAuthentication(msg.into())
    }

    /// True when the failure was raised by the facade itself rather than a backend.
    pub fn is_facade_originated(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::RequiresAuthentication(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_surface_unchanged() {
        let err: AuthError = ValidationError::RolesRequired.into();
        assert_eq!(err.to_string(), "Roles array required");
        assert!(err.is_facade_originated());
    }

    #[test]
    fn delegated_failures_are_not_rewrapped() {
        let err: AuthError = ProviderError::InvalidCredentials.into();
        assert_eq!(err.to_string(), "invalid credentials");
        assert!(!err.is_facade_originated());

        let err: AuthError = StorageError::Other(anyhow::anyhow!("disk full")).into();
        assert_eq!(err.to_string(), "disk full");
    }
}
