//! Construction-time error model.

use thiserror::Error;

/// Result type for wiring components together.
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// A required collaborator was not supplied.
///
/// These are fatal: the component is never handed to the caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Authentication provider required")]
    MissingProvider,

    #[error("Storage service required")]
    MissingStorage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_dependency() {
        assert_eq!(
            ConstructionError::MissingProvider.to_string(),
            "Authentication provider required"
        );
        assert_eq!(
            ConstructionError::MissingStorage.to_string(),
            "Storage service required"
        );
    }
}
