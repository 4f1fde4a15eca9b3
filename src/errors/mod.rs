use std::fmt;

use thiserror::Error;

/// Failure reported by a recipe or review store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No recipe with this id
    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    /// No review with this id
    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    /// A read did not settle in time
    #[error("Store operation '{operation}' timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    /// Transport, permission or storage engine failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::RecipeNotFound(_) | StoreError::ReviewNotFound(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a recipe, review or ranking operation
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Rejected user input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Caller does not own the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl ServiceError {
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        ServiceError::Validation(msg.to_string())
    }

    pub fn forbidden<T: fmt::Display>(msg: T) -> Self {
        ServiceError::Forbidden(msg.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(e) if e.is_not_found())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Context message for a failed store operation
pub fn store_context(operation: &str, collection: &str) -> String {
    format!("Failed to {} {}", operation, collection)
}

/// Context message for a failed operation on one record
pub fn record_context(operation: &str, collection: &str, id: &str) -> String {
    format!("Failed to {} {} with id: {}", operation, collection, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_backend_failure() {
        let not_found = ServiceError::from(StoreError::RecipeNotFound("r1".to_string()));
        let backend = ServiceError::from(StoreError::Backend(anyhow::anyhow!("permission denied")));

        assert!(not_found.is_not_found());
        assert!(!backend.is_not_found());
        assert_eq!(not_found.to_string(), "Recipe not found: r1");
        assert_eq!(backend.to_string(), "permission denied");
    }
}
