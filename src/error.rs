//! Core error types
//!
//! Failures surfaced by the catalog, resolver, log and profile operations.

use thiserror::Error;

/// Error kinds returned by tracker operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackerError {
    /// Malformed or out-of-range argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Food with ID '{0}' already exists")]
    DuplicateId(String),

    /// Composite creation referenced a food that is not in the catalog
    #[error("Ingredient '{0}' does not exist")]
    UnknownIngredient(String),

    #[error("Food with ID '{0}' not found")]
    FoodNotFound(String),

    /// A composite food reaches itself again through its ingredients
    #[error("Composite food '{0}' contains itself through its ingredients")]
    CyclicComposite(String),
}

impl TrackerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TrackerError::InvalidInput(message.into())
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
