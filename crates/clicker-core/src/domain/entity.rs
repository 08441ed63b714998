//! Domain Layer - Core Entity Trait
//!
//! Every remote row has a key the store addresses it by.

use thiserror::Error;

/// Core trait for all table rows
pub trait Entity: Sized + Clone {
    /// The type of the row's key
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug;

    /// Returns the row's key
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// User input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
