//! Common error infrastructure for inventory-core.
//!
//! This module provides shared types and traits used across all error types
//! in the crate. Domain-specific errors (e.g., `PlacementError`, `SlotError`)
//! are defined in their respective modules alongside the operations they
//! validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each operation has its own error type with specific variants
//! - **Severity Classification**: Errors are categorized for recovery strategies
//! - **Recoverable by Default**: Every failure is a value; nothing panics

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Expected gameplay conditions (full slot, locked cell)
///   that a caller resolves by picking another target
/// - **Validation**: Invalid input that should be rejected without retry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with an alternative target or item.
    ///
    /// Examples: slot occupied, stack at capacity
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: duplicate catalog id, empty shape
    Validation,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all inventory-core errors.
///
/// Provides a uniform interface for error classification across the crate.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait InventoryError: std::fmt::Display + std::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str;
}
