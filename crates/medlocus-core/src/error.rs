//! # Error Types
//!
//! Domain-specific error types for medlocus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medlocus-core (this file)                                             │
//! │  ├── CoreError        - Business rule failures (stock, not found)      │
//! │  └── ValidationError  - Input rejected before any storage access       │
//! │                                                                         │
//! │  medlocus-db                                                           │
//! │  └── DbError          - Storage failures, wraps CoreError              │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while processing sales and inventory.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Medicine id does not exist.
    #[error("Medicine not found: {0}")]
    MedicineNotFound(i64),

    /// Sale id does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(i64),

    /// Customer id does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(i64),

    /// Supplier id does not exist.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(i64),

    /// A sale line asks for more units than are on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/sales { items: [{ medicine_id: 7, quantity: 5 }] }
    ///      │
    ///      ▼
    /// conditional decrement affects 0 rows (on hand: 3)
    ///      │
    ///      ▼
    /// InsufficientStock { medicine_id: 7, name: "Paracetamol", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// whole sale rolled back, client gets 409
    /// ```
    #[error(
        "Insufficient stock for {name} (medicine {medicine_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        medicine_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Line items are fixed once a sale is created.
    #[error("Sale items cannot be modified after creation; delete the sale and create a new one")]
    ImmutableSaleItems,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Units missing to satisfy the request, for stock errors.
    pub fn shortfall(&self) -> Option<i64> {
        match self {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => Some(requested - available),
            _ => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors. Every variant names the offending field.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed date or email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A derived value disagrees with what the client sent.
    #[error("{field} is {actual} but expected {expected}")]
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Mismatch { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_medicine() {
        let err = CoreError::InsufficientStock {
            medicine_id: 7,
            name: "Paracetamol 500mg".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Paracetamol 500mg (medicine 7): available 3, requested 5"
        );
        assert_eq!(err.shortfall(), Some(2));
    }

    #[test]
    fn test_validation_error_field() {
        let err = ValidationError::MustBePositive {
            field: "items[0].quantity".to_string(),
        };
        assert_eq!(err.field(), "items[0].quantity");
        assert_eq!(err.to_string(), "items[0].quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sale_date".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.shortfall(), None);
    }
}
