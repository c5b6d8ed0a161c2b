//! # Error Types
//!
//! Domain-specific error and warning types for sgp-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sgp-core (this file)                                                  │
//! │  ├── CoreError          - Arithmetic / domain failures                 │
//! │  ├── ValidationError    - Blocking input problems                      │
//! │  └── ValidationWarning  - Advisory, never blocks submission            │
//! │                                                                         │
//! │  sgp-engine (separate crate)                                           │
//! │  └── EngineError        - Lifecycle and configuration failures         │
//! │                                                                         │
//! │  Flow: ValidationError ──Display──► ValidationResult.errors ──► Form   │
//! │        ValidationWarning ─Display──► ValidationResult.warnings ─► Form │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for error derive macros (not manual impl)
//! 2. Include the field name in every message so forms can place it
//! 3. Errors are enum variants, never String, until they reach a
//!    `ValidationResult`

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core calculation errors.
///
/// These never escape the public calculation functions as `Err`; batch and
/// total operations fold them into per-item errors so they stay total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A cents sum or product does not fit in `i64`.
    #[error("Arithmetic overflow while computing {operation}")]
    Overflow { operation: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Blocking input errors.
///
/// The `Display` output is what ends up in `ValidationResult::errors`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field text could not be read as a number.
    #[error("{field} must be a number, got '{input}'")]
    NotANumber { field: String, input: String },

    /// Value must be strictly positive.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be a whole number.
    #[error("{field} must be a whole number")]
    MustBeInteger { field: String },

    /// Invalid format (e.g., digits overflow, malformed separators).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotANumber { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::MustBeInteger { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Validation Warning
// =============================================================================

/// Advisory findings: suspicious but legal values flagged for human review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A dimension above the sanity ceiling, likely a typo (cm vs mm).
    DimensionAboveCeiling {
        field: String,
        value: String,
        ceiling: String,
    },

    /// A money value above the high-value ceiling, possibly a misplaced comma.
    MoneyAboveCeiling { value: String, ceiling: String },

    /// More eyelets than a typical panel carries.
    TooManyEyelets { quantity: u32, max: u32 },

    /// Eyelets placed closer than is physically reasonable.
    EyeletsTooDense { spacing: String, min: String },

    /// Quantity x spacing covers more than a typical panel perimeter.
    EyeletCoverageTooLong { covered: String, max: String },

    /// An entry of a total could not be parsed and counted as zero.
    EntryTreatedAsZero { index: usize, input: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DimensionAboveCeiling {
                field,
                value,
                ceiling,
            } => write!(
                f,
                "{field} of {value} cm is above {ceiling} cm, check the measurement"
            ),
            ValidationWarning::MoneyAboveCeiling { value, ceiling } => write!(
                f,
                "value R$ {value} is above R$ {ceiling}, check the decimal placement"
            ),
            ValidationWarning::TooManyEyelets { quantity, max } => write!(
                f,
                "{quantity} eyelets is more than the usual maximum of {max}, confirm the quantity"
            ),
            ValidationWarning::EyeletsTooDense { spacing, min } => write!(
                f,
                "eyelet spacing of {spacing} cm is below {min} cm, confirm the spacing"
            ),
            ValidationWarning::EyeletCoverageTooLong { covered, max } => write!(
                f,
                "eyelets cover {covered} cm, more than the {max} cm perimeter of a typical panel"
            ),
            ValidationWarning::EntryTreatedAsZero { index, input } => write!(
                f,
                "entry {index} ('{input}') could not be read and was counted as zero"
            ),
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
