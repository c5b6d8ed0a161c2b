//! # sgp-core: Pure Calculation Logic for the Production-Order Engine
//!
//! Money parsing and formatting, panel areas, form validation and batch
//! aggregation for print-shop production orders. Everything here is a pure
//! function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Production-Order Engine                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Order Forms (web frontend)                      │   │
//! │  │    dimensions ──► value ──► eyelets ──► customer ──► submit    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 sgp-engine (facade + cache)                     │   │
//! │  │    init, calculate_area, parse_money, process_batch, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sgp-core (THIS CRATE) ★                         │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐ │   │
//! │  │   │ number  │ │  money  │ │ geometry │ │validation│ │ batch │ │   │
//! │  │   │ parse   │ │  Money  │ │   area   │ │  errors  │ │ items │ │   │
//! │  │   │ format  │ │  cents  │ │   m²     │ │ warnings │ │ totals│ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └───────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`number`] - Locale-tolerant number parsing and pt-BR formatting
//! - [`money`] - Integer-cents money, cents-first input parsing
//! - [`geometry`] - Panel area in m²
//! - [`validation`] - Field validation with errors and warnings
//! - [`batch`] - Production items and money totals
//! - [`types`] - Shared input types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: Totals are summed in cents (i64), never floats
//! 2. **Total Parsers**: Parsing returns a value plus an optional error
//! 3. **Warnings Never Block**: Only errors make a result invalid
//!
//! ## Example Usage
//!
//! ```rust
//! use sgp_core::geometry::calculate_area;
//! use sgp_core::money::parse_money;
//!
//! let area = calculate_area("150", "200");
//! assert_eq!(area.formatted_area, "3,00");
//!
//! // Cents-first: "12345" is R$ 123,45
//! let amount = parse_money("12345").value;
//! assert_eq!(amount.formatted_value, "123,45");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod error;
pub mod geometry;
pub mod money;
pub mod number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use batch::{BatchAggregate, BatchFailure, BatchItemResult, BatchResult, MoneyTotal};
pub use error::{CoreError, CoreResult, ValidationError, ValidationWarning};
pub use geometry::{AreaCalculator, AreaResult, PureAreaCalculator};
pub use money::{MonetaryAmount, Money};
pub use number::{NumericInput, NumericRead};
pub use types::*;
pub use validation::{ValidationLimits, ValidationResult};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Width or height (cm) above which a dimension is flagged.
///
/// ## Business Reason
/// Panels beyond 5 m are rare; a value like `1500` is usually `150` typed
/// with an extra zero.
pub const DIMENSION_WARNING_CM: i64 = 500;

/// Money value (currency units) above which an item is flagged.
pub const MONEY_WARNING_UNITS: i64 = 10_000;

/// Eyelet count above which a configuration is flagged.
pub const ILHOS_QUANTITY_WARNING: u32 = 50;

/// Eyelet spacing (cm) below which a configuration is flagged.
pub const ILHOS_MIN_SPACING_CM: i64 = 5;

/// Quantity × spacing (cm) above which a configuration is flagged.
///
/// 4000 cm is the perimeter of a 10 m × 10 m panel.
pub const ILHOS_MAX_COVERAGE_CM: i64 = 4000;
