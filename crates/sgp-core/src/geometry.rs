//! # Geometry Module
//!
//! Panel area from a width/height pair in centimeters.
//!
//! ```text
//! area (m²) = width (cm) × height (cm) / 10 000, rounded to 2 places
//!
//! 150 cm × 200 cm = 30 000 cm² = 3,00 m²
//! ```
//!
//! Invalid pairs never abort: they produce a zero area that carries the
//! validation errors, so a list of pairs always yields a list of results.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::number::{format_decimal, NumericInput};
use crate::types::Dimension;
use crate::validation::{read_dimensions, ValidationLimits, ValidationResult};

/// Square centimeters in one square meter.
const CM2_PER_M2: i64 = 10_000;

// =============================================================================
// Area Result
// =============================================================================

/// Area of one panel.
///
/// Built once and never mutated; equal inputs always give equal results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AreaResult {
    /// Width in cm as read (zero when unreadable).
    #[ts(type = "string")]
    pub width: Decimal,

    /// Height in cm as read (zero when unreadable).
    #[ts(type = "string")]
    pub height: Decimal,

    /// Area in m², two decimal places.
    #[ts(type = "string")]
    pub area: Decimal,

    /// `3,00`
    pub formatted_area: String,

    /// Validation of the input pair. Warnings may be present on valid pairs.
    pub validation: ValidationResult,
}

impl AreaResult {
    fn invalid(width: Decimal, height: Decimal, validation: ValidationResult) -> Self {
        AreaResult {
            width,
            height,
            area: Decimal::ZERO,
            formatted_area: format_decimal(Decimal::ZERO),
            validation,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Calculates the area of a panel with the default limits.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use sgp_core::geometry::calculate_area;
///
/// let result = calculate_area(150, 200);
/// assert_eq!(result.area, Decimal::new(300, 2));
/// assert_eq!(result.formatted_area, "3,00");
///
/// let result = calculate_area(0, 200);
/// assert!(!result.is_valid());
/// assert!(result.area.is_zero());
/// ```
pub fn calculate_area(width: impl NumericInput, height: impl NumericInput) -> AreaResult {
    calculate_area_with_limits(width, height, &ValidationLimits::default())
}

pub fn calculate_area_with_limits(
    width: impl NumericInput,
    height: impl NumericInput,
    limits: &ValidationLimits,
) -> AreaResult {
    let (mut validation, pair) = read_dimensions(width, height, limits);

    let Some((width, height)) = pair else {
        return AreaResult::invalid(Decimal::ZERO, Decimal::ZERO, validation);
    };

    match square_meters(width, height) {
        Some(area) => AreaResult {
            width,
            height,
            area,
            formatted_area: format_decimal(area),
            validation,
        },
        None => {
            validation.push_error(ValidationError::InvalidFormat {
                field: "area".to_string(),
                reason: "dimensions are too large".to_string(),
            });
            AreaResult::invalid(width, height, validation)
        }
    }
}

fn square_meters(width: Decimal, height: Decimal) -> Option<Decimal> {
    width
        .checked_mul(height)?
        .checked_div(Decimal::from(CM2_PER_M2))
        .map(|area| area.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

// =============================================================================
// Area Calculator Seam
// =============================================================================

/// Source of area results for the batch operations.
///
/// The engine implements this with its memoizing cache; [`PureAreaCalculator`]
/// computes every call.
pub trait AreaCalculator {
    fn area(&self, width: Decimal, height: Decimal) -> AreaResult;
}

/// Uncached calculator.
#[derive(Debug, Clone, Default)]
pub struct PureAreaCalculator {
    limits: ValidationLimits,
}

impl PureAreaCalculator {
    pub fn new(limits: ValidationLimits) -> Self {
        PureAreaCalculator { limits }
    }
}

impl AreaCalculator for PureAreaCalculator {
    fn area(&self, width: Decimal, height: Decimal) -> AreaResult {
        calculate_area_with_limits(width, height, &self.limits)
    }
}

impl<C: AreaCalculator + ?Sized> AreaCalculator for &C {
    fn area(&self, width: Decimal, height: Decimal) -> AreaResult {
        (**self).area(width, height)
    }
}

/// Calculates every pair independently, preserving order.
pub fn calculate_batch_areas(pairs: &[Dimension]) -> Vec<AreaResult> {
    calculate_batch_areas_with(pairs, &PureAreaCalculator::default())
}

pub fn calculate_batch_areas_with(
    pairs: &[Dimension],
    calculator: &impl AreaCalculator,
) -> Vec<AreaResult> {
    pairs
        .iter()
        .map(|pair| calculator.area(pair.width, pair.height))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_calculate_area_basic() {
        let result = calculate_area(150, 200);
        assert!(result.is_valid());
        assert_eq!(result.area, Decimal::new(300, 2));
        assert_eq!(result.formatted_area, "3,00");
        assert_eq!(result.width, Decimal::from(150));
    }

    #[test]
    fn test_calculate_area_rounds_to_two_places() {
        // 150,5 × 200,75 = 30 212,875 cm² = 3,0212875 m²
        let result = calculate_area("150,5", "200,75");
        assert_eq!(result.area, Decimal::new(302, 2));
        assert_eq!(result.formatted_area, "3,02");

        // 7,5 × 7,5 = 56,25 cm² = 0,005625 m², just past the midpoint
        let result = calculate_area("7,5", "7,5");
        assert_eq!(result.area, Decimal::new(1, 2));
    }

    #[test]
    fn test_calculate_area_invalid_is_zero_not_crash() {
        let result = calculate_area(0, 200);
        assert!(!result.is_valid());
        assert!(result.area.is_zero());
        assert_eq!(result.formatted_area, "0,00");
        assert!(result.validation.errors()[0].contains("width"));

        let result = calculate_area("abc", "");
        assert_eq!(result.validation.errors().len(), 2);
    }

    #[test]
    fn test_calculate_area_overflow_is_reported() {
        let result = calculate_area(Decimal::MAX, Decimal::MAX);
        assert!(!result.is_valid());
        assert!(result.area.is_zero());
    }

    #[test]
    fn test_calculate_area_is_pure() {
        assert_eq!(calculate_area(150, 200), calculate_area("150", "200,0"));
    }

    #[test]
    fn test_batch_areas_preserve_order_and_isolate_failures() {
        let pairs = [
            Dimension::new(Decimal::from(100), Decimal::from(100)),
            Dimension::new(Decimal::ZERO, Decimal::from(100)),
            Dimension::new(Decimal::from(150), Decimal::from(200)),
        ];

        let results = calculate_batch_areas(&pairs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].formatted_area, "1,00");
        assert!(!results[1].is_valid());
        assert_eq!(results[1].formatted_area, "0,00");
        assert_eq!(results[2].formatted_area, "3,00");
    }

    struct CountingCalculator {
        calls: Cell<usize>,
    }

    impl AreaCalculator for CountingCalculator {
        fn area(&self, width: Decimal, height: Decimal) -> AreaResult {
            self.calls.set(self.calls.get() + 1);
            calculate_area(width, height)
        }
    }

    #[test]
    fn test_batch_areas_use_given_calculator() {
        let calculator = CountingCalculator {
            calls: Cell::new(0),
        };
        let pairs = [Dimension::new(Decimal::from(10), Decimal::from(10)); 4];

        calculate_batch_areas_with(&pairs, &calculator);
        assert_eq!(calculator.calls.get(), 4);
    }
}
