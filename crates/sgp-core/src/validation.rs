//! # Validation Module
//!
//! Field and cross-field validation for production-order forms.
//!
//! ## Blocking vs Advisory
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ValidationResult                                   │
//! │                                                                         │
//! │  errors   (blocking)    missing, non-numeric, zero/negative            │
//! │           ──────────►   form refuses to submit                          │
//! │                                                                         │
//! │  warnings (advisory)    suspicious but legal: 800 cm wide panel,       │
//! │           ──────────►   R$ 25.000,00 item, 80 eyelets                  │
//! │                         form shows a hint, submission still allowed     │
//! │                                                                         │
//! │  valid == errors.is_empty()   (always; warnings never count)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sgp_core::validation::{validate_dimensions, validate_ilhos_config};
//!
//! let result = validate_dimensions("150", "200");
//! assert!(result.is_valid());
//!
//! let result = validate_ilhos_config("0", "0,50", "20");
//! assert!(!result.is_valid());
//! assert!(result.errors()[0].contains("quantity"));
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ValidationError, ValidationWarning};
use crate::number::{format_decimal, NumericInput};
use crate::{
    DIMENSION_WARNING_CM, ILHOS_MAX_COVERAGE_CM, ILHOS_MIN_SPACING_CM, ILHOS_QUANTITY_WARNING,
    MONEY_WARNING_UNITS,
};

// =============================================================================
// Validation Result
// =============================================================================

/// Structured outcome of a validation: blocking errors plus advisory warnings.
///
/// Fields are private so `valid` can only ever mirror `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    /// An empty, valid result.
    pub fn new() -> Self {
        ValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A result holding a single error.
    pub fn from_error(error: impl fmt::Display) -> Self {
        let mut result = Self::new();
        result.push_error(error);
        result
    }

    pub fn push_error(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
        self.valid = false;
    }

    pub fn push_warning(&mut self, warning: impl fmt::Display) {
        self.warnings.push(warning.to_string());
    }

    /// Appends another result's errors and warnings, keeping their order.
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.push_error(error);
        }
        self.warnings.extend(other.warnings);
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Validation Limits
// =============================================================================

/// Advisory ceilings. Crossing one produces a warning, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    /// Width/height above this (cm) is flagged as a likely typo.
    pub dimension_warning_cm: Decimal,

    /// Money values above this (currency units) are flagged.
    pub money_warning: Decimal,

    /// Eyelet counts above this are flagged.
    pub ilhos_quantity_warning: u32,

    /// Eyelet spacing below this (cm) is flagged.
    pub ilhos_min_spacing_cm: Decimal,

    /// Quantity x spacing above this (cm) is flagged.
    pub ilhos_max_coverage_cm: Decimal,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        ValidationLimits {
            dimension_warning_cm: Decimal::from(DIMENSION_WARNING_CM),
            money_warning: Decimal::from(MONEY_WARNING_UNITS),
            ilhos_quantity_warning: ILHOS_QUANTITY_WARNING,
            ilhos_min_spacing_cm: Decimal::from(ILHOS_MIN_SPACING_CM),
            ilhos_max_coverage_cm: Decimal::from(ILHOS_MAX_COVERAGE_CM),
        }
    }
}

// =============================================================================
// Field Helpers
// =============================================================================

fn require_positive(field: &str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Reads a required, strictly positive number.
pub(crate) fn read_positive(field: &str, input: impl NumericInput) -> Result<Decimal, ValidationError> {
    input
        .read_number()
        .require(field)
        .and_then(|value| require_positive(field, value))
}

/// Reads a required positive whole number that fits in `u32`.
pub(crate) fn read_positive_integer(
    field: &str,
    input: impl NumericInput,
) -> Result<u32, ValidationError> {
    let value = read_positive(field, input)?;

    if !value.fract().is_zero() {
        return Err(ValidationError::MustBeInteger {
            field: field.to_string(),
        });
    }

    value.to_u32().ok_or_else(|| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "value is too large".to_string(),
    })
}

// =============================================================================
// Dimensions
// =============================================================================

/// Validates a width/height pair (cm) with the default limits.
///
/// ## Rules
/// - Each value must be present, numeric and greater than zero (error)
/// - Each value above the ceiling is flagged (warning)
pub fn validate_dimensions(width: impl NumericInput, height: impl NumericInput) -> ValidationResult {
    validate_dimensions_with_limits(width, height, &ValidationLimits::default())
}

pub fn validate_dimensions_with_limits(
    width: impl NumericInput,
    height: impl NumericInput,
    limits: &ValidationLimits,
) -> ValidationResult {
    read_dimensions(width, height, limits).0
}

/// Validates and, when valid, returns the parsed pair.
pub(crate) fn read_dimensions(
    width: impl NumericInput,
    height: impl NumericInput,
    limits: &ValidationLimits,
) -> (ValidationResult, Option<(Decimal, Decimal)>) {
    let mut result = ValidationResult::new();

    let mut check = |field: &str, input: &dyn NumericInput| match read_positive(field, input) {
        Ok(value) => {
            if value > limits.dimension_warning_cm {
                result.push_warning(ValidationWarning::DimensionAboveCeiling {
                    field: field.to_string(),
                    value: format_decimal(value),
                    ceiling: format_decimal(limits.dimension_warning_cm),
                });
            }
            Some(value)
        }
        Err(err) => {
            result.push_error(err);
            None
        }
    };

    let width = check("width", &width);
    let height = check("height", &height);

    let pair = width.zip(height);
    (result, pair)
}

// =============================================================================
// Money
// =============================================================================

/// Validates a money value in currency units (`"150,00"`, `150`, ...).
///
/// ## Rules
/// - Must be present, numeric and greater than zero (error)
/// - Above the high-value ceiling (warning: possible decimal-placement slip)
pub fn validate_money_value(value: impl NumericInput) -> ValidationResult {
    validate_money_value_with_limits(value, &ValidationLimits::default())
}

pub fn validate_money_value_with_limits(
    value: impl NumericInput,
    limits: &ValidationLimits,
) -> ValidationResult {
    read_money_value("value", value, limits).0
}

pub(crate) fn read_money_value(
    field: &str,
    value: impl NumericInput,
    limits: &ValidationLimits,
) -> (ValidationResult, Option<Decimal>) {
    match read_positive(field, value) {
        Ok(value) => {
            let mut result = ValidationResult::new();
            if value > limits.money_warning {
                result.push_warning(ValidationWarning::MoneyAboveCeiling {
                    value: format_decimal(value),
                    ceiling: format_decimal(limits.money_warning),
                });
            }
            (result, Some(value))
        }
        Err(err) => (ValidationResult::from_error(err), None),
    }
}

// =============================================================================
// Ilhós (eyelets)
// =============================================================================

/// Parsed eyelet configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IlhosValues {
    pub quantity: u32,
    pub unit_price: Decimal,
    pub spacing: Decimal,
}

/// Validates an eyelet configuration with the default limits.
///
/// ## Rules
/// - `quantity` is a positive whole number (error)
/// - `unit_price` and `spacing` are positive (error)
/// - Density checks (warnings only):
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  quantity > 50                  → too many eyelets for one panel        │
/// │  spacing  < 5 cm                → eyelets touching each other           │
/// │  quantity × spacing > 4000 cm   → longer than a 10 m × 10 m perimeter   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_ilhos_config(
    quantity: impl NumericInput,
    unit_price: impl NumericInput,
    spacing: impl NumericInput,
) -> ValidationResult {
    validate_ilhos_config_with_limits(quantity, unit_price, spacing, &ValidationLimits::default())
}

pub fn validate_ilhos_config_with_limits(
    quantity: impl NumericInput,
    unit_price: impl NumericInput,
    spacing: impl NumericInput,
    limits: &ValidationLimits,
) -> ValidationResult {
    read_ilhos(quantity, unit_price, spacing, limits).0
}

pub(crate) fn read_ilhos(
    quantity: impl NumericInput,
    unit_price: impl NumericInput,
    spacing: impl NumericInput,
    limits: &ValidationLimits,
) -> (ValidationResult, Option<IlhosValues>) {
    let mut result = ValidationResult::new();

    let quantity = read_positive_integer("quantity", quantity)
        .map_err(|err| result.push_error(err))
        .ok();
    let unit_price = read_positive("unit price", unit_price)
        .map_err(|err| result.push_error(err))
        .ok();
    let spacing = read_positive("spacing", spacing)
        .map_err(|err| result.push_error(err))
        .ok();

    if let Some(quantity) = quantity {
        if quantity > limits.ilhos_quantity_warning {
            result.push_warning(ValidationWarning::TooManyEyelets {
                quantity,
                max: limits.ilhos_quantity_warning,
            });
        }
    }

    if let Some(spacing) = spacing {
        if spacing < limits.ilhos_min_spacing_cm {
            result.push_warning(ValidationWarning::EyeletsTooDense {
                spacing: format_decimal(spacing),
                min: format_decimal(limits.ilhos_min_spacing_cm),
            });
        }
    }

    if let (Some(quantity), Some(spacing)) = (quantity, spacing) {
        // A product too large for Decimal is past any ceiling.
        let covered = match Decimal::from(quantity).checked_mul(spacing) {
            Some(covered) if covered <= limits.ilhos_max_coverage_cm => None,
            Some(covered) => Some(format_decimal(covered)),
            None => Some(format!("over {}", format_decimal(Decimal::MAX))),
        };
        if let Some(covered) = covered {
            result.push_warning(ValidationWarning::EyeletCoverageTooLong {
                covered,
                max: format_decimal(limits.ilhos_max_coverage_cm),
            });
        }
    }

    let values = match (quantity, unit_price, spacing) {
        (Some(quantity), Some(unit_price), Some(spacing)) => Some(IlhosValues {
            quantity,
            unit_price,
            spacing,
        }),
        _ => None,
    };
    (result, values)
}

// =============================================================================
// Identity Checks
// =============================================================================

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("e-mail pattern compiles")
});

/// Checks that text has the shape `local@domain.tld`.
///
/// ## Example
/// ```rust
/// use sgp_core::validation::is_valid_email;
///
/// assert!(is_valid_email("cliente@grafica.com.br"));
/// assert!(!is_valid_email("cliente@grafica"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Validates a CPF (Brazilian individual taxpayer number).
///
/// ## Algorithm
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  529.982.247-25  → digits d0..d10                                       │
/// │                                                                         │
/// │  1. exactly 11 digits after stripping punctuation                      │
/// │  2. reject 000.000.000-00 ... 999.999.999-99 (all digits equal)        │
/// │  3. d9  = check(sum d0..d8 × weights 10..2)                            │
/// │  4. d10 = check(sum d0..d9 × weights 11..2)                            │
/// │                                                                         │
/// │  check(sum) = 11 - (sum mod 11), where 10 and 11 become 0              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Example
/// ```rust
/// use sgp_core::validation::is_valid_cpf;
///
/// assert!(is_valid_cpf("529.982.247-25"));
/// assert!(!is_valid_cpf("11111111111"));
/// ```
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    cpf_check_digit(&digits[..9]) == digits[9] && cpf_check_digit(&digits[..10]) == digits[10]
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top_weight - i as u32))
        .sum();

    match 11 - sum % 11 {
        10 | 11 => 0,
        check => check,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
