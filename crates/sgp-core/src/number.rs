//! # Number Module
//!
//! Locale-aware reading and writing of plain (non-money) numbers.
//!
//! ## Accepted Input Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input text        Decimal separator      Result                        │
//! │  ─────────────     ─────────────────      ──────────                    │
//! │  "150"             none                   150                           │
//! │  "150,5"           ',' (single)           150.5                         │
//! │  "150.5"           '.' (single)           150.5                         │
//! │  "1.234,56"        ',' (right-most)       1234.56                       │
//! │  "1,234.56"        '.' (right-most)       1234.56                       │
//! │  "1.234.567"       none (repeated '.')    1234567                       │
//! │  "R$ 0,50"         ','                    0.50                          │
//! │  "abc" / "1,2,3.4" -                      Invalid                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator reads its inputs through [`NumericInput`], so form code
//! can hand over the raw string it has and typed callers can pass numbers.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;
use crate::types::Parsed;

// =============================================================================
// Numeric Read
// =============================================================================

/// Outcome of reading one numeric field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumericRead {
    /// Nothing was entered.
    Missing,
    /// Something was entered but it is not a number. Holds the original text.
    Invalid(String),
    /// A finite number.
    Value(Decimal),
}

impl NumericRead {
    /// Converts the read into a value, naming `field` in the error.
    pub fn require(self, field: &str) -> Result<Decimal, ValidationError> {
        match self {
            NumericRead::Value(value) => Ok(value),
            NumericRead::Missing => Err(ValidationError::Required {
                field: field.to_string(),
            }),
            NumericRead::Invalid(input) => Err(ValidationError::NotANumber {
                field: field.to_string(),
                input,
            }),
        }
    }

    /// Like [`NumericRead::require`], but a missing value is allowed.
    pub fn optional(self, field: &str) -> Result<Option<Decimal>, ValidationError> {
        match self {
            NumericRead::Missing => Ok(None),
            other => other.require(field).map(Some),
        }
    }
}

/// Anything a form may hand to a validator as a number.
pub trait NumericInput {
    fn read_number(&self) -> NumericRead;
}

impl NumericInput for str {
    fn read_number(&self) -> NumericRead {
        read_number_text(self)
    }
}

impl NumericInput for String {
    fn read_number(&self) -> NumericRead {
        read_number_text(self)
    }
}

impl NumericInput for Decimal {
    fn read_number(&self) -> NumericRead {
        NumericRead::Value(*self)
    }
}

impl NumericInput for f64 {
    fn read_number(&self) -> NumericRead {
        if !self.is_finite() {
            return NumericRead::Invalid(self.to_string());
        }
        match Decimal::from_f64(*self) {
            Some(value) => NumericRead::Value(value),
            None => NumericRead::Invalid(self.to_string()),
        }
    }
}

macro_rules! impl_numeric_input_for_int {
    ($($ty:ty),*) => {
        $(
            impl NumericInput for $ty {
                fn read_number(&self) -> NumericRead {
                    NumericRead::Value(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_numeric_input_for_int!(i32, i64, u32, u64);

impl<T: NumericInput> NumericInput for Option<T> {
    fn read_number(&self) -> NumericRead {
        match self {
            Some(inner) => inner.read_number(),
            None => NumericRead::Missing,
        }
    }
}

impl<T: NumericInput + ?Sized> NumericInput for &T {
    fn read_number(&self) -> NumericRead {
        (**self).read_number()
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a locale-formatted number without ever failing.
///
/// On empty or unreadable input the value is `0` and `error` says why.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use sgp_core::number::parse_number_safe;
///
/// assert_eq!(parse_number_safe("1.234,56").value, Decimal::new(123456, 2));
/// assert_eq!(parse_number_safe("12.5").value, Decimal::new(125, 1));
///
/// let failed = parse_number_safe("abc");
/// assert!(failed.value.is_zero());
/// assert!(failed.error.is_some());
/// ```
pub fn parse_number_safe(input: &str) -> Parsed<Decimal> {
    match read_number_text(input).require("value") {
        Ok(value) => Parsed::ok(value),
        Err(err) => Parsed::failed(Decimal::ZERO, err),
    }
}

fn read_number_text(input: &str) -> NumericRead {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();

    if trimmed.is_empty() {
        return NumericRead::Missing;
    }

    normalize_separators(trimmed)
        .and_then(|canonical| Decimal::from_str(&canonical).ok())
        .map(NumericRead::Value)
        .unwrap_or_else(|| NumericRead::Invalid(input.trim().to_string()))
}

/// Rewrites locale text into the `-1234.56` shape `Decimal::from_str` reads.
///
/// A thousands separator is only accepted between well-formed groups:
/// one to three leading digits, then groups of exactly three.
fn normalize_separators(text: &str) -> Option<String> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest.trim_start()),
        None => ("", text.strip_prefix('+').unwrap_or(text).trim_start()),
    };

    if !body.chars().any(|c| c.is_ascii_digit())
        || !body
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return None;
    }

    let commas = body.matches(',').count();
    let dots = body.matches('.').count();

    let (decimal_sep, group_sep) = match (commas, dots) {
        (0, 0) => (None, None),
        (1, 0) => (Some(','), None),
        (0, 1) => (Some('.'), None),
        (_, 0) => (None, Some(',')),
        (0, _) => (None, Some('.')),
        _ => match body.chars().rev().find(|c| *c == ',' || *c == '.') {
            Some(',') => (Some(','), Some('.')),
            _ => (Some('.'), Some(',')),
        },
    };

    let (integer, fraction) = match decimal_sep {
        Some(sep) => {
            if body.matches(sep).count() != 1 {
                return None;
            }
            body.split_once(sep)?
        }
        None => (body, ""),
    };

    if let Some(sep) = group_sep {
        if !is_grouped(integer, sep) {
            return None;
        }
    }

    let digits: String = integer.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut canonical = String::with_capacity(body.len() + 2);
    canonical.push_str(sign);
    canonical.push_str(if digits.is_empty() { "0" } else { &digits });
    if !fraction.is_empty() {
        canonical.push('.');
        canonical.push_str(fraction);
    }
    Some(canonical)
}

/// `1.234.567` style grouping: first group 1-3 digits, the rest exactly 3.
fn is_grouped(integer: &str, sep: char) -> bool {
    let mut groups = integer.split(sep);
    let leading_ok = groups
        .next()
        .is_some_and(|first| (1..=3).contains(&first.len()));
    leading_ok && groups.all(|group| group.len() == 3)
}

// =============================================================================
// Formatting
// =============================================================================

/// Inserts `.` every three digits from the right: `"1234567"` -> `"1.234.567"`.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats a decimal with two places in pt-BR style (`1.234,56`).
///
/// Rounds half away from zero.
pub fn format_decimal(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, group_thousands(integer), fraction)
}

// =============================================================================
// Unit Tests
// =============================================================================
