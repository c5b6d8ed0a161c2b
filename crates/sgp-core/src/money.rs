//! # Money Module
//!
//! Provides the `Money` type and the pt-BR money parser/formatter.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    "0,10" summed 1000 times drifts away from 100,00                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10 cents × 1000 = 10000 cents = R$ 100,00 exactly                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cents-First Input
//! Money fields are typed like a cash register: every keystroke is a digit
//! and the last two digits are always cents.
//! ```text
//! keystrokes  "1" → 0,01   "12" → 0,12   "123" → 1,23   "12345" → 123,45
//! ```
//! Anything that is not a digit (separators, `R$`, spaces) is ignored, so
//! re-parsing a formatted value gives back the same cents.
//!
//! ## Usage
//! ```rust
//! use sgp_core::money::{format_money, parse_money, Money};
//!
//! let parsed = parse_money("12345");
//! assert_eq!(parsed.value.cents, 12345);
//! assert_eq!(parsed.value.formatted_value, "123,45");
//!
//! assert_eq!(format_money(Money::from_cents(123456)), "1.234,56");
//! ```

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::number::group_thousands;
use crate::types::Parsed;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (1/100 of a real).
///
/// Arithmetic is checked only (`checked_add`, `checked_multiply_quantity`):
/// a sum that leaves `i64` surfaces as `None`, never as a wrapped total.
/// `Display` is the pt-BR rendering `1.234,56`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use sgp_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in currency units to cents.
    ///
    /// Rounds to two places (half away from zero). Returns an overflow
    /// error when the amount does not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use sgp_core::money::Money;
    ///
    /// let value = Decimal::new(1505, 3); // 1.505
    /// assert_eq!(Money::from_decimal(value).unwrap().cents(), 151);
    /// ```
    pub fn from_decimal(value: Decimal) -> CoreResult<Self> {
        let cents = value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.trunc().to_i64())
            .ok_or_else(|| CoreError::Overflow {
                operation: "money conversion".to_string(),
            })?;
        Ok(Money(cents))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the exact decimal value in currency units.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use sgp_core::money::Money;
    ///
    /// let eyelet = Money::from_cents(50); // R$ 0,50
    /// assert_eq!(eyelet.checked_multiply_quantity(4), Some(Money::from_cents(200)));
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the pt-BR form: `1.234,56` (no currency symbol).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = (self.0 / 100).unsigned_abs();
        write!(
            f,
            "{}{},{:02}",
            sign,
            group_thousands(&units.to_string()),
            (self.0 % 100).unsigned_abs()
        )
    }
}

// =============================================================================
// Monetary Amount
// =============================================================================

/// A money value in the three shapes the forms need.
///
/// `cents` is authoritative; `raw_value` and `formatted_value` are derived
/// from it and never set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryAmount {
    pub cents: i64,

    /// `cents / 100`, exact.
    #[ts(type = "string")]
    pub raw_value: Decimal,

    /// `1.234,56`
    pub formatted_value: String,
}

impl MonetaryAmount {
    pub fn zero() -> Self {
        MonetaryAmount::from(Money::zero())
    }

    /// Returns the authoritative value as `Money`.
    pub fn money(&self) -> Money {
        Money::from_cents(self.cents)
    }
}

impl From<Money> for MonetaryAmount {
    fn from(money: Money) -> Self {
        MonetaryAmount {
            cents: money.cents(),
            raw_value: money.to_decimal(),
            formatted_value: money.to_string(),
        }
    }
}

// =============================================================================
// Parse / Format
// =============================================================================

/// Parses cents-first money text. Never fails.
///
/// Every non-digit character is dropped and the remaining digits are read as
/// cents. Empty input yields zero plus a `Required` error; a digit string too
/// long for `i64` yields zero plus an `InvalidFormat` error.
///
/// ## User Workflow
/// ```text
/// Money input: user types 1 2 3 4 5
///      │
///      ▼
/// parse_money("12345") ← THIS FUNCTION
///      │
///      ▼
/// { cents: 12345, rawValue: "123.45", formattedValue: "123,45" }
///      │
///      ▼
/// Input re-renders "123,45"; the next keystroke re-parses that text
/// ```
pub fn parse_money(input: &str) -> Parsed<MonetaryAmount> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Parsed::failed(
            MonetaryAmount::zero(),
            ValidationError::Required {
                field: "value".to_string(),
            },
        );
    }

    match digits.parse::<i64>() {
        Ok(cents) => Parsed::ok(MonetaryAmount::from(Money::from_cents(cents))),
        Err(_) => Parsed::failed(
            MonetaryAmount::zero(),
            ValidationError::InvalidFormat {
                field: "value".to_string(),
                reason: "amount is too large".to_string(),
            },
        ),
    }
}

/// Formats money as `1.234,56`: dot thousands, comma decimals, two places.
#[inline]
pub fn format_money(amount: Money) -> String {
    amount.to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
