//! # Domain Types
//!
//! Input and outcome types shared by the calculation modules.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Dimension     │   │  IlhosConfig    │   │ ProductionItem  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  width  (cm)    │   │  quantity       │   │  width/height   │       │
//! │  │  height (cm)    │   │  unit_price     │   │  value, extras  │       │
//! │  └─────────────────┘   │  spacing (cm)   │   │  ilhos          │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Parsed<T>  - value + optional error, for parses that never fail│   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Form-facing inputs keep the raw text the user typed; the calculation
//! modules decide how to read it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Parsed
// =============================================================================

/// Result of a total parse: there is always a value, plus an error when the
/// value is the neutral fallback rather than what the user meant.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Parsed<T> {
    /// Parsed value, or the neutral zero on failure.
    pub value: T,

    /// Why parsing fell back to zero.
    #[serde(serialize_with = "serialize_error")]
    #[ts(type = "string | null")]
    pub error: Option<ValidationError>,
}

impl<T> Parsed<T> {
    /// A successful parse.
    pub fn ok(value: T) -> Self {
        Parsed { value, error: None }
    }

    /// A failed parse carrying its fallback value.
    pub fn failed(fallback: T, error: ValidationError) -> Self {
        Parsed {
            value: fallback,
            error: Some(error),
        }
    }

    /// Returns true when the value came from the input.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_error<S>(error: &Option<ValidationError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A width/height pair in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dimension {
    #[ts(type = "string")]
    pub width: Decimal,
    #[ts(type = "string")]
    pub height: Decimal,
}

impl Dimension {
    pub fn new(width: Decimal, height: Decimal) -> Self {
        Dimension { width, height }
    }
}

// =============================================================================
// Ilhós (eyelet) configuration
// =============================================================================

/// Eyelet fastening configuration of a panel, as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct IlhosConfig {
    /// Number of eyelets.
    pub quantity: String,

    /// Price of one eyelet in currency units (`"0,50"`).
    pub unit_price: String,

    /// Distance between eyelets in centimeters.
    pub spacing: String,
}

// =============================================================================
// Production Item
// =============================================================================

/// One line of a production order, with the raw text of each form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductionItem {
    /// Identifier assigned by the caller, echoed back in failures.
    #[serde(default)]
    pub id: Option<String>,

    /// Production type (panel, banner, ...).
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub description: String,

    /// Width in centimeters.
    #[serde(default)]
    pub width: Option<String>,

    /// Height in centimeters.
    #[serde(default)]
    pub height: Option<String>,

    /// Base value in currency units.
    #[serde(default)]
    pub value: Option<String>,

    /// Additional charges in currency units.
    #[serde(default)]
    pub extras_value: Option<String>,

    #[serde(default)]
    pub ilhos: Option<IlhosConfig>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_keeps_fallback_on_failure() {
        let ok = Parsed::ok(5);
        assert!(ok.is_ok());
        assert_eq!(ok.value, 5);

        let failed = Parsed::failed(
            0,
            ValidationError::Required {
                field: "value".to_string(),
            },
        );
        assert!(!failed.is_ok());
        assert_eq!(failed.value, 0);
    }

    #[test]
    fn test_parsed_serializes_error_as_message() {
        let failed = Parsed::failed(
            0,
            ValidationError::Required {
                field: "value".to_string(),
            },
        );
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["value"], 0);
        assert_eq!(json["error"], "value is required");
    }

    #[test]
    fn test_production_item_deserializes_with_defaults() {
        let item: ProductionItem =
            serde_json::from_str(r#"{"width": "150", "height": "200", "value": "100,00"}"#)
                .unwrap();
        assert_eq!(item.width.as_deref(), Some("150"));
        assert!(item.id.is_none());
        assert!(item.ilhos.is_none());
    }
}
