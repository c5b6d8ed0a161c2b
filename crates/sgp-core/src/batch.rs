//! # Batch Module
//!
//! Applies the calculator and validators across production-order items.
//!
//! ## Failure Isolation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_batch(items)                                 │
//! │                                                                         │
//! │  item 0 ──► area + total + validation ──► valid   ──┐                   │
//! │  item 1 ──► area + total + validation ──► INVALID ──┼──► failures[]     │
//! │  item 2 ──► area + total + validation ──► valid   ──┤                   │
//! │                                                     ▼                   │
//! │                                      aggregate (valid items only)       │
//! │                                      total_area, total (cents)          │
//! │                                                                         │
//! │  Every item is reported in `items`, in input order.                    │
//! │  One bad item never aborts the batch.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError, ValidationWarning};
use crate::geometry::AreaCalculator;
use crate::money::{parse_money, MonetaryAmount, Money};
use crate::number::{format_decimal, NumericInput};
use crate::types::ProductionItem;
use crate::validation::{
    read_dimensions, read_ilhos, read_money_value, ValidationLimits, ValidationResult,
};

// =============================================================================
// Result Types
// =============================================================================

/// Derived values and validation outcome of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    /// Position in the input list.
    pub index: usize,

    pub id: Option<String>,

    /// Area in m² (zero when the item has no usable dimensions).
    #[ts(type = "string")]
    pub area: Decimal,

    pub formatted_area: String,

    /// value + extras + eyelets, as far as they could be read.
    pub total: MonetaryAmount,

    pub validation: ValidationResult,
}

/// Totals over the items that validated.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchAggregate {
    /// Number of items received.
    pub item_count: usize,

    /// Number of items included in the totals.
    pub valid_count: usize,

    #[ts(type = "string")]
    pub total_area: Decimal,

    pub formatted_total_area: String,

    pub total: MonetaryAmount,

    /// Wall-clock time spent in [`process_batch`], in milliseconds.
    pub calculation_time_ms: f64,
}

/// One rejected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchFailure {
    pub index: usize,
    pub id: Option<String>,
    pub errors: Vec<String>,
}

/// Outcome of [`process_batch`].
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub items: Vec<BatchItemResult>,
    pub aggregate: BatchAggregate,
    pub failures: Vec<BatchFailure>,
}

/// Outcome of [`calculate_total`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MoneyTotal {
    pub amount: MonetaryAmount,

    /// One warning per entry that was counted as zero.
    pub warnings: Vec<String>,

    /// Positions of the entries counted as zero.
    pub failed_entries: Vec<usize>,
}

// =============================================================================
// Batch Processing
// =============================================================================

/// Processes every item independently and aggregates the valid ones.
///
/// ## Per-item Rules
/// - Dimensions are optional as a pair; one without the other is an error
/// - `value` is required and positive, read as a plain decimal (`"100"` is
///   R$ 100,00, unlike the cents-first [`calculate_total`])
/// - `extras_value` is optional and must not be negative
/// - `ilhos`, when present, follows the eyelet validation rules and adds
///   `quantity × unit price` to the total
///
/// ## Example
/// ```rust
/// use sgp_core::batch::process_batch;
/// use sgp_core::geometry::PureAreaCalculator;
/// use sgp_core::types::ProductionItem;
/// use sgp_core::validation::ValidationLimits;
///
/// let items = vec![
///     ProductionItem {
///         width: Some("150".into()),
///         height: Some("200".into()),
///         value: Some("100,00".into()),
///         ..Default::default()
///     },
///     ProductionItem::default(), // no value: reported, not aggregated
/// ];
///
/// let result = process_batch(&items, &PureAreaCalculator::default(), &ValidationLimits::default());
/// assert_eq!(result.aggregate.valid_count, 1);
/// assert_eq!(result.aggregate.total.formatted_value, "100,00");
/// assert_eq!(result.failures.len(), 1);
/// ```
pub fn process_batch(
    items: &[ProductionItem],
    calculator: &impl AreaCalculator,
    limits: &ValidationLimits,
) -> BatchResult {
    let started = Instant::now();
    let mut results = Vec::with_capacity(items.len());
    let mut failures = Vec::new();
    let mut total_area = Decimal::ZERO;
    let mut total = Money::zero();
    let mut valid_count = 0;

    for (index, item) in items.iter().enumerate() {
        let mut result = process_item(index, item, calculator, limits);

        if result.validation.is_valid() {
            match add_to_totals(&result, total_area, total) {
                Ok((area, money)) => {
                    total_area = area;
                    total = money;
                    valid_count += 1;
                }
                Err(err) => result.validation.push_error(err),
            }
        }

        if !result.validation.is_valid() {
            failures.push(BatchFailure {
                index,
                id: result.id.clone(),
                errors: result.validation.errors().to_vec(),
            });
        }
        results.push(result);
    }

    let calculation_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(
        items = items.len(),
        valid = valid_count,
        failures = failures.len(),
        total_cents = total.cents(),
        elapsed_ms = calculation_time_ms,
        "Processed production batch"
    );

    BatchResult {
        items: results,
        aggregate: BatchAggregate {
            item_count: items.len(),
            valid_count,
            total_area,
            formatted_total_area: format_decimal(total_area),
            total: MonetaryAmount::from(total),
            calculation_time_ms,
        },
        failures,
    }
}

fn add_to_totals(
    item: &BatchItemResult,
    total_area: Decimal,
    total: Money,
) -> Result<(Decimal, Money), CoreError> {
    let area = total_area
        .checked_add(item.area)
        .ok_or_else(|| overflow("batch area total"))?;
    let money = total
        .checked_add(item.total.money())
        .ok_or_else(|| overflow("batch money total"))?;
    Ok((area, money))
}

fn overflow(operation: &str) -> CoreError {
    CoreError::Overflow {
        operation: operation.to_string(),
    }
}

fn process_item(
    index: usize,
    item: &ProductionItem,
    calculator: &impl AreaCalculator,
    limits: &ValidationLimits,
) -> BatchItemResult {
    let mut validation = ValidationResult::new();

    let area = item_area(item, calculator, limits, &mut validation);

    let mut total = Money::zero();
    for part in [
        item_value(item, limits, &mut validation),
        item_extras(item, &mut validation),
        item_ilhos(item, limits, &mut validation),
    ]
    .into_iter()
    .flatten()
    {
        match total.checked_add(part) {
            Some(sum) => total = sum,
            None => validation.push_error(overflow("item total")),
        }
    }

    BatchItemResult {
        index,
        id: item.id.clone(),
        area,
        formatted_area: format_decimal(area),
        total: MonetaryAmount::from(total),
        validation,
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |text| text.trim().is_empty())
}

fn item_area(
    item: &ProductionItem,
    calculator: &impl AreaCalculator,
    limits: &ValidationLimits,
    validation: &mut ValidationResult,
) -> Decimal {
    if is_blank(&item.width) && is_blank(&item.height) {
        return Decimal::ZERO;
    }

    let (dimensions, pair) = read_dimensions(item.width.as_deref(), item.height.as_deref(), limits);
    validation.merge(dimensions);

    let Some((width, height)) = pair else {
        return Decimal::ZERO;
    };

    let area = calculator.area(width, height);
    if !area.is_valid() {
        for error in area.validation.errors() {
            validation.push_error(error);
        }
    }
    area.area
}

fn to_money(value: Decimal, validation: &mut ValidationResult) -> Option<Money> {
    Money::from_decimal(value)
        .map_err(|err| validation.push_error(err))
        .ok()
}

fn item_value(
    item: &ProductionItem,
    limits: &ValidationLimits,
    validation: &mut ValidationResult,
) -> Option<Money> {
    let (checked, value) = read_money_value("value", item.value.as_deref(), limits);
    validation.merge(checked);
    value.and_then(|value| to_money(value, validation))
}

fn item_extras(item: &ProductionItem, validation: &mut ValidationResult) -> Option<Money> {
    let field = "extras value";
    match item.extras_value.as_deref().read_number().optional(field) {
        Ok(None) => None,
        Ok(Some(value)) if value < Decimal::ZERO => {
            validation.push_error(ValidationError::MustNotBeNegative {
                field: field.to_string(),
            });
            None
        }
        Ok(Some(value)) => to_money(value, validation),
        Err(err) => {
            validation.push_error(err);
            None
        }
    }
}

fn item_ilhos(
    item: &ProductionItem,
    limits: &ValidationLimits,
    validation: &mut ValidationResult,
) -> Option<Money> {
    let ilhos = item.ilhos.as_ref()?;

    let (checked, values) = read_ilhos(&ilhos.quantity, &ilhos.unit_price, &ilhos.spacing, limits);
    validation.merge(checked);
    let values = values?;

    let unit_price = to_money(values.unit_price, validation)?;
    let cost = unit_price.checked_multiply_quantity(i64::from(values.quantity));
    if cost.is_none() {
        validation.push_error(overflow("eyelet cost"));
    }
    cost
}

// =============================================================================
// Money Totals
// =============================================================================

/// Sums cents-first money entries exactly.
///
/// Entries that cannot be parsed count as zero and each adds a warning, so
/// the total is always produced.
///
/// ## Example
/// ```rust
/// use sgp_core::batch::calculate_total;
///
/// let total = calculate_total(&["100,00", "50,00"]);
/// assert_eq!(total.amount.formatted_value, "150,00");
/// assert!(total.warnings.is_empty());
/// ```
pub fn calculate_total<S: AsRef<str>>(values: &[S]) -> MoneyTotal {
    let mut total = Money::zero();
    let mut warnings = Vec::new();
    let mut failed_entries = Vec::new();

    for (index, value) in values.iter().enumerate() {
        let input = value.as_ref();
        let parsed = parse_money(input);

        let sum = if parsed.is_ok() {
            total.checked_add(parsed.value.money())
        } else {
            None
        };

        match sum {
            Some(sum) => total = sum,
            None => {
                warnings.push(
                    ValidationWarning::EntryTreatedAsZero {
                        index,
                        input: input.to_string(),
                    }
                    .to_string(),
                );
                failed_entries.push(index);
            }
        }
    }

    MoneyTotal {
        amount: MonetaryAmount::from(total),
        warnings,
        failed_entries,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PureAreaCalculator;
    use crate::types::IlhosConfig;

    fn item(width: &str, height: &str, value: &str) -> ProductionItem {
        ProductionItem {
            width: Some(width.to_string()),
            height: Some(height.to_string()),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn run(items: &[ProductionItem]) -> BatchResult {
        process_batch(items, &PureAreaCalculator::default(), &ValidationLimits::default())
    }

    #[test]
    fn test_calculate_total_basic() {
        let total = calculate_total(&["100,00", "50,00"]);
        assert_eq!(total.amount.cents, 15000);
        assert_eq!(total.amount.formatted_value, "150,00");
        assert!(total.warnings.is_empty());
    }

    #[test]
    fn test_calculate_total_has_no_drift() {
        let values = vec!["0,10"; 1000];
        let total = calculate_total(&values);
        assert_eq!(total.amount.cents, 10000);
        assert_eq!(total.amount.formatted_value, "100,00");
    }

    #[test]
    fn test_calculate_total_warns_on_unparsable_entries() {
        let total = calculate_total(&["10,00", "", "abc", "5,00"]);
        assert_eq!(total.amount.formatted_value, "15,00");
        assert_eq!(total.failed_entries, vec![1, 2]);
        assert_eq!(total.warnings.len(), 2);
        assert!(total.warnings[1].contains("'abc'"));
    }

    #[test]
    fn test_calculate_total_empty_list() {
        let total = calculate_total::<&str>(&[]);
        assert_eq!(total.amount, MonetaryAmount::zero());
    }

    #[test]
    fn test_process_batch_all_valid() {
        let result = run(&[item("150", "200", "100,00"), item("100", "100", "50,50")]);

        assert_eq!(result.aggregate.item_count, 2);
        assert_eq!(result.aggregate.valid_count, 2);
        assert_eq!(result.aggregate.total_area, Decimal::new(400, 2));
        assert_eq!(result.aggregate.formatted_total_area, "4,00");
        assert_eq!(result.aggregate.total.formatted_value, "150,50");
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_process_batch_isolates_malformed_item() {
        let mut bad = item("abc", "200", "100,00");
        bad.id = Some("item-2".to_string());
        let items = vec![
            item("150", "200", "100,00"),
            bad,
            item("100", "100", "20,00"),
        ];

        let result = run(&items);

        assert_eq!(result.items.len(), 3);
        assert_eq!(result.aggregate.valid_count, 2);
        assert_eq!(result.aggregate.total.formatted_value, "120,00");
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].index, 1);
        assert_eq!(result.failures[0].id.as_deref(), Some("item-2"));
        assert!(result.failures[0].errors[0].contains("width"));
    }

    #[test]
    fn test_process_batch_item_total_includes_extras_and_ilhos() {
        let mut with_extras = item("100", "100", "100,00");
        with_extras.extras_value = Some("15,50".to_string());
        with_extras.ilhos = Some(IlhosConfig {
            quantity: "4".to_string(),
            unit_price: "0,50".to_string(),
            spacing: "20".to_string(),
        });

        let result = run(&[with_extras]);
        // 100,00 + 15,50 + 4 × 0,50
        assert_eq!(result.items[0].total.formatted_value, "117,50");
        assert_eq!(result.aggregate.total.cents, 11750);
    }

    #[test]
    fn test_process_batch_dimensions_are_optional_as_a_pair() {
        let no_dims = ProductionItem {
            value: Some("30,00".to_string()),
            ..Default::default()
        };
        let half_dims = ProductionItem {
            width: Some("100".to_string()),
            value: Some("30,00".to_string()),
            ..Default::default()
        };

        let result = run(&[no_dims, half_dims]);
        assert!(result.items[0].validation.is_valid());
        assert!(result.items[0].area.is_zero());
        assert!(!result.items[1].validation.is_valid());
        assert!(result.failures[0].errors[0].contains("height"));
    }

    #[test]
    fn test_process_batch_rejects_negative_extras_and_bad_ilhos() {
        let mut negative = item("100", "100", "10,00");
        negative.extras_value = Some("-1".to_string());

        let mut bad_ilhos = item("100", "100", "10,00");
        bad_ilhos.ilhos = Some(IlhosConfig {
            quantity: "0".to_string(),
            unit_price: "0,50".to_string(),
            spacing: "20".to_string(),
        });

        let result = run(&[negative, bad_ilhos]);
        assert_eq!(result.aggregate.valid_count, 0);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[1].errors[0].contains("quantity"));
    }

    #[test]
    fn test_process_batch_warnings_do_not_exclude_items() {
        let result = run(&[item("800", "100", "25.000,00")]);
        assert_eq!(result.aggregate.valid_count, 1);
        assert_eq!(result.items[0].validation.warnings().len(), 2);
    }

    #[test]
    fn test_process_batch_survives_eyelet_coverage_overflow() {
        let mut huge_spacing = item("100", "100", "10,00");
        huge_spacing.ilhos = Some(IlhosConfig {
            quantity: "2".to_string(),
            unit_price: "0,50".to_string(),
            spacing: "79228162514264337593543950335".to_string(),
        });

        let result = run(&[item("150", "200", "100,00"), huge_spacing]);

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.aggregate.valid_count, 2);
        assert!(result.failures.is_empty());
        assert!(result.items[1].validation.warnings()[0].contains("eyelets cover over"));
        // 100,00 + 10,00 + 2 × 0,50
        assert_eq!(result.aggregate.total.formatted_value, "111,00");
    }

    #[test]
    fn test_process_batch_reports_calculation_time() {
        let result = run(&[item("150", "200", "100,00")]);
        assert!(result.aggregate.calculation_time_ms >= 0.0);
        assert!(result.aggregate.calculation_time_ms.is_finite());
    }

    #[test]
    fn test_process_batch_empty() {
        let result = run(&[]);
        assert_eq!(result.aggregate.item_count, 0);
        assert_eq!(result.aggregate.formatted_total_area, "0,00");
        assert_eq!(result.aggregate.total.formatted_value, "0,00");
    }
}
