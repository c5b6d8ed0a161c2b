//! # Engine Facade
//!
//! The single entry point the host application talks to.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Engine Lifecycle                                 │
//! │                                                                         │
//! │   Engine::new(config)                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   ┌───────────────┐  init().await  ┌──────────────┐     ┌───────────┐  │
//! │   │ Uninitialized │ ─────────────► │ Initializing │ ──► │   Ready   │  │
//! │   └───────────────┘                └──────────────┘     └───────────┘  │
//! │          │                                ▲                   │         │
//! │          │ any operation                  │ concurrent        │ every   │
//! │          ▼                                │ init() calls      │ op is   │
//! │   Err(NotInitialized)                     │ await the same    │ sync    │
//! │                                           │ bootstrap         ▼         │
//! │                                                           results       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use sgp_engine::{Engine, EngineConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), sgp_engine::EngineError> {
//! let engine = Engine::new(EngineConfig::default());
//! assert!(engine.calculate_area(150, 200).is_err());
//!
//! engine.init().await;
//! let area = engine.calculate_area("150", "200")?;
//! assert_eq!(area.formatted_area, "3,00");
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

use rust_decimal::Decimal;
use serde::Serialize;
use sgp_core::batch::{self, BatchResult, MoneyTotal};
use sgp_core::geometry::{self, AreaCalculator, AreaResult};
use sgp_core::money::{self, MonetaryAmount, Money};
use sgp_core::number::{self, NumericInput, NumericRead};
use sgp_core::types::{Dimension, Parsed, ProductionItem};
use sgp_core::validation::{self, ValidationResult};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use ts_rs::TS;

use crate::benchmark::{self, BenchmarkReport};
use crate::cache::{CacheKey, CachedValue, CalculationCache};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// State & Stats
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => EngineState::Initializing,
            2 => EngineState::Ready,
            _ => EngineState::Uninitialized,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            EngineState::Uninitialized => 0,
            EngineState::Initializing => 1,
            EngineState::Ready => 2,
        }
    }
}

/// Read-only snapshot of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub initialized: bool,
    pub cache_size: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

// =============================================================================
// Engine
// =============================================================================

/// Calculation engine instance.
///
/// Owned by the host and shared by reference (`Arc<Engine>` across tasks).
/// No global state: two engines never share a cache.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    cache: CalculationCache,
    bootstrap: OnceCell<()>,
    state: AtomicU8,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Engine {
            config,
            cache: CalculationCache::new(),
            bootstrap: OnceCell::new(),
            state: AtomicU8::new(EngineState::Uninitialized.as_u8()),
        }
    }

    /// Brings the engine to `Ready`.
    ///
    /// Idempotent. Concurrent callers await the one in-flight bootstrap and
    /// all return once it has completed.
    pub async fn init(&self) {
        self.bootstrap
            .get_or_init(|| async {
                self.set_state(EngineState::Initializing);
                info!(
                    cache_enabled = self.config.cache.enabled,
                    "Initializing calculation engine"
                );

                // Compiles the e-mail pattern before the first form needs it.
                validation::is_valid_email("bootstrap@sgp.local");

                self.set_state(EngineState::Ready);
                info!("Calculation engine ready");
            })
            .await;
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot of readiness and cache counters. Never fails.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            initialized: self.is_ready(),
            cache_size: self.cache.len(),
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
        }
    }

    fn set_state(&self, state: EngineState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    fn ensure_ready(&self, operation: &'static str) -> EngineResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            debug!(operation, state = ?self.state(), "Operation rejected before init");
            Err(EngineError::NotInitialized { operation })
        }
    }

    // =========================================================================
    // Cached Primitives
    // =========================================================================

    pub(crate) fn cached_area(&self, width: Decimal, height: Decimal) -> AreaResult {
        let compute = || geometry::calculate_area_with_limits(width, height, &self.config.limits);

        if !self.config.cache.enabled {
            return compute();
        }

        self.cache
            .get_or_insert_with(CacheKey::area(width, height), || {
                CachedValue::Area(compute())
            })
            .into_area()
            .unwrap_or_else(compute)
    }

    pub(crate) fn cached_money(&self, input: &str) -> Parsed<MonetaryAmount> {
        if !self.config.cache.enabled {
            return money::parse_money(input);
        }

        self.cache
            .get_or_insert_with(CacheKey::money(input), || {
                CachedValue::Money(money::parse_money(input))
            })
            .into_money()
            .unwrap_or_else(|| money::parse_money(input))
    }

    fn area_calculator(&self) -> CachedAreaCalculator<'_> {
        CachedAreaCalculator { engine: self }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Area of one panel. Readable pairs go through the cache.
    pub fn calculate_area(
        &self,
        width: impl NumericInput,
        height: impl NumericInput,
    ) -> EngineResult<AreaResult> {
        self.ensure_ready("calculate_area")?;

        match (width.read_number(), height.read_number()) {
            (NumericRead::Value(w), NumericRead::Value(h)) => Ok(self.cached_area(w, h)),
            _ => Ok(geometry::calculate_area_with_limits(
                width,
                height,
                &self.config.limits,
            )),
        }
    }

    pub fn calculate_batch_areas(&self, pairs: &[Dimension]) -> EngineResult<Vec<AreaResult>> {
        self.ensure_ready("calculate_batch_areas")?;
        Ok(geometry::calculate_batch_areas_with(
            pairs,
            &self.area_calculator(),
        ))
    }

    // =========================================================================
    // Money
    // =========================================================================

    pub fn parse_money(&self, input: &str) -> EngineResult<Parsed<MonetaryAmount>> {
        self.ensure_ready("parse_money")?;
        Ok(self.cached_money(input))
    }

    pub fn format_money(&self, amount: Money) -> EngineResult<String> {
        self.ensure_ready("format_money")?;
        Ok(money::format_money(amount))
    }

    pub fn calculate_total<S: AsRef<str>>(&self, values: &[S]) -> EngineResult<MoneyTotal> {
        self.ensure_ready("calculate_total")?;
        Ok(batch::calculate_total(values))
    }

    pub fn parse_number_safe(&self, input: &str) -> EngineResult<Parsed<Decimal>> {
        self.ensure_ready("parse_number_safe")?;
        Ok(number::parse_number_safe(input))
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub fn validate_dimensions(
        &self,
        width: impl NumericInput,
        height: impl NumericInput,
    ) -> EngineResult<ValidationResult> {
        self.ensure_ready("validate_dimensions")?;
        Ok(validation::validate_dimensions_with_limits(
            width,
            height,
            &self.config.limits,
        ))
    }

    pub fn validate_money_value(&self, value: impl NumericInput) -> EngineResult<ValidationResult> {
        self.ensure_ready("validate_money_value")?;
        Ok(validation::validate_money_value_with_limits(
            value,
            &self.config.limits,
        ))
    }

    pub fn validate_ilhos_config(
        &self,
        quantity: impl NumericInput,
        unit_price: impl NumericInput,
        spacing: impl NumericInput,
    ) -> EngineResult<ValidationResult> {
        self.ensure_ready("validate_ilhos_config")?;
        Ok(validation::validate_ilhos_config_with_limits(
            quantity,
            unit_price,
            spacing,
            &self.config.limits,
        ))
    }

    pub fn is_valid_email(&self, email: &str) -> EngineResult<bool> {
        self.ensure_ready("is_valid_email")?;
        Ok(validation::is_valid_email(email))
    }

    pub fn is_valid_cpf(&self, cpf: &str) -> EngineResult<bool> {
        self.ensure_ready("is_valid_cpf")?;
        Ok(validation::is_valid_cpf(cpf))
    }

    // =========================================================================
    // Batch & Maintenance
    // =========================================================================

    pub fn process_batch(&self, items: &[ProductionItem]) -> EngineResult<BatchResult> {
        self.ensure_ready("process_batch")?;
        Ok(batch::process_batch(
            items,
            &self.area_calculator(),
            &self.config.limits,
        ))
    }

    pub fn run_benchmark(&self, iterations: u32) -> EngineResult<BenchmarkReport> {
        self.ensure_ready("run_benchmark")?;
        Ok(benchmark::run(self, iterations))
    }

    pub fn clear_cache(&self) -> EngineResult<()> {
        self.ensure_ready("clear_cache")?;
        let size = self.cache.len();
        self.cache.clear();
        info!(entries = size, "Engine cache cleared");
        Ok(())
    }
}

// =============================================================================
// Cached Area Calculator
// =============================================================================

/// Routes batch area calculations through the engine cache.
#[derive(Debug, Clone, Copy)]
pub struct CachedAreaCalculator<'a> {
    engine: &'a Engine,
}

impl AreaCalculator for CachedAreaCalculator<'_> {
    fn area(&self, width: Decimal, height: Decimal) -> AreaResult {
        self.engine.cached_area(width, height)
    }
}
