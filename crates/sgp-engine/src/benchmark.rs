//! # Benchmark Harness
//!
//! Times a fixed workload through the engine so cache and parser
//! regressions show up as numbers.
//!
//! ```text
//! per iteration:
//!   area   150,5 cm × 200,75 cm      (engine cache)
//!   money  parse "123456" → format   (engine cache + formatter)
//! ```

use std::hint::black_box;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sgp_core::money::format_money;
use tracing::info;
use ts_rs::TS;

use crate::engine::Engine;

const BENCH_MONEY: &str = "123456";

/// 150,5 cm × 200,75 cm
fn bench_dimensions() -> (Decimal, Decimal) {
    (Decimal::new(1505, 1), Decimal::new(20075, 2))
}

/// Timings of one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkReport {
    pub iterations: u32,
    pub area_elapsed_ms: f64,
    pub money_elapsed_ms: f64,
    pub total_elapsed_ms: f64,
    #[ts(type = "string")]
    pub started_at: DateTime<Utc>,
    pub summary: String,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

pub(crate) fn run(engine: &Engine, iterations: u32) -> BenchmarkReport {
    let started_at = Utc::now();
    let total_start = Instant::now();

    let (width, height) = bench_dimensions();
    let area_start = Instant::now();
    for _ in 0..iterations {
        black_box(engine.cached_area(black_box(width), black_box(height)));
    }
    let area_elapsed = area_start.elapsed();

    let money_start = Instant::now();
    for _ in 0..iterations {
        let parsed = engine.cached_money(black_box(BENCH_MONEY));
        black_box(format_money(parsed.value.money()));
    }
    let money_elapsed = money_start.elapsed();

    let total_elapsed = total_start.elapsed();

    let summary = format!(
        "{} iterations: area {:.3} ms, money {:.3} ms, total {:.3} ms",
        iterations,
        millis(area_elapsed),
        millis(money_elapsed),
        millis(total_elapsed)
    );
    info!(
        iterations,
        area_ms = millis(area_elapsed),
        money_ms = millis(money_elapsed),
        "Benchmark finished"
    );

    BenchmarkReport {
        iterations,
        area_elapsed_ms: millis(area_elapsed),
        money_elapsed_ms: millis(money_elapsed),
        total_elapsed_ms: millis(total_elapsed),
        started_at,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn test_bench_inputs() {
        let (width, height) = bench_dimensions();
        assert_eq!(width.to_string(), "150.5");
        assert_eq!(height.to_string(), "200.75");
    }

    #[tokio::test]
    async fn test_run_reports_and_warms_cache() {
        let engine = Engine::new(EngineConfig::default());
        engine.init().await;

        let report = engine.run_benchmark(25).unwrap();
        assert_eq!(report.iterations, 25);
        assert!(report.total_elapsed_ms >= report.area_elapsed_ms);
        assert!(report.summary.starts_with("25 iterations"));

        // One area entry and one money entry, every later iteration a hit.
        let stats = engine.stats();
        assert_eq!(stats.cache_size, 2);
        assert_eq!(stats.cache_misses, 2);
        assert_eq!(stats.cache_hits, 48);
    }

    #[tokio::test]
    async fn test_zero_iterations() {
        let engine = Engine::new(EngineConfig::default());
        engine.init().await;

        let report = engine.run_benchmark(0).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(engine.stats().cache_size, 0);
    }
}
