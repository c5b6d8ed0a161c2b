//! # sgp-engine: Calculation Engine for Production-Order Forms
//!
//! Wraps the pure `sgp-core` calculations in an explicitly initialized,
//! cache-backed engine instance.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Engine Request Flow                             │
//! │                                                                         │
//! │  form field ──► Engine::calculate_area("150,5", "200,75")              │
//! │                      │                                                  │
//! │                      ├─ not Ready? ──► Err(NotInitialized)              │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │               CalculationCache ── hit ──► AreaResult                    │
//! │                      │                                                  │
//! │                      └─ miss ──► sgp_core::geometry ──► AreaResult      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The `Engine` facade and its lifecycle
//! - [`cache`] - Memoized area and money results
//! - [`benchmark`] - Timed fixed workload
//! - [`config`] - TOML + environment configuration
//! - [`telemetry`] - Tracing subscriber setup for binaries
//! - [`error`] - Engine error types

pub mod benchmark;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use benchmark::BenchmarkReport;
pub use cache::{CacheKey, CachedValue, CalculationCache};
pub use config::{BenchmarkSettings, CacheSettings, EngineConfig};
pub use engine::{CachedAreaCalculator, Engine, EngineState, EngineStats};
pub use error::{EngineError, EngineResult};

pub use sgp_core;
