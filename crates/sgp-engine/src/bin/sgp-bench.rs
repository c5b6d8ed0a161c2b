//! # Engine Benchmark
//!
//! Runs the fixed area + money workload and prints the report as JSON.
//!
//! ## Usage
//! ```bash
//! # Iterations from engine.toml (default 1000)
//! cargo run -p sgp-engine --bin sgp-bench
//!
//! # Custom iteration count
//! cargo run -p sgp-engine --bin sgp-bench -- --iterations 100000
//!
//! # Specific config file
//! cargo run -p sgp-engine --bin sgp-bench -- --config ./engine.toml
//! ```

use std::env;
use std::path::PathBuf;

use sgp_engine::telemetry::init_tracing;
use sgp_engine::{Engine, EngineConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut iterations: Option<u32> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--iterations" | "-n" => {
                let value = args.get(i + 1).ok_or("--iterations needs a value")?;
                iterations = Some(value.parse()?);
                i += 1;
            }
            "--config" | "-c" => {
                let value = args.get(i + 1).ok_or("--config needs a value")?;
                config_path = Some(PathBuf::from(value));
                i += 1;
            }
            "--help" | "-h" => {
                println!("SGP Engine Benchmark");
                println!();
                println!("Usage: sgp-bench [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --iterations <N>  Iterations to run (default: from config)");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => return Err(format!("Unknown argument: {}", other).into()),
        }
        i += 1;
    }

    let config = EngineConfig::load(config_path)?;
    let iterations = iterations.unwrap_or(config.benchmark.default_iterations);

    let engine = Engine::new(config);
    engine.init().await;

    let report = engine.run_benchmark(iterations)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
