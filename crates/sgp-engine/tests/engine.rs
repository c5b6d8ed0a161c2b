//! End-to-end tests of the engine facade.

use std::sync::Arc;

use rust_decimal::Decimal;
use sgp_engine::sgp_core::money::Money;
use sgp_engine::sgp_core::types::{Dimension, IlhosConfig, ProductionItem};
use sgp_engine::{Engine, EngineConfig, EngineError, EngineState};

async fn ready_engine() -> Engine {
    let engine = Engine::new(EngineConfig::default());
    engine.init().await;
    engine
}

fn item(id: &str, width: &str, height: &str, value: &str) -> ProductionItem {
    ProductionItem {
        id: Some(id.to_string()),
        kind: "painel".to_string(),
        width: Some(width.to_string()),
        height: Some(height.to_string()),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_every_operation_requires_init() {
    let engine = Engine::new(EngineConfig::default());

    assert!(matches!(
        engine.calculate_area(150, 200),
        Err(EngineError::NotInitialized {
            operation: "calculate_area"
        })
    ));
    assert!(engine.calculate_batch_areas(&[]).is_err());
    assert!(engine.parse_money("100").is_err());
    assert!(engine.format_money(Money::zero()).is_err());
    assert!(engine.calculate_total(&["1,00"]).is_err());
    assert!(engine.validate_dimensions(1, 1).is_err());
    assert!(engine.validate_money_value(1).is_err());
    assert!(engine.validate_ilhos_config(1, 1, 10).is_err());
    assert!(engine.is_valid_email("a@b.co").is_err());
    assert!(engine.is_valid_cpf("52998224725").is_err());
    assert!(engine.parse_number_safe("1").is_err());
    assert!(engine.process_batch(&[]).is_err());
    assert!(engine.run_benchmark(1).is_err());
    assert!(engine.clear_cache().is_err());

    let stats = engine.stats();
    assert!(!stats.initialized);
    assert_eq!(stats.cache_size, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_init_converges_on_ready() {
    let engine = Arc::new(Engine::new(EngineConfig::default()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine.init().await;
                engine.is_ready()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap());
    }
    assert_eq!(engine.state(), EngineState::Ready);
}

#[tokio::test]
async fn test_parse_money_is_cents_first() {
    let engine = ready_engine().await;

    let parsed = engine.parse_money("12345").unwrap();
    assert!(parsed.is_ok());
    assert_eq!(parsed.value.cents, 12345);
    assert_eq!(parsed.value.raw_value, Decimal::new(12345, 2));
    assert_eq!(parsed.value.formatted_value, "123,45");

    let empty = engine.parse_money("").unwrap();
    assert_eq!(empty.value.cents, 0);
    assert!(empty.error.is_some());
}

#[tokio::test]
async fn test_area_and_validation() {
    let engine = ready_engine().await;

    let area = engine.calculate_area(150, 200).unwrap();
    assert_eq!(area.area, Decimal::new(300, 2));

    let invalid = engine.calculate_area(0, 200).unwrap();
    assert!(!invalid.is_valid());
    assert!(invalid.area.is_zero());
}

#[tokio::test]
async fn test_repeated_area_is_a_cache_hit() {
    let engine = ready_engine().await;

    let first = engine.calculate_area(150, 200).unwrap();
    let size_after_first = engine.stats().cache_size;

    let second = engine.calculate_area(150, 200).unwrap();
    let stats = engine.stats();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(stats.cache_size, size_after_first);
    assert_eq!(stats.cache_hits, 1);
}

#[tokio::test]
async fn test_batch_areas_share_the_cache() {
    let engine = ready_engine().await;
    let pair = Dimension::new(Decimal::from(150), Decimal::from(200));

    let results = engine.calculate_batch_areas(&[pair, pair, pair]).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(engine.stats().cache_size, 1);
    assert_eq!(engine.stats().cache_hits, 2);
}

#[tokio::test]
async fn test_totals_are_exact() {
    let engine = ready_engine().await;

    let total = engine.calculate_total(&["100,00", "50,00"]).unwrap();
    assert_eq!(total.amount.formatted_value, "150,00");

    let dimes = vec!["0,10"; 1000];
    let total = engine.calculate_total(&dimes).unwrap();
    assert_eq!(total.amount.formatted_value, "100,00");
    assert!(total.warnings.is_empty());
}

#[tokio::test]
async fn test_ilhos_and_identity_checks() {
    let engine = ready_engine().await;

    assert!(engine.validate_ilhos_config(4, "0,50", "20").unwrap().is_valid());

    let result = engine.validate_ilhos_config(0, "0,50", "20").unwrap();
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.contains("quantity")));

    assert!(!engine.is_valid_cpf("11111111111").unwrap());
    assert!(engine.is_valid_cpf("529.982.247-25").unwrap());
    assert!(engine.is_valid_email("cliente@grafica.com.br").unwrap());
}

#[tokio::test]
async fn test_batch_isolates_one_malformed_item() {
    let engine = ready_engine().await;

    let mut items: Vec<ProductionItem> = (0..4)
        .map(|n| item(&format!("item-{}", n), "100", "100", "25,00"))
        .collect();
    items[2].value = Some("não informado".to_string());
    items[3].ilhos = Some(IlhosConfig {
        quantity: "8".to_string(),
        unit_price: "0,50".to_string(),
        spacing: "25".to_string(),
    });

    let result = engine.process_batch(&items).unwrap();

    assert_eq!(result.items.len(), 4);
    assert_eq!(result.aggregate.valid_count, 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].id.as_deref(), Some("item-2"));
    // 3 × 25,00 + 8 × 0,50
    assert_eq!(result.aggregate.total.formatted_value, "79,00");
    assert_eq!(result.aggregate.formatted_total_area, "3,00");

    // Every item used the same dimensions: one cache entry.
    assert_eq!(engine.stats().cache_size, 1);
}

#[tokio::test]
async fn test_clear_cache_empties_stats() {
    let engine = ready_engine().await;
    engine.calculate_area(150, 200).unwrap();
    engine.parse_money("999").unwrap();
    assert_eq!(engine.stats().cache_size, 2);

    engine.clear_cache().unwrap();
    let stats = engine.stats();
    assert_eq!(stats.cache_size, 0);
    assert_eq!(stats.cache_hits, 0);
    assert!(stats.initialized);
}
