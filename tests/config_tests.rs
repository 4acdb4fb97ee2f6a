//! Tests for loading engine configuration from JSON files

use std::io::Write;

use ledger_tx::*;
use tempfile::NamedTempFile;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_config() {
    init_tracing();
    let file = write_config(
        r#"{
            "network": {"name": "mainnet", "p2pkh_version": 40, "p2sh_version": 100},
            "weight": {"min_weight": 12.0, "weight_coefficient": 1.4, "min_weight_k": 80.0},
            "decimal_places": 4,
            "token_deposit_basis_points": 250
        }"#,
    );
    let config = TxConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.network, NetworkConfig::mainnet());
    assert_eq!(config.weight, WeightConstants::new(12.0, 1.4, 80.0));
    assert_eq!(config.decimal_places, 4);

    let engine = TxEngine::new(config).unwrap();
    assert_eq!(engine.weight_constants().min_weight, 12.0);
    // 2.5% of 1000
    assert_eq!(engine.get_deposit_amount(1000), 25);
    assert_eq!(engine.get_deposit_amount(1001), 26);
    assert_eq!(engine.get_withdraw_amount(1039), 25);
}

#[test]
fn test_load_empty_config_uses_defaults() {
    init_tracing();
    let file = write_config("{}");
    let config = TxConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config, TxConfig::default());
}

#[test]
fn test_partial_weight_section() {
    let config = TxConfig::from_json_str(r#"{"weight": {"min_weight": 8.0}}"#).unwrap();
    assert_eq!(config.weight.min_weight, 8.0);
    assert_eq!(config.weight.weight_coefficient, DEFAULT_WEIGHT_COEFFICIENT);
    assert_eq!(config.weight.min_weight_k, DEFAULT_MIN_WEIGHT_K);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TxConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_invalid_values() {
    for json in [
        r#"{"decimal_places": 19}"#,
        r#"{"weight": {"min_weight": -1.0}}"#,
        r#"{"token_deposit_basis_points": 10001}"#,
        r#"{"decimal_places": "two"}"#,
    ] {
        let err = TxConfig::from_json_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{}", json);
    }
}

#[test]
fn test_config_roundtrip_through_json() {
    let config = TxConfig {
        network: NetworkConfig::privatenet(),
        decimal_places: 8,
        ..TxConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(TxConfig::from_json_str(&json).unwrap(), config);
}
