//! Engine configuration: network, weight curve and token deposit
//!
//! Loaded from JSON; every field falls back to its default when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, TxError};
use crate::weight::WeightConstants;

/// Address version bytes of a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
}

impl NetworkConfig {
    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            p2pkh_version: 0x28,
            p2sh_version: 0x64,
        }
    }

    pub fn testnet() -> Self {
        Self {
            name: "testnet".to_string(),
            p2pkh_version: 0x49,
            p2sh_version: 0x87,
        }
    }

    pub fn privatenet() -> Self {
        Self {
            name: "privatenet".to_string(),
            ..Self::testnet()
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name {
            "mainnet" => Ok(Self::mainnet()),
            "testnet" => Ok(Self::testnet()),
            "privatenet" => Ok(Self::privatenet()),
            other => Err(TxError::Config(format!("unknown network '{}'", other))),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxConfig {
    pub network: NetworkConfig,
    pub weight: WeightConstants,
    /// Decimal places of the native currency amounts
    pub decimal_places: u32,
    /// Deposit charged on mint and returned on melt, in basis points
    pub token_deposit_basis_points: u64,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            weight: WeightConstants::default(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            token_deposit_basis_points: DEFAULT_TOKEN_DEPOSIT_BASIS_POINTS,
        }
    }
}

impl TxConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TxError::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TxError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.weight.validate()?;
        if self.token_deposit_basis_points > BASIS_POINTS_DENOMINATOR {
            return Err(TxError::Config(format!(
                "token deposit of {} basis points exceeds 100%",
                self.token_deposit_basis_points
            )));
        }
        if i64::from(self.decimal_places) > i64::from(MAX_DECIMAL_PLACES) {
            return Err(TxError::Config(format!(
                "{} decimal places is out of range",
                self.decimal_places
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TxConfig::default();
        assert_eq!(config.network, NetworkConfig::testnet());
        assert_eq!(config.decimal_places, 2);
        assert_eq!(config.token_deposit_basis_points, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = TxConfig::from_json_str(
            r#"{"network": {"name": "mainnet", "p2pkh_version": 40, "p2sh_version": 100},
                "weight": {"min_weight": 10.0, "weight_coefficient": 1.5, "min_weight_k": 8.0}}"#,
        )
        .unwrap();
        assert_eq!(config.network, NetworkConfig::mainnet());
        assert_eq!(config.weight.min_weight, 10.0);
        assert_eq!(config.weight.weight_coefficient, 1.5);
        assert_eq!(config.decimal_places, DEFAULT_DECIMAL_PLACES);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(TxConfig::from_json_str("{"), Err(TxError::Config(_))));
        assert!(matches!(
            TxConfig::from_json_str(r#"{"token_deposit_basis_points": 10001}"#),
            Err(TxError::Config(_))
        ));
    }

    #[test]
    fn test_network_by_name() {
        assert_eq!(NetworkConfig::by_name("mainnet").unwrap().p2pkh_version, 0x28);
        assert_eq!(NetworkConfig::by_name("privatenet").unwrap().p2sh_version, 0x87);
        assert!(NetworkConfig::by_name("nope").is_err());
    }
}
