//! Transaction weight: an anti-spam admission score derived from size
//!
//! weight(tx) = max(min_weight, c × log₂(size) + 4 / (1 + k / amount) + 4) + ε
//!
//! where `size` is the serialized length with two parents assumed and
//! `amount` is the sum of non-authority outputs in whole units. The
//! constants are shared process-wide through a `WeightCalculator`; updates
//! are visible to every later computation. Writers are expected to be
//! single; the lock only keeps reads from tearing.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::constants::*;
use crate::error::{Result, TxError};
use crate::transaction::{get_outputs_sum, tx_to_bytes};
use crate::types::*;

/// Constants of the weight curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConstants {
    pub min_weight: f64,
    pub weight_coefficient: f64,
    pub min_weight_k: f64,
}

impl Default for WeightConstants {
    fn default() -> Self {
        Self {
            min_weight: DEFAULT_MIN_WEIGHT,
            weight_coefficient: DEFAULT_WEIGHT_COEFFICIENT,
            min_weight_k: DEFAULT_MIN_WEIGHT_K,
        }
    }
}

impl WeightConstants {
    pub fn new(min_weight: f64, weight_coefficient: f64, min_weight_k: f64) -> Self {
        Self {
            min_weight,
            weight_coefficient,
            min_weight_k,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_weight", self.min_weight),
            ("weight_coefficient", self.weight_coefficient),
            ("min_weight_k", self.min_weight_k),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TxError::Config(format!("{} must be finite and >= 0, got {}", name, value)));
            }
        }
        Ok(())
    }
}

/// Weight of a transaction of `size` bytes moving `amount` whole units
pub fn compute_weight(size: usize, amount: f64, constants: &WeightConstants) -> f64 {
    let weight = constants.weight_coefficient * (size as f64).log2()
        + 4.0 / (1.0 + constants.min_weight_k / amount)
        + 4.0;
    weight.max(constants.min_weight) + WEIGHT_EPSILON
}

/// Weight calculator holding the shared curve constants
#[derive(Debug, Clone)]
pub struct WeightCalculator {
    constants: Arc<RwLock<WeightConstants>>,
    decimal_places: u32,
}

impl WeightCalculator {
    pub fn new(constants: WeightConstants, decimal_places: u32) -> Self {
        Self {
            constants: Arc::new(RwLock::new(constants)),
            decimal_places,
        }
    }

    pub fn constants(&self) -> WeightConstants {
        *self.constants.read()
    }

    /// Replace the curve constants for every holder of this calculator
    pub fn set_constants(&self, constants: WeightConstants) -> Result<()> {
        constants.validate()?;
        info!(
            min_weight = constants.min_weight,
            weight_coefficient = constants.weight_coefficient,
            min_weight_k = constants.min_weight_k,
            "weight constants updated"
        );
        *self.constants.write() = constants;
        Ok(())
    }

    pub fn reset(&self) {
        *self.constants.write() = WeightConstants::default();
    }

    /// CalculateTxWeight: 𝒯𝒳 → ℝ
    ///
    /// Fails with `MaximumNumberParents` before any work when the
    /// transaction has more than 3 parents. The parents themselves are not
    /// measured, so the result does not depend on how many there are.
    pub fn calculate_tx_weight(&self, tx: &Transaction, network: &NetworkConfig) -> Result<f64> {
        if tx.parents.len() > MAX_PARENTS {
            return Err(TxError::MaximumNumberParents(tx.parents.len()));
        }

        let unparented = Transaction {
            parents: Vec::new(),
            ..tx.clone()
        };
        let size = tx_to_bytes(&unparented, network)?.len() + WEIGHT_ASSUMED_PARENTS * HASH_LEN;

        // Authority-only transactions move nothing; avoid dividing by zero
        let sum = get_outputs_sum(&tx.outputs)?.max(1);
        let decimal_places = i32::try_from(self.decimal_places)
            .ok()
            .filter(|places| *places <= MAX_DECIMAL_PLACES)
            .ok_or_else(|| {
                TxError::Config(format!("{} decimal places is out of range", self.decimal_places))
            })?;
        let amount = sum as f64 / 10f64.powi(decimal_places);

        let weight = compute_weight(size, amount, &self.constants());
        debug!(size, amount, weight, "calculated transaction weight");
        Ok(weight)
    }
}

impl Default for WeightCalculator {
    fn default() -> Self {
        Self::new(WeightConstants::default(), DEFAULT_DECIMAL_PLACES)
    }
}
