//! # Ledger-Tx
//!
//! Transaction encoding, scripting and weight calculation for a DAG-based
//! UTXO ledger.
//!
//! This crate turns a structured transaction description into the canonical
//! byte sequence that is signed, hashed and broadcast, builds the locking and
//! unlocking scripts, and assigns the anti-spam weight every transaction must
//! carry. Nodes reject anything that is off by a single byte, so every
//! encoder either produces the exact wire form or fails.
//!
//! ## Control flow
//!
//! 1. `data_to_sign` serializes the transaction with empty input scripts
//! 2. `sign_tx` asks a `Signer` for a signature per input and fills the scripts
//! 3. `complete_tx` sets the timestamp and weight
//! 4. `tx_to_bytes` produces the submittable bytes
//!
//! ## Usage
//!
//! ```rust
//! use ledger_tx::TxEngine;
//! use ledger_tx::types::*;
//!
//! let engine = TxEngine::default();
//! let tx = Transaction::new(
//!     vec![Input::new([0xab; 32], 0)],
//!     vec![Output::new(100, OutputScript::p2pkh("WR1i8USJWQuaU423fwuFQbezfevmT4vFWX"))],
//! );
//! let data = engine.data_to_sign(&tx).unwrap();
//! assert_eq!(&data[..2], &[0x00, 0x01]);
//! ```

pub mod types;
pub mod constants;
pub mod encoding;
pub mod address;
pub mod script;
pub mod weight;
pub mod transaction;
pub mod signing;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use config::{NetworkConfig, TxConfig};
pub use error::{ErrorKind, Result, TxError};
pub use signing::{EcdsaSigner, KeyStore, MemoryKeyStore, Signer};
pub use weight::{WeightCalculator, WeightConstants};

use tracing::info;

/// Transaction engine: a configuration plus the shared weight calculator
///
/// # Examples
///
/// ```
/// use ledger_tx::{TxConfig, TxEngine, NetworkConfig};
///
/// let config = TxConfig { network: NetworkConfig::mainnet(), ..TxConfig::default() };
/// let engine = TxEngine::new(config).unwrap();
/// assert_eq!(engine.network().name, "mainnet");
/// ```
#[derive(Debug, Clone)]
pub struct TxEngine {
    config: TxConfig,
    weight: WeightCalculator,
}

impl TxEngine {
    pub fn new(config: TxConfig) -> Result<Self> {
        config.validate()?;
        let weight = WeightCalculator::new(config.weight, config.decimal_places);
        Ok(Self { config, weight })
    }

    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.config.network
    }

    pub fn weight_calculator(&self) -> &WeightCalculator {
        &self.weight
    }

    pub fn weight_constants(&self) -> WeightConstants {
        self.weight.constants()
    }

    /// Update the weight curve; visible to every clone of this engine
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_tx::{TxEngine, WeightConstants};
    ///
    /// let engine = TxEngine::default();
    /// engine.set_weight_constants(WeightConstants::new(10.0, 1.5, 8.0)).unwrap();
    /// assert_eq!(engine.weight_constants().min_weight, 10.0);
    /// ```
    pub fn set_weight_constants(&self, constants: WeightConstants) -> Result<()> {
        self.weight.set_constants(constants)
    }

    /// Decode a base58 address to its 25 raw bytes
    pub fn decode_address(&self, address: &str) -> Result<Vec<u8>> {
        address::decode_address(address)
    }

    /// Check checksum and version byte of a decoded address
    pub fn validate_address(&self, address: &str, decoded: &[u8]) -> Result<()> {
        address::validate_address(address, decoded, self.network())
    }

    pub fn create_output_script(&self, script: &OutputScript) -> Result<ByteString> {
        script::create_output_script(script, self.network())
    }

    /// The bytes that get signed: the transaction with empty input scripts
    ///
    /// # Examples
    ///
    /// ```
    /// use ledger_tx::TxEngine;
    /// use ledger_tx::types::*;
    ///
    /// let engine = TxEngine::default();
    /// let mut tx = Transaction::new(
    ///     vec![Input::new([1; 32], 0)],
    ///     vec![Output::new(5, OutputScript::p2pkh("WR1i8USJWQuaU423fwuFQbezfevmT4vFWX"))],
    /// );
    /// let unsigned = engine.data_to_sign(&tx).unwrap();
    /// tx.inputs[0].data = vec![0xde, 0xad];
    /// assert_eq!(engine.data_to_sign(&tx).unwrap(), unsigned);
    /// ```
    pub fn data_to_sign(&self, tx: &Transaction) -> Result<Vec<u8>> {
        transaction::data_to_sign(tx, self.network())
    }

    pub fn tx_to_bytes(&self, tx: &Transaction) -> Result<Vec<u8>> {
        transaction::tx_to_bytes(tx, self.network())
    }

    pub fn tx_from_bytes(&self, bytes: &[u8]) -> Result<Transaction> {
        transaction::tx_from_bytes(bytes, self.network())
    }

    pub fn tx_hash(&self, tx: &Transaction) -> Result<TxId> {
        transaction::tx_hash(tx, self.network())
    }

    pub fn calculate_tx_weight(&self, tx: &Transaction) -> Result<f64> {
        self.weight.calculate_tx_weight(tx, self.network())
    }

    pub fn get_outputs_sum(&self, outputs: &[Output]) -> Result<u64> {
        transaction::get_outputs_sum(outputs)
    }

    pub fn get_deposit_amount(&self, mint_amount: u64) -> u64 {
        transaction::get_deposit_amount(mint_amount, self.config.token_deposit_basis_points)
    }

    pub fn get_withdraw_amount(&self, melt_amount: u64) -> u64 {
        transaction::get_withdraw_amount(melt_amount, self.config.token_deposit_basis_points)
    }

    pub fn sign_tx<K, S>(
        &self,
        tx: Transaction,
        data_to_sign: &[u8],
        password: &str,
        keys: &K,
        signer: &S,
    ) -> Result<Transaction>
    where
        K: KeyStore + ?Sized,
        S: Signer + ?Sized,
    {
        transaction::sign_tx(tx, data_to_sign, password, keys, signer)
    }

    pub fn set_weight_if_needed(&self, tx: &mut Transaction) -> Result<()> {
        transaction::set_weight_if_needed(tx, &self.weight, self.network())
    }

    pub fn complete_tx(&self, tx: &mut Transaction) -> Result<()> {
        transaction::complete_tx(tx, &self.weight, self.network())
    }

    /// Validate, sign, complete and serialize `tx` in one pass
    ///
    /// Returns the completed transaction and its submittable bytes.
    pub fn prepare_tx<K, S>(
        &self,
        tx: Transaction,
        password: &str,
        keys: &K,
        signer: &S,
    ) -> Result<(Transaction, Vec<u8>)>
    where
        K: KeyStore + ?Sized,
        S: Signer + ?Sized,
    {
        transaction::validate_tx(&tx)?;
        let data = self.data_to_sign(&tx)?;
        let mut signed = self.sign_tx(tx, &data, password, keys, signer)?;
        self.complete_tx(&mut signed)?;
        let bytes = self.tx_to_bytes(&signed)?;
        info!(
            inputs = signed.inputs.len(),
            outputs = signed.outputs.len(),
            len = bytes.len(),
            "prepared transaction"
        );
        Ok((signed, bytes))
    }
}

impl Default for TxEngine {
    /// Engine with the default testnet configuration
    fn default() -> Self {
        let config = TxConfig::default();
        let weight = WeightCalculator::new(config.weight, config.decimal_places);
        Self { config, weight }
    }
}
