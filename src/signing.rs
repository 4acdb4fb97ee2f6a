//! Signing adapter and key storage boundaries
//!
//! The serializer never touches key material directly. It asks a `KeyStore`
//! for the key and public key behind each input and hands the data to sign
//! to a `Signer`. `EcdsaSigner` and `MemoryKeyStore` are the default
//! implementations; wallets with encrypted storage plug in their own.

use std::collections::HashMap;

use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::address::address_from_public_key;
use crate::config::NetworkConfig;
use crate::constants::*;
use crate::error::{Result, TxError};
use crate::types::*;

/// Produces a signature over the data to sign
pub trait Signer {
    fn sign(&self, data_to_sign: &[u8], private_key: &SecretKey) -> Result<Vec<u8>>;
}

/// Read-only key lookup for the inputs being signed
pub trait KeyStore {
    fn address_for_input(&self, input: &Input) -> Result<String>;

    fn public_key_for_input(&self, input: &Input) -> Result<Vec<u8>>;

    /// Unlocks the private key behind `input` with `password`
    fn private_key_for_input(&self, input: &Input, password: &str) -> Result<SecretKey>;
}

/// ECDSA over SHA256(data), DER encoded, deterministic nonces
pub struct EcdsaSigner {
    secp: Secp256k1<secp256k1::All>,
}

impl EcdsaSigner {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for EcdsaSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Signer for EcdsaSigner {
    fn sign(&self, data_to_sign: &[u8], private_key: &SecretKey) -> Result<Vec<u8>> {
        let message = data_to_sign_message(data_to_sign)?;
        let signature = self.secp.sign_ecdsa(&message, private_key);
        Ok(signature.serialize_der().to_vec())
    }
}

fn data_to_sign_message(data_to_sign: &[u8]) -> Result<Message> {
    let digest = Sha256::digest(data_to_sign);
    Message::from_digest_slice(&digest).map_err(|e| TxError::Signing(e.to_string()))
}

/// Checks that `input.data` is `push(signature) push(public_key)` and that
/// the signature is valid for `data_to_sign`
pub fn verify_input_signature(input: &Input, data_to_sign: &[u8]) -> Result<bool> {
    let pushes = read_pushes(&input.data)?;
    let [signature, public_key] = pushes.as_slice() else {
        return Err(TxError::Signing(format!(
            "input data has {} pushes, expected 2",
            pushes.len()
        )));
    };

    let secp = Secp256k1::verification_only();
    let message = data_to_sign_message(data_to_sign)?;
    let public_key = PublicKey::from_slice(public_key).map_err(|e| TxError::Signing(e.to_string()))?;
    let signature = Signature::from_der(signature).map_err(|e| TxError::Signing(e.to_string()))?;
    Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}

fn read_pushes(data: &[u8]) -> Result<Vec<&[u8]>> {
    let mut pushes = Vec::new();
    let mut rest = data;
    while let Some((&first, tail)) = rest.split_first() {
        let (len, tail) = if first == OP_PUSHDATA1 {
            let (&len, tail) = tail
                .split_first()
                .ok_or_else(|| TxError::Signing("truncated OP_PUSHDATA1".to_string()))?;
            (usize::from(len), tail)
        } else if usize::from(first) < PUSHDATA_THRESHOLD {
            (usize::from(first), tail)
        } else {
            return Err(TxError::Signing(format!("unexpected opcode {:#04x} in input data", first)));
        };
        if tail.len() < len {
            return Err(TxError::Signing("truncated push in input data".to_string()));
        }
        let (push, tail) = tail.split_at(len);
        pushes.push(push);
        rest = tail;
    }
    Ok(pushes)
}

/// In-memory, password-protected key store
///
/// Keys are indexed by address, and each spendable output by the address
/// that owns it.
pub struct MemoryKeyStore {
    network: NetworkConfig,
    password_hash: [u8; 32],
    secp: Secp256k1<secp256k1::All>,
    keys: HashMap<String, SecretKey>,
    utxos: HashMap<(TxId, u8), String>,
}

impl MemoryKeyStore {
    pub fn new(network: NetworkConfig, password: &str) -> Self {
        Self {
            network,
            password_hash: hash_password(password),
            secp: Secp256k1::new(),
            keys: HashMap::new(),
            utxos: HashMap::new(),
        }
    }

    /// Stores `secret` and returns its address
    pub fn add_key(&mut self, secret: SecretKey) -> String {
        let public_key = PublicKey::from_secret_key(&self.secp, &secret);
        let address = address_from_public_key(&public_key.serialize(), &self.network);
        self.keys.insert(address.clone(), secret);
        address
    }

    pub fn add_key_hex(&mut self, secret_hex: &str) -> Result<String> {
        let bytes = hex::decode(secret_hex).map_err(|e| TxError::Signing(format!("invalid key hex: {}", e)))?;
        let secret = SecretKey::from_slice(&bytes).map_err(|e| TxError::Signing(e.to_string()))?;
        Ok(self.add_key(secret))
    }

    /// Records that output `index` of `tx_id` belongs to `address`
    pub fn register_utxo(&mut self, tx_id: TxId, index: u8, address: &str) -> Result<()> {
        if !self.keys.contains_key(address) {
            return Err(TxError::KeyNotFound(address.to_string()));
        }
        self.utxos.insert((tx_id, index), address.to_string());
        Ok(())
    }

    fn secret_for_input(&self, input: &Input) -> Result<&SecretKey> {
        let address = self.address_for_input(input)?;
        self.keys
            .get(&address)
            .ok_or(TxError::KeyNotFound(address))
    }
}

fn hash_password(password: &str) -> [u8; 32] {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

impl KeyStore for MemoryKeyStore {
    fn address_for_input(&self, input: &Input) -> Result<String> {
        self.utxos
            .get(&(input.tx_id, input.index))
            .cloned()
            .ok_or_else(|| {
                TxError::KeyNotFound(format!("no address for output {}:{}", hex::encode(input.tx_id), input.index))
            })
    }

    fn public_key_for_input(&self, input: &Input) -> Result<Vec<u8>> {
        let secret = self.secret_for_input(input)?;
        Ok(PublicKey::from_secret_key(&self.secp, secret).serialize().to_vec())
    }

    fn private_key_for_input(&self, input: &Input, password: &str) -> Result<SecretKey> {
        if hash_password(password) != self.password_hash {
            warn!("rejected signing request with wrong password");
            return Err(TxError::Signing("invalid password".to_string()));
        }
        self.secret_for_input(input).copied()
    }
}
