//! Base58 address codec
//!
//! An address is `[version:1][hash:20][checksum:4]`, base58 encoded. The
//! checksum is the first 4 bytes of the double SHA-256 of the first 21
//! bytes. The version byte tells the network and whether the hash is a
//! public key hash or a script hash.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::config::NetworkConfig;
use crate::constants::*;
use crate::error::{Result, TxError};

/// What the embedded hash commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    P2pkh,
    P2sh,
}

/// A decoded and validated address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub kind: AddressKind,
    pub hash: [u8; PUBKEY_HASH_LEN],
}

impl Address {
    /// Decode and validate `address` against `network`
    pub fn parse(address: &str, network: &NetworkConfig) -> Result<Self> {
        let decoded = decode_address(address)?;
        validate_address(address, &decoded, network)?;
        let kind = if decoded[0] == network.p2pkh_version {
            AddressKind::P2pkh
        } else {
            AddressKind::P2sh
        };
        let mut hash = [0u8; PUBKEY_HASH_LEN];
        hash.copy_from_slice(&decoded[1..1 + PUBKEY_HASH_LEN]);
        Ok(Self { kind, hash })
    }

    pub fn to_base58(&self, network: &NetworkConfig) -> String {
        let version = match self.kind {
            AddressKind::P2pkh => network.p2pkh_version,
            AddressKind::P2sh => network.p2sh_version,
        };
        encode_address(version, &self.hash)
    }
}

/// DecodeAddress: base58 → 𝔹^25
pub fn decode_address(address: &str) -> Result<Vec<u8>> {
    let decoded = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| TxError::Address(format!("invalid base58 '{}': {}", address, e)))?;
    if decoded.len() != ADDRESS_LEN {
        return Err(TxError::Address(format!(
            "'{}' decodes to {} bytes, expected {}",
            address,
            decoded.len(),
            ADDRESS_LEN
        )));
    }
    Ok(decoded)
}

/// ValidateAddress: checks length, checksum and version byte
pub fn validate_address(address: &str, decoded: &[u8], network: &NetworkConfig) -> Result<()> {
    if decoded.len() != ADDRESS_LEN {
        return Err(TxError::Address(format!("'{}' has wrong length", address)));
    }
    let (payload, checksum) = decoded.split_at(ADDRESS_LEN - ADDRESS_CHECKSUM_LEN);
    if checksum != get_checksum(payload).as_slice() {
        return Err(TxError::Address(format!("'{}' has invalid checksum", address)));
    }
    let version = decoded[0];
    if version != network.p2pkh_version && version != network.p2sh_version {
        return Err(TxError::Address(format!(
            "'{}' has version byte {:#04x}, not valid on {}",
            address, version, network.name
        )));
    }
    Ok(())
}

/// First 4 bytes of SHA256d(payload)
pub fn get_checksum(payload: &[u8]) -> [u8; ADDRESS_CHECKSUM_LEN] {
    let digest = sha256d::Hash::hash(payload).into_inner();
    let mut checksum = [0u8; ADDRESS_CHECKSUM_LEN];
    checksum.copy_from_slice(&digest[..ADDRESS_CHECKSUM_LEN]);
    checksum
}

/// Build a base58 address from a version byte and 20-byte hash
pub fn encode_address(version: u8, hash: &[u8; PUBKEY_HASH_LEN]) -> String {
    let mut payload = Vec::with_capacity(ADDRESS_LEN);
    payload.push(version);
    payload.extend_from_slice(hash);
    let checksum = get_checksum(&payload);
    payload.extend_from_slice(&checksum);
    bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// HASH160: RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; PUBKEY_HASH_LEN] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(&sha256_hash);
    let mut out = [0u8; PUBKEY_HASH_LEN];
    out.copy_from_slice(&ripemd160_hash);
    out
}

/// P2PKH address of a serialized public key
pub fn address_from_public_key(public_key: &[u8], network: &NetworkConfig) -> String {
    encode_address(network.p2pkh_version, &hash160(public_key))
}
