//! Locking and unlocking script construction
//!
//! Scripts are assembled as a stack of byte buffers and concatenated at the
//! end. Opcode order is part of the network contract.

use crate::address::{decode_address, validate_address, AddressKind};
use crate::config::NetworkConfig;
use crate::constants::*;
use crate::encoding::int_to_bytes;
use crate::error::{Result, TxError};
use crate::types::*;

/// PushDataToStack: appends `len | data` when len < 0x4c,
/// else `OP_PUSHDATA1 | len | data`
pub fn push_data_to_stack(stack: &mut Vec<ByteString>, data: &[u8]) -> Result<()> {
    if data.len() < PUSHDATA_THRESHOLD {
        stack.push(vec![data.len() as u8]);
    } else if data.len() <= MAX_PUSHDATA1_LEN {
        stack.push(vec![OP_PUSHDATA1]);
        stack.push(vec![data.len() as u8]);
    } else {
        return Err(TxError::Serialization(format!(
            "push of {} bytes exceeds OP_PUSHDATA1 limit",
            data.len()
        )));
    }
    stack.push(data.to_vec());
    Ok(())
}

/// CreateOutputScript: dispatches on the output script kind
pub fn create_output_script(script: &OutputScript, network: &NetworkConfig) -> Result<ByteString> {
    let mut stack: Vec<ByteString> = Vec::new();
    match script {
        OutputScript::P2pkh { address, timelock } => {
            let hash = address_hash(address, AddressKind::P2pkh, network)?;
            push_timelock(&mut stack, *timelock)?;
            stack.push(vec![OP_DUP, OP_HASH160]);
            push_data_to_stack(&mut stack, &hash)?;
            stack.push(vec![OP_EQUALVERIFY, OP_CHECKSIG]);
        }
        OutputScript::P2sh { address, timelock } => {
            let hash = address_hash(address, AddressKind::P2sh, network)?;
            push_timelock(&mut stack, *timelock)?;
            stack.push(vec![OP_HASH160]);
            push_data_to_stack(&mut stack, &hash)?;
            stack.push(vec![OP_EQUAL]);
        }
        OutputScript::Data { data } => {
            push_data_to_stack(&mut stack, data)?;
            stack.push(vec![OP_CHECKSIG]);
        }
        OutputScript::Raw { script } => stack.push(script.clone()),
    }
    Ok(stack.concat())
}

/// CreateInputData: `push(signature) push(public_key)`
pub fn create_input_data(signature: &[u8], public_key: &[u8]) -> Result<ByteString> {
    let mut stack = Vec::new();
    push_data_to_stack(&mut stack, signature)?;
    push_data_to_stack(&mut stack, public_key)?;
    Ok(stack.concat())
}

fn push_timelock(stack: &mut Vec<ByteString>, timelock: Option<u32>) -> Result<()> {
    if let Some(timelock) = timelock {
        let bytes = int_to_bytes(u64::from(timelock), 4)?;
        push_data_to_stack(stack, &bytes)?;
        stack.push(vec![OP_GREATERTHAN_TIMESTAMP]);
    }
    Ok(())
}

fn address_hash(address: &str, expected: AddressKind, network: &NetworkConfig) -> Result<Vec<u8>> {
    let decoded = decode_address(address)?;
    validate_address(address, &decoded, network)?;
    let version = match expected {
        AddressKind::P2pkh => network.p2pkh_version,
        AddressKind::P2sh => network.p2sh_version,
    };
    if decoded[0] != version {
        return Err(TxError::Address(format!(
            "'{}' is not a {:?} address",
            address, expected
        )));
    }
    Ok(decoded[1..1 + PUBKEY_HASH_LEN].to_vec())
}

/// ParseOutputScript: the inverse of `create_output_script`.
/// Scripts that match no known template come back as `Raw`.
pub fn parse_output_script(script: &[u8], network: &NetworkConfig) -> OutputScript {
    parse_address_script(script, network).unwrap_or_else(|| match parse_data_script(script) {
        Some(data) => OutputScript::Data { data },
        None => OutputScript::Raw {
            script: script.to_vec(),
        },
    })
}

fn parse_address_script(script: &[u8], network: &NetworkConfig) -> Option<OutputScript> {
    let (timelock, rest) = match script {
        [4, t0, t1, t2, t3, OP_GREATERTHAN_TIMESTAMP, rest @ ..] => {
            (Some(u32::from_be_bytes([*t0, *t1, *t2, *t3])), rest)
        }
        _ => (None, script),
    };
    match rest {
        [OP_DUP, OP_HASH160, 20, body @ ..] if body.len() == 22 => {
            let (hash, tail) = body.split_at(PUBKEY_HASH_LEN);
            if tail != [OP_EQUALVERIFY, OP_CHECKSIG].as_slice() {
                return None;
            }
            Some(OutputScript::P2pkh {
                address: encode_hash(network.p2pkh_version, hash),
                timelock,
            })
        }
        [OP_HASH160, 20, body @ ..] if body.len() == 21 => {
            let (hash, tail) = body.split_at(PUBKEY_HASH_LEN);
            if tail != [OP_EQUAL].as_slice() {
                return None;
            }
            Some(OutputScript::P2sh {
                address: encode_hash(network.p2sh_version, hash),
                timelock,
            })
        }
        _ => None,
    }
}

fn parse_data_script(script: &[u8]) -> Option<ByteString> {
    let (last, body) = script.split_last()?;
    if *last != OP_CHECKSIG {
        return None;
    }
    match body {
        [OP_PUSHDATA1, len, data @ ..] if data.len() == usize::from(*len) && data.len() >= PUSHDATA_THRESHOLD => {
            Some(data.to_vec())
        }
        [len, data @ ..] if data.len() == usize::from(*len) && data.len() < PUSHDATA_THRESHOLD => {
            Some(data.to_vec())
        }
        _ => None,
    }
}

fn encode_hash(version: u8, hash: &[u8]) -> String {
    let mut fixed = [0u8; PUBKEY_HASH_LEN];
    fixed.copy_from_slice(hash);
    crate::address::encode_address(version, &fixed)
}
