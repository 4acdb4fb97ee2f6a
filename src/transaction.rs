//! Transaction serialization, signing and completion
//!
//! Wire layout (all integers big-endian):
//!
//! ```text
//! funds:  version:u16 | tokens_len:u8 | inputs_len:u8 | outputs_len:u8
//!         tokens    (32 bytes each)
//!         inputs    tx_id:32 | index:u8 | data_len:u16 | data
//!         outputs   value:4|8 | token_data:u8 | script_len:u16 | script
//! graph:  weight:f64 | timestamp:u32 | parents_len:u8 | parents (32 bytes each)
//! nonce:  u32
//! ```
//!
//! Token-creation transactions drop `tokens_len` and the token list and
//! append `info_version:u8 | name_len:u8 | name | symbol_len:u8 | symbol`
//! after the outputs. The bytes that get signed are the funds part with
//! every input's data left empty.

use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use chrono::Utc;
use tracing::{debug, trace};

use crate::config::NetworkConfig;
use crate::constants::*;
use crate::encoding::{float_to_bytes, int_to_bytes, output_value_to_bytes, Reader};
use crate::error::{Result, TxError};
use crate::script::{create_input_data, create_output_script, parse_output_script};
use crate::signing::{KeyStore, Signer};
use crate::types::*;
use crate::weight::WeightCalculator;

/// ValidateTx: structural checks that must hold before serialization
///
/// 1. |inputs| ≤ 255 ∧ |outputs| ≤ 255 ∧ |parents| ≤ 3
/// 2. ∀o ∈ outputs: 0 < o.value ≤ M_max
/// 3. ∀o ∈ outputs: token_index(o) ≤ |tokens|, and authority outputs name a token
/// 4. Token creation carries a name and symbol and no token list
/// 5. Blocks are not built here
pub fn validate_tx(tx: &Transaction) -> Result<()> {
    if tx.version.is_block() {
        return Err(TxError::Serialization(format!(
            "{:?} cannot be built by a wallet",
            tx.version
        )));
    }
    if tx.inputs.len() > MAX_INPUTS {
        return Err(TxError::MaximumNumberInputs(tx.inputs.len()));
    }
    if tx.outputs.len() > MAX_OUTPUTS {
        return Err(TxError::MaximumNumberOutputs(tx.outputs.len()));
    }
    if tx.parents.len() > MAX_PARENTS {
        return Err(TxError::MaximumNumberParents(tx.parents.len()));
    }

    let token_count = match tx.version {
        TxVersion::TokenCreationTransaction => {
            if !tx.tokens.is_empty() {
                return Err(TxError::TokenInfo(
                    "token creation transaction cannot list tokens".to_string(),
                ));
            }
            validate_token_info(tx.token_info.as_ref())?;
            1
        }
        _ => {
            if tx.tokens.len() > MAX_TOKENS {
                return Err(TxError::MaximumNumberTokens(tx.tokens.len()));
            }
            tx.tokens.len()
        }
    };

    for (i, output) in tx.outputs.iter().enumerate() {
        if output.value == 0 || output.value > MAX_OUTPUT_VALUE {
            return Err(TxError::OutputValue(format!(
                "output {} has value {}, must be in 1..={}",
                i, output.value, MAX_OUTPUT_VALUE
            )));
        }
        let token_index = usize::from(output.token_index());
        if token_index > token_count {
            return Err(TxError::InvalidTokenIndex(format!(
                "output {} references token {} of {}",
                i, token_index, token_count
            )));
        }
        if output.is_authority() && token_index == 0 {
            return Err(TxError::InvalidTokenIndex(format!(
                "output {} is an authority over the native token",
                i
            )));
        }
    }
    Ok(())
}

fn validate_token_info(info: Option<&TokenInfo>) -> Result<()> {
    let info = info.ok_or_else(|| TxError::TokenInfo("missing name and symbol".to_string()))?;
    let name_len = info.name.len();
    let symbol_len = info.symbol.len();
    if name_len == 0 || name_len > MAX_TOKEN_NAME_LEN {
        return Err(TxError::TokenInfo(format!(
            "name must be 1..={} bytes, got {}",
            MAX_TOKEN_NAME_LEN, name_len
        )));
    }
    if symbol_len == 0 || symbol_len > MAX_TOKEN_SYMBOL_LEN {
        return Err(TxError::TokenInfo(format!(
            "symbol must be 1..={} bytes, got {}",
            MAX_TOKEN_SYMBOL_LEN, symbol_len
        )));
    }
    Ok(())
}

fn serialize_funds(tx: &Transaction, network: &NetworkConfig, with_input_data: bool) -> Result<Vec<u8>> {
    validate_tx(tx)?;

    let mut buf = Vec::new();
    buf.extend(int_to_bytes(u64::from(tx.version.to_u16()), 2)?);
    let creates_token = tx.version == TxVersion::TokenCreationTransaction;
    if !creates_token {
        buf.extend(int_to_bytes(tx.tokens.len() as u64, 1)?);
    }
    buf.extend(int_to_bytes(tx.inputs.len() as u64, 1)?);
    buf.extend(int_to_bytes(tx.outputs.len() as u64, 1)?);

    if !creates_token {
        for token in &tx.tokens {
            buf.extend_from_slice(token);
        }
    }

    for input in &tx.inputs {
        buf.extend_from_slice(&input.tx_id);
        buf.extend(int_to_bytes(u64::from(input.index), 1)?);
        if with_input_data {
            buf.extend(int_to_bytes(input.data.len() as u64, 2)?);
            buf.extend_from_slice(&input.data);
        } else {
            buf.extend(int_to_bytes(0, 2)?);
        }
    }

    for output in &tx.outputs {
        buf.extend(output_value_to_bytes(output.value)?);
        buf.extend(int_to_bytes(u64::from(output.token_data), 1)?);
        let script = create_output_script(&output.script, network)?;
        buf.extend(int_to_bytes(script.len() as u64, 2)?);
        buf.extend(script);
    }

    if creates_token {
        if let Some(info) = &tx.token_info {
            buf.push(TOKEN_INFO_VERSION);
            buf.extend(int_to_bytes(info.name.len() as u64, 1)?);
            buf.extend_from_slice(info.name.as_bytes());
            buf.extend(int_to_bytes(info.symbol.len() as u64, 1)?);
            buf.extend_from_slice(info.symbol.as_bytes());
        }
    }

    Ok(buf)
}

/// DataToSign: the funds part with empty input scripts
pub fn data_to_sign(tx: &Transaction, network: &NetworkConfig) -> Result<Vec<u8>> {
    let bytes = serialize_funds(tx, network, false)?;
    debug!(inputs = tx.inputs.len(), outputs = tx.outputs.len(), len = bytes.len(), "built data to sign");
    Ok(bytes)
}

/// TxToBytes: funds with input scripts, graph part and nonce
pub fn tx_to_bytes(tx: &Transaction, network: &NetworkConfig) -> Result<Vec<u8>> {
    let mut buf = serialize_funds(tx, network, true)?;

    buf.extend(float_to_bytes(tx.weight.unwrap_or(0.0), 8)?);
    buf.extend(int_to_bytes(u64::from(tx.timestamp.unwrap_or(0)), 4)?);
    buf.extend(int_to_bytes(tx.parents.len() as u64, 1)?);
    for parent in &tx.parents {
        buf.extend_from_slice(parent);
    }
    buf.extend(int_to_bytes(u64::from(tx.nonce), 4)?);

    trace!(len = buf.len(), "serialized transaction");
    Ok(buf)
}

/// TxFromBytes: the inverse of `tx_to_bytes`
///
/// A zero weight or timestamp decodes as unset.
pub fn tx_from_bytes(bytes: &[u8], network: &NetworkConfig) -> Result<Transaction> {
    let mut reader = Reader::new(bytes);

    let raw_version = reader.read_u16()?;
    let version = TxVersion::from_u16(raw_version)
        .ok_or_else(|| TxError::Deserialization(format!("unknown version {}", raw_version)))?;
    if version.is_block() {
        return Err(TxError::Deserialization(format!("{:?} is not a transaction", version)));
    }
    let creates_token = version == TxVersion::TokenCreationTransaction;

    let tokens_len = if creates_token { 0 } else { reader.read_u8()? };
    let inputs_len = reader.read_u8()?;
    let outputs_len = reader.read_u8()?;

    let mut tokens = Vec::with_capacity(usize::from(tokens_len));
    for _ in 0..tokens_len {
        tokens.push(reader.read_array::<HASH_LEN>()?);
    }

    let mut inputs = Vec::with_capacity(usize::from(inputs_len));
    for _ in 0..inputs_len {
        let tx_id = reader.read_array::<HASH_LEN>()?;
        let index = reader.read_u8()?;
        let data_len = reader.read_u16()?;
        let data = reader.read_bytes(usize::from(data_len))?.to_vec();
        inputs.push(Input {
            tx_id,
            index,
            token_index: NATIVE_TOKEN_INDEX,
            data,
        });
    }

    let mut outputs = Vec::with_capacity(usize::from(outputs_len));
    for _ in 0..outputs_len {
        let value = reader.read_output_value()?;
        let token_data = reader.read_u8()?;
        let script_len = reader.read_u16()?;
        let script = reader.read_bytes(usize::from(script_len))?;
        outputs.push(Output {
            value,
            token_data,
            script: parse_output_script(script, network),
        });
    }

    let token_info = if creates_token {
        let info_version = reader.read_u8()?;
        if info_version != TOKEN_INFO_VERSION {
            return Err(TxError::Deserialization(format!(
                "unknown token info version {}",
                info_version
            )));
        }
        let name = read_string(&mut reader)?;
        let symbol = read_string(&mut reader)?;
        Some(TokenInfo { name, symbol })
    } else {
        None
    };

    let weight = reader.read_f64()?;
    let timestamp = reader.read_u32()?;
    let parents_len = reader.read_u8()?;
    let mut parents = Vec::with_capacity(usize::from(parents_len));
    for _ in 0..parents_len {
        parents.push(reader.read_array::<HASH_LEN>()?);
    }
    let nonce = reader.read_u32()?;

    if !reader.is_empty() {
        return Err(TxError::Deserialization(format!(
            "{} trailing bytes after transaction",
            reader.remaining()
        )));
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        tokens,
        parents,
        timestamp: (timestamp != 0).then_some(timestamp),
        nonce,
        weight: (weight != 0.0).then_some(weight),
        token_info,
    })
}

fn read_string(reader: &mut Reader<'_>) -> Result<String> {
    let len = reader.read_u8()?;
    let bytes = reader.read_bytes(usize::from(len))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| TxError::Deserialization(format!("token info is not UTF-8: {}", e)))
}

/// Transaction hash: SHA256d of the serialized transaction, byte-reversed
pub fn tx_hash(tx: &Transaction, network: &NetworkConfig) -> Result<TxId> {
    let bytes = tx_to_bytes(tx, network)?;
    let mut hash = sha256d::Hash::hash(&bytes).into_inner();
    hash.reverse();
    Ok(hash)
}

/// Sum of output values, skipping authority outputs
pub fn get_outputs_sum(outputs: &[Output]) -> Result<u64> {
    outputs
        .iter()
        .filter(|output| !output.is_authority())
        .try_fold(0u64, |sum, output| {
            sum.checked_add(output.value)
                .ok_or_else(|| TxError::OutputValue("sum of output values overflows".to_string()))
        })
}

/// Native currency deposit required to mint `mint_amount`, rounded up
pub fn get_deposit_amount(mint_amount: u64, deposit_basis_points: u64) -> u64 {
    let scaled = u128::from(mint_amount) * u128::from(deposit_basis_points);
    let denominator = u128::from(BASIS_POINTS_DENOMINATOR);
    ((scaled + denominator - 1) / denominator) as u64
}

/// Native currency returned when melting `melt_amount`, rounded down
pub fn get_withdraw_amount(melt_amount: u64, deposit_basis_points: u64) -> u64 {
    let scaled = u128::from(melt_amount) * u128::from(deposit_basis_points);
    (scaled / u128::from(BASIS_POINTS_DENOMINATOR)) as u64
}

/// SignTx: fills each input's script from a signature over `data_to_sign`
pub fn sign_tx<K, S>(
    mut tx: Transaction,
    data_to_sign: &[u8],
    password: &str,
    keys: &K,
    signer: &S,
) -> Result<Transaction>
where
    K: KeyStore + ?Sized,
    S: Signer + ?Sized,
{
    for (i, input) in tx.inputs.iter_mut().enumerate() {
        let private_key = keys.private_key_for_input(input, password)?;
        let signature = signer.sign(data_to_sign, &private_key)?;
        let public_key = keys.public_key_for_input(input)?;
        input.data = create_input_data(&signature, &public_key)?;
        debug!(input = i, "signed input");
    }
    Ok(tx)
}

/// SetWeightIfNeeded: computes the weight only when unset or zero
pub fn set_weight_if_needed(
    tx: &mut Transaction,
    calculator: &WeightCalculator,
    network: &NetworkConfig,
) -> Result<()> {
    match tx.weight {
        Some(weight) if weight > 0.0 => Ok(()),
        _ => {
            tx.weight = Some(calculator.calculate_tx_weight(tx, network)?);
            Ok(())
        }
    }
}

/// CompleteTx: defaults the timestamp to now and sets the weight
pub fn complete_tx(
    tx: &mut Transaction,
    calculator: &WeightCalculator,
    network: &NetworkConfig,
) -> Result<()> {
    if tx.timestamp.is_none() {
        let now = u32::try_from(Utc::now().timestamp())
            .map_err(|_| TxError::Serialization("current time does not fit in 4 bytes".to_string()))?;
        tx.timestamp = Some(now);
    }
    set_weight_if_needed(tx, calculator, network)
}
