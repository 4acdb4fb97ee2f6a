//! Ledger constants: opcodes, token masks and structural limits

/// Push the next byte as a length, then that many bytes
pub const OP_PUSHDATA1: u8 = 0x4c;

/// Fail unless the block timestamp is greater than the pushed value
pub const OP_GREATERTHAN_TIMESTAMP: u8 = 0x6f;

pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;

/// Data shorter than this is pushed with a single length byte
pub const PUSHDATA_THRESHOLD: usize = 0x4c;

/// Largest payload a single OP_PUSHDATA1 push can carry
pub const MAX_PUSHDATA1_LEN: usize = 0xff;

/// Maximum number of parents a transaction may confirm
pub const MAX_PARENTS: usize = 3;

/// Number of parents assumed when sizing a transaction for weight
pub const WEIGHT_ASSUMED_PARENTS: usize = 2;

/// Input and output counts are encoded in one byte
pub const MAX_INPUTS: usize = 255;
pub const MAX_OUTPUTS: usize = 255;

/// Token indices occupy the low 7 bits of the token-data byte
pub const MAX_TOKENS: usize = 0x7f;

/// Token-data bit marking an authority output
pub const TOKEN_AUTHORITY_MASK: u8 = 0x80;

/// Token-data bits holding the 1-based token index
pub const TOKEN_INDEX_MASK: u8 = 0x7f;

/// Authority output value flag granting mint rights
pub const TOKEN_MINT_MASK: u64 = 0x01;

/// Authority output value flag granting melt rights
pub const TOKEN_MELT_MASK: u64 = 0x02;

/// Token index of the native currency
pub const NATIVE_TOKEN_INDEX: u8 = 0;

/// Largest value encoded in the 4-byte output value form
pub const MAX_OUTPUT_VALUE_32: u64 = (1 << 31) - 1;

/// Largest value an output may carry
pub const MAX_OUTPUT_VALUE: u64 = 1 << 43;

/// Length of a transaction id or token uid
pub const HASH_LEN: usize = 32;

/// Length of a public key hash or script hash
pub const PUBKEY_HASH_LEN: usize = 20;

/// Decoded address: version byte, 20-byte hash, 4-byte checksum
pub const ADDRESS_LEN: usize = 25;
pub const ADDRESS_CHECKSUM_LEN: usize = 4;

/// Serialization version of the token-creation info block
pub const TOKEN_INFO_VERSION: u8 = 1;

/// Token name and symbol lengths are encoded in one byte
pub const MAX_TOKEN_NAME_LEN: usize = 30;
pub const MAX_TOKEN_SYMBOL_LEN: usize = 5;

/// Default weight curve
pub const DEFAULT_MIN_WEIGHT: f64 = 14.0;
pub const DEFAULT_WEIGHT_COEFFICIENT: f64 = 1.6;
pub const DEFAULT_MIN_WEIGHT_K: f64 = 100.0;

/// Added to every computed weight so it never falls below the minimum
/// because of floating point differences between nodes
pub const WEIGHT_EPSILON: f64 = 1e-6;

/// Amounts are integers in the smallest unit; this many decimal places
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// 10^19 overflows u64
pub const MAX_DECIMAL_PLACES: i32 = 18;

/// Deposit required to mint tokens, in basis points (1%)
pub const DEFAULT_TOKEN_DEPOSIT_BASIS_POINTS: u64 = 100;

pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;
