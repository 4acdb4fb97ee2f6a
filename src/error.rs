//! Error types for transaction encoding, scripting and signing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TxError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Invalid output value: {0}")]
    OutputValue(String),

    #[error("Transaction has {0} parents, maximum is 3")]
    MaximumNumberParents(usize),

    #[error("Transaction has {0} inputs, maximum is 255")]
    MaximumNumberInputs(usize),

    #[error("Transaction has {0} outputs, maximum is 255")]
    MaximumNumberOutputs(usize),

    #[error("Transaction has {0} tokens, maximum is 127")]
    MaximumNumberTokens(usize),

    #[error("Value {value} does not fit in {width} unsigned bytes")]
    IntegerRange { value: u64, width: usize },

    #[error("Value {value} does not fit in {width} signed bytes")]
    SignedIntegerRange { value: i64, width: usize },

    #[error("Unsupported encoding width: {0}")]
    UnsupportedWidth(usize),

    #[error("Invalid token index: {0}")]
    InvalidTokenIndex(String),

    #[error("Invalid token info: {0}")]
    TokenInfo(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error category, for callers that branch on the kind of failure
/// rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed address; recoverable by asking for another one.
    Address,
    /// Output value outside the encodable range.
    OutputValue,
    /// Too many parents; an upstream selection bug.
    Parents,
    /// Fixed-width encoding overflow or structural limit exceeded.
    Encoding,
    /// Key lookup or signature production failed.
    Signing,
    /// Configuration could not be loaded or is out of range.
    Config,
}

impl TxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TxError::Address(_) => ErrorKind::Address,
            TxError::OutputValue(_) => ErrorKind::OutputValue,
            TxError::MaximumNumberParents(_) => ErrorKind::Parents,
            TxError::MaximumNumberInputs(_)
            | TxError::MaximumNumberOutputs(_)
            | TxError::MaximumNumberTokens(_)
            | TxError::IntegerRange { .. }
            | TxError::SignedIntegerRange { .. }
            | TxError::UnsupportedWidth(_)
            | TxError::InvalidTokenIndex(_)
            | TxError::TokenInfo(_)
            | TxError::Deserialization(_)
            | TxError::Serialization(_) => ErrorKind::Encoding,
            TxError::Signing(_) | TxError::KeyNotFound(_) => ErrorKind::Signing,
            TxError::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, TxError>;
