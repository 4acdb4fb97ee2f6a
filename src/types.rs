//! Core ledger types for transaction building

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Transaction id: 256-bit hash
pub type TxId = [u8; 32];

/// Token uid: id of the transaction that created the token
pub type TokenUid = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Version tag, encoded as a 2-byte big-endian integer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxVersion {
    Block,
    #[default]
    RegularTransaction,
    MergeMinedBlock,
    TokenCreationTransaction,
}

impl TxVersion {
    pub fn to_u16(self) -> u16 {
        match self {
            TxVersion::Block => 0,
            TxVersion::RegularTransaction => 1,
            TxVersion::TokenCreationTransaction => 2,
            TxVersion::MergeMinedBlock => 3,
        }
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(TxVersion::Block),
            1 => Some(TxVersion::RegularTransaction),
            2 => Some(TxVersion::TokenCreationTransaction),
            3 => Some(TxVersion::MergeMinedBlock),
            _ => None,
        }
    }

    pub fn is_block(self) -> bool {
        matches!(self, TxVersion::Block | TxVersion::MergeMinedBlock)
    }
}

/// Input: a reference to a prior output plus the script that unlocks it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    pub tx_id: TxId,
    pub index: u8,
    /// Position in the owning transaction's token list; 0 is the native currency.
    /// Wallet bookkeeping only, never serialized.
    #[serde(default)]
    pub token_index: u8,
    /// Unlocking script; empty until signed
    #[serde(default)]
    pub data: ByteString,
}

impl Input {
    pub fn new(tx_id: TxId, index: u8) -> Self {
        Self {
            tx_id,
            index,
            token_index: NATIVE_TOKEN_INDEX,
            data: Vec::new(),
        }
    }
}

/// Locking script of an output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputScript {
    /// Pay to public key hash; `address` is base58
    P2pkh {
        address: String,
        #[serde(default)]
        timelock: Option<u32>,
    },
    /// Pay to script hash; `address` is base58
    P2sh {
        address: String,
        #[serde(default)]
        timelock: Option<u32>,
    },
    /// Arbitrary application data
    Data { data: ByteString },
    /// Script that was not recognised while decoding
    Raw { script: ByteString },
}

impl OutputScript {
    pub fn p2pkh(address: impl Into<String>) -> Self {
        OutputScript::P2pkh {
            address: address.into(),
            timelock: None,
        }
    }

    pub fn p2sh(address: impl Into<String>) -> Self {
        OutputScript::P2sh {
            address: address.into(),
            timelock: None,
        }
    }

    pub fn timelock(&self) -> Option<u32> {
        match self {
            OutputScript::P2pkh { timelock, .. } | OutputScript::P2sh { timelock, .. } => *timelock,
            OutputScript::Data { .. } | OutputScript::Raw { .. } => None,
        }
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            OutputScript::P2pkh { address, .. } | OutputScript::P2sh { address, .. } => Some(address),
            OutputScript::Data { .. } | OutputScript::Raw { .. } => None,
        }
    }
}

/// Output: a value locked by a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in the smallest unit, or authority flags for authority outputs
    pub value: u64,
    /// 0 = native currency; bit 7 = authority; low bits = 1-based index into `tokens`
    #[serde(default)]
    pub token_data: u8,
    pub script: OutputScript,
}

impl Output {
    pub fn new(value: u64, script: OutputScript) -> Self {
        Self {
            value,
            token_data: NATIVE_TOKEN_INDEX,
            script,
        }
    }

    /// Output of a custom token, `token_index` being 1-based
    pub fn with_token(value: u64, token_index: u8, script: OutputScript) -> Self {
        Self {
            value,
            token_data: token_index & TOKEN_INDEX_MASK,
            script,
        }
    }

    pub fn mint_authority(token_index: u8, script: OutputScript) -> Self {
        Self {
            value: TOKEN_MINT_MASK,
            token_data: TOKEN_AUTHORITY_MASK | (token_index & TOKEN_INDEX_MASK),
            script,
        }
    }

    pub fn melt_authority(token_index: u8, script: OutputScript) -> Self {
        Self {
            value: TOKEN_MELT_MASK,
            token_data: TOKEN_AUTHORITY_MASK | (token_index & TOKEN_INDEX_MASK),
            script,
        }
    }

    pub fn is_authority(&self) -> bool {
        self.token_data & TOKEN_AUTHORITY_MASK != 0
    }

    /// 1-based token index, 0 for the native currency
    pub fn token_index(&self) -> u8 {
        self.token_data & TOKEN_INDEX_MASK
    }

    pub fn can_mint(&self) -> bool {
        self.is_authority() && self.value & TOKEN_MINT_MASK != 0
    }

    pub fn can_melt(&self) -> bool {
        self.is_authority() && self.value & TOKEN_MELT_MASK != 0
    }
}

/// Name and symbol of a token being created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
}

/// Transaction descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub version: TxVersion,
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    /// Token uids, excluding the native currency
    #[serde(default)]
    pub tokens: Vec<TokenUid>,
    /// Confirmed transactions, at most 3
    #[serde(default)]
    pub parents: Vec<TxId>,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub timestamp: Option<u32>,
    #[serde(default)]
    pub nonce: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Only for token-creation transactions
    #[serde(default)]
    pub token_info: Option<TokenInfo>,
}

impl Transaction {
    pub fn new(inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        Self {
            version: TxVersion::RegularTransaction,
            inputs,
            outputs,
            tokens: Vec::new(),
            parents: Vec::new(),
            timestamp: None,
            nonce: 0,
            weight: None,
            token_info: None,
        }
    }

    pub fn new_token_creation(inputs: Vec<Input>, outputs: Vec<Output>, info: TokenInfo) -> Self {
        Self {
            version: TxVersion::TokenCreationTransaction,
            token_info: Some(info),
            ..Self::new(inputs, outputs)
        }
    }
}
