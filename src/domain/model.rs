use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity fingerprint of a contract. Never parsed or normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashCode(String);

impl HashCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HashCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub hash_code: HashCode,
    pub issued: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

// Wire types. Fields the service may send beyond these (items, pricing,
// check results) are ignored on decode.

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuybackContractsReq {
    pub include_items: bool,
    pub include_check: bool,
    pub include_buy: bool,
    pub refresh_token: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuybackContractsRep {
    #[serde(default)]
    pub contracts: Vec<BuybackContract>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuybackContract {
    pub hash_code: String,
    #[serde(default)]
    pub esi_contract: Option<EsiContract>,
}

/// Epoch seconds, as the ESI API reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsiContract {
    pub issued: i64,
    pub expires: i64,
}
