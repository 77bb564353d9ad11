use crate::domain::model::{BuybackContract, BuybackContractsRep, Contract, HashCode};
use crate::utils::error::{ContractError, Result};
use chrono::{DateTime, Utc};

/// Maps every record of the reply, in order. The first invalid record fails
/// the whole batch; nothing is skipped.
pub fn contracts_from_reply(reply: BuybackContractsRep) -> Result<Vec<Contract>> {
    reply
        .contracts
        .into_iter()
        .enumerate()
        .map(|(index, record)| contract_from_record(index, record))
        .collect()
}

pub fn contract_from_record(index: usize, record: BuybackContract) -> Result<Contract> {
    let Some(esi) = record.esi_contract else {
        return Err(malformed(index, &record.hash_code, "contract has no ESI contract"));
    };

    let issued = from_epoch_seconds(esi.issued)
        .ok_or_else(|| malformed(index, &record.hash_code, out_of_range("issued", esi.issued)))?;
    let expires = from_epoch_seconds(esi.expires)
        .ok_or_else(|| malformed(index, &record.hash_code, out_of_range("expires", esi.expires)))?;

    Ok(Contract {
        hash_code: HashCode::from(record.hash_code),
        issued,
        expires,
    })
}

/// Pretty JSON rendering of a contract list for callers that print it.
pub fn contracts_to_json(contracts: &[Contract]) -> Result<String> {
    Ok(serde_json::to_string_pretty(contracts)?)
}

/// Whole seconds since the Unix epoch, UTC, zero nanoseconds.
pub fn from_epoch_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

fn out_of_range(field: &str, seconds: i64) -> String {
    format!("{} timestamp {} is out of range", field, seconds)
}

fn malformed(index: usize, hash_code: &str, reason: impl Into<String>) -> ContractError {
    ContractError::MalformedRecord {
        index,
        hash_code: hash_code.to_string(),
        reason: reason.into(),
    }
}
