//! Candidate → canonical definition validation.

use serde_json::Value;
use thiserror::Error;

use crate::types::{CandidateDefinition, ContractDefinition};

/// A candidate definition failed the required-field checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidDefinition {
    #[error("Invalid contract definition: bytecode is missing or invalid")]
    Bytecode,

    #[error("Invalid contract definition: abi is missing or invalid")]
    Abi,

    #[error("Invalid contract definition: address must be a string")]
    Address,
}

impl InvalidDefinition {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Bytecode => "bytecode",
            Self::Abi => "abi",
            Self::Address => "address",
        }
    }
}

/// Check a candidate and build the canonical definition.
///
/// Fields are checked in the order `bytecode`, `abi`, `address`; the first
/// failure wins. A missing or `null` address normalizes to `""`.
pub fn validate(candidate: CandidateDefinition) -> Result<ContractDefinition, InvalidDefinition> {
    let bytecode = match candidate.bytecode {
        Some(Value::String(code)) if !code.is_empty() => code,
        _ => return Err(InvalidDefinition::Bytecode),
    };

    let abi = match candidate.abi {
        Some(Value::Array(items)) => items,
        _ => return Err(InvalidDefinition::Abi),
    };

    let address = match candidate.address {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(address)) => address,
        Some(_) => return Err(InvalidDefinition::Address),
    };

    Ok(ContractDefinition::new(address, abi, bytecode))
}
