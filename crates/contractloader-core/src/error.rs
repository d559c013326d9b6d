//! Loader-level error types.

use thiserror::Error;

use crate::parser::ParseError;
use crate::transport::TransportError;
use crate::validator::InvalidDefinition;

/// Errors surfaced by [`crate::ContractLoader`], at construction or per `load`.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// A named parser is not in the built-in table.
    #[error("Parser \"{name}\" was not found")]
    ParserNotFound { name: String },

    /// Parser configuration holds something other than a parser name.
    #[error("Invalid parser: expected a parser name, got {found}")]
    InvalidParser { found: String },

    /// The fetcher could not be constructed.
    #[error("Unable to set up fetcher: {0}")]
    FetcherSetup(#[source] TransportError),

    /// The resource could not be fetched (connection failure, bad status).
    #[error("Unable to fetch resource for contract {contract}: {reason}")]
    Fetch { contract: String, reason: String },

    /// The resource was fetched but its body is not JSON.
    #[error("Unable to get JSON for contract {contract}: {reason}")]
    Decode { contract: String, reason: String },

    /// The parsed definition failed validation.
    #[error("Unable to parse contract definition for contract {contract}: {source}")]
    InvalidDefinition {
        contract: String,
        #[source]
        source: InvalidDefinition,
    },

    /// The parser itself failed. Passed through untouched.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl LoaderError {
    /// The contract this error concerns, if it arose while loading one.
    pub fn contract(&self) -> Option<&str> {
        match self {
            Self::Fetch { contract, .. }
            | Self::Decode { contract, .. }
            | Self::InvalidDefinition { contract, .. } => Some(contract),
            _ => None,
        }
    }

    /// Returns `true` for transport-level failures.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Returns `true` when the body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns `true` for errors raised while constructing a loader.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ParserNotFound { .. } | Self::InvalidParser { .. } | Self::FetcherSetup(_)
        )
    }
}
