//! contractloader-core — the contract definition loading pipeline.
//!
//! # Overview
//!
//! A [`ContractLoader`] turns a contract name (plus optional version and
//! address) into a validated [`ContractDefinition`]:
//!
//! 1. [`EndpointTemplate`] renders the resource location from `%%NAME%%`,
//!    `%%VERSION%%` and `%%ADDRESS%%` placeholders
//! 2. a [`ResourceFetcher`] performs exactly one fetch of that resource
//! 3. the parser chosen at construction ([`ParserSpec`]) extracts a
//!    [`CandidateDefinition`] from the JSON body
//! 4. [`validate`] checks the candidate and produces the canonical definition
//!
//! Every failure surfaces as a [`LoaderError`] carrying the contract name.
//! There is no retry and no caching: each `load` performs a fresh fetch.

pub mod endpoint;
pub mod error;
pub mod loader;
pub mod parser;
pub mod settings;
pub mod transport;
pub mod types;
pub mod validator;

pub use endpoint::{resolve_endpoint_resource, EndpointTemplate};
pub use error::LoaderError;
pub use loader::{ContractLoader, LoaderConfig};
pub use parser::{
    builtin_parsers, parse_fn, resolve_parser, NetworkSelection, ParseError, ParseFn, ParserSpec,
};
pub use settings::LoaderSettings;
pub use transport::{FetchError, RawResponse, ResourceFetcher, TransportError};
pub use types::{CandidateDefinition, ContractDefinition, ContractIdentifier, LoadOptions};
pub use validator::{validate, InvalidDefinition};
