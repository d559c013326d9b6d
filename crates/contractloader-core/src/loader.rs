//! `ContractLoader` — resolve, fetch, parse, validate.

use std::fmt;

use crate::endpoint::EndpointTemplate;
use crate::error::LoaderError;
use crate::parser::{resolve_parser, NetworkSelection, ParseFn, ParserSpec};
use crate::transport::{FetchError, ResourceFetcher};
use crate::types::{ContractDefinition, LoadOptions};
use crate::validator::validate;

/// Construction-time configuration for a [`ContractLoader`].
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Endpoint template, e.g. `https://host/contracts/%%NAME%%?v=%%VERSION%%`.
    pub endpoint: String,
    /// Parser name or custom function.
    pub parser: ParserSpec,
    /// Deployment selection for parsers that read per-network addresses.
    pub network: NetworkSelection,
}

impl LoaderConfig {
    pub fn new(endpoint: impl Into<String>, parser: impl Into<ParserSpec>) -> Self {
        Self {
            endpoint: endpoint.into(),
            parser: parser.into(),
            network: NetworkSelection::default(),
        }
    }

    pub fn with_network(mut self, network: NetworkSelection) -> Self {
        self.network = network;
        self
    }
}

/// Loads contract definitions through a [`ResourceFetcher`].
///
/// The loader holds no per-call state: the endpoint template and parse
/// function are fixed at construction, so `load` only needs `&self` and
/// concurrent calls on one loader are independent. Nothing is cached; every
/// call performs exactly one fetch.
pub struct ContractLoader<F> {
    endpoint: EndpointTemplate,
    parser: ParseFn,
    fetcher: F,
}

impl<F: ResourceFetcher> ContractLoader<F> {
    /// Build a loader. Fails if the parser name is unknown.
    pub fn new(config: LoaderConfig, fetcher: F) -> Result<Self, LoaderError> {
        let parser = resolve_parser(&config.parser, &config.network)?;
        tracing::debug!(
            endpoint = %config.endpoint,
            parser = ?config.parser,
            "contract loader ready"
        );
        Ok(Self {
            endpoint: EndpointTemplate::new(config.endpoint),
            parser,
            fetcher,
        })
    }

    /// The endpoint template.
    pub fn endpoint(&self) -> &EndpointTemplate {
        &self.endpoint
    }

    /// The resolved parse function.
    pub fn parser(&self) -> &ParseFn {
        &self.parser
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The resource `load(name, options)` would fetch.
    pub fn resolve_endpoint_resource(&self, name: &str, options: &LoadOptions) -> String {
        self.endpoint.resolve(name, options)
    }

    /// Load and validate the definition of contract `name`.
    pub async fn load(
        &self,
        name: &str,
        options: &LoadOptions,
    ) -> Result<ContractDefinition, LoaderError> {
        let resource = self.resolve_endpoint_resource(name, options);
        tracing::debug!(contract = name, resource = %resource, "loading contract definition");

        match self.load_resource(name, &resource).await {
            Ok(definition) => {
                tracing::debug!(
                    contract = name,
                    address = definition.address(),
                    abi_items = definition.abi().len(),
                    "contract definition loaded"
                );
                Ok(definition)
            }
            Err(e) => {
                tracing::warn!(contract = name, resource = %resource, error = %e, "contract load failed");
                Err(e)
            }
        }
    }

    async fn load_resource(
        &self,
        name: &str,
        resource: &str,
    ) -> Result<ContractDefinition, LoaderError> {
        let json = self
            .fetcher
            .fetch_json(resource)
            .await
            .map_err(|e| match e {
                FetchError::Transport(e) => LoaderError::Fetch {
                    contract: name.to_string(),
                    reason: e.to_string(),
                },
                FetchError::Decode(e) => LoaderError::Decode {
                    contract: name.to_string(),
                    reason: e.to_string(),
                },
            })?;

        let candidate = (self.parser)(&json)?;

        validate(candidate).map_err(|source| LoaderError::InvalidDefinition {
            contract: name.to_string(),
            source,
        })
    }
}

impl<F> fmt::Debug for ContractLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractLoader")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
