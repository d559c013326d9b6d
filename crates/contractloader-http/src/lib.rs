//! contractloader-http — HTTP transport for the contract loader.
//!
//! [`HttpFetcher`] implements [`contractloader_core::ResourceFetcher`] with a
//! single `GET` per call. [`http_loader`] wires it into a
//! [`ContractLoader`] in one step.

pub mod client;

pub use client::{HttpFetcher, HttpFetcherConfig};

use contractloader_core::{ContractLoader, LoaderConfig, LoaderError};

/// A contract loader that fetches over HTTP.
pub type HttpContractLoader = ContractLoader<HttpFetcher>;

/// Build an [`HttpContractLoader`] with the given fetcher configuration.
pub fn http_loader(
    config: LoaderConfig,
    http: HttpFetcherConfig,
) -> Result<HttpContractLoader, LoaderError> {
    let fetcher = HttpFetcher::new(http).map_err(LoaderError::FetcherSetup)?;
    ContractLoader::new(config, fetcher)
}
