//! Serializable loader settings, e.g. read from a JSON config file.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoaderError;
use crate::loader::LoaderConfig;
use crate::parser::{NetworkSelection, ParserSpec};

/// Loader settings as they appear in configuration.
///
/// ```json
/// {
///   "endpoint": "https://registry.example/%%NAME%%/%%VERSION%%.json",
///   "parser": "truffle",
///   "network": "5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderSettings {
    /// Endpoint template.
    pub endpoint: String,
    /// Parser name. Kept untyped so a malformed value is reported as an
    /// invalid parser rather than a generic config error.
    #[serde(default = "default_parser")]
    pub parser: Value,
    /// Network ID to take the deployed address from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Reject definitions deployed on more than one network when no
    /// `network` is given.
    #[serde(default)]
    pub unique_network: bool,
}

fn default_parser() -> Value {
    Value::String("truffle".into())
}

impl LoaderSettings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            parser: default_parser(),
            network: None,
            unique_network: false,
        }
    }

    /// Parse settings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The deployment selection these settings describe. An explicit
    /// `network` wins over `unique_network`.
    pub fn network_selection(&self) -> NetworkSelection {
        match (&self.network, self.unique_network) {
            (Some(id), _) => NetworkSelection::Exact(id.clone()),
            (None, true) => NetworkSelection::Unique,
            (None, false) => NetworkSelection::Latest,
        }
    }

    /// Convert into a [`LoaderConfig`]. Fails with
    /// [`LoaderError::InvalidParser`] when `parser` is not a string.
    pub fn into_config(self) -> Result<LoaderConfig, LoaderError> {
        let parser = ParserSpec::from_value(&self.parser)?;
        let network = self.network_selection();
        Ok(LoaderConfig::new(self.endpoint, parser).with_network(network))
    }
}
