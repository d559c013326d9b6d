//! Contract identifiers and the two shapes of a contract definition:
//! the untrusted [`CandidateDefinition`] a parser produces, and the
//! validated [`ContractDefinition`] callers receive.

use alloy_json_abi::JsonAbi;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Optional lookup fields for a contract.
///
/// Both are substituted into the endpoint template; absent values render as
/// the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Contract version. Numeric versions are stored as their decimal text.
    pub version: Option<String>,
    /// Deployed contract address.
    pub address: Option<String>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version. Accepts strings and numbers alike (`1`, `"1.2.0"`).
    pub fn with_version(mut self, version: impl ToString) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Set the deployed address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Identifies which definition to load: a mandatory name plus the optional
/// fields of [`LoadOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractIdentifier<'a> {
    pub name: &'a str,
    pub version: Option<&'a str>,
    pub address: Option<&'a str>,
}

impl<'a> ContractIdentifier<'a> {
    pub fn new(name: &'a str, options: &'a LoadOptions) -> Self {
        Self {
            name,
            version: options.version.as_deref(),
            address: options.address.as_deref(),
        }
    }
}

/// Parser output. Nothing about its shape is trusted until [`crate::validate`]
/// has checked it, so every field is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode: Option<Value>,
    #[serde(
        rename = "contractName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub contract_name: Option<Value>,
}

impl CandidateDefinition {
    /// Pick the top-level `address`, `abi`, `bytecode` and `contractName`
    /// fields out of a JSON object. Anything that is not an object yields an
    /// empty candidate.
    pub fn from_value(value: &Value) -> Self {
        Self {
            address: value.get("address").cloned(),
            abi: value.get("abi").cloned(),
            bytecode: value.get("bytecode").cloned(),
            contract_name: value.get("contractName").cloned(),
        }
    }
}

/// A validated contract definition.
///
/// Invariants: `bytecode` is a non-empty string, `abi` is an array (possibly
/// empty) and `address` is a string that may be empty when the registry did
/// not report a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractDefinition {
    address: String,
    abi: Vec<Value>,
    bytecode: String,
}

impl ContractDefinition {
    pub(crate) fn new(address: String, abi: Vec<Value>, bytecode: String) -> Self {
        Self {
            address,
            abi,
            bytecode,
        }
    }

    /// Deployed address, or `""` when none was reported.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `true` if the definition carries a deployed address.
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// The raw ABI entries.
    pub fn abi(&self) -> &[Value] {
        &self.abi
    }

    /// Creation bytecode as returned by the registry (usually `0x`-prefixed hex).
    pub fn bytecode(&self) -> &str {
        &self.bytecode
    }

    /// Decode the ABI into typed alloy items.
    pub fn json_abi(&self) -> Result<JsonAbi, serde_json::Error> {
        serde_json::from_value(Value::Array(self.abi.clone()))
    }

    /// Decode the bytecode hex (with or without `0x` prefix) into bytes.
    pub fn bytecode_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        let stripped = self.bytecode.strip_prefix("0x").unwrap_or(&self.bytecode);
        hex::decode(stripped)
    }

    /// Consume the definition, returning `(address, abi, bytecode)`.
    pub fn into_parts(self) -> (String, Vec<Value>, String) {
        (self.address, self.abi, self.bytecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn version_accepts_numbers_and_strings() {
        assert_eq!(LoadOptions::new().with_version(1).version.as_deref(), Some("1"));
        assert_eq!(
            LoadOptions::new().with_version("2.0.1").version.as_deref(),
            Some("2.0.1")
        );
    }

    #[test]
    fn candidate_from_object() {
        let c = CandidateDefinition::from_value(&json!({
            "contractName": "Token",
            "abi": [],
            "bytecode": "0x60",
            "extra": true,
        }));
        assert_eq!(c.contract_name, Some(json!("Token")));
        assert_eq!(c.abi, Some(json!([])));
        assert_eq!(c.bytecode, Some(json!("0x60")));
        assert!(c.address.is_none());
    }

    #[test]
    fn candidate_from_non_object_is_empty() {
        assert_eq!(
            CandidateDefinition::from_value(&json!([1, 2, 3])),
            CandidateDefinition::default()
        );
    }

    #[test]
    fn definition_serializes_canonical_fields_only() {
        let def = ContractDefinition::new("0x123".into(), vec![json!({})], "0x60".into());
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({ "address": "0x123", "abi": [{}], "bytecode": "0x60" })
        );
    }

    #[test]
    fn bytecode_bytes_strips_prefix() {
        let def = ContractDefinition::new(String::new(), vec![], "0x6080".into());
        assert_eq!(def.bytecode_bytes().unwrap(), vec![0x60, 0x80]);
        assert!(!def.has_address());
    }

    #[test]
    fn json_abi_decodes_functions() {
        let def = ContractDefinition::new(
            String::new(),
            vec![json!({
                "type": "function",
                "name": "getBalance",
                "inputs": [{ "name": "addr", "type": "address" }],
                "outputs": [{ "name": "", "type": "uint256" }],
                "stateMutability": "view"
            })],
            "0x60".into(),
        );
        let abi = def.json_abi().unwrap();
        assert_eq!(abi.functions().count(), 1);
        assert!(abi.function("getBalance").is_some());
    }
}
