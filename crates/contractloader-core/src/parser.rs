//! Parser registry — maps parser names to functions that pull a
//! [`CandidateDefinition`] out of a fetched JSON document.
//!
//! The built-in table is fixed at compile time. The only extension point is
//! passing a custom function as [`ParserSpec::Custom`].

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::LoaderError;
use crate::types::CandidateDefinition;

/// A parse function: raw JSON in, untrusted candidate out.
pub type ParseFn =
    Arc<dyn Fn(&Value) -> Result<CandidateDefinition, ParseError> + Send + Sync + 'static>;

/// Errors raised by parse functions.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Network ID {network} not found in contract definition")]
    NetworkNotFound { network: String },

    #[error("Contract definition is deployed on {count} networks; select one explicitly")]
    AmbiguousNetwork { count: usize },

    /// Raised by caller-supplied parsers.
    #[error("{0}")]
    Custom(String),
}

impl ParseError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// How a parser that reads per-network deployments picks the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NetworkSelection {
    /// The numerically largest network ID. Non-numeric IDs rank below every
    /// numeric one and compare as strings among themselves.
    #[default]
    Latest,
    /// Exactly this network ID; missing is an error.
    Exact(String),
    /// At most one deployment may exist; more than one is an error.
    Unique,
}

/// Which parser a loader uses.
#[derive(Clone)]
pub enum ParserSpec {
    /// A key into the built-in table (see [`builtin_parsers`]).
    Named(String),
    /// A caller-supplied function, used as-is.
    Custom(ParseFn),
}

/// Wrap a closure as a [`ParseFn`].
pub fn parse_fn<F>(parse: F) -> ParseFn
where
    F: Fn(&Value) -> Result<CandidateDefinition, ParseError> + Send + Sync + 'static,
{
    Arc::new(parse)
}

impl ParserSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn custom<F>(parse: F) -> Self
    where
        F: Fn(&Value) -> Result<CandidateDefinition, ParseError> + Send + Sync + 'static,
    {
        Self::Custom(parse_fn(parse))
    }

    /// Build a spec from untyped configuration. Only strings name a parser;
    /// functions cannot be expressed in JSON, so anything else is rejected.
    pub fn from_value(value: &Value) -> Result<Self, LoaderError> {
        match value {
            Value::String(name) => Ok(Self::Named(name.clone())),
            other => Err(LoaderError::InvalidParser {
                found: json_kind(other).to_string(),
            }),
        }
    }
}

impl fmt::Debug for ParserSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<&str> for ParserSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ParserSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ParseFn> for ParserSpec {
    fn from(parse: ParseFn) -> Self {
        Self::Custom(parse)
    }
}

// ─── Built-in table ───────────────────────────────────────────────────────────

struct BuiltinParser {
    name: &'static str,
    description: &'static str,
    build: fn(&NetworkSelection) -> ParseFn,
}

static BUILTIN_PARSERS: &[BuiltinParser] = &[
    BuiltinParser {
        name: "truffle",
        description: "Truffle artifact: abi, bytecode, address from the networks map",
        build: truffle,
    },
    BuiltinParser {
        name: "hardhat",
        description: "Hardhat artifact: abi, bytecode (no address)",
        build: hardhat,
    },
    BuiltinParser {
        name: "foundry",
        description: "Foundry out/ artifact: abi, bytecode.object (no address)",
        build: foundry,
    },
    BuiltinParser {
        name: "plain",
        description: "Top-level address, abi, bytecode fields",
        build: plain,
    },
];

/// `(name, description)` of every built-in parser.
pub fn builtin_parsers() -> impl Iterator<Item = (&'static str, &'static str)> {
    BUILTIN_PARSERS.iter().map(|p| (p.name, p.description))
}

/// Turn a [`ParserSpec`] into a callable parse function.
///
/// Custom functions come back unchanged (same `Arc`). Named parsers are
/// looked up in the built-in table; `network` configures the ones that read
/// deployment addresses.
pub fn resolve_parser(spec: &ParserSpec, network: &NetworkSelection) -> Result<ParseFn, LoaderError> {
    match spec {
        ParserSpec::Custom(parse) => Ok(Arc::clone(parse)),
        ParserSpec::Named(name) => BUILTIN_PARSERS
            .iter()
            .find(|p| p.name == name.as_str())
            .map(|p| (p.build)(network))
            .ok_or_else(|| LoaderError::ParserNotFound { name: name.clone() }),
    }
}

fn truffle(network: &NetworkSelection) -> ParseFn {
    let network = network.clone();
    parse_fn(move |value| parse_truffle(value, &network))
}

fn hardhat(_: &NetworkSelection) -> ParseFn {
    parse_fn(|value| {
        Ok(CandidateDefinition {
            address: None,
            abi: value.get("abi").cloned(),
            bytecode: value.get("bytecode").cloned(),
            contract_name: value.get("contractName").cloned(),
        })
    })
}

fn foundry(_: &NetworkSelection) -> ParseFn {
    parse_fn(|value| {
        let bytecode = match value.get("bytecode") {
            Some(Value::Object(code)) => code.get("object").cloned(),
            other => other.cloned(),
        };
        Ok(CandidateDefinition {
            address: None,
            abi: value.get("abi").cloned(),
            bytecode,
            contract_name: None,
        })
    })
}

fn plain(_: &NetworkSelection) -> ParseFn {
    parse_fn(|value| Ok(CandidateDefinition::from_value(value)))
}

fn parse_truffle(
    value: &Value,
    network: &NetworkSelection,
) -> Result<CandidateDefinition, ParseError> {
    // Truffle < 4 called the creation code `unlinked_binary`.
    let bytecode = value
        .get("bytecode")
        .or_else(|| value.get("unlinked_binary"))
        .cloned();

    let empty = Map::new();
    let networks = value
        .get("networks")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let address = select_network(networks, network)?
        .and_then(|deployment| deployment.get("address"))
        .cloned();

    Ok(CandidateDefinition {
        address,
        abi: value.get("abi").cloned(),
        bytecode,
        contract_name: value.get("contractName").cloned(),
    })
}

fn select_network<'a>(
    networks: &'a Map<String, Value>,
    selection: &NetworkSelection,
) -> Result<Option<&'a Value>, ParseError> {
    match selection {
        NetworkSelection::Exact(id) => networks
            .get(id)
            .map(Some)
            .ok_or_else(|| ParseError::NetworkNotFound {
                network: id.clone(),
            }),
        NetworkSelection::Unique => match networks.len() {
            0 | 1 => Ok(networks.values().next()),
            count => Err(ParseError::AmbiguousNetwork { count }),
        },
        NetworkSelection::Latest => Ok(networks
            .iter()
            .max_by(|(a, _), (b, _)| compare_network_ids(a, b))
            .map(|(_, deployment)| deployment)),
    }
}

fn compare_network_ids(a: &str, b: &str) -> Ordering {
    match (decimal_digits(a), decimal_digits(b)) {
        (Some(a), Some(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Significant digits of a non-negative decimal integer, without any bound on
/// its magnitude. `None` for anything else.
fn decimal_digits(id: &str) -> Option<&str> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let trimmed = id.trim_start_matches('0');
    Some(if trimmed.is_empty() { "0" } else { trimmed })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, network: NetworkSelection, value: Value) -> CandidateDefinition {
        let parser = resolve_parser(&ParserSpec::named(name), &network).unwrap();
        parser(&value).unwrap()
    }

    #[test]
    fn every_builtin_resolves() {
        for (name, _) in builtin_parsers() {
            assert!(resolve_parser(&ParserSpec::named(name), &NetworkSelection::Latest).is_ok());
        }
    }

    #[test]
    fn unknown_name_not_found() {
        let err = resolve_parser(&ParserSpec::named("does not exist"), &NetworkSelection::Latest)
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::ParserNotFound { ref name } if name == "does not exist"));
        assert!(err.to_string().contains("was not found"));
    }

    #[test]
    fn custom_parser_identity() {
        let parse = parse_fn(|v| Ok(CandidateDefinition::from_value(v)));
        let resolved =
            resolve_parser(&ParserSpec::Custom(Arc::clone(&parse)), &NetworkSelection::Latest)
                .unwrap();
        assert!(Arc::ptr_eq(&parse, &resolved));
    }

    #[test]
    fn from_value_rejects_non_strings() {
        assert!(matches!(
            ParserSpec::from_value(&json!("truffle")),
            Ok(ParserSpec::Named(ref n)) if n == "truffle"
        ));
        let err = ParserSpec::from_value(&json!(123)).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidParser { ref found } if found == "number"));
        assert_eq!(
            err.to_string(),
            "Invalid parser: expected a parser name, got number"
        );
        assert!(ParserSpec::from_value(&json!({ "name": "truffle" })).is_err());
    }

    #[test]
    fn truffle_latest_network() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({
                "abi": [],
                "bytecode": "0x60",
                "networks": {
                    "3": { "address": "0x3" },
                    "1492719647054": { "address": "0xlocal" },
                    "42": { "address": "0x42" },
                }
            }),
        );
        assert_eq!(c.address, Some(json!("0xlocal")));
    }

    #[test]
    fn truffle_numeric_not_lexicographic() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({ "networks": { "9": { "address": "0x9" }, "10": { "address": "0x10" } } }),
        );
        assert_eq!(c.address, Some(json!("0x10")));
    }

    #[test]
    fn truffle_numeric_ids_are_unbounded() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({ "networks": {
                "1": { "address": "0x1" },
                "340282366920938463463374607431768211456": { "address": "0xbig" },
                "00099": { "address": "0x99" }
            } }),
        );
        assert_eq!(c.address, Some(json!("0xbig")));
    }

    #[test]
    fn network_id_ordering() {
        assert_eq!(compare_network_ids("007", "7"), Ordering::Equal);
        assert_eq!(compare_network_ids("10", "9"), Ordering::Greater);
        assert_eq!(compare_network_ids("0", "mainnet"), Ordering::Greater);
        assert_eq!(compare_network_ids("+5", "-5"), "+5".cmp("-5"));
    }

    #[test]
    fn truffle_numeric_beats_named() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({ "networks": { "zzz": { "address": "0xz" }, "1": { "address": "0x1" } } }),
        );
        assert_eq!(c.address, Some(json!("0x1")));
    }

    #[test]
    fn truffle_exact_network() {
        let value = json!({ "networks": { "1": { "address": "0x1" }, "5": { "address": "0x5" } } });
        let c = parse("truffle", NetworkSelection::Exact("1".into()), value.clone());
        assert_eq!(c.address, Some(json!("0x1")));

        let parser =
            resolve_parser(&ParserSpec::named("truffle"), &NetworkSelection::Exact("137".into())).unwrap();
        let err = parser(&value).unwrap_err();
        assert!(matches!(err, ParseError::NetworkNotFound { ref network } if network == "137"));
    }

    #[test]
    fn truffle_unique_network() {
        let parser = resolve_parser(&ParserSpec::named("truffle"), &NetworkSelection::Unique).unwrap();
        let two = json!({ "networks": { "1": { "address": "0x1" }, "5": { "address": "0x5" } } });
        assert!(matches!(
            parser(&two).unwrap_err(),
            ParseError::AmbiguousNetwork { count: 2 }
        ));

        let one = json!({ "networks": { "5": { "address": "0x5" } } });
        assert_eq!(parser(&one).unwrap().address, Some(json!("0x5")));
        assert_eq!(parser(&json!({})).unwrap().address, None);
    }

    #[test]
    fn truffle_without_networks_has_no_address() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({ "abi": [], "bytecode": "0x60", "networks": {} }),
        );
        assert!(c.address.is_none());
        assert_eq!(c.bytecode, Some(json!("0x60")));
    }

    #[test]
    fn truffle_legacy_unlinked_binary() {
        let c = parse(
            "truffle",
            NetworkSelection::Latest,
            json!({ "abi": [], "unlinked_binary": "0x6060" }),
        );
        assert_eq!(c.bytecode, Some(json!("0x6060")));
    }

    #[test]
    fn foundry_bytecode_object() {
        let c = parse(
            "foundry",
            NetworkSelection::Latest,
            json!({ "abi": [], "bytecode": { "object": "0x6080", "linkReferences": {} } }),
        );
        assert_eq!(c.bytecode, Some(json!("0x6080")));
        assert!(c.address.is_none());
    }

    #[test]
    fn hardhat_ignores_address() {
        let c = parse(
            "hardhat",
            NetworkSelection::Latest,
            json!({ "contractName": "Lock", "abi": [], "bytecode": "0x60", "address": "0x1" }),
        );
        assert!(c.address.is_none());
        assert_eq!(c.contract_name, Some(json!("Lock")));
    }

    #[test]
    fn plain_reads_top_level() {
        let c = parse(
            "plain",
            NetworkSelection::Latest,
            json!({ "address": "0x1", "abi": [], "bytecode": "0x60" }),
        );
        assert_eq!(c.address, Some(json!("0x1")));
    }
}
