//! Endpoint templates.
//!
//! A template is a plain string carrying `%%KEY%%` markers, e.g.
//! `https://registry.example/contracts?name=%%NAME%%&version=%%VERSION%%`.
//! Rendering replaces every known marker in a single left-to-right pass, so
//! substituted values are never rescanned and marker order does not matter.

use crate::types::{ContractIdentifier, LoadOptions};

const MARKER: &str = "%%";

/// One substitutable field of a [`ContractIdentifier`].
struct Placeholder {
    key: &'static str,
    value: for<'a> fn(&'a ContractIdentifier<'a>) -> Option<&'a str>,
}

fn name_field<'a>(id: &'a ContractIdentifier<'a>) -> Option<&'a str> {
    Some(id.name)
}

fn version_field<'a>(id: &'a ContractIdentifier<'a>) -> Option<&'a str> {
    id.version
}

fn address_field<'a>(id: &'a ContractIdentifier<'a>) -> Option<&'a str> {
    id.address
}

static PLACEHOLDERS: &[Placeholder] = &[
    Placeholder {
        key: "NAME",
        value: name_field,
    },
    Placeholder {
        key: "VERSION",
        value: version_field,
    },
    Placeholder {
        key: "ADDRESS",
        value: address_field,
    },
];

/// A resource location template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    template: String,
}

impl EndpointTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Every marker this renderer understands, e.g. `%%NAME%%`.
    pub fn placeholders() -> impl Iterator<Item = String> {
        PLACEHOLDERS
            .iter()
            .map(|p| format!("{MARKER}{}{MARKER}", p.key))
    }

    /// Render the template for a contract name and its load options.
    pub fn resolve(&self, name: &str, options: &LoadOptions) -> String {
        self.render(&ContractIdentifier::new(name, options))
    }

    /// Render the template for a contract identifier.
    ///
    /// Absent fields render as `""`. Unknown `%%KEY%%` markers are copied
    /// through verbatim.
    pub fn render(&self, id: &ContractIdentifier<'_>) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find(MARKER) {
            out.push_str(&rest[..start]);
            let after = &rest[start + MARKER.len()..];

            let Some(end) = after.find(MARKER) else {
                // Unterminated marker: copy the tail as-is.
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let key = &after[..end];
            match PLACEHOLDERS.iter().find(|p| p.key == key) {
                Some(placeholder) => {
                    out.push_str((placeholder.value)(id).unwrap_or_default());
                    rest = &after[end + MARKER.len()..];
                }
                None => {
                    // The closing marker may open the next placeholder.
                    out.push_str(MARKER);
                    out.push_str(key);
                    rest = &after[end..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl From<&str> for EndpointTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for EndpointTemplate {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

/// Convenience: render `template` for `name` without building an
/// [`EndpointTemplate`] first.
pub fn resolve_endpoint_resource(template: &str, name: &str, options: &LoadOptions) -> String {
    EndpointTemplate::new(template).resolve(name, options)
}
