//! Tracing / logging initialisation.

use std::collections::BTreeMap;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter and format for the CLI's stderr logs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default level for every target.
    pub level: String,
    /// Per-crate overrides from `--log-component crate=level`.
    pub components: BTreeMap<String, String>,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            components: BTreeMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Filter directives, e.g. `"warn,contractloader_core=debug"`.
    pub fn directives(&self) -> String {
        self.components
            .iter()
            .fold(self.level.clone(), |mut directives, (component, level)| {
                directives.push_str(&format!(",{}={level}", component.replace('-', "_")));
                directives
            })
    }
}

/// Parse one `crate=level` override.
pub fn parse_component(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((component, level)) if !component.is_empty() && !level.is_empty() => {
            Ok((component.to_string(), level.to_string()))
        }
        _ => Err(format!("expected <crate>=<level>, got \"{arg}\"")),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for definition output. Call once at startup.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("warn"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
