use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::session::SessionOptions;
use crate::form::block_model::WidgetKind;
use crate::form::classifier::FormSelectors;
use crate::matching::alias::AliasTable;
use crate::matching::resolver::{DEFAULT_THRESHOLD, Resolver};
use crate::runner::orchestrator::{DEFAULT_LOAD_GRACE_MS, RunSettings};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "form-autofill.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "form-autofill",
    version,
    about = "Fill web questionnaires from a JSON field record"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: form-autofill.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a form in the browser and fill it from a record
    Fill {
        /// Form URL
        #[arg(long)]
        url: String,

        /// Field record: JSON file path or http(s) URL
        #[arg(long)]
        record: String,

        /// Close the browser right after filling instead of waiting for Enter
        #[arg(long)]
        no_pause: bool,

        /// Append per-block JSON lines to this file (overrides trace.path)
        #[arg(long)]
        trace: Option<String>,

        /// Similarity threshold, 0-100 (overrides matching.threshold)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// Run the browser without a window (overrides driver.headless)
        #[arg(long)]
        headless: bool,
    },

    /// Resolve question labels against a record without opening a browser
    Resolve {
        /// Field record: JSON file path or http(s) URL
        #[arg(long)]
        record: String,

        /// Question label to resolve (repeatable)
        #[arg(long = "label", required = true)]
        labels: Vec<String>,

        /// Similarity threshold, 0-100 (overrides matching.threshold)
        #[arg(long, value_parser = parse_threshold)]
        threshold: Option<f64>,
    },

    /// Print the effective alias table
    Aliases,
}

/// Clap value parser for `--threshold`.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("`{}` is not a number", raw))?;
    if valid_threshold(value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0-100", value))
    }
}

fn valid_threshold(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `form-autofill.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Extra phrase → record key entries
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,

    /// Use only `aliases`, dropping the built-in table
    #[serde(default)]
    pub replace_default_aliases: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            aliases: BTreeMap::new(),
            replace_default_aliases: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_load_grace_ms")]
    pub load_grace_ms: u64,

    #[serde(default = "default_widget_order")]
    pub widget_order: Vec<WidgetKind>,

    #[serde(default)]
    pub selectors: FormSelectors,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            load_grace_ms: DEFAULT_LOAD_GRACE_MS,
            widget_order: default_widget_order(),
            selectors: FormSelectors::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_node")]
    pub node: String,

    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default)]
    pub headless: bool,

    /// Saved login state; `null` starts a fresh profile
    #[serde(default = "default_storage_state")]
    pub storage_state: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: default_script(),
            headless: false,
            storage_state: default_storage_state(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_threshold() -> f64 { DEFAULT_THRESHOLD }
fn default_load_grace_ms() -> u64 { DEFAULT_LOAD_GRACE_MS }
fn default_widget_order() -> Vec<WidgetKind> { WidgetKind::DEFAULT_ORDER.to_vec() }
fn default_node() -> String { SessionOptions::default().node }
fn default_script() -> String { SessionOptions::default().script }
fn default_storage_state() -> Option<String> { SessionOptions::default().storage_state }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Parse YAML config. An out-of-range `matching.threshold` is replaced by
/// the default with a warning.
pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    let mut config: AppConfig = serde_yaml::from_str(content)?;
    if !valid_threshold(config.matching.threshold) {
        tracing::warn!(
            threshold = config.matching.threshold,
            "matching.threshold outside 0-100, using {}",
            DEFAULT_THRESHOLD
        );
        config.matching.threshold = DEFAULT_THRESHOLD;
    }
    Ok(config)
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Build the resolver from `matching`, with an optional CLI threshold override.
pub fn build_resolver(matching: &MatchingConfig, threshold: Option<f64>) -> Resolver {
    let base = if matching.replace_default_aliases {
        AliasTable::empty()
    } else {
        AliasTable::builtin()
    };
    let aliases = base.with_overrides(&matching.aliases);
    Resolver::new(aliases, threshold.unwrap_or(matching.threshold))
}

pub fn build_run_settings(form: &FormConfig) -> RunSettings {
    let widget_order = if form.widget_order.is_empty() {
        tracing::warn!("empty widget_order, using the default order");
        default_widget_order()
    } else {
        form.widget_order.clone()
    };
    RunSettings {
        load_grace_ms: form.load_grace_ms,
        widget_order,
        selectors: form.selectors.clone(),
    }
}

pub fn build_session_options(driver: &DriverConfig, headless: bool) -> SessionOptions {
    SessionOptions {
        node: driver.node.clone(),
        script: driver.script.clone(),
        headless: headless || driver.headless,
        storage_state: driver.storage_state.clone(),
    }
}
