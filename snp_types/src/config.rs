//! Run configuration shared by the sample-sheet validator and the pipeline
//! input functions.
//!
//! The configuration is a flat mapping from option name to a dynamically typed
//! value, loaded from a YAML or JSON file and then amended with `KEY=VALUE`
//! overrides in the same way the workflow engine treats `--config`.

use crate::errors::WorkflowError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

/// A single configuration value.
pub type ConfigValue = Value;

/// Key holding the path to the sample sheet.
pub const SAMPLES_KEY: &str = "samples";
/// Key marking a run as standalone (inputs supplied directly via config).
pub const STANDALONE_KEY: &str = "standalone";
/// Config-level reference genome name.
pub const REF_GENOME_KEY: &str = "refGenome";
/// Config-level reference genome path.
pub const REF_PATH_KEY: &str = "refPath";

/// Python-style truthiness of a config value.
pub fn is_truthy(value: &ConfigValue) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Render a scalar value the way it would be written on the command line.
pub fn value_to_string(value: &ConfigValue) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse the right hand side of a `KEY=VALUE` override.
///
/// Values are read as YAML scalars so that `True`, `3` and `[a, b]` get the
/// same types the engine would give them. Anything YAML rejects is kept as a
/// plain string.
pub fn parse_override_value(raw: &str) -> ConfigValue {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunConfig(Map<String, ConfigValue>);

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a YAML mapping. JSON is a subset of YAML, so this reads both.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)
            .with_context(|| format!("Unable to open config file {path:?}"))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Unable to parse config file {path:?}"))
    }

    /// Apply `KEY=VALUE` overrides in order; later pairs win.
    pub fn apply_overrides<I, S>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, raw) = match pair.split_once('=') {
                Some((key, raw)) if !key.trim().is_empty() => (key.trim(), raw),
                _ => {
                    return Err(WorkflowError::InvalidOverride {
                        pair: pair.to_string(),
                    }
                    .into())
                }
            };
            self.insert(key, parse_override_value(raw));
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// True when the key is present and its value is truthy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// The value under `key` rendered as a string, if the key is truthy.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| is_truthy(v)).map(value_to_string)
    }

    /// Path to the sample sheet.
    pub fn samples_path(&self) -> Result<PathBuf> {
        self.get_str(SAMPLES_KEY)
            .map(PathBuf::from)
            .with_context(|| format!("'{SAMPLES_KEY}' is not set in config"))
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for RunConfig {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        RunConfig(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
