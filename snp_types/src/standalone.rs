//! Standalone fallback for pipeline input functions.
//!
//! In a normal run, inputs are resolved per sample from wildcards. When the
//! pipeline is started from the command line in standalone mode, the inputs
//! are given directly in the config instead. [StandaloneFallback] wraps an
//! input function so that one call site works for both.

use crate::config::{ConfigValue, RunConfig, STANDALONE_KEY};
use crate::errors::WorkflowError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wildcard values bound for one job instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wildcards(BTreeMap<String, String>);

impl Wildcards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Wildcards {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Wildcards(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// True if the config marks this run as standalone.
pub fn is_standalone(config: &RunConfig) -> bool {
    config.is_truthy(STANDALONE_KEY)
}

/// Redirects an input function to a config value when running standalone.
#[derive(Debug, Clone)]
pub struct StandaloneFallback<'a> {
    config: &'a RunConfig,
    config_key: String,
    allow_missing: bool,
}

impl<'a> StandaloneFallback<'a> {
    pub fn new(config: &'a RunConfig, config_key: impl Into<String>) -> Self {
        StandaloneFallback {
            config,
            config_key: config_key.into(),
            allow_missing: false,
        }
    }

    /// Return an empty list instead of failing when the key is absent.
    pub fn allow_missing(mut self, allow_missing: bool) -> Self {
        self.allow_missing = allow_missing;
        self
    }

    /// The config value to use in place of `func`, or `None` when not standalone.
    fn standalone_value(&self) -> Option<Result<ConfigValue, WorkflowError>> {
        if !is_standalone(self.config) {
            return None;
        }
        Some(match self.config.get(&self.config_key) {
            Some(value) => Ok(value.clone()),
            None if self.allow_missing => Ok(ConfigValue::Array(Vec::new())),
            None => Err(WorkflowError::MissingStandaloneInput {
                key: self.config_key.clone(),
            }),
        })
    }

    /// Resolve a single call: the config value when standalone, `func` otherwise.
    pub fn resolve<A, F>(&self, wildcards: &Wildcards, args: A, func: F) -> Result<ConfigValue>
    where
        F: FnOnce(&Wildcards, A) -> Result<ConfigValue>,
    {
        match self.standalone_value() {
            Some(value) => {
                log::debug!("standalone mode: taking '{}' from config", self.config_key);
                Ok(value?)
            }
            None => func(wildcards, args),
        }
    }

    /// Wrap `func` into a function with the same signature.
    pub fn wrap<A, F>(self, func: F) -> impl Fn(&Wildcards, A) -> Result<ConfigValue> + 'a
    where
        A: 'a,
        F: Fn(&Wildcards, A) -> Result<ConfigValue> + 'a,
    {
        move |wildcards: &Wildcards, args: A| self.resolve(wildcards, args, &func)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn fastq_for_sample(wildcards: &Wildcards, suffix: &str) -> Result<ConfigValue> {
        let sample = wildcards.get("sample").unwrap_or("unknown");
        Ok(json!([format!("{sample}_1.{suffix}"), format!("{sample}_2.{suffix}")]))
    }

    fn wildcards() -> Wildcards {
        [("sample", "s1"), ("refGenome", "hg38")].into_iter().collect()
    }

    #[test]
    fn test_standalone_returns_config_value() -> Result<()> {
        let config: RunConfig = [("standalone", json!(true)), ("vcf", json!("/data/x.vcf.gz"))]
            .into_iter()
            .collect();
        let calls = Cell::new(0);
        let input = StandaloneFallback::new(&config, "vcf").wrap(|w: &Wildcards, s: &str| {
            calls.set(calls.get() + 1);
            fastq_for_sample(w, s)
        });

        assert_eq!(input(&wildcards(), "fq.gz")?, json!("/data/x.vcf.gz"));
        assert_eq!(input(&Wildcards::new(), "anything")?, json!("/data/x.vcf.gz"));
        assert_eq!(calls.get(), 0);
        Ok(())
    }

    #[test]
    fn test_standalone_value_is_verbatim() -> Result<()> {
        let value = json!(["a.bam", "b.bam", {"nested": 1}]);
        let config: RunConfig = [("standalone", json!("yes")), ("bams", value.clone())]
            .into_iter()
            .collect();
        let input = StandaloneFallback::new(&config, "bams").wrap(fastq_for_sample);
        assert_eq!(input(&wildcards(), "fq.gz")?, value);
        Ok(())
    }

    #[test]
    fn test_standalone_missing_allowed() -> Result<()> {
        let config: RunConfig = [("standalone", json!(true))].into_iter().collect();
        let input = StandaloneFallback::new(&config, "coords_file")
            .allow_missing(true)
            .wrap(fastq_for_sample);
        assert_eq!(input(&wildcards(), "fq.gz")?, json!([]));
        Ok(())
    }

    #[test]
    fn test_standalone_missing_not_allowed() {
        let config: RunConfig = [("standalone", json!(true))].into_iter().collect();
        let input = StandaloneFallback::new(&config, "fai").wrap(fastq_for_sample);
        let err = input(&wildcards(), "fq.gz").unwrap_err();
        assert_eq!(
            err.downcast_ref::<WorkflowError>(),
            Some(&WorkflowError::MissingStandaloneInput {
                key: "fai".to_string()
            })
        );
    }

    #[test]
    fn test_not_standalone_delegates() -> Result<()> {
        for config in [
            RunConfig::new(),
            [("standalone", json!(false)), ("vcf", json!("/ignored"))]
                .into_iter()
                .collect(),
            [("standalone", json!(0))].into_iter().collect(),
        ] {
            let seen = Cell::new(None);
            let input = StandaloneFallback::new(&config, "vcf").wrap(|w: &Wildcards, s: &str| {
                seen.set(Some((w.clone(), s.to_string())));
                fastq_for_sample(w, s)
            });
            assert_eq!(
                input(&wildcards(), "fq.gz")?,
                json!(["s1_1.fq.gz", "s1_2.fq.gz"])
            );
            assert_eq!(seen.take(), Some((wildcards(), "fq.gz".to_string())));
        }
        Ok(())
    }

    #[test]
    fn test_not_standalone_passes_errors_through() {
        let config = RunConfig::new();
        let input = StandaloneFallback::new(&config, "vcf")
            .wrap(|_: &Wildcards, (): ()| -> Result<ConfigValue> { anyhow::bail!("no such sample") });
        assert_eq!(input(&wildcards(), ()).unwrap_err().to_string(), "no such sample");
    }

    #[test]
    fn test_wrappers_are_independent() -> Result<()> {
        let config: RunConfig = [("standalone", json!(true)), ("vcf", json!("x.vcf"))]
            .into_iter()
            .collect();
        let vcf = StandaloneFallback::new(&config, "vcf").wrap(fastq_for_sample);
        let fai = StandaloneFallback::new(&config, "fai")
            .allow_missing(true)
            .wrap(fastq_for_sample);
        assert_eq!(vcf(&wildcards(), "")?, json!("x.vcf"));
        assert_eq!(fai(&wildcards(), "")?, json!([]));
        Ok(())
    }

    #[test]
    fn test_resolve_once() -> Result<()> {
        let config: RunConfig = [("standalone", json!(true)), ("fai", json!("ref.fai"))]
            .into_iter()
            .collect();
        let fallback = StandaloneFallback::new(&config, "fai");
        let value = fallback.resolve(&wildcards(), (), |_, ()| unreachable!())?;
        assert_eq!(value, json!("ref.fai"));
        Ok(())
    }
}
