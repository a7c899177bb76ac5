//! The `validate` command: check a sample sheet before starting a full run.

use crate::utils::{validate_config_pair, CliPath};
use anyhow::{Context, Result};
use clap::Parser;
use snp_types::{parse_sample_sheet, RunConfig, SampleSheet};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Validate the reference genome information of a sample sheet.
#[derive(Parser, Debug, Clone)]
pub struct Validate {
    /// YAML or JSON workflow config naming the sample sheet under 'samples'.
    #[clap(long, value_name = "PATH")]
    configfile: Option<CliPath>,

    /// Set a workflow config value, may be repeated. Applied after --configfile.
    #[clap(
        long = "config",
        value_name = "KEY=VALUE",
        value_parser = validate_config_pair,
    )]
    config: Vec<String>,

    /// Write the validated sample sheet, with any config-level reference
    /// filled in, to this CSV file.
    #[clap(long, value_name = "CSV")]
    out: Option<PathBuf>,
}

impl Validate {
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.configfile {
            Some(path) => RunConfig::from_yaml_file(path.as_path())?,
            None => RunConfig::new(),
        };
        config.apply_overrides(&self.config)?;
        Ok(config)
    }

    pub fn sample_sheet(&self) -> Result<SampleSheet> {
        parse_sample_sheet(&self.run_config()?)
    }

    pub fn execute(&self) -> Result<ExitCode> {
        let samples = self.sample_sheet()?;
        for ref_genome in samples.ref_genomes() {
            println!(
                "{ref_genome}: {} samples, refPath {}",
                samples.samples_for_genome(ref_genome).len(),
                samples.ref_path_for_genome(ref_genome).unwrap_or("(to be downloaded)")
            );
        }
        if let Some(out) = &self.out {
            let writer = BufWriter::new(
                File::create(out).with_context(|| format!("Unable to create {out:?}"))?,
            );
            samples
                .write_csv(writer)
                .with_context(|| format!("Unable to write {out:?}"))?;
            log::info!("Wrote validated sample sheet to {out:?}");
        }
        Ok(ExitCode::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snp_types::WorkflowError;
    use std::fs::{read_to_string, write};

    #[test]
    fn test_validate_writes_sheet() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let reference = dir.path().join("ref.fa");
        write(&reference, ">chr1\nACGT\n")?;
        let samples = dir.path().join("samples.csv");
        write(&samples, "BioSample,Run\nind 1,SRR1\n")?;
        let out = dir.path().join("validated.csv");

        let validate = Validate::try_parse_from([
            "validate".to_string(),
            "--config".to_string(),
            format!("samples={}", samples.display()),
            "--config".to_string(),
            "refGenome=GCA_1".to_string(),
            "--config".to_string(),
            format!("refPath={}", reference.display()),
            "--out".to_string(),
            out.display().to_string(),
        ])?;
        validate.execute()?;
        assert_eq!(
            read_to_string(&out)?,
            format!(
                "BioSample,Run,refGenome,refPath\nind_1,SRR1,GCA_1,{}\n",
                reference.display()
            )
        );
        Ok(())
    }

    #[test]
    fn test_configfile_then_overrides() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let samples = dir.path().join("samples.csv");
        write(&samples, "BioSample,refGenome\ns1,GCA_1\n")?;
        let configfile = dir.path().join("config.yaml");
        write(
            &configfile,
            format!("samples: {}\nrefGenome: GCA_2\n", samples.display()),
        )?;

        let validate = Validate::try_parse_from([
            "validate".to_string(),
            "--configfile".to_string(),
            configfile.display().to_string(),
        ])?;
        let err = validate.sample_sheet().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WorkflowError>(),
            Some(WorkflowError::ConfigurationConflict(_))
        ));

        let validate = Validate::try_parse_from([
            "validate".to_string(),
            "--configfile".to_string(),
            configfile.display().to_string(),
            "--config".to_string(),
            "refGenome=".to_string(),
        ])?;
        assert_eq!(validate.sample_sheet()?.ref_genomes(), ["GCA_1"]);
        Ok(())
    }
}
