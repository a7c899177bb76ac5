//! The `qc` command: run the QC module on an existing VCF.

use crate::engine_args::EngineArgs;
use crate::env::{module_snakefile, workflow_dir};
use crate::utils::CliPath;
use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

/// The pipeline module run by `qc`.
pub const QC_MODULE: &str = "qc";

/// Run the QC module on a VCF file.
#[derive(Parser, Debug, Clone)]
pub struct Qc {
    /// Path to vcf file
    #[clap(value_name = "VCF")]
    vcf: CliPath,

    /// Path to fai file
    #[clap(value_name = "FAI")]
    fai: CliPath,

    /// File containing coordinates for samples in VCF.
    #[clap(long, value_name = "PATH", required = true)]
    coords_file: CliPath,

    /// Min depth of SNPs to keep
    #[clap(long, value_name = "NUM", required = true)]
    min_depth: u32,

    /// Comma separated list of chromosomes to exclude.
    #[clap(long, value_name = "LIST", value_delimiter = ',')]
    exclude_chrs: Vec<String>,

    /// Number of clusters for PCA
    #[clap(long, value_name = "NUM", default_value_t = 3)]
    nclusters: u32,

    /// Google API key for satellite map
    #[clap(long, value_name = "KEY", default_value = "")]
    google_api_key: String,

    /// Do not run the workflow.
    /// Print the engine command that would be run and stop.
    #[clap(long)]
    pub dry: bool,

    #[clap(flatten)]
    pub engine: EngineArgs,
}

/// Output prefix derived from the VCF name: `birds.vcf.gz` becomes `birds`.
pub fn final_prefix(vcf: &Path) -> String {
    let stem = vcf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_suffix(".vcf") {
        Some(prefix) => prefix.to_string(),
        None => stem,
    }
}

impl Qc {
    /// The workflow config set by this command, as `KEY=VALUE` pairs.
    pub fn to_config_pairs(&self) -> Vec<String> {
        vec![
            format!("fai={}", self.fai),
            format!("vcf={}", self.vcf),
            format!("final_prefix={}", final_prefix(self.vcf.as_path())),
            "standalone=True".to_string(),
            format!("min_depth={}", self.min_depth),
            format!("scaffolds_to_exclude={}", self.exclude_chrs.join(",")),
            format!("nClusters={}", self.nclusters),
            format!("GoogleAPIKey={}", self.google_api_key),
            format!("coords_file={}", self.coords_file),
        ]
    }

    pub fn execute(&self) -> Result<ExitCode> {
        let snakefile = module_snakefile(&workflow_dir()?, QC_MODULE);
        crate::execute(&snakefile, &self.to_config_pairs(), &self.engine, self.dry)
    }
}
