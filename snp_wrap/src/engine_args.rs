use crate::utils::validate_config_pair;
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Options passed through to the workflow engine.
#[derive(Parser, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Number of cores the engine may use at one time, or 'all'.
    #[clap(
        long,
        value_name = "NUM",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    cores: Option<String>,

    /// Maximum number of jobs run or submitted in parallel.
    #[clap(long, value_name = "NUM")]
    jobs: Option<usize>,

    /// Name of, or path to, an engine profile directory describing
    /// cluster or cloud execution settings.
    #[clap(
        long,
        value_name = "PROFILE",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    profile: Option<String>,

    /// Run the workflow in this working directory.
    #[clap(long, value_name = "PATH")]
    directory: Option<PathBuf>,

    /// YAML or JSON file with additional workflow config.
    #[clap(long, value_name = "PATH")]
    configfile: Option<PathBuf>,

    /// Set a workflow config value, may be repeated. Values set by the
    /// command itself take precedence.
    #[clap(
        long = "config",
        value_name = "KEY=VALUE",
        value_parser = validate_config_pair,
    )]
    pub config: Vec<String>,

    /// Re-run jobs whose output was left incomplete.
    #[clap(long)]
    rerun_incomplete: bool,

    /// Keep running independent jobs when a job fails.
    #[clap(long)]
    keep_going: bool,

    /// Ask the engine to only plan the jobs, without running them.
    #[clap(long)]
    dry_run: bool,

    /// Additional arguments, given after `--`, forwarded to the engine as is.
    #[clap(last = true, value_name = "ENGINE_ARGS")]
    pub extra: Vec<String>,
}

impl EngineArgs {
    /// Convert this struct into a vector of command line arguments.
    /// Config pairs and trailing arguments are not included.
    pub(crate) fn get_args(&self) -> Vec<String> {
        [
            optional_arg(&self.cores, "cores"),
            optional_arg(&self.jobs, "jobs"),
            optional_arg(&self.profile, "profile"),
            optional_arg(&self.directory.as_ref().map(|p| p.display()), "directory"),
            optional_arg(&self.configfile.as_ref().map(|p| p.display()), "configfile"),
            self.rerun_incomplete
                .then_some("--rerun-incomplete".to_string()),
            self.keep_going.then_some("--keep-going".to_string()),
            self.dry_run.then_some("--dry-run".to_string()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn optional_arg<T: std::fmt::Display>(arg: &Option<T>, param_name: &str) -> Option<String> {
    arg.as_ref().map(|x| format!("--{param_name}={x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_has_no_args() {
        assert!(EngineArgs::default().get_args().is_empty());
    }

    #[test]
    fn test_get_args_order() {
        let args = EngineArgs::try_parse_from([
            "engine",
            "--keep-going",
            "--profile",
            "slurm",
            "--cores",
            "8",
            "--directory",
            "/scratch/run",
            "--config",
            "a=1",
            "--config",
            "b=x",
            "--",
            "--printshellcmds",
            "-p",
        ])
        .unwrap();
        assert_eq!(
            args.get_args(),
            [
                "--cores=8",
                "--profile=slurm",
                "--directory=/scratch/run",
                "--keep-going",
            ]
        );
        assert_eq!(args.config, ["a=1", "b=x"]);
        assert_eq!(args.extra, ["--printshellcmds", "-p"]);
    }

    #[test]
    fn test_rejects_bad_config_pair() {
        assert!(EngineArgs::try_parse_from(["engine", "--config", "nokey"]).is_err());
        assert!(EngineArgs::try_parse_from(["engine", "--cores", ""]).is_err());
    }
}
