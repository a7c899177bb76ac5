#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

// handling the workflow engine
pub mod engine_args;
pub mod env;
pub mod qc;
pub mod utils;
pub mod validate;

use anyhow::{ensure, Context, Result};
use engine_args::EngineArgs;
use std::path::Path;
use std::process::{Command, ExitCode, ExitStatus};

/// The workflow engine executable.
pub const ENGINE: &str = "snakemake";

/// Convert something to an ExitCode.
trait IntoExitCode {
    fn into_exit_code(self) -> ExitCode;
}

impl IntoExitCode for ExitStatus {
    /// Convert an ExitStatus to an ExitCode.
    fn into_exit_code(self) -> ExitCode {
        self.code()
            .map_or(ExitCode::FAILURE, |x| ExitCode::from(x as u8))
    }
}

/// Build the engine arguments for a run.
/// Args:
///  - `snakefile`: the workflow definition to run.
///  - `config_pairs`: `KEY=VALUE` pairs set by the command. These follow any
///    `--config` pairs from the user, so they win on conflicts.
///  - `engine_args`: pass-through options controlling the engine.
pub fn engine_command_args(
    snakefile: &Path,
    config_pairs: &[String],
    engine_args: &EngineArgs,
) -> Vec<String> {
    let mut args = vec![format!("--snakefile={}", snakefile.display())];
    args.extend(engine_args.get_args());
    // --config consumes every following word, so it goes last
    args.extend(engine_args.extra.iter().cloned());
    let config: Vec<_> = engine_args
        .config
        .iter()
        .chain(config_pairs)
        .cloned()
        .collect();
    if !config.is_empty() {
        args.push("--config".to_string());
        args.extend(config);
    }
    args
}

/// Run the workflow engine and return an ExitCode.
/// Args:
///  - `snakefile`: the workflow definition to run.
///  - `config_pairs`: `KEY=VALUE` pairs set by the command.
///  - `engine_args`: pass-through options controlling the engine.
///  - `dry`: print the engine command that would be run but don't run it.
pub fn execute(
    snakefile: &Path,
    config_pairs: &[String],
    engine_args: &EngineArgs,
    dry: bool,
) -> Result<ExitCode> {
    let args = engine_command_args(snakefile, config_pairs, engine_args);
    let cmdline = utils::shell_join(&[ENGINE]) + " " + &utils::shell_join(&args);

    if dry {
        println!("Dry Run Mode");
        println!();
        println!("{ENGINE} command: {cmdline}");
        return Ok(ExitCode::SUCCESS);
    }

    ensure!(
        snakefile.is_file(),
        "Workflow definition not found: {}. Set {} to the snparcher workflow directory.",
        snakefile.display(),
        env::WORKFLOW_DIR_ENV
    );
    log::info!("Running {cmdline}");
    Ok(Command::new(ENGINE)
        .args(&args)
        .status()
        .with_context(|| format!("running {cmdline}"))?
        .into_exit_code())
}
