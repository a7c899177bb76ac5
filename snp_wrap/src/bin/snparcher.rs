//! snparcher
#![deny(missing_docs)]

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use snp_wrap::qc::Qc;
use snp_wrap::utils::print_error_chain;
use snp_wrap::validate::Validate;
use std::io::Write;
use std::process::ExitCode;

const CMD: &str = "snparcher";

/// Run snpArcher workflow modules and check their inputs
#[derive(Parser, Debug)]
#[clap(name = CMD, version)]
struct SnpArcher {
    #[clap(subcommand)]
    subcmd: SubCommand,

    /// Log debug messages.
    #[clap(long, global = true)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum SubCommand {
    /// Run quality control on a VCF file.
    #[clap(name = "qc")]
    Qc(Qc),

    /// Validate the reference genome information of a sample sheet.
    #[clap(name = "validate")]
    Validate(Validate),
}

/// Log to stderr with a timestamp. RUST_LOG overrides the level.
fn init_log(verbose: bool) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(
            None,
            if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        )
        .parse_default_env()
        .init();
}

fn inner_main() -> Result<ExitCode> {
    let args = SnpArcher::parse();
    init_log(args.verbose);

    match args.subcmd {
        SubCommand::Qc(qc) => qc.execute(),
        SubCommand::Validate(validate) => validate.execute(),
    }
}

fn main() -> ExitCode {
    match inner_main() {
        Ok(exit_code) => exit_code,
        Err(err) => {
            print_error_chain(&err);
            ExitCode::FAILURE
        }
    }
}
