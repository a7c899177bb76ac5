use anyhow::{bail, ensure, Result};
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The message of an io::Error without the trailing "(os error N)".
fn io_error_message(err: &std::io::Error) -> String {
    let msg = err.to_string();
    match err.raw_os_error() {
        Some(code) => msg
            .strip_suffix(&format!(" (os error {code})"))
            .unwrap_or(&msg)
            .to_string(),
        None => msg,
    }
}

/// Report a failed command on stderr, one cause per line.
/// An io::Error at the top of the chain is shown without its os error code.
pub fn print_error_chain(err: &anyhow::Error) {
    let causes = err.chain().join("\n\tCaused by: ");
    match err.downcast_ref::<std::io::Error>() {
        Some(io_err) if err.chain().len() <= 2 => {
            let msg = io_error_message(io_err);
            if err.chain().len() == 1 {
                eprintln!("ERROR: {msg}");
            } else {
                eprintln!("ERROR: {msg}: {err}");
            }
        }
        _ => eprintln!("ERROR: {causes}"),
    }
}

/// An existing input file given on the command line.
///
/// The path is made absolute so the workflow can run from another directory,
/// but symlinks are not resolved: output names are derived from the name the
/// user typed.
#[derive(Clone, PartialEq, Eq)]
pub struct CliPath(PathBuf);

impl CliPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl FromStr for CliPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<CliPath> {
        if let Err(err) = std::fs::metadata(s) {
            bail!(io_error_message(&err));
        }
        Ok(CliPath(std::path::absolute(s)?))
    }
}

impl Display for CliPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0.display(), f)
    }
}

impl Debug for CliPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

/// Parse and validate a `KEY=VALUE` config pair, for use with Clap's value_parser.
pub fn validate_config_pair(pair: &str) -> Result<String> {
    ensure!(
        pair.split_once('=')
            .is_some_and(|(key, _)| !key.trim().is_empty()),
        "must have the form KEY=VALUE with a non-empty KEY."
    );
    Ok(String::from(pair))
}

/// Quote arguments so the command can be pasted into a shell.
pub fn shell_join<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|arg| shell_escape::escape(arg.as_ref().into()))
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_pair() {
        for s in ["a=1", "refGenome=", "x=y=z", "GoogleAPIKey=abc def"] {
            assert!(validate_config_pair(s).is_ok(), "{s} should be a valid pair");
        }
        for s in ["a", "=1", " =1", ""] {
            assert!(validate_config_pair(s).is_err(), "{s} should be an invalid pair");
        }
    }

    #[test]
    fn test_cli_path_is_absolute() -> Result<()> {
        // tests run from the package root
        let path: CliPath = "Cargo.toml".parse()?;
        assert_eq!(path.as_path(), std::env::current_dir()?.join("Cargo.toml"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_cli_path_keeps_symlink() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let target = dir.path().join("blob_abc123");
        std::fs::write(&target, "")?;
        let link = dir.path().join("birds.vcf.gz");
        std::os::unix::fs::symlink(&target, &link)?;
        let path: CliPath = link.to_str().unwrap().parse()?;
        assert_eq!(path.as_path(), link);
        Ok(())
    }

    #[test]
    fn test_cli_path_missing() {
        let err = "/nonexistent/in.vcf".parse::<CliPath>().unwrap_err();
        assert_eq!(err.to_string(), "No such file or directory");
    }

    #[test]
    fn test_shell_join() {
        assert_eq!(
            shell_join(&["snakemake", "--config", "GoogleAPIKey=a b"]),
            "snakemake --config 'GoogleAPIKey=a b'"
        );
    }
}
