//! Locating the workflow definitions shipped with the package.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the workflow directory.
pub const WORKFLOW_DIR_ENV: &str = "SNPARCHER_WORKFLOW_DIR";

/// The workflow directory: `$SNPARCHER_WORKFLOW_DIR` if set, otherwise
/// `workflow/` in the installation root, one above the binary.
pub fn workflow_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(WORKFLOW_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let exe = env::current_exe().context("Unable to locate the snparcher executable")?;
    installed_workflow_dir(&exe)
}

fn installed_workflow_dir(exe: &Path) -> Result<PathBuf> {
    exe.parent()
        .and_then(Path::parent)
        .map(|root| root.join("workflow"))
        .with_context(|| format!("No installation root above {}", exe.display()))
}

/// The Snakefile of one pipeline module.
pub fn module_snakefile(workflow_dir: &Path, module: &str) -> PathBuf {
    workflow_dir.join("modules").join(module).join("Snakefile")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_workflow_dir() -> Result<()> {
        assert_eq!(
            installed_workflow_dir(Path::new("/opt/snparcher/bin/snparcher"))?,
            PathBuf::from("/opt/snparcher/workflow")
        );
        assert!(installed_workflow_dir(Path::new("snparcher")).is_err());
        Ok(())
    }

    #[test]
    fn test_module_snakefile() {
        assert_eq!(
            module_snakefile(Path::new("/opt/snparcher/workflow"), "qc"),
            PathBuf::from("/opt/snparcher/workflow/modules/qc/Snakefile")
        );
    }
}
