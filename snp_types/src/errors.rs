use itertools::Itertools;
use std::path::PathBuf;

/// Reference information supplied redundantly or incompletely.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationConflict {
    #[error(
        "'refGenome' is set in sample sheet AND in config. These are mutually exclusive."
    )]
    SetInSheetAndConfig,

    #[error(
        "'{present}' is set in config, but '{missing}' is not. Both are required to use these \
         settings."
    )]
    IncompletePair {
        present: &'static str,
        missing: &'static str,
    },
}

/// Fatal errors raised while preparing a pipeline run.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    ConfigurationConflict(#[from] ConfigurationConflict),

    #[error("No 'refGenome' or 'refPath' found in config or sample sheet.")]
    MissingReferenceInfo,

    #[error(
        "refGenome '{ref_genome}' has more than one unique 'refPath' specified: [{}]",
        ref_paths.iter().map(|p| format!("'{p}'")).join(", ")
    )]
    AmbiguousReferencePath {
        ref_genome: String,
        ref_paths: Vec<String>,
    },

    #[error(
        "refPath: '{}' was specified in sample sheet, but could not be found.",
        path.display()
    )]
    ReferencePathNotFound { path: PathBuf },

    #[error("{key} not found in config while in standalone mode.")]
    MissingStandaloneInput { key: String },

    #[error("The sample sheet {path:?} is missing the required column '{column}'.")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Invalid config override '{pair}': expected KEY=VALUE with a non-empty KEY.")]
    InvalidOverride { pair: String },
}
