#![deny(
    future_incompatible,
    nonstandard_style,
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2018_idioms,
    unused
)]

//! Shared types for the snparcher command-line wrapper: the run configuration,
//! sample-sheet validation, and the standalone fallback used by pipeline input
//! functions.

pub mod config;
pub mod errors;
pub mod sample_sheet;
pub mod standalone;

pub use config::{ConfigValue, RunConfig};
pub use errors::{ConfigurationConflict, WorkflowError};
pub use sample_sheet::{parse_sample_sheet, SampleSheet};
pub use standalone::{is_standalone, StandaloneFallback, Wildcards};
