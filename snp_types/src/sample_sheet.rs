//! Loading and validation of the sample sheet.
//!
//! Every sample must resolve its reference genome from exactly one place:
//! either the sheet's own `refGenome`/`refPath` columns, or a `refGenome` +
//! `refPath` pair set once in the run config. Within the sheet, a genome name
//! maps to at most one reference path, and that path has to exist.

use crate::config::{RunConfig, REF_GENOME_KEY, REF_PATH_KEY};
use crate::errors::{ConfigurationConflict, WorkflowError};
use anyhow::{bail, Context, Result};
use itertools::Itertools;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SAMPLE_ID_COLUMN: &str = "BioSample";
pub const REF_GENOME_COLUMN: &str = "refGenome";
pub const REF_PATH_COLUMN: &str = "refPath";

/// Cell contents read as missing values.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn normalize_cell(raw: &str) -> Option<String> {
    if NA_VALUES.contains(&raw) {
        None
    } else {
        Some(raw.replace(' ', "_"))
    }
}

/// A sample sheet held as text columns. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleSheet {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl SampleSheet {
    /// Read a comma separated sample sheet with a header row.
    pub fn from_csv(path: &Path) -> Result<SampleSheet> {
        // short rows are padded with missing cells, long rows are an error
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Unable to read sample sheet: {path:?}"))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("Unable to read header of sample sheet: {path:?}"))?
            .iter()
            .map(String::from)
            .collect();
        if let Some(dup) = headers.iter().duplicates().next() {
            bail!("Duplicate column '{dup}' in the header of sample sheet {path:?}");
        }

        let mut rows = Vec::new();
        for (i, rec) in reader.records().enumerate() {
            // line 1 is the header
            let rec = rec.with_context(|| {
                format!("Unable to read line {} of sample sheet {path:?}", i + 2)
            })?;
            if rec.len() > headers.len() {
                bail!(
                    "Line {} of sample sheet {path:?} has {} fields, but the header has {}",
                    i + 2,
                    rec.len(),
                    headers.len()
                );
            }
            let mut row: Vec<_> = rec.iter().map(normalize_cell).collect();
            row.resize(headers.len(), None);
            rows.push(row);
        }

        Ok(SampleSheet {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All cells of a column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// The cell at `row` in column `name`, if both exist and the cell is not missing.
    pub fn get(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?[idx].as_deref()
    }

    /// True if the column exists and has at least one non-missing cell.
    pub fn has_values(&self, name: &str) -> bool {
        self.column(name)
            .is_some_and(|col| col.iter().any(Option::is_some))
    }

    /// Set every row of column `name` to `value`, appending the column if needed.
    pub fn set_column(&mut self, name: &str, value: &str) {
        let idx = match self.column_index(name) {
            Some(idx) => idx,
            None => {
                self.headers.push(name.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.headers.len() - 1
            }
        };
        for row in &mut self.rows {
            row[idx] = Some(value.to_string());
        }
    }

    /// Distinct reference genome names, in the order they first appear.
    pub fn ref_genomes(&self) -> Vec<&str> {
        self.column(REF_GENOME_COLUMN)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .unique()
            .collect()
    }

    /// Distinct sample identifiers whose rows use the given reference genome.
    pub fn samples_for_genome(&self, ref_genome: &str) -> Vec<&str> {
        (0..self.len())
            .filter(|&i| self.get(i, REF_GENOME_COLUMN) == Some(ref_genome))
            .filter_map(|i| self.get(i, SAMPLE_ID_COLUMN))
            .unique()
            .collect()
    }

    /// Distinct reference paths given for a genome, in first-seen order.
    pub fn ref_paths_for_genome(&self, ref_genome: &str) -> Vec<&str> {
        (0..self.len())
            .filter(|&i| self.get(i, REF_GENOME_COLUMN) == Some(ref_genome))
            .filter_map(|i| self.get(i, REF_PATH_COLUMN))
            .unique()
            .collect()
    }

    /// The single reference path for a genome. Only meaningful on a validated sheet.
    pub fn ref_path_for_genome(&self, ref_genome: &str) -> Option<&str> {
        self.ref_paths_for_genome(ref_genome).into_iter().next()
    }

    /// Write the table as CSV, missing cells as empty fields.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Load the sample sheet named by `samples` in the config and validate its
/// reference genome information.
pub fn parse_sample_sheet(config: &RunConfig) -> Result<SampleSheet> {
    let path = config.samples_path()?;
    let mut samples = SampleSheet::from_csv(&path)?;
    if !samples.has_column(SAMPLE_ID_COLUMN) {
        return Err(WorkflowError::MissingColumn {
            path,
            column: SAMPLE_ID_COLUMN,
        }
        .into());
    }

    let config_genomes = get_config_genomes(config, &samples)?;
    let sheet_ref_genome = samples.has_values(REF_GENOME_COLUMN);
    let sheet_ref_path = samples.has_values(REF_PATH_COLUMN);
    if config_genomes.is_none() && !sheet_ref_genome && !sheet_ref_path {
        return Err(WorkflowError::MissingReferenceInfo.into());
    }

    if let Some((ref_genome, ref_path)) = config_genomes {
        log::debug!(
            "Using refGenome '{ref_genome}' and refPath '{ref_path}' from config for all {} rows",
            samples.len()
        );
        samples.set_column(REF_GENOME_COLUMN, &ref_genome);
        samples.set_column(REF_PATH_COLUMN, &ref_path);
    }

    if samples.has_values(REF_PATH_COLUMN) {
        check_ref_paths(&samples)?;
    }

    log::info!(
        "Validated sample sheet {:?}: {} rows, reference genomes [{}]",
        samples.path(),
        samples.len(),
        samples.ref_genomes().join(", ")
    );
    Ok(samples)
}

/// Return the config-level `(refGenome, refPath)` pair, if one is set.
///
/// Setting only one half of the pair, or setting the pair while the sheet has
/// its own `refGenome` values, is a conflict.
pub fn get_config_genomes(
    config: &RunConfig,
    samples: &SampleSheet,
) -> Result<Option<(String, String)>, WorkflowError> {
    match (config.get_str(REF_GENOME_KEY), config.get_str(REF_PATH_KEY)) {
        (Some(ref_genome), Some(ref_path)) => {
            if samples.has_values(REF_GENOME_COLUMN) {
                return Err(ConfigurationConflict::SetInSheetAndConfig.into());
            }
            Ok(Some((ref_genome, ref_path)))
        }
        (Some(_), None) => Err(ConfigurationConflict::IncompletePair {
            present: REF_GENOME_KEY,
            missing: REF_PATH_KEY,
        }
        .into()),
        (None, Some(_)) => Err(ConfigurationConflict::IncompletePair {
            present: REF_PATH_KEY,
            missing: REF_GENOME_KEY,
        }
        .into()),
        (None, None) => Ok(None),
    }
}

/// Check that each reference genome has at most one reference path and that
/// the path exists.
pub fn check_ref_paths(samples: &SampleSheet) -> Result<(), WorkflowError> {
    for ref_genome in samples.ref_genomes() {
        let ref_paths = samples.ref_paths_for_genome(ref_genome);
        if ref_paths.len() > 1 {
            return Err(WorkflowError::AmbiguousReferencePath {
                ref_genome: ref_genome.to_string(),
                ref_paths: ref_paths.into_iter().map(String::from).collect(),
            });
        }
        for ref_path in ref_paths {
            if !Path::new(ref_path).exists() {
                return Err(WorkflowError::ReferencePathNotFound {
                    path: PathBuf::from(ref_path),
                });
            }
        }
    }
    Ok(())
}
