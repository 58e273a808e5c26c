//! CSV matrix loading.
//!
//! Scans a directory for `*.csv` association matrices and turns each file
//! into a [`Dataset`]. The first header cell names the index column and is
//! ignored; the remaining header cells are column labels, and each record's
//! first field is its row label. Blank and `NA`/`NaN` cells are missing.
//!
//! Dataset metadata comes from the file name: a name containing `anti`
//! (case-insensitive) flags an anti-association measurement, and the ordered
//! threshold rules from the configuration assign per-file thresholds, the
//! last matching rule winning.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use trellis::{dataset::Dataset, identifier::Id, matrix::Matrix};

use crate::{config::CliConfig, error::CliError};

/// Loads every CSV matrix under `dir` as a dataset.
///
/// Entries are processed in file-name order so repeated runs see the same
/// dataset order (and therefore the same layer order).
///
/// # Errors
///
/// Returns [`CliError`] for unreadable directories or files, malformed CSV,
/// non-numeric cells, and matrices with duplicate or ragged labels.
pub fn load_datasets(dir: impl AsRef<Path>, config: &CliConfig) -> Result<Vec<Dataset>, CliError> {
    let dir = dir.as_ref();
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("csv")
        })
        .collect();
    paths.sort();

    let mut datasets = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let matrix = read_matrix(path)?;
        let anti = name.to_lowercase().contains("anti");
        let mut threshold = config.default_threshold();
        for rule in config.thresholds() {
            if name.contains(&rule.pattern) {
                threshold = rule.value;
            }
        }

        debug!(
            file = name,
            anti = anti,
            threshold = threshold,
            rows = matrix.rows_len(),
            cols = matrix.cols_len();
            "Loaded dataset",
        );
        datasets.push(
            Dataset::new(matrix)
                .with_name(name)
                .with_anti(anti)
                .with_threshold(threshold),
        );
    }

    info!(datasets_len = datasets.len(); "Datasets loaded");
    Ok(datasets)
}

fn read_matrix(path: &Path) -> Result<Matrix, CliError> {
    let csv_error = |source| CliError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    // The first header cell names the index column and is ignored.
    let headers = reader.headers().map_err(csv_error)?.clone();
    let col_labels: Vec<Id> = headers.iter().skip(1).map(Id::new).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut fields = record.iter();
        let label = fields.next().unwrap_or_default();
        let cells = fields
            .enumerate()
            .map(|(idx, field)| parse_cell(path, label, headers.get(idx + 1), field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push((Id::new(label), cells));
    }

    Matrix::from_rows(col_labels, rows).map_err(|err| CliError::Pipeline(err.into()))
}

fn parse_cell(
    path: &Path,
    row: &str,
    column: Option<&str>,
    field: &str,
) -> Result<Option<f64>, CliError> {
    let trimmed = field.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("nan")
    {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| CliError::InvalidCell {
            path: path.to_path_buf(),
            row: row.to_string(),
            column: column.unwrap_or_default().to_string(),
            value: field.to_string(),
        })
}
