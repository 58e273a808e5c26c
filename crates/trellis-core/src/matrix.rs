//! Labeled association matrices.
//!
//! A [`Matrix`] is a dense table of `Option<f64>` cells addressed by interned
//! row and column labels. Missing measurements are `None`, which keeps the
//! "cleared" state of symmetric deduplication distinct from a measured NaN.
//!
//! The structure is optimized for the access patterns of edge extraction:
//! label-based cell reads and clears, whole-row retention, empty-column
//! dropping, transposition, and row-major flattening.

use std::collections::HashMap;

use thiserror::Error;

use crate::identifier::Id;

/// Errors raised while constructing a [`Matrix`].
#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("duplicate row label: {0}")]
    DuplicateRowLabel(Id),

    #[error("duplicate column label: {0}")]
    DuplicateColumnLabel(Id),

    #[error("row {row} has {found} cells, expected {expected}")]
    RowLength {
        row: Id,
        expected: usize,
        found: usize,
    },
}

/// A dense labeled matrix with missing cells.
///
/// Cells are stored row-major; label lookup goes through `HashMap` indices so
/// reads and clears stay O(1) regardless of matrix size.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    row_labels: Vec<Id>,
    col_labels: Vec<Id>,
    row_index: HashMap<Id, usize>,
    col_index: HashMap<Id, usize>,
    cells: Vec<Option<f64>>,
}

impl Matrix {
    /// Builds a matrix from column labels and labeled rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] when a row or column label repeats, or when a
    /// row's cell count does not match the number of column labels.
    pub fn from_rows(
        col_labels: Vec<Id>,
        rows: Vec<(Id, Vec<Option<f64>>)>,
    ) -> Result<Self, MatrixError> {
        let mut col_index = HashMap::with_capacity(col_labels.len());
        for (idx, &label) in col_labels.iter().enumerate() {
            if col_index.insert(label, idx).is_some() {
                return Err(MatrixError::DuplicateColumnLabel(label));
            }
        }

        let mut row_labels = Vec::with_capacity(rows.len());
        let mut row_index = HashMap::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(rows.len() * col_labels.len());
        for (label, row) in rows {
            if row.len() != col_labels.len() {
                return Err(MatrixError::RowLength {
                    row: label,
                    expected: col_labels.len(),
                    found: row.len(),
                });
            }
            if row_index.insert(label, row_labels.len()).is_some() {
                return Err(MatrixError::DuplicateRowLabel(label));
            }
            row_labels.push(label);
            cells.extend(row);
        }

        Ok(Self {
            row_labels,
            col_labels,
            row_index,
            col_index,
            cells,
        })
    }

    /// Returns the number of rows.
    pub fn rows_len(&self) -> usize {
        self.row_labels.len()
    }

    /// Returns the number of columns.
    pub fn cols_len(&self) -> usize {
        self.col_labels.len()
    }

    /// Returns an iterator over the row labels in order.
    pub fn row_labels(&self) -> impl Iterator<Item = Id> + '_ {
        self.row_labels.iter().copied()
    }

    /// Returns an iterator over the column labels in order.
    pub fn col_labels(&self) -> impl Iterator<Item = Id> + '_ {
        self.col_labels.iter().copied()
    }

    /// Checks if a row with the given label exists.
    pub fn has_row(&self, label: Id) -> bool {
        self.row_index.contains_key(&label)
    }

    /// Checks if a column with the given label exists.
    pub fn has_col(&self, label: Id) -> bool {
        self.col_index.contains_key(&label)
    }

    /// Returns the cell at (`row`, `col`), or `None` when the cell is missing
    /// or either label is unknown.
    pub fn get(&self, row: Id, col: Id) -> Option<f64> {
        let r = *self.row_index.get(&row)?;
        let c = *self.col_index.get(&col)?;
        self.cells[r * self.col_labels.len() + c]
    }

    /// Clears the cell at (`row`, `col`) to missing.
    ///
    /// Unknown labels are ignored.
    pub fn clear(&mut self, row: Id, col: Id) {
        if let (Some(&r), Some(&c)) = (self.row_index.get(&row), self.col_index.get(&col)) {
            self.cells[r * self.col_labels.len() + c] = None;
        }
    }

    /// Returns the transposed matrix: rows become columns and vice versa.
    pub fn transposed(&self) -> Self {
        let cols = self.col_labels.len();
        let mut cells = Vec::with_capacity(self.cells.len());
        for c in 0..cols {
            for r in 0..self.row_labels.len() {
                cells.push(self.cells[r * cols + c]);
            }
        }

        Self {
            row_labels: self.col_labels.clone(),
            col_labels: self.row_labels.clone(),
            row_index: self.col_index.clone(),
            col_index: self.row_index.clone(),
            cells,
        }
    }

    /// Keeps only the rows whose label satisfies `keep`, preserving order.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(Id) -> bool) {
        let cols = self.col_labels.len();
        let mut row_labels = Vec::new();
        let mut cells = Vec::new();
        for (r, &label) in self.row_labels.iter().enumerate() {
            if keep(label) {
                row_labels.push(label);
                cells.extend_from_slice(&self.cells[r * cols..(r + 1) * cols]);
            }
        }

        self.row_labels = row_labels;
        self.row_index = self
            .row_labels
            .iter()
            .enumerate()
            .map(|(idx, &label)| (label, idx))
            .collect();
        self.cells = cells;
    }

    /// Drops every column whose cells are all missing.
    pub fn drop_empty_columns(&mut self) {
        let cols = self.col_labels.len();
        let keep: Vec<usize> = (0..cols)
            .filter(|&c| {
                (0..self.row_labels.len()).any(|r| self.cells[r * cols + c].is_some())
            })
            .collect();
        if keep.len() == cols {
            return;
        }

        let mut cells = Vec::with_capacity(self.row_labels.len() * keep.len());
        for r in 0..self.row_labels.len() {
            for &c in &keep {
                cells.push(self.cells[r * cols + c]);
            }
        }

        self.col_labels = keep.iter().map(|&c| self.col_labels[c]).collect();
        self.col_index = self
            .col_labels
            .iter()
            .enumerate()
            .map(|(idx, &label)| (label, idx))
            .collect();
        self.cells = cells;
    }

    /// Returns an iterator over all present cell values.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    /// Returns the largest present cell value, skipping NaN, or `None` for a
    /// matrix with no present cells.
    pub fn max_value(&self) -> Option<f64> {
        self.values().fold(None, |acc, v| match acc {
            Some(max) => Some(f64::max(max, v)),
            None => Some(v),
        })
    }

    /// Returns the number of present cells.
    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Flattens the matrix to (row, column, value) triples in row-major label
    /// order, skipping missing cells.
    pub fn entries(&self) -> impl Iterator<Item = (Id, Id, f64)> + '_ {
        let cols = self.col_labels.len();
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|value| (self.row_labels[i / cols], self.col_labels[i % cols], value))
        })
    }
}
