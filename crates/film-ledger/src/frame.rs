//! Schema-less table of string cells, used for raw inputs whose columns
//! are only known at run time.
//!
//! Every transformation returns a new `Frame`; the receiver is never
//! modified, so one raw table can feed several stages.

use std::io::Read;
use std::path::Path;

use crate::types::{LedgerError, LedgerResult};

/// A table of named columns and string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Frame {
    /// Create an empty frame with the given columns.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a frame from string slices, checking every row's width.
    pub fn from_rows(name: &str, columns: &[&str], rows: &[&[&str]]) -> LedgerResult<Self> {
        let mut frame = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            frame.push_row(row.iter().map(|c| c.to_string()).collect())?;
        }
        Ok(frame)
    }

    /// Append a row. Its width must match the column count.
    pub fn push_row(&mut self, row: Vec<String>) -> LedgerResult<()> {
        if row.len() != self.columns.len() {
            return Err(LedgerError::RaggedRow {
                table: self.name.clone(),
                line: self.rows.len() + 2,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Like [`Frame::column_index`], but a missing column is an error.
    pub fn require_column(&self, column: &str) -> LedgerResult<usize> {
        self.column_index(column)
            .ok_or_else(|| LedgerError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Cell at `row` in the named column.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Copy with every column name lower-cased.
    pub fn with_lowercase_columns(&self) -> Frame {
        Frame {
            name: self.name.clone(),
            columns: self.columns.iter().map(|c| c.to_lowercase()).collect(),
            rows: self.rows.clone(),
        }
    }

    /// Copy with every cell lower-cased.
    pub fn with_lowercase_cells(&self) -> Frame {
        Frame {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_lowercase()).collect())
                .collect(),
        }
    }

    /// Copy without the named columns. Names not present are ignored.
    pub fn without_columns(&self, drop: &[&str]) -> Frame {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !drop.contains(&c.as_str()))
            .map(|(i, _)| i)
            .collect();

        Frame {
            name: self.name.clone(),
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Copy keeping only the rows for which `keep` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Frame
    where
        F: FnMut(&[String]) -> bool,
    {
        Frame {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r.as_slice())).cloned().collect(),
        }
    }

    /// Read a delimited file with a header row.
    ///
    /// The delimiter is sniffed from the header line: tab-separated files
    /// are common for the awards dataset, everything else is read as CSV.
    pub fn read_csv(path: &Path) -> LedgerResult<Frame> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let delimiter = sniff_delimiter(&text);
        Self::from_reader(&name, text.as_bytes(), delimiter)
    }

    /// Read delimited text with a header row from any reader.
    pub fn from_reader<R: Read>(name: &str, reader: R, delimiter: u8) -> LedgerResult<Frame> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .from_reader(reader);

        let columns = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        let mut frame = Frame::new(name, columns);
        for record in rdr.records() {
            let record = record?;
            frame.push_row(record.iter().map(|c| c.to_string()).collect())?;
        }
        tracing::debug!(
            "read {} rows x {} columns from {}",
            frame.len(),
            frame.columns.len(),
            name
        );
        Ok(frame)
    }
}

fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    if header.contains('\t') {
        b'\t'
    } else {
        b','
    }
}
