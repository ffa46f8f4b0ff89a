//! Header-aware tab-delimited input.
//!
//! Similarity files are plain tab-delimited text with a header row. This
//! module wraps the `csv` crate with the conventions the rest of the crate
//! relies on: tab delimiters, no quoting, flexible record lengths, and
//! column addressing by header name or by 1-based position.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// A column specification: a header name or a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Match a header label exactly.
    Name(String),
    /// 1-based column position.
    Position(usize),
}

impl Column {
    /// Interpret a string spec: a positive integer is a position, anything
    /// else a header name.
    pub fn new(spec: &str) -> Self {
        match spec.parse::<usize>() {
            Ok(n) if n > 0 => Column::Position(n),
            _ => Column::Name(spec.to_owned()),
        }
    }
}

impl From<&str> for Column {
    fn from(spec: &str) -> Self {
        Column::new(spec)
    }
}

/// One data record, addressable by 0-based field index.
#[derive(Debug, Clone)]
pub struct Line {
    record: csv::StringRecord,
    /// 1-based record number, excluding the header.
    number: usize,
}

impl Line {
    /// Field text at the given index; short records read as empty.
    pub fn get(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("")
    }

    /// Field parsed as a float.
    pub fn get_f64(&self, idx: usize) -> Result<f64> {
        let text = self.get(idx);
        text.trim().parse().map_err(|_| Error::BadScore {
            value: text.to_owned(),
            record: self.number,
        })
    }

    /// 1-based record number, excluding the header.
    pub fn number(&self) -> usize {
        self.number
    }
}

/// A tab-delimited reader that has already consumed its header row.
pub struct TabbedReader<R: Read> {
    reader: csv::Reader<R>,
    labels: Vec<String>,
    next_number: usize,
}

impl TabbedReader<File> {
    /// Open a tab-delimited file and parse its header.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read> TabbedReader<R> {
    /// Wrap a reader and parse its header row.
    pub fn new(input: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(input);
        let labels = reader
            .headers()?
            .iter()
            .map(str::to_owned)
            .collect();
        Ok(TabbedReader {
            reader,
            labels,
            next_number: 1,
        })
    }

    /// The header labels, in file order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The header row re-joined with tabs.
    pub fn header(&self) -> String {
        self.labels.join("\t")
    }

    /// Resolve a column spec to a 0-based field index.
    pub fn find_field(&self, column: &Column) -> Result<usize> {
        match column {
            Column::Name(name) => {
                self.find_column(name).ok_or_else(|| Error::MissingColumn {
                    column: name.clone(),
                })
            }
            Column::Position(pos) => {
                if (1..=self.labels.len()).contains(pos) {
                    Ok(pos - 1)
                } else {
                    Err(Error::MissingColumn {
                        column: pos.to_string(),
                    })
                }
            }
        }
    }

    /// 0-based index of a header label, if present.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == name)
    }

    /// The next data record, or `None` at end of input.
    pub fn next_line(&mut self) -> Option<Result<Line>> {
        let mut record = csv::StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                let number = self.next_number;
                self.next_number += 1;
                Some(Ok(Line { record, number }))
            }
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl<R: Read> core::fmt::Debug for TabbedReader<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TabbedReader")
            .field("labels", &self.labels)
            .field("next_number", &self.next_number)
            .finish_non_exhaustive()
    }
}
