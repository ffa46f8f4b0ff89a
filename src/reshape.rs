//! Re-serialise one tab-delimited file into another's column layout.
//!
//! Given a source file and a target file, [`ConversionStream`] reads the
//! source and emits it with the target's columns, in the target's order:
//! columns present only in the source are dropped, and columns present
//! only in the target are filled with a default value. The result is a
//! byte stream (the target's header line followed by the reshaped source
//! records), usable anywhere a [`std::io::Read`] is accepted.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::Result;
use crate::tabbed::TabbedReader;

/// Default text for columns the source file does not supply.
const DEFAULT_VALUE: &str = "0.0";

/// A reader that reshapes a source tab-delimited file to a target layout.
///
/// Each output column is driven by one instruction: copy a source field
/// by index, or emit the default value when the target column has no
/// source counterpart.
pub struct ConversionStream {
    /// Source records, read lazily.
    source: TabbedReader<File>,
    /// For each output column, the source column to copy, if any.
    instructions: Vec<Option<usize>>,
    /// Line being emitted, with its trailing newline; `None` at EOF.
    current: Option<Vec<u8>>,
    /// Read position within `current`.
    pos: usize,
    /// Fill text for columns missing from the source.
    default_value: String,
}

impl ConversionStream {
    /// Build a conversion stream from a source file and a target file
    /// whose header defines the output layout.
    pub fn new(source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<Self> {
        Self::with_default(source, target, DEFAULT_VALUE)
    }

    /// Like [`ConversionStream::new`], with an explicit default for
    /// columns the source lacks.
    pub fn with_default(
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
        default_value: &str,
    ) -> Result<Self> {
        let source = TabbedReader::from_path(source)?;
        // Only the target's header matters; the instruction table maps
        // each of its columns back to a source column where one exists.
        let target = TabbedReader::from_path(target)?;
        let instructions = target
            .labels()
            .iter()
            .map(|label| source.find_column(label))
            .collect();
        let mut header: Vec<u8> = target.header().into_bytes();
        header.push(b'\n');
        Ok(ConversionStream {
            source,
            instructions,
            current: Some(header),
            pos: 0,
            default_value: default_value.to_owned(),
        })
    }

    /// Pull the next source record and reshape it, or mark EOF.
    fn advance(&mut self) -> io::Result<()> {
        match self.source.next_line() {
            None => {
                self.current = None;
            }
            Some(line) => {
                let line = line.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                let fields: Vec<&str> = self
                    .instructions
                    .iter()
                    .map(|instr| match instr {
                        Some(idx) => line.get(*idx),
                        None => self.default_value.as_str(),
                    })
                    .collect();
                let mut out: Vec<u8> = fields.join("\t").into_bytes();
                out.push(b'\n');
                self.current = Some(out);
                self.pos = 0;
            }
        }
        Ok(())
    }
}

impl Read for ConversionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < buf.len() {
            let exhausted = match &self.current {
                None => break,
                Some(line) => self.pos >= line.len(),
            };
            if exhausted {
                self.advance()?;
                continue;
            }
            if let Some(line) = &self.current {
                let chunk = (line.len() - self.pos).min(buf.len() - written);
                buf[written..written + chunk]
                    .copy_from_slice(&line[self.pos..self.pos + chunk]);
                self.pos += chunk;
                written += chunk;
            }
        }
        Ok(written)
    }
}

impl core::fmt::Debug for ConversionStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConversionStream")
            .field("instructions", &self.instructions)
            .field("default_value", &self.default_value)
            .finish_non_exhaustive()
    }
}
