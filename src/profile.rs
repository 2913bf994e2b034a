//! Per-column type narrowing and width tracking.
//!
//! The profiler keeps one [`ColumnState`] per header column and feeds it every
//! value of every data row exactly once. A column's position in the lattice
//! only moves forward, so a full scan costs at most `rows + lattice.len()`
//! predicate evaluations per column.

use std::{io::Read, path::Path};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    error::{Result, SchemaError},
    io_utils::{
        decode_record, open_csv_reader_from_path, reader_headers, resolve_input_delimiter,
    },
    lattice::{CandidateType, TEXT_TYPE_NAME, lattice},
    names::column_identifiers,
};

/// Narrowing state for a single column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnState {
    /// Position of the most specific candidate consistent with every non-empty
    /// value seen so far. Equal to `lattice.len()` once the column is text.
    pub type_index: usize,
    /// Longest value seen, in characters. Empty values count as zero.
    pub max_length: usize,
}

/// Final type of a column after the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType {
    Typed(&'static str),
    Text { max_length: usize },
}

impl ResolvedType {
    pub fn name(&self) -> &'static str {
        match self {
            ResolvedType::Typed(name) => name,
            ResolvedType::Text { .. } => TEXT_TYPE_NAME,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ResolvedType::Text { .. })
    }
}

impl ColumnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_text(&self, lattice: &[CandidateType]) -> bool {
        self.type_index >= lattice.len()
    }

    /// Records `value`, widening `max_length` and narrowing `type_index` until
    /// a candidate accepts the value or the lattice is exhausted.
    pub fn observe(&mut self, lattice: &[CandidateType], value: &str) {
        self.max_length = self.max_length.max(value.chars().count());
        if self.is_text(lattice) || value.is_empty() {
            return;
        }
        while self.type_index < lattice.len() && !lattice[self.type_index].conforms(value) {
            self.type_index += 1;
        }
    }

    pub fn resolve(&self, lattice: &[CandidateType]) -> ResolvedType {
        match lattice.get(self.type_index) {
            Some(candidate) => ResolvedType::Typed(candidate.name),
            None => ResolvedType::Text {
                max_length: self.max_length,
            },
        }
    }
}

/// Output-ready description of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    pub name: String,
    pub column_type: ResolvedType,
}

impl ResolvedField {
    pub fn type_name(&self) -> &'static str {
        self.column_type.name()
    }

    pub fn max_length(&self) -> Option<usize> {
        match self.column_type {
            ResolvedType::Text { max_length } => Some(max_length),
            ResolvedType::Typed(_) => None,
        }
    }
}

/// Scans rows against the fixed lattice.
#[derive(Debug)]
pub struct ColumnProfiler {
    headers: Vec<String>,
    states: Vec<ColumnState>,
    lattice: &'static [CandidateType],
    rows_observed: u64,
}

impl ColumnProfiler {
    pub fn new(headers: Vec<String>) -> Self {
        let states = vec![ColumnState::new(); headers.len()];
        Self {
            headers,
            states,
            lattice: lattice(),
            rows_observed: 0,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn states(&self) -> &[ColumnState] {
        &self.states
    }

    pub fn rows_observed(&self) -> u64 {
        self.rows_observed
    }

    /// Feeds one data row. `row_number` is 1-based and excludes the header.
    pub fn observe_row<S: AsRef<str>>(&mut self, row_number: u64, row: &[S]) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(SchemaError::field_count(
                row_number,
                self.headers.len(),
                row.len(),
            ));
        }
        for (column, (state, value)) in self.states.iter_mut().zip(row).enumerate() {
            let before = state.type_index;
            state.observe(self.lattice, value.as_ref());
            if state.type_index != before {
                debug!(
                    "Column '{}' narrowed from {} to {} at row {}",
                    self.headers[column],
                    type_label(self.lattice, before),
                    type_label(self.lattice, state.type_index),
                    row_number
                );
            }
        }
        self.rows_observed += 1;
        Ok(())
    }

    /// Resolves every column. Header names are sanitized and disambiguated.
    pub fn finish(self) -> Vec<ResolvedField> {
        let names = column_identifiers(&self.headers);
        names
            .into_iter()
            .zip(&self.states)
            .map(|(name, state)| ResolvedField {
                name,
                column_type: state.resolve(self.lattice),
            })
            .collect()
    }
}

fn type_label(lattice: &[CandidateType], index: usize) -> &'static str {
    lattice
        .get(index)
        .map(|candidate| candidate.name)
        .unwrap_or(TEXT_TYPE_NAME)
}

/// Reader settings for [`infer_path`].
#[derive(Debug, Clone, Copy)]
pub struct InferOptions {
    /// Field delimiter; `None` picks tab for `.tsv` files and comma otherwise.
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

/// Opens `path` (or stdin for `-`) and resolves every column in one pass.
pub fn infer_path(path: &Path, options: &InferOptions) -> Result<Vec<ResolvedField>> {
    let delimiter = resolve_input_delimiter(path, options.delimiter);
    let mut reader = open_csv_reader_from_path(path, delimiter)?;
    infer_fields(&mut reader, options.encoding)
}

/// Runs a single streaming pass over `reader` and resolves every column.
///
/// The reader must be configured with headers enabled and a fixed field
/// count; any row whose length disagrees with the header aborts the scan.
pub fn infer_fields<R: Read>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<ResolvedField>> {
    let headers = reader_headers(reader, encoding)?;
    if headers.is_empty() {
        return Err(SchemaError::Parse(
            "Input is empty; a header row is required".to_string(),
        ));
    }
    let mut profiler = ColumnProfiler::new(headers);

    let mut record = csv::ByteRecord::new();
    let mut row_number = 0u64;
    while reader.read_byte_record(&mut record)? {
        row_number += 1;
        let row = decode_record(&record, encoding).map_err(|err| {
            SchemaError::Parse(format!("Row {row_number}: {err}"))
        })?;
        profiler.observe_row(row_number, row.as_slice())?;
    }

    info!(
        "Profiled {} column(s) across {} row(s)",
        profiler.headers().len(),
        profiler.rows_observed()
    );
    Ok(profiler.finish())
}
