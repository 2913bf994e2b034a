//! Input plumbing: delimiter and encoding resolution plus reader construction.
//!
//! - **Delimiter resolution**: `.tsv` inputs default to tab, everything else
//!   to comma, unless overridden.
//! - **Encoding**: fields are decoded through `encoding_rs`, defaulting to
//!   UTF-8; undecodable bytes are a parse error.
//! - **stdin**: the `-` path reads standard input.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

use crate::error::SchemaError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
) -> Result<csv::Reader<Box<dyn Read>>, SchemaError> {
    let reader: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).map_err(|err| SchemaError::input_open(path, err))?,
        ))
    };
    Ok(open_csv_reader(reader, delimiter, true))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    // Fields are decoded individually, so a leading BOM is data, not a marker.
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            anyhow!(
                "Failed to decode text with encoding {}",
                encoding.name()
            )
        })
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>, SchemaError>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_record(&headers, encoding)
        .map_err(|err| SchemaError::Parse(format!("Header row: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn delimiter_defaults_follow_extension() {
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.TSV"), None), b'\t');
        assert_eq!(resolve_input_delimiter(Path::new("a.csv"), None), b',');
        assert_eq!(resolve_input_delimiter(Path::new("a.tsv"), Some(b';')), b';');
    }

    #[test]
    fn encoding_labels_resolve() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" windows-1252 ")).unwrap(),
            WINDOWS_1252
        );
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(decode_bytes(&[0x66, 0xff, 0x6f], UTF_8).is_err());
        assert_eq!(
            decode_bytes(&[0x43, 0x61, 0x66, 0xe9], WINDOWS_1252).unwrap(),
            "Café"
        );
    }

    #[test]
    fn decode_ignores_byte_order_marks_in_fields() {
        assert!(decode_bytes(&[0xFF, 0xFE, 0x61, 0x62], UTF_8).is_err());
        let kept = decode_bytes("\u{FEFF}42".as_bytes(), UTF_8).expect("valid utf-8");
        assert_eq!(kept, "\u{FEFF}42");
        assert_eq!(kept.chars().count(), 3);
    }

    #[test]
    fn missing_file_is_input_open_error() {
        let err = open_csv_reader_from_path(Path::new("/definitely/not/here.csv"), b',')
            .err()
            .expect("missing file must fail");
        assert!(matches!(err, SchemaError::InputOpen { .. }));
    }
}
