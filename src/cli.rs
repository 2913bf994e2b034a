use std::path::PathBuf;

use clap::Parser;

use crate::ddl::IdentifierQuoting;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer a CREATE TABLE statement from a delimited text file",
    long_about = None
)]
pub struct Cli {
    /// Delimited text file with a header row ('-' reads stdin)
    pub input: PathBuf,
    /// Table name to emit (defaults to the input file name without extension)
    #[arg(short = 't', long = "table-name")]
    pub table_name: Option<String>,
    /// Quote table and column identifiers
    #[arg(long = "quote", value_enum, default_value = "always")]
    pub quote: IdentifierQuoting,
    /// Multiplier applied to text column widths (1.0 keeps the observed maximum)
    #[arg(long = "length-scale", default_value_t = 1.0, value_parser = parse_length_scale)]
    pub length_scale: f64,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Write the statement to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_length_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !scale.is_finite() || scale < 1.0 {
        return Err("Length scale must be a finite number of at least 1.0".to_string());
    }
    Ok(scale)
}
