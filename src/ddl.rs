//! Rendering of the inferred columns as a `CREATE TABLE` statement.

use std::fmt::Write as _;

use clap::ValueEnum;

use crate::{
    names::{PLACEHOLDER_TABLE_NAME, friendly_name},
    profile::ResolvedField,
};

/// Whether table and column identifiers are wrapped in double quotes.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum IdentifierQuoting {
    #[default]
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DdlOptions {
    pub quoting: IdentifierQuoting,
    /// Multiplier applied to text column widths, rounded up. `1.0` keeps the
    /// observed maximum.
    pub length_scale: f64,
}

impl Default for DdlOptions {
    fn default() -> Self {
        Self {
            quoting: IdentifierQuoting::Always,
            length_scale: 1.0,
        }
    }
}

impl DdlOptions {
    fn identifier(&self, name: &str) -> String {
        match self.quoting {
            IdentifierQuoting::Always => format!("\"{}\"", name.replace('"', "\"\"")),
            IdentifierQuoting::Never => name.to_string(),
        }
    }

    fn table_identifier(&self, table: &str) -> String {
        match self.quoting {
            IdentifierQuoting::Always => self.identifier(table),
            IdentifierQuoting::Never => {
                let friendly = friendly_name(table);
                if friendly.is_empty() {
                    PLACEHOLDER_TABLE_NAME.to_string()
                } else {
                    friendly
                }
            }
        }
    }

    pub fn scaled_length(&self, max_length: usize) -> usize {
        if self.length_scale == 1.0 {
            return max_length;
        }
        let scaled = max_length as f64 * self.length_scale;
        let nearest = scaled.round();
        if (scaled - nearest).abs() <= scaled.max(1.0) * 1e-9 {
            nearest as usize
        } else {
            scaled.ceil() as usize
        }
    }
}

/// Formats the statement. Text columns carry their (scaled) width; every
/// other type is emitted bare.
pub fn render_create_table(table: &str, fields: &[ResolvedField], options: &DdlOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CREATE TABLE {} (", options.table_identifier(table));
    for (idx, field) in fields.iter().enumerate() {
        let _ = write!(
            out,
            "  {} {}",
            options.identifier(&field.name),
            field.type_name()
        );
        if let Some(max_length) = field.max_length() {
            let _ = write!(out, " ({})", options.scaled_length(max_length));
        }
        if idx + 1 < fields.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(");\n");
    out
}
