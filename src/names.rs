use std::{collections::HashSet, path::Path, sync::LazyLock};

use regex::Regex;

use crate::io_utils::is_dash;

/// Table name used when nothing better can be derived from the input.
pub const PLACEHOLDER_TABLE_NAME: &str = "table_name";

static NON_FRIENDLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("valid identifier pattern"));

static REPEATED_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore pattern"));

/// Lowercases `raw` and reduces it to `[a-z0-9_]`, with single underscores
/// between words and none at either end.
pub fn friendly_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = NON_FRIENDLY.replace_all(&lowered, "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Sanitizes every header, naming blanks `field_<n>` and suffixing repeats.
pub fn column_identifiers(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(headers.len());
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let mut base = friendly_name(header);
            if base.is_empty() {
                base = format!("field_{}", idx + 1);
            }
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Derives a table name from the input file name, dropping its final
/// extension. Stdin and extension-only names fall back to the placeholder.
pub fn table_name_from_path(path: &Path) -> String {
    if is_dash(path) {
        return PLACEHOLDER_TABLE_NAME.to_string();
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TABLE_NAME.to_string())
}
