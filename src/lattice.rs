//! Ordered candidate types used for column type inference.
//!
//! The lattice runs from the most restrictive type to the least restrictive
//! one. A column starts at position 0 and only ever moves forward; the
//! implicit catch-all sits one past the last entry and is rendered as
//! [`TEXT_TYPE_NAME`].
//!
//! Every predicate combines an anchored regex with a parse step so the rules
//! stay independent of locale and float precision:
//!
//! - `timestamp`: `YYYY-MM-DD`, RFC 3339 date-times, or `MM/DD/YYYY`
//! - `int` / `bigint`: base-10 integers without leading zeros or `+`
//! - `decimal`: fixed or scientific notation, same leading-zero rule
//! - `boolean`: `true` / `false` in any ASCII case

use std::{fmt, sync::LazyLock};

use chrono::{DateTime, NaiveDate};
use regex::Regex;

pub const TEXT_TYPE_NAME: &str = "character varying";

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid ISO date pattern"));

static RFC3339_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:[Zz]|[+-]\d{2}:\d{2})$")
        .expect("valid RFC 3339 pattern")
});

static US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid US date pattern"));

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9]\d*)$").expect("valid integer pattern"));

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:(?:0|[1-9]\d*)(?:\.\d*)?|\.\d+)(?:[eE][-+]?\d+)?$")
        .expect("valid decimal pattern")
});

/// A named type together with the test deciding whether a value fits it.
#[derive(Clone, Copy)]
pub struct CandidateType {
    pub name: &'static str,
    test: fn(&str) -> bool,
}

impl CandidateType {
    pub const fn new(name: &'static str, test: fn(&str) -> bool) -> Self {
        Self { name, test }
    }

    /// Pure function of `value`. Never consulted for empty values.
    pub fn conforms(&self, value: &str) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CandidateType").field(&self.name).finish()
    }
}

static LATTICE: [CandidateType; 5] = [
    CandidateType::new("timestamp", is_timestamp),
    CandidateType::new("int", is_int),
    CandidateType::new("bigint", is_bigint),
    CandidateType::new("decimal", is_decimal),
    CandidateType::new("boolean", is_boolean),
];

/// The fixed lattice, most restrictive first.
pub fn lattice() -> &'static [CandidateType] {
    &LATTICE
}

pub fn is_timestamp(value: &str) -> bool {
    if ISO_DATE.is_match(value) {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    }
    if RFC3339_DATETIME.is_match(value) {
        return DateTime::parse_from_rfc3339(value).is_ok();
    }
    if US_DATE.is_match(value) {
        return NaiveDate::parse_from_str(value, "%m/%d/%Y").is_ok();
    }
    false
}

pub fn is_int(value: &str) -> bool {
    INTEGER.is_match(value) && value.parse::<i32>().is_ok()
}

pub fn is_bigint(value: &str) -> bool {
    INTEGER.is_match(value) && value.parse::<i64>().is_ok()
}

pub fn is_decimal(value: &str) -> bool {
    DECIMAL.is_match(value) && value.parse::<f64>().is_ok_and(f64::is_finite)
}

pub fn is_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}
