//! Spanish license-plate validation.
//!
//! Input is normalized first (spaces and hyphens dropped, upper-cased), so
//! `1234 bcd` and `1234-BCD` both pass. The national series since 2000 never
//! uses vowels, Ñ or Q in its letter block.

use std::sync::LazyLock;

use regex::Regex;

/// Recognized plate layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlateFormat {
    /// `0000 BBB`, national series since 2000.
    Current,
    /// `M 0000 XX`, pre-2000 provincial series.
    Provincial,
    /// `E 0000 BBB`, special vehicles and agricultural or works machinery.
    Special,
    /// `R 0000 BBB`, trailers and semi-trailers.
    Trailer,
}

const CONSONANTS: &str = "BCDFGHJKLMNPRSTVWXYZ";

static CURRENT: LazyLock<Regex> = LazyLock::new(|| series_regex(""));
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| series_regex("E"));
static TRAILER: LazyLock<Regex> = LazyLock::new(|| series_regex("R"));
static PROVINCIAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,2}\d{4}[A-Z]{0,2}$").expect("provincial plate regex compiles"));

fn series_regex(prefix: &str) -> Regex {
    Regex::new(&format!(r"^{prefix}\d{{4}}[{CONSONANTS}]{{3}}$")).expect("plate regex compiles")
}

/// Strip spaces and hyphens and upper-case the rest.
#[must_use]
pub fn normalize_plate(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Layout of `input`, or `None` if it is not a valid plate.
#[must_use]
pub fn validate_plate(input: &str) -> Option<PlateFormat> {
    let plate = normalize_plate(input);
    if CURRENT.is_match(&plate) {
        Some(PlateFormat::Current)
    } else if SPECIAL.is_match(&plate) {
        Some(PlateFormat::Special)
    } else if TRAILER.is_match(&plate) {
        Some(PlateFormat::Trailer)
    } else if PROVINCIAL.is_match(&plate) {
        Some(PlateFormat::Provincial)
    } else {
        None
    }
}

#[must_use]
pub fn is_valid_plate(input: &str) -> bool {
    validate_plate(input).is_some()
}

#[cfg(test)]
#[path = "plate_test.rs"]
mod tests;
