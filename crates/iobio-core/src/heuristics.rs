//! Pattern heuristics over the biography's free text.
//!
//! Every heuristic is a pure function over a string that returns
//! `Some(Finding)` when its anchor is present. Findings carry a
//! [`Confidence`]: a direct pattern capture is more trustworthy than a
//! substring hit against a reference table.
//!
//! The intro sentence these functions expect looks like:
//!
//! ```text
//! LIE, Trygve (known as Trygve Halvdan Lie), Norwegian Secretary-General of the
//! United Nations (UN) 1946-1952, was born on 16 July 1896 in Oslo …
//! ```
//!
//! Known weak spots: demonyms are matched as plain substrings, so
//! multi-word nationalities and demonyms embedded in place names can
//! produce false hits.

use std::sync::LazyLock;

use regex::Regex;

use crate::reference::{Country, INTERNATIONAL_ORGANISATIONS, UN_MEMBER_STATES};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^,]+),\s*([^(,]+)(?:\s*\((?:known as|née)\s+(.+?)\))?,").expect("static regex")
});
static LIFE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(\bwas\b.+)$").expect("static regex"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^,]+,\s*[^,]+,\s*(.+?)\s*,\s*was born").expect("static regex")
});
static PAREN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("static regex"));
static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-–](\d{4})").expect("static regex"));
static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Source:\s*(.+)").expect("static regex"));
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

/// How a finding was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// Captured directly by a structural pattern.
    Pattern,
    /// Matched against a reference table.
    Lookup,
}

/// A heuristic's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<T> {
    pub value: T,
    pub confidence: Confidence,
}

impl<T> Finding<T> {
    fn pattern(value: T) -> Self {
        Self {
            value,
            confidence: Confidence::Pattern,
        }
    }

    fn lookup(value: T) -> Self {
        Self {
            value,
            confidence: Confidence::Lookup,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    pub last_name: String,
    pub first_name: String,
    pub known_as: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nationality {
    /// The demonym as it appears in the text.
    pub demonym: String,
    /// Common name of the country.
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSpan {
    pub start: String,
    pub end: String,
}

/// `<LAST>, <First>[ (known as|née <Alias>)],` at the start of the intro.
/// The surname is name-cased.
pub fn parse_name(intro: &str) -> Option<Finding<NameParts>> {
    let caps = NAME_RE.captures(intro)?;
    Some(Finding::pattern(NameParts {
        last_name: crate::namecase::name_case(caps[1].trim()),
        first_name: caps[2].trim().to_string(),
        known_as: caps.get(3).map(|m| m.as_str().trim().to_string()),
    }))
}

/// Everything from the first "was" to the end, with a capital first letter.
pub fn parse_life(intro: &str) -> Option<Finding<String>> {
    let caps = LIFE_RE.captures(intro)?;
    let life = caps[1].trim();
    if life.is_empty() {
        return None;
    }
    Some(Finding::pattern(capitalize_first(life)))
}

/// The clause between the name and ", was born".
pub fn parse_title(intro: &str) -> Option<Finding<String>> {
    let caps = TITLE_RE.captures(intro)?;
    let title = caps[1].trim();
    if title.is_empty() {
        return None;
    }
    Some(Finding::pattern(title.to_string()))
}

/// The first parenthesised group of the title, else a known organisation
/// whose name occurs in it. A blank group still wins over the lookup.
pub fn find_organisation(title: &str) -> Option<Finding<String>> {
    if let Some(caps) = PAREN_RE.captures(title) {
        return Some(Finding::pattern(caps[1].trim().to_string()));
    }
    INTERNATIONAL_ORGANISATIONS
        .iter()
        .find(|io| title.contains(io.name))
        .map(|io| Finding::lookup(io.label().to_string()))
}

/// The first UN member state whose demonym occurs in the title.
pub fn find_nationality(title: &str) -> Option<Finding<Nationality>> {
    let country: &Country = UN_MEMBER_STATES
        .iter()
        .find(|c| title.contains(c.demonym_f) || title.contains(c.demonym_m))?;
    let demonym = if title.contains(country.demonym_m) {
        country.demonym_m
    } else {
        country.demonym_f
    };
    Some(Finding::lookup(Nationality {
        demonym: demonym.to_string(),
        country: country.name.to_string(),
    }))
}

/// A `YYYY-YYYY` span (hyphen or en dash).
pub fn parse_years(title: &str) -> Option<Finding<YearSpan>> {
    let caps = YEARS_RE.captures(title)?;
    Some(Finding::pattern(YearSpan {
        start: caps[1].to_string(),
        end: caps[2].to_string(),
    }))
}

/// The attribution after "Source:".
pub fn parse_image_source(text: &str) -> Option<Finding<String>> {
    let caps = SOURCE_RE.captures(text)?;
    let source = caps[1].trim();
    if source.is_empty() {
        return None;
    }
    Some(Finding::pattern(source.to_string()))
}

/// Text before the first comma of a citation line.
pub fn parse_authors(citation: &str) -> String {
    citation
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// The title with parenthesised groups removed:
/// "Secretary-General (ABC)" → "Secretary-General".
pub fn role_from_title(title: &str) -> String {
    let stripped = PAREN_RE.replace_all(title, "");
    SPACES_RE
        .replace_all(stripped.trim(), " ")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
