use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::ParseError;

pub const MONTHS: [(&str, &str); 12] = [
    ("Jan", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Apr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Aug", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dec", "12"),
];

pub fn month_number(abbrev: &str) -> Result<&'static str, ParseError> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbrev)
        .map(|(_, num)| *num)
        .ok_or_else(|| ParseError::UnknownMonth(abbrev.to_string()))
}

/// Turn `"Mon January 5, 2021"` into `"2021-01-05"`.
///
/// The first token (weekday) is ignored and only the first three characters
/// of the month word count. The day may carry a trailing comma. Day range is
/// not checked and the year is copied through as written.
pub fn normalize_date(phrase: &str) -> Result<String, ParseError> {
    let tokens: Vec<&str> = phrase.split_whitespace().collect();
    normalize_date_tokens(&tokens).map_err(|e| match e {
        ParseError::TooFewTokens(n, _) => ParseError::TooFewTokens(n, phrase.to_string()),
        other => other,
    })
}

pub fn normalize_date_tokens(tokens: &[&str]) -> Result<String, ParseError> {
    if tokens.len() < 4 {
        return Err(ParseError::TooFewTokens(tokens.len(), tokens.join(" ")));
    }
    let month_word = tokens[1];
    let abbrev = month_word.get(..3).unwrap_or(month_word);
    let month = month_number(abbrev)?;

    let raw_day = tokens[2].trim_matches(',');
    let day: u32 = raw_day
        .parse()
        .map_err(|_| ParseError::InvalidDay(tokens[2].to_string()))?;

    let year = tokens[3];
    Ok(format!("{year}-{month}-{day:02}"))
}

// ---------------------------------------------------------------------------
// Sync cursor
// ---------------------------------------------------------------------------

pub const DEFAULT_CURSOR: &str = "2021-Jan-01";

/// Sync watermark, persisted as `YYYY-Mon-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor(NaiveDate);

impl Cursor {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidCursor(raw.to_string());
        let parts: Vec<&str> = raw.trim().split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month_number(month)
            .map_err(|_| invalid())?
            .parse()
            .map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// `YYYY/MM/DD`, the form mail search expressions accept after `after:`.
    pub fn search_date(&self) -> String {
        self.0.format("%Y/%m/%d").to_string()
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or(NaiveDate::MIN))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (abbrev, _) = MONTHS[self.0.month0() as usize];
        write!(f, "{:04}-{abbrev}-{:02}", self.0.year(), self.0.day())
    }
}
