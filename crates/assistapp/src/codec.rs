//! # Line Codec
//!
//! Every record is stored as exactly one line of text. This module owns the
//! translation between a record's fields and that line.
//!
//! ## Dialects
//!
//! Each domain keeps its historical file layout, described by a [`Dialect`]:
//!
//! | Domain   | Delimiter | Fields | Minimum accepted |
//! |----------|-----------|--------|------------------|
//! | Tasks    | `,`       | 4      | 4                |
//! | Health   | `" \| "`  | 9      | 8                |
//! | Life log | `" \| "`  | 5      | 5                |
//! | Payments | tab       | 7      | 6                |
//!
//! Missing trailing fields (allowed by the minimum) decode as empty, which
//! means "absent" for optional values.
//!
//! ## Escaping
//!
//! All dialects share one escaping scheme, applied to every field:
//!
//! - `\` becomes `\\`
//! - newline, carriage return and tab become `\n`, `\r`, `\t`
//! - the delimiter's marker character (`,` or `|`) becomes `\,` / `\|`
//!
//! The splitter never splits on an escaped character, so any text survives a
//! round trip. Splitting is bounded to `fields - 1` cuts: whatever follows the
//! last cut is the final field, verbatim, delimiters included.
//!
//! ## Value Formats
//!
//! - Dates: `%Y-%m-%d`, date-times: `%Y-%m-%d %H:%M:%S`
//! - Amounts: two fixed decimals
//! - Other numbers: Rust's locale-independent `Display`
//! - Absent optionals: empty field, never a placeholder

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Why a line could not be turned back into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field `{field}`: {reason}")]
    Field { field: &'static str, reason: String },
}

impl DecodeError {
    fn field(field: &'static str, reason: impl Display) -> Self {
        DecodeError::Field {
            field,
            reason: reason.to_string(),
        }
    }
}

/// The delimiter and field layout of one backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: &'static str,
    pub fields: usize,
    pub min_fields: usize,
}

impl Dialect {
    pub const fn new(delimiter: &'static str, fields: usize) -> Self {
        Self {
            delimiter,
            fields,
            min_fields: fields,
        }
    }

    pub const fn with_min_fields(self, min_fields: usize) -> Self {
        Self { min_fields, ..self }
    }

    /// The character that must be escaped inside fields.
    fn marker(&self) -> char {
        self.delimiter
            .chars()
            .find(|c| *c != ' ')
            .unwrap_or(' ')
    }

    /// Escapes every field and joins them with the delimiter.
    pub fn join(&self, fields: &[String]) -> String {
        let marker = self.marker();
        fields
            .iter()
            .map(|f| escape(f, marker))
            .collect::<Vec<_>>()
            .join(self.delimiter)
    }

    /// Splits a line into at most `fields` unescaped values.
    pub fn split(&self, line: &str) -> Result<Vec<String>, DecodeError> {
        let mut fields = Vec::with_capacity(self.fields);
        let mut start = 0;
        let mut i = 0;

        while fields.len() + 1 < self.fields && i < line.len() {
            let rest = &line[i..];
            if rest.starts_with('\\') {
                i += 1;
                if let Some(escaped) = line[i..].chars().next() {
                    i += escaped.len_utf8();
                }
                continue;
            }
            if rest.starts_with(self.delimiter) {
                fields.push(unescape(&line[start..i]));
                i += self.delimiter.len();
                start = i;
                continue;
            }
            i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
        fields.push(unescape(&line[start..]));

        if fields.len() < self.min_fields {
            return Err(DecodeError::FieldCount {
                expected: self.min_fields,
                found: fields.len(),
            });
        }
        Ok(fields)
    }
}

pub fn escape(field: &str, marker: char) -> String {
    let mut out = String::with_capacity(field.len());
    for ch in field.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == marker => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Sequential access to the fields of a split line.
///
/// Fields beyond the end of the line read as empty, so optional trailing
/// fields simply decode as absent.
pub struct FieldReader {
    inner: std::vec::IntoIter<String>,
}

impl FieldReader {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            inner: fields.into_iter(),
        }
    }

    pub fn text(&mut self) -> String {
        self.inner.next().unwrap_or_default()
    }

    pub fn opt_text(&mut self) -> Option<String> {
        let value = self.text();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn parse<T>(&mut self, field: &'static str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.text();
        raw.trim()
            .parse()
            .map_err(|e| DecodeError::field(field, format!("'{}': {}", raw, e)))
    }

    pub fn parse_opt<T>(&mut self, field: &'static str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.text();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|e| DecodeError::field(field, format!("'{}': {}", raw, e)))
    }

    pub fn date(&mut self, field: &'static str) -> Result<NaiveDate, DecodeError> {
        let raw = self.text();
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|e| DecodeError::field(field, format!("'{}': {}", raw, e)))
    }

    pub fn datetime(&mut self, field: &'static str) -> Result<NaiveDateTime, DecodeError> {
        let raw = self.text();
        NaiveDateTime::parse_from_str(raw.trim(), DATETIME_FORMAT)
            .map_err(|e| DecodeError::field(field, format!("'{}': {}", raw, e)))
    }
}

/// A record that can be written as one delimited line.
pub trait LineCodec: Sized {
    const DIALECT: Dialect;

    fn encode_fields(&self) -> Vec<String>;

    fn decode_fields(fields: &mut FieldReader) -> Result<Self, DecodeError>;

    fn encode(&self) -> String {
        Self::DIALECT.join(&self.encode_fields())
    }

    fn decode(line: &str) -> Result<Self, DecodeError> {
        let fields = Self::DIALECT.split(line)?;
        Self::decode_fields(&mut FieldReader::new(fields))
    }
}

pub fn encode_opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn encode_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

pub fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn encode_datetime(at: NaiveDateTime) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIPE: Dialect = Dialect::new(" | ", 3);
    const COMMA: Dialect = Dialect::new(",", 3);
    const TAB: Dialect = Dialect::new("\t", 3).with_min_fields(2);

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn joins_plain_fields_with_delimiter() {
        assert_eq!(PIPE.join(&strings(&["a", "b", "c"])), "a | b | c");
        assert_eq!(COMMA.join(&strings(&["a", "", "c"])), "a,,c");
    }

    #[test]
    fn escapes_marker_backslash_and_newlines() {
        let line = COMMA.join(&strings(&["buy milk, eggs", "C:\\tmp", "two\nlines"]));
        assert_eq!(line, "buy milk\\, eggs,C:\\\\tmp,two\\nlines");
        assert_eq!(
            COMMA.split(&line).unwrap(),
            strings(&["buy milk, eggs", "C:\\tmp", "two\nlines"])
        );
    }

    #[test]
    fn pipe_dialect_round_trips_delimiter_text_in_every_field() {
        let fields = strings(&["x | y", "|", " | trailing | "]);
        let line = PIPE.join(&fields);
        assert_eq!(PIPE.split(&line).unwrap(), fields);
    }

    #[test]
    fn tab_dialect_round_trips_tabs() {
        let fields = strings(&["1", "a\tb", "c"]);
        let line = TAB.join(&fields);
        assert!(!line.contains("a\tb"));
        assert_eq!(TAB.split(&line).unwrap(), fields);
    }

    #[test]
    fn bounded_split_keeps_extra_delimiters_in_last_field() {
        let fields = PIPE.split("a | b | c | d | e").unwrap();
        assert_eq!(fields, strings(&["a", "b", "c | d | e"]));
    }

    #[test]
    fn trailing_empty_field_is_kept() {
        assert_eq!(COMMA.split("a,b,").unwrap(), strings(&["a", "b", ""]));
        assert_eq!(PIPE.split("a | b | ").unwrap(), strings(&["a", "b", ""]));
    }

    #[test]
    fn too_few_fields_is_an_error() {
        assert_eq!(
            COMMA.split("a,b"),
            Err(DecodeError::FieldCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn min_fields_allows_missing_trailing_field() {
        assert_eq!(TAB.split("1\t2").unwrap(), strings(&["1", "2"]));
    }

    #[test]
    fn unicode_content_survives() {
        let fields = strings(&["午餐 | 外卖", "😊 Happy", "ß,ü"]);
        assert_eq!(PIPE.split(&PIPE.join(&fields)).unwrap(), fields);
    }

    #[test]
    fn lone_trailing_backslash_is_preserved() {
        assert_eq!(unescape("abc\\"), "abc\\");
    }

    #[test]
    fn field_reader_treats_empty_as_absent() {
        let mut reader = FieldReader::new(strings(&["", "42", "x"]));
        assert_eq!(reader.parse_opt::<u32>("a").unwrap(), None);
        assert_eq!(reader.parse_opt::<u32>("b").unwrap(), Some(42));
        assert!(reader.parse::<u32>("c").is_err());
        assert_eq!(reader.opt_text(), None);
    }

    #[test]
    fn field_reader_parses_dates() {
        let mut reader = FieldReader::new(strings(&["2024-03-05", "2024-03-05 08:30:00", "05/03"]));
        assert_eq!(
            reader.date("d").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            encode_datetime(reader.datetime("t").unwrap()),
            "2024-03-05 08:30:00"
        );
        assert!(reader.date("bad").is_err());
    }

    #[test]
    fn amounts_use_two_decimals() {
        assert_eq!(encode_amount(12.0), "12.00");
        assert_eq!(encode_amount(0.126), "0.13");
        assert_eq!(encode_opt::<u32>(None), "");
        assert_eq!(encode_opt(Some(70.5)), "70.5");
    }
}
