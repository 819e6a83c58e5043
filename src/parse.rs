//! Tolerant extraction of key/value pairs from zap-style JSON lines.
//!
//! This is a flat, best-effort scanner rather than a JSON parser. Once a
//! line is framed by `{` and `}` every key is taken as the text between a
//! pair of `"` and every value as the text between `:` and the next `,` or
//! `}`. There is no nesting depth and no escape handling, so values that
//! contain a literal `,`, `{` or `}` (nested objects, arrays, some strings)
//! are cut short. Lines without a `{` before a `}` become a synthetic
//! debug record carrying the whole line as its message.

use crate::record::{Record, CALLER_KEY, LEVEL_KEY, TIMESTAMP_KEY};
use chrono::Utc;
use std::collections::BTreeMap;

/// Level given to lines that are not object-shaped.
pub const FALLBACK_LEVEL: &str = r#""debug""#;
/// Caller given to lines that are not object-shaped.
pub const FALLBACK_CALLER: &str = r#""user-code""#;

/// Error returned by [`parse_line`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("cannot parse an empty line")]
    EmptyLine,
}

/// Build a [`Record`] from one raw input line.
///
/// Only a zero-length input fails; whitespace-only or malformed lines come
/// back as a fallback record with level `"debug"`, caller `"user-code"`, the
/// current Unix time as `ts` and the trimmed line as `msg`.
pub fn parse_line(raw: &[u8]) -> Result<Record, ParseError> {
    if raw.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    match object_bounds(raw) {
        Some((start, end)) => Ok(Record::from_fields(scan_fields(raw, start, end))),
        None => Ok(fallback_record(raw)),
    }
}

/// Locate the outer `{` and `}` by walking in from both ends at once. Each
/// frontier passes over anything that is not its brace, so a timestamp or
/// container prefix in front of the object is ignored. Gives up once the two
/// frontiers meet.
fn object_bounds(raw: &[u8]) -> Option<(usize, usize)> {
    let mut front = 0;
    let mut back = raw.len().checked_sub(1)?;
    let mut start = None;
    let mut end = None;

    while front < back {
        if start.is_none() {
            if raw[front] == b'{' {
                start = Some(front);
            } else {
                front += 1;
            }
        }
        if end.is_none() {
            if raw[back] == b'}' {
                end = Some(back);
            } else {
                back -= 1;
            }
        }
        if start.is_some() && end.is_some() {
            break;
        }
    }

    start.zip(end)
}

fn scan_fields(raw: &[u8], start: usize, end: usize) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let mut key = String::new();
    let mut offset = start;

    while offset < end {
        let mut advance = 0;
        match raw[offset] {
            b'"' => {
                let (text, len) = take_until(&raw[offset + 1..], |b| b == b'"');
                key = trimmed(text);
                advance = len + 1;
            }
            b':' => {
                let (text, len) = take_until(&raw[offset + 1..], |b| b == b',' || b == b'}');
                // last write wins for repeated keys
                fields.insert(key.clone(), trimmed(text));
                advance = len + 1;
            }
            _ => {}
        }
        offset += advance + 1;
    }

    fields
}

/// Bytes before the first delimiter and the delimiter's index. Without a
/// delimiter nothing is taken and the index is zero.
fn take_until(data: &[u8], is_delimiter: impl Fn(u8) -> bool) -> (&[u8], usize) {
    match data.iter().position(|&b| is_delimiter(b)) {
        Some(index) => (&data[..index], index),
        None => (&[], 0),
    }
}

fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

fn fallback_record(raw: &[u8]) -> Record {
    let mut fields = BTreeMap::new();
    fields.insert(LEVEL_KEY.to_string(), FALLBACK_LEVEL.to_string());
    fields.insert(TIMESTAMP_KEY.to_string(), Utc::now().timestamp().to_string());
    fields.insert(CALLER_KEY.to_string(), FALLBACK_CALLER.to_string());
    fields.insert("msg".to_string(), trimmed(raw));
    Record::from_fields(fields)
}
