//! Startup settings: the filter criteria and display options chosen once
//! per process, and the helpers that turn user input into them.

use crate::filter::FilterCriteria;
use crate::render::RenderMode;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// Timestamp keyword for "from the current second on".
pub const NOW_KEYWORD: &str = "now";
/// Timestamp keyword for "from local midnight on".
pub const TODAY_KEYWORD: &str = "today";

/// Error type returned while building [`Settings`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("local midnight of {0} does not exist in the current time zone")]
    LocalMidnight(String),
}

/// Everything the pipeline needs to know about user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub criteria: FilterCriteria,
    pub mode: RenderMode,
    /// Emit ANSI colors. When `false` output is plain text.
    pub color: bool,
}

impl Settings {
    /// One-line summary of the active settings, shown at startup.
    pub fn banner(&self) -> String {
        let criteria = &self.criteria;
        let mut banner = format!(
            "[PRETTIER ZAP] Level: '{}' Timestamp: '{}' Caller: '{}' Emoji: '{}'",
            criteria.level,
            criteria.timestamp,
            criteria.caller,
            self.mode == RenderMode::Emoji
        );
        if !criteria.metadata.is_empty() {
            banner.push_str(" Key-Value:");
            for (key, value) in &criteria.metadata {
                banner.push_str(&format!(" {}:{}", key, value));
            }
        }
        banner
    }
}

/// Replace the `now` and `today` keywords with a Unix timestamp. Any other
/// value is returned unchanged.
pub fn resolve_timestamp(value: &str) -> Result<String, ConfigError> {
    resolve_timestamp_at(value, Local::now())
}

/// [`resolve_timestamp`] against a fixed clock.
pub fn resolve_timestamp_at(value: &str, now: DateTime<Local>) -> Result<String, ConfigError> {
    match value {
        NOW_KEYWORD => Ok(now.timestamp().to_string()),
        TODAY_KEYWORD => {
            let date = now.date_naive();
            date.and_hms_opt(0, 0, 0)
                .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
                .map(|midnight| midnight.timestamp().to_string())
                .ok_or_else(|| ConfigError::LocalMidnight(date.to_string()))
        }
        other => Ok(other.to_string()),
    }
}

/// Parse a comma-separated `key=value` list into metadata constraints.
///
/// Values that are not numbers are wrapped in double quotes so they compare
/// equal to JSON string values as they appear in log lines: `user=test`
/// requires `"test"` while `port=4222` requires `4222`. Entries without `=`
/// are ignored; only the first `=` splits.
pub fn parse_key_values(list: &str) -> BTreeMap<String, String> {
    list.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            let value = if value.parse::<f64>().is_ok() {
                value.to_string()
            } else {
                format!("\"{}\"", value)
            };
            (key.to_string(), value)
        })
        .collect()
}
