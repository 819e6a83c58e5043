use serde::Serialize;
use std::collections::BTreeMap;

/// Field holding the log level, e.g. `"info"`.
pub const LEVEL_KEY: &str = "level";
/// Field holding the seconds-since-epoch timestamp, e.g. `1522426145.1872783`.
pub const TIMESTAMP_KEY: &str = "ts";
/// Field holding the call site, e.g. `"auth/a.go:271"`.
pub const CALLER_KEY: &str = "caller";
/// Message keys in lookup order. `msg` wins when both are present.
pub const MESSAGE_KEYS: [&str; 2] = ["msg", "message"];

/// Key/value pairs extracted from a single log line.
///
/// Values are kept exactly as they appeared in the source text, quotes
/// included: `"info"` stays `"info"` and a numeric `ts` stays unquoted.
/// A record is never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub(crate) fn from_fields(fields: BTreeMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn level(&self) -> Option<&str> {
        self.get(LEVEL_KEY)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_KEY)
    }

    pub fn caller(&self) -> Option<&str> {
        self.get(CALLER_KEY)
    }

    pub fn message(&self) -> Option<&str> {
        MESSAGE_KEYS.iter().find_map(|key| self.get(key))
    }

    /// Every field that is not one of `level`, `ts`, `caller`, `msg` or
    /// `message`, in key order.
    pub fn metadata(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(key, _)| !is_well_known(key))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        if is_well_known(key) {
            None
        } else {
            self.get(key)
        }
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn is_well_known(key: &str) -> bool {
    key == LEVEL_KEY || key == TIMESTAMP_KEY || key == CALLER_KEY || MESSAGE_KEYS.contains(&key)
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_fields(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
