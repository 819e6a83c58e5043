use crate::record::Record;
use std::collections::BTreeMap;

/// Constraints a [`Record`] must satisfy to be rendered.
///
/// Built once at startup and never changed afterwards. Every empty field
/// places no constraint on its dimension.
///
/// **Fields**
/// - `level`: exact match against the record level with its quotes removed,
///   e.g. `error`.
/// - `caller`: substring of the raw caller value.
/// - `timestamp`: inclusive lower bound on the raw `ts` value. The comparison
///   is lexicographic on the strings, so it is only meaningful between
///   timestamps with the same number of integer digits.
/// - `metadata`: key to exact raw value, e.g. `user` to `"test"` (quotes
///   included) or `port` to `4222`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub level: String,
    pub timestamp: String,
    pub caller: String,
    pub metadata: BTreeMap<String, String>,
}

impl FilterCriteria {
    /// Whether `record` passes every constraint.
    pub fn matches(&self, record: &Record) -> bool {
        if !self.level.is_empty() && record.level().unwrap_or("").replace('"', "") != self.level {
            return false;
        }
        if !self.caller.is_empty() && !record.caller().unwrap_or("").contains(&self.caller) {
            return false;
        }
        if !self.timestamp.is_empty() && record.timestamp().unwrap_or("") < self.timestamp.as_str() {
            return false;
        }

        self.metadata
            .iter()
            .all(|(key, wanted)| record.metadata_value(key) == Some(wanted.as_str()))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.level.is_empty()
            && self.timestamp.is_empty()
            && self.caller.is_empty()
            && self.metadata.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: &str, ts: &str, caller: &str, extra: &[(&str, &str)]) -> Record {
        let mut fields = vec![
            ("level", level),
            ("ts", ts),
            ("caller", caller),
            ("msg", r#""connecting to the database""#),
            ("user", r#""test""#),
        ];
        fields.extend_from_slice(extra);
        fields.into_iter().collect()
    }

    fn run(records: &[Record], criteria: &FilterCriteria) -> Vec<bool> {
        records.iter().map(|r| criteria.matches(r)).collect()
    }

    const CALLER: &str = r#""authentication/authentication.go:271""#;

    #[test]
    fn empty_criteria_pass_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_unconstrained());
        assert!(criteria.matches(&Record::default()));
    }

    #[test]
    fn level_is_compared_without_quotes() {
        let records = [
            record(r#""debug""#, "1234567.8901234", CALLER, &[]),
            record(r#""info""#, "1234567.8901234", CALLER, &[]),
        ];
        let criteria = FilterCriteria { level: "debug".into(), ..Default::default() };
        assert_eq!(run(&records, &criteria), vec![true, false]);
    }

    #[test]
    fn caller_is_a_substring_match() {
        let records = [
            record(r#""info""#, "1234567.8901234", CALLER, &[]),
            record(r#""info""#, "1234567.8901234", r#""hello/run.go:271""#, &[]),
        ];
        let criteria = FilterCriteria { caller: "authentication".into(), ..Default::default() };
        assert_eq!(run(&records, &criteria), vec![true, false]);
    }

    #[test]
    fn timestamp_is_an_inclusive_lower_bound() {
        let records = [
            record(r#""error""#, "1234567.8901220", CALLER, &[]),
            record(r#""error""#, "1234567.8901234", CALLER, &[]),
            record(r#""error""#, "1234567.8901299", CALLER, &[]),
        ];
        let criteria = FilterCriteria { timestamp: "1234567.8901234".into(), ..Default::default() };
        assert_eq!(run(&records, &criteria), vec![false, true, true]);
    }

    #[test]
    fn timestamp_bound_compares_strings_not_numbers() {
        let records = [record(r#""info""#, "999", CALLER, &[])];
        let criteria = FilterCriteria { timestamp: "1000".into(), ..Default::default() };
        assert_eq!(run(&records, &criteria), vec![true]);
    }

    #[test]
    fn metadata_must_match_exactly() {
        let records = [
            record(r#""debug""#, "1", CALLER, &[("token", "1234")]),
            record(r#""info""#, "1", CALLER, &[]),
            record(r#""info""#, "1", CALLER, &[("token", "4321")]),
        ];
        let criteria = FilterCriteria {
            metadata: [("token".to_string(), "1234".to_string())].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(run(&records, &criteria), vec![true, false, false]);
    }

    #[test]
    fn every_metadata_constraint_applies() {
        let records = [
            record(r#""debug""#, "1", CALLER, &[("token", "1234"), ("auth", r#""badef123==""#)]),
            record(r#""info""#, "1", CALLER, &[("token", "1234")]),
            record(r#""info""#, "1", CALLER, &[("token", "4321")]),
        ];
        let criteria = FilterCriteria {
            metadata: [
                ("token".to_string(), "1234".to_string()),
                ("auth".to_string(), r#""badef123==""#.to_string()),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        assert_eq!(run(&records, &criteria), vec![true, false, false]);
    }

    #[test]
    fn missing_fields_fail_their_constraint() {
        let bare = Record::default();
        for criteria in [
            FilterCriteria { level: "info".into(), ..Default::default() },
            FilterCriteria { caller: "a".into(), ..Default::default() },
            FilterCriteria { timestamp: "1".into(), ..Default::default() },
        ] {
            assert!(!criteria.matches(&bare));
        }
    }
}
