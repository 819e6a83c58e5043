use crate::record::Record;
use crate::style::{Style, Styler};
use chrono::{Local, TimeZone};
use std::num::ParseIntError;

const TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const STACKTRACE_KEY: &str = "stacktrace";

const CLOCK: &str = "\u{23F0}";
const SPEAKER: &str = "\u{1F5E3}";

/// How the main line of a block is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Plain,
    Emoji,
}

impl RenderMode {
    pub fn from_emoji_flag(emoji: bool) -> Self {
        if emoji {
            RenderMode::Emoji
        } else {
            RenderMode::Plain
        }
    }
}

/// Error returned when a record cannot be rendered.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("timestamp {value} is not a number of seconds: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("timestamp {0} is outside the supported time range")]
    TimestampRange(String),
}

/// Severity bucket driving the message color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Notice,
    Alert,
    Normal,
}

impl Severity {
    fn of(level: &str) -> Self {
        match level {
            "debug" | "warn" => Severity::Notice,
            "fatal" | "error" | "dpanic" | "panic" => Severity::Alert,
            _ => Severity::Normal,
        }
    }
}

/// Pictograph shown before the level in emoji mode. Keyed by the quoted
/// level as it appears in the record.
fn level_pictograph(level: &str) -> &'static str {
    match level {
        r#""info""# => "\u{1F4DF}",
        r#""warn""# => "\u{26A0} ",
        r#""error""# => "\u{1F6A8}",
        r#""panic""# | r#""dpanic""# => "\u{1F4A9}",
        r#""fatal""# => "\u{2620} ",
        r#""debug""# => "\u{1F440}",
        _ => "",
    }
}

/// Turns a [`Record`] into a human-readable, styled block of text.
#[derive(Debug, Clone, Default)]
pub struct Renderer<S> {
    styler: S,
}

impl<S: Styler> Renderer<S> {
    pub fn new(styler: S) -> Self {
        Self { styler }
    }

    /// Render `record` as a main line followed by an optional metadata
    /// block.
    ///
    /// The main line holds, in order and each only when present: local
    /// time, level, caller and the message. Metadata follows one entry per
    /// line with `stacktrace` first, then a blank line.
    ///
    /// **Errors**
    /// - [`FormatError`] when `ts` is present but its integer part is not a
    ///   valid number of seconds.
    pub fn render(&self, record: &Record, mode: RenderMode) -> Result<String, FormatError> {
        let emoji = mode == RenderMode::Emoji;
        let level = present(record.level());
        let mut out = String::new();

        if let Some(ts) = present(record.timestamp()) {
            let time = local_time(ts)?;
            if emoji {
                out.push_str(&format!(
                    "{} {} ",
                    CLOCK,
                    self.styler.paint(Style::Timestamp, &format!("{:<20}", time))
                ));
            } else {
                out.push_str(&self.styler.paint(Style::Timestamp, &format!("{:<20}| ", time)));
            }
        }

        if let Some(level) = level {
            let name = self
                .styler
                .paint(Style::Level, &format!(" {:<8}", level.to_uppercase().replace('"', "")));
            if emoji {
                out.push_str(&format!("{} {}", level_pictograph(level), name));
            } else {
                out.push_str(&name);
            }
        }

        if let Some(caller) = present(record.caller()) {
            if emoji {
                out.push_str(&format!(
                    " {}{}",
                    SPEAKER,
                    self.styler.paint(Style::Accent, &format!(" [{}]", caller))
                ));
            } else {
                out.push_str(&self.styler.paint(Style::Accent, &format!(" @[{}]", caller)));
            }
        }

        let message = record.message().unwrap_or("");
        let bare_level = level.unwrap_or("").replace('"', "");
        out.push(' ');
        match Severity::of(&bare_level) {
            Severity::Notice => out.push_str(&self.styler.paint(Style::Warning, message)),
            Severity::Alert => out.push_str(&self.styler.paint(Style::Alert, message)),
            Severity::Normal => out.push_str(message),
        }
        out.push('\n');

        if record.has_metadata() {
            out.push_str(&self.metadata_block(record));
            out.push('\n');
        }

        Ok(out)
    }

    /// Keys are quoted with Rust debug escaping, which escapes fewer
    /// non-ASCII characters than Go's `%q`.
    fn metadata_block(&self, record: &Record) -> String {
        let mut block = String::new();

        if let Some(trace) = record.metadata_value(STACKTRACE_KEY) {
            block.push_str(&format!(
                "\t{}: \n\t\t{}\n",
                self.styler.paint(Style::Alert, &format!("{:?}", STACKTRACE_KEY)),
                self.styler.paint(Style::Alert, &format!("> {}", reformat_stacktrace(trace)))
            ));
        }

        for (key, value) in record.metadata().filter(|(key, _)| *key != STACKTRACE_KEY) {
            block.push_str(&format!(
                "   {}: {}\n",
                self.styler.paint(Style::Accent, &format!("{:?}", key)),
                value
            ));
        }

        block
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Format the integer-seconds part of `ts` as local time.
fn local_time(ts: &str) -> Result<String, FormatError> {
    let seconds = ts.split('.').next().unwrap_or(ts);
    let seconds: i64 = seconds.parse().map_err(|source| FormatError::Timestamp {
        value: ts.to_string(),
        source,
    })?;

    Local
        .timestamp_opt(seconds, 0)
        .earliest()
        .map(|time| time.format(TIME_FORMAT).to_string())
        .ok_or_else(|| FormatError::TimestampRange(ts.to_string()))
}

/// Unquote a stacktrace and expand its escaped `\n\t` and `\n` sequences
/// into indented lines.
fn reformat_stacktrace(trace: &str) -> String {
    let trace = trace.strip_prefix('"').unwrap_or(trace);
    let trace = trace.strip_suffix('"').unwrap_or(trace);
    trace.replace("\\n\\t", "\n\t\t> ").replace("\\n", "\n\t\t ")
}
