use crate::config::{parse_key_values, resolve_timestamp, ConfigError, Settings};
use crate::filter::FilterCriteria;
use crate::render::RenderMode;
use clap::Parser;

/// Command-line arguments of the `pz` binary.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pz")]
#[command(about = "Make zap logs more beautiful and queryable")]
#[command(version)]
pub struct Args {
    /// Only show logs with log level `LOG_LEVEL`
    #[arg(short, long, value_name = "LOG_LEVEL", default_value = "")]
    pub level: String,

    /// Only show logs at or after `TIMESTAMP`. Also accepts `now` (from the
    /// current time) and `today` (from local midnight)
    #[arg(short, long, default_value = "")]
    pub timestamp: String,

    /// Only show logs whose caller contains `CALLER_NAME`
    #[arg(short, long, value_name = "CALLER_NAME", default_value = "")]
    pub caller: String,

    /// Only show logs carrying all of `key_1=value_1,key_2=value_2`
    #[arg(short = 'k', long = "keyvalue", value_name = "PAIRS", default_value = "")]
    pub keyvalue: String,

    /// Decorate output with emoji
    #[arg(short, long)]
    pub emoji: bool,

    /// Disable terminal colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Resolve timestamp keywords and key/value constraints into
    /// [`Settings`].
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            criteria: FilterCriteria {
                level: self.level,
                timestamp: resolve_timestamp(&self.timestamp)?,
                caller: self.caller,
                metadata: parse_key_values(&self.keyvalue),
            },
            mode: RenderMode::from_emoji_flag(self.emoji),
            color: !self.no_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_place_no_constraints() {
        let settings = Args::try_parse_from(["pz"]).unwrap().into_settings().unwrap();
        assert!(settings.criteria.is_unconstrained());
        assert_eq!(settings.mode, RenderMode::Plain);
        assert!(settings.color);
    }

    #[test]
    fn short_flags() {
        let args = Args::try_parse_from([
            "pz", "-l", "error", "-c", "auth", "-t", "1522426145", "-k", "port=4222,user=test", "-e",
        ])
        .unwrap();
        let settings = args.into_settings().unwrap();

        assert_eq!(settings.criteria.level, "error");
        assert_eq!(settings.criteria.caller, "auth");
        assert_eq!(settings.criteria.timestamp, "1522426145");
        assert_eq!(settings.criteria.metadata.get("port").map(String::as_str), Some("4222"));
        assert_eq!(settings.criteria.metadata.get("user").map(String::as_str), Some(r#""test""#));
        assert_eq!(settings.mode, RenderMode::Emoji);
    }

    #[test]
    fn long_flags() {
        let args = Args::try_parse_from(["pz", "--timestamp", "now", "--keyvalue", "a=b", "--no-color"])
            .unwrap();
        let settings = args.into_settings().unwrap();

        assert!(settings.criteria.timestamp.parse::<i64>().is_ok());
        assert!(!settings.color);
    }
}
