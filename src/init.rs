use crate::env::{env_or, DEFAULT_DIAGNOSTICS_LEVEL, PZ_LOG_ENV};
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Configuration of the tool's own diagnostics.
///
/// Diagnostics always go to stderr so that stdout carries nothing but
/// rendered log blocks.
///
/// **Fields**
/// - `level`: most verbose level that is printed.
/// - `ansi`: whether the `fmt` layer may use terminal colors.
#[derive(Clone, Debug)]
pub struct DiagnosticsConfig {
    pub level: LevelFilter,
    pub ansi: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            ansi: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Build a config whose level comes from `PZ_LOG`, falling back to
    /// `warn` when the variable is unset or not a level name.
    pub fn from_env() -> Self {
        let level = env_or(PZ_LOG_ENV, DEFAULT_DIAGNOSTICS_LEVEL)
            .parse()
            .unwrap_or(LevelFilter::WARN);
        Self { level, ..Self::default() }
    }
}

/// Install the global `tracing` subscriber for diagnostics.
///
/// **Errors**
/// - [`SetGlobalDefaultError`] if a global subscriber is already installed.
pub fn init_diagnostics_with_config(config: DiagnosticsConfig) -> Result<(), SetGlobalDefaultError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi)
        .with_target(false)
        .with_filter(config.level);
    let subscriber = Registry::default().with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)
}
