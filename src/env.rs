/// Environment variable names read by the `pz` binary.
///
/// These are purely helpers; the library types never read the environment
/// themselves.

/// Maximum level of the tool's own diagnostics on stderr, e.g. `debug`.
pub const PZ_LOG_ENV: &str = "PZ_LOG";

/// Diagnostics level used when [`PZ_LOG_ENV`] is unset.
pub const DEFAULT_DIAGNOSTICS_LEVEL: &str = "warn";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
