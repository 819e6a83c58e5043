use colored::Colorize;

/// Roles a rendered segment can take. The [`Styler`] decides what each
/// role looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Timestamp: black on yellow.
    Timestamp,
    /// Level name: bold black on yellow.
    Level,
    /// Caller and metadata keys: cyan.
    Accent,
    /// Messages of `debug` and `warn` lines: yellow.
    Warning,
    /// Messages of `error`, `dpanic`, `panic` and `fatal` lines, and stacktraces: red.
    Alert,
}

/// Text styling capability injected into the renderer.
///
/// The renderer never emits escape sequences itself; it hands every
/// segment to a styler, so terminal output and plain output share one
/// code path.
pub trait Styler: Send + Sync {
    fn paint(&self, style: Style, text: &str) -> String;
}

/// Styler producing ANSI terminal colors.
///
/// Honors `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` through `colored`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnsiStyler;

impl Styler for AnsiStyler {
    fn paint(&self, style: Style, text: &str) -> String {
        let styled = match style {
            Style::Timestamp => text.black().on_yellow(),
            Style::Level => text.black().on_yellow().bold(),
            Style::Accent => text.cyan(),
            Style::Warning => text.yellow(),
            Style::Alert => text.red(),
        };
        styled.to_string()
    }
}

/// Styler that returns text unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainStyler;

impl Styler for PlainStyler {
    fn paint(&self, _style: Style, text: &str) -> String {
        text.to_string()
    }
}
