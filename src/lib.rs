//! Pretty-printing and filtering for zap-style structured JSON logs.
//!
//! A line goes through [`parse::parse_line`], is checked against
//! [`filter::FilterCriteria`], and if it passes is turned into a styled block
//! by [`render::Renderer`]. [`pipeline::Pipeline`] drives that for a whole
//! input stream.

pub mod record;
pub mod parse;
pub mod filter;
pub mod style;
pub mod render;
pub mod sink;
pub mod pipeline;

#[cfg(feature = "cli")]
pub mod cli;

pub mod config;
pub mod env;
pub mod init;

pub use config::Settings;
pub use filter::FilterCriteria;
pub use parse::{parse_line, ParseError};
pub use record::Record;
pub use render::{FormatError, RenderMode, Renderer};
