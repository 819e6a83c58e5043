use crate::filter::FilterCriteria;
use crate::parse::{parse_line, ParseError};
use crate::render::{FormatError, RenderMode, Renderer};
use crate::sink::OutputSink;
use crate::style::Styler;
use std::error::Error;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{trace, warn};

/// Counters collected while draining one input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Non-empty lines read.
    pub lines: u64,
    /// Blocks handed to the sink.
    pub rendered: u64,
    /// Lines rejected by the filter.
    pub filtered: u64,
    /// Lines skipped because they could not be rendered.
    pub failed: u64,
}

/// Why a single line produced no output.
#[derive(thiserror::Error, Debug)]
pub enum LineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Error that ends a pipeline run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("failed to read input: {0}")]
    Read(#[from] io::Error),

    #[error("failed to write output: {0}")]
    Sink(Box<dyn Error + Send + Sync>),
}

/// Classify, filter and render log lines, one at a time and in order.
pub struct Pipeline<S> {
    criteria: FilterCriteria,
    mode: RenderMode,
    renderer: Renderer<S>,
}

impl<S: Styler> Pipeline<S> {
    pub fn new(criteria: FilterCriteria, mode: RenderMode, renderer: Renderer<S>) -> Self {
        Self { criteria, mode, renderer }
    }

    /// Run one raw line through the pipeline.
    ///
    /// **Returns**
    /// - `Ok(Some(block))` with the rendered text when the line passes the
    ///   filter.
    /// - `Ok(None)` when the filter rejects it.
    /// - `Err(..)` when the line is empty or its timestamp is malformed.
    pub fn process_line(&self, raw: &[u8]) -> Result<Option<String>, LineError> {
        let record = parse_line(raw)?;
        trace!(
            record = %serde_json::to_string(&record).unwrap_or_default(),
            "parsed line"
        );

        if !self.criteria.matches(&record) {
            return Ok(None);
        }
        Ok(Some(self.renderer.render(&record, self.mode)?))
    }

    /// Drain `reader` line by line into `sink`.
    ///
    /// Empty lines are skipped without being counted. Lines that fail to
    /// render are reported and skipped without stopping the stream. A read
    /// error ends the run and is returned after everything read so far has
    /// been flushed.
    pub async fn run<R, K>(&self, mut reader: R, sink: &K) -> Result<PipelineStats, PipelineError>
    where
        R: AsyncBufRead + Unpin,
        K: OutputSink + ?Sized,
    {
        let mut stats = PipelineStats::default();
        let mut buf = Vec::new();
        let mut read_error = None;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    read_error = Some(e);
                    break;
                }
            }

            let line = strip_line_ending(&buf);
            match self.process_line(line) {
                Ok(Some(block)) => {
                    stats.lines += 1;
                    sink.send(&block).await.map_err(PipelineError::Sink)?;
                    stats.rendered += 1;
                }
                Ok(None) => {
                    stats.lines += 1;
                    stats.filtered += 1;
                }
                Err(LineError::Parse(e)) => {
                    trace!(error = %e, "skipping line");
                }
                Err(LineError::Format(e)) => {
                    stats.lines += 1;
                    stats.failed += 1;
                    warn!(error = %e, line = %String::from_utf8_lossy(line), "cannot render line");
                }
            }
        }

        sink.flush().await.map_err(PipelineError::Sink)?;

        match read_error {
            Some(e) => Err(PipelineError::Read(e)),
            None => Ok(stats),
        }
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::WriterSink;
    use crate::style::PlainStyler;

    fn pipeline(criteria: FilterCriteria) -> Pipeline<PlainStyler> {
        Pipeline::new(criteria, RenderMode::Plain, Renderer::new(PlainStyler))
    }

    #[test]
    fn strips_lf_and_crlf() {
        assert_eq!(strip_line_ending(b"abc\n"), b"abc");
        assert_eq!(strip_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(strip_line_ending(b"abc"), b"abc");
        assert_eq!(strip_line_ending(b"\n"), b"");
    }

    #[test]
    fn process_line_outcomes() {
        let criteria = FilterCriteria { level: "error".into(), ..Default::default() };
        let pipeline = pipeline(criteria);

        assert!(matches!(pipeline.process_line(b""), Err(LineError::Parse(_))));
        assert!(pipeline.process_line(br#"{"level":"info","msg":"x"}"#).unwrap().is_none());
        assert!(matches!(
            pipeline.process_line(br#"{"level":"error","ts":"yesterday"}"#),
            Err(LineError::Format(_))
        ));
        let block = pipeline.process_line(br#"{"level":"error","msg":"x"}"#).unwrap().unwrap();
        assert_eq!(block, " ERROR    \"x\"\n");
    }

    #[tokio::test]
    async fn run_skips_empty_and_failing_lines() {
        let input: &[u8] = b"{\"level\":\"info\",\"msg\":\"one\"}\n\n\
            {\"level\":\"info\",\"ts\":\"bad\",\"msg\":\"two\"}\r\n\
            {\"level\":\"debug\",\"msg\":\"three\"}\n\
            {\"level\":\"info\",\"msg\":\"four\"}";
        let criteria = FilterCriteria { level: "info".into(), ..Default::default() };
        let sink = WriterSink::new(Vec::new());

        let stats = pipeline(criteria).run(input, &sink).await.unwrap();

        assert_eq!(
            stats,
            PipelineStats { lines: 4, rendered: 2, filtered: 1, failed: 1 }
        );
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, " INFO     \"one\"\n INFO     \"four\"\n");
    }

    #[tokio::test]
    async fn blank_input_produces_nothing() {
        let input: &[u8] = b"\n\r\n\n";
        let sink = WriterSink::new(Vec::new());

        let stats = pipeline(FilterCriteria::default()).run(input, &sink).await.unwrap();

        assert_eq!(stats, PipelineStats::default());
        assert!(sink.into_inner().is_empty());
    }
}
