use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{error, info};
use zap_prettier::cli::Args;
use zap_prettier::init::{init_diagnostics_with_config, DiagnosticsConfig};
use zap_prettier::pipeline::{Pipeline, PipelineError, PipelineStats};
use zap_prettier::render::Renderer;
use zap_prettier::sink::WriterSink;
use zap_prettier::style::{AnsiStyler, PlainStyler, Styler};
use zap_prettier::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let diagnostics = DiagnosticsConfig {
        ansi: !args.no_color,
        ..DiagnosticsConfig::from_env()
    };
    if let Err(e) = init_diagnostics_with_config(diagnostics) {
        eprintln!("failed to install diagnostics: {}", e);
    }

    let settings = match args.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid arguments");
            return ExitCode::FAILURE;
        }
    };
    eprintln!("\n{}\n", settings.banner());

    let result = if settings.color {
        drain(settings, AnsiStyler).await
    } else {
        drain(settings, PlainStyler).await
    };

    match result {
        Ok(stats) => {
            info!(
                lines = stats.lines,
                rendered = stats.rendered,
                filtered = stats.filtered,
                failed = stats.failed,
                "input stream finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "stopped reading logs");
            ExitCode::FAILURE
        }
    }
}

async fn drain<S: Styler>(settings: Settings, styler: S) -> Result<PipelineStats, PipelineError> {
    let pipeline = Pipeline::new(settings.criteria, settings.mode, Renderer::new(styler));
    let sink = WriterSink::new(tokio::io::stdout());
    pipeline.run(BufReader::new(tokio::io::stdin()), &sink).await
}
