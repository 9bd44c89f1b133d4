//! `dg generate` command implementation.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Args;
use dg_config::{CliSettings, Config};
use dg_context::{Generator, RenderSession};
use dg_model::{EntityModel, OutputFormat};

use crate::dump::JsonDumpEngine;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover docgen.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON entity model (overrides config).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format; repeat for several (overrides config).
    #[arg(short, long = "format", value_parser = OutputFormat::from_str)]
    formats: Vec<OutputFormat>,

    /// Kroki server URL for diagram layout (overrides config).
    #[arg(long, env = "DG_KROKI_URL")]
    kroki_url: Option<String>,

    /// Enable verbose output (run and format progress).
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or model loading fails, or if any
    /// output format failed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            model: self.model,
            output_dir: self.output,
            formats: (!self.formats.is_empty()).then_some(self.formats),
            kroki_url: self.kroki_url,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.field("model", config.input_resolved.model.display());
        output.field("output", config.output_resolved.dir.display());
        if let Some(kroki_url) = &config.graphs.kroki_url {
            output.field("kroki", kroki_url);
        }

        let model = EntityModel::from_path(&config.input_resolved.model)?;
        output.field("entities", model.len());

        let session = RenderSession::new(Arc::new(model), Arc::new(config));
        let report = Generator::new(session).run(&mut JsonDumpEngine::new());

        for pass in &report.formats {
            match &pass.error {
                None => output.format_done(pass.format, pass.files, &pass.output_dir),
                Some(err) => output.format_failed(pass.format, err),
            }
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(CliError::Generate {
                failed: report.failures().count(),
                total: report.formats.len(),
            })
        }
    }
}
