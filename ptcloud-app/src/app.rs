//! Inspection run with builder-style configuration.

use crate::errors::AppError;
use crate::report::{HeaderReport, LoadReport};
use ptcloud_data::{DEFAULT_VERTEX_BUDGET, Decoder, HeaderLayout};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// How the summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Builder for configuring and running an inspection.
pub struct AppBuilder {
    budget: usize,
    header_only: bool,
    preview: usize,
    format: OutputFormat,
    logging: LoggingConfig,
}

impl AppBuilder {
    /// Create a new AppBuilder with default settings.
    pub fn new() -> Self {
        Self {
            budget: DEFAULT_VERTEX_BUDGET,
            header_only: false,
            preview: 0,
            format: OutputFormat::Text,
            logging: LoggingConfig::default(),
        }
    }

    /// Set the maximum number of vertices to keep.
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Only parse the header.
    pub fn with_header_only(mut self, header_only: bool) -> Self {
        self.header_only = header_only;
        self
    }

    /// Print the first `count` decoded vertices.
    pub fn with_preview(mut self, count: usize) -> Self {
        self.preview = count;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Initialize logging, inspect `path` and print the summary to stdout.
    pub fn run(self, path: &Path) -> Result<(), AppError> {
        self.init_logging();
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.inspect(path, &mut out)
    }

    /// Inspect `path` and write the summary to `out`.
    pub fn inspect(&self, path: &Path, out: &mut impl Write) -> Result<(), AppError> {
        let decoder = Decoder::new().with_budget(self.budget);
        let name = path.display().to_string();
        debug!("Inspecting {} (budget {})", name, self.budget);

        if self.header_only {
            let layout = match std::fs::read(path) {
                Ok(bytes) => decoder.read_header(&bytes)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!("Point cloud file not found: {}", path.display());
                    HeaderLayout::default()
                }
                Err(e) => return Err(e.into()),
            };
            let report = HeaderReport::new(name, layout);
            match self.format {
                OutputFormat::Text => report.write_text(out)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
            }
            return Ok(());
        }

        let decoded = decoder.load(path)?;
        info!("Loaded {} vertices", decoded.stats.vertices_decoded);
        let report = LoadReport::new(name, &decoded, self.preview);
        match self.format {
            OutputFormat::Text => report.write_text(out)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        }
        Ok(())
    }

    fn init_logging(&self) {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Run an inspection with the given options.
pub fn run(
    file: PathBuf,
    budget: usize,
    header_only: bool,
    json: bool,
    preview: usize,
    log_level: &str,
) -> Result<(), AppError> {
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    AppBuilder::new()
        .with_budget(budget)
        .with_header_only(header_only)
        .with_preview(preview)
        .with_format(format)
        .with_logging(LoggingConfig {
            level: log_level.to_string(),
        })
        .run(&file)
}
