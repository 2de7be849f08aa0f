//! Conversion orchestration with strategy fallback.
//!
//! A [`Converter`] holds an ordered list of [`Strategy`]s and a
//! [`DocumentWriter`]. Strategies are tried one after another until one
//! produces a document; unavailable or failing strategies are logged and
//! skipped. Only two outcomes reach the caller as errors: every strategy
//! failing ([`Error::StrategiesExhausted`]) and the writer failing
//! ([`Error::WriteFailed`]).
//!
//! # Example
//!
//! ```no_run
//! use pdfdocx::convert::{ConvertOptions, Converter};
//! use std::path::Path;
//!
//! fn main() -> pdfdocx::Result<()> {
//!     let converter = Converter::with_defaults(ConvertOptions::default())?;
//!     let data = std::fs::read("report.pdf")?;
//!
//!     let result = converter.convert_to_dir(&data, "report.pdf", Path::new("out"))?;
//!     println!("{} via {}", result.output_path.display(), result.strategy);
//!     Ok(())
//! }
//! ```

mod extraction;
mod opaque;
mod postprocess;

pub use extraction::ExtractionStrategy;
pub use opaque::{CommandConverter, CommandSpec, OpaqueConverter, OpaqueStrategy};
pub use postprocess::{is_bullet_glyph, PostProcessPass, CANONICAL_MARKER};

use std::fmt;
use std::io::ErrorKind;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AttemptFailure, AttemptRecord, Error, Result};
use crate::model::Document;
use crate::parser::{CharSource, LayoutOptions, SpanSource};
use crate::render::{DocumentWriter, DocxWriter};

/// Base name used when the input name has no usable stem.
const FALLBACK_STEM: &str = "document";

/// Options for document conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Line assembly and bullet detection settings
    pub layout: LayoutOptions,

    /// Use the writer's native list style instead of an emulated indent
    pub native_list_style: bool,

    /// External converter used as the last resort; `None` disables it
    pub opaque_command: Option<CommandSpec>,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable the native list style.
    pub fn with_native_list_style(mut self, enabled: bool) -> Self {
        self.native_list_style = enabled;
        self
    }

    /// Set the external converter command.
    pub fn with_opaque_command(mut self, command: CommandSpec) -> Self {
        self.opaque_command = Some(command);
        self
    }

    /// Disable the external converter.
    pub fn without_opaque_command(mut self) -> Self {
        self.opaque_command = None;
        self
    }

    /// Load options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.layout.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            native_list_style: true,
            opaque_command: Some(CommandSpec::default()),
        }
    }
}

/// The explicit result of one strategy attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// The strategy produced a document
    Success(Document),
    /// The strategy's capability is not installed or not reachable
    Unavailable(String),
    /// The strategy ran and failed
    Failed(String),
}

impl From<Result<Document>> for StrategyOutcome {
    fn from(result: Result<Document>) -> Self {
        match result {
            Ok(doc) => StrategyOutcome::Success(doc),
            Err(Error::CapabilityUnavailable(reason)) => StrategyOutcome::Unavailable(reason),
            Err(e) => StrategyOutcome::Failed(e.to_string()),
        }
    }
}

/// One way of turning document bytes into a [`Document`].
///
/// Attempts are all-or-nothing: a strategy either returns a complete
/// document or reports why it could not.
pub trait Strategy: Send + Sync {
    /// Short name used in logs and attempt records.
    fn name(&self) -> &str;

    /// Try to convert `data`.
    fn attempt(&self, data: &[u8]) -> StrategyOutcome;
}

/// Progress of a conversion through the strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// Nothing attempted yet
    Idle,
    /// Running the strategy at this index
    Attempting(usize),
    /// The strategy at this index produced the document
    Succeeded(usize),
    /// Every strategy was unavailable or failed
    Exhausted,
}

impl ConversionState {
    /// The state following a failed attempt at `index` out of `total`.
    fn after_failure(index: usize, total: usize) -> Self {
        if index + 1 < total {
            ConversionState::Attempting(index + 1)
        } else {
            ConversionState::Exhausted
        }
    }

    /// Leave `Idle` for a list of `total` strategies; other states are kept.
    fn start(self, total: usize) -> Self {
        match self {
            ConversionState::Idle if total == 0 => ConversionState::Exhausted,
            ConversionState::Idle => ConversionState::Attempting(0),
            other => other,
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionState::Idle => write!(f, "idle"),
            ConversionState::Attempting(i) => write!(f, "attempting #{}", i),
            ConversionState::Succeeded(i) => write!(f, "succeeded #{}", i),
            ConversionState::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// A document together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The reconstructed document
    pub document: Document,

    /// Name of the strategy that produced it
    pub strategy: String,

    /// Strategies skipped before it, in order
    pub attempts: Vec<AttemptRecord>,
}

/// Result of a conversion that wrote an output file.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Where the output was written
    pub output_path: PathBuf,

    /// Name of the strategy that produced the document
    pub strategy: String,

    /// Number of paragraphs written
    pub paragraph_count: usize,

    /// Strategies skipped before the successful one
    pub attempts: Vec<AttemptRecord>,
}

impl ConvertResult {
    /// Check if a fallback strategy was used.
    pub fn fell_back(&self) -> bool {
        !self.attempts.is_empty()
    }
}

/// Strategy-driven document converter.
///
/// Holds only immutable configuration, so one instance can serve concurrent
/// calls; callers pick distinct output paths.
pub struct Converter {
    strategies: Vec<Box<dyn Strategy>>,
    writer: Box<dyn DocumentWriter>,
}

impl Converter {
    /// Create a converter with no strategies.
    pub fn new(writer: impl DocumentWriter + 'static) -> Self {
        Self {
            strategies: Vec::new(),
            writer: Box::new(writer),
        }
    }

    /// Create the default converter: span extraction, then character
    /// extraction, then the external command (if configured), writing DOCX.
    pub fn with_defaults(options: ConvertOptions) -> Result<Self> {
        options.layout.validate()?;

        let writer = DocxWriter::new().with_native_list_style(options.native_list_style);
        let mut converter = Self::new(writer)
            .with_strategy(ExtractionStrategy::new(Arc::new(SpanSource::new()), &options.layout)?)
            .with_strategy(ExtractionStrategy::new(Arc::new(CharSource::new()), &options.layout)?);

        if let Some(command) = options.opaque_command {
            converter = converter.with_strategy(OpaqueStrategy::new(Arc::new(
                CommandConverter::new(command),
            )));
        }

        Ok(converter)
    }

    /// Append a strategy to the end of the list.
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Strategy names in priority order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The document writer.
    pub fn writer(&self) -> &dyn DocumentWriter {
        self.writer.as_ref()
    }

    /// Run the strategies and return the first document produced.
    ///
    /// Nothing is written. Fails with [`Error::StrategiesExhausted`] when no
    /// strategy succeeds.
    pub fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let total = self.strategies.len();
        let mut attempts = Vec::new();
        let mut state = ConversionState::Idle;
        log::debug!("Converting {} bytes with {} strategies ({})", data.len(), total, state);
        state = state.start(total);

        while let ConversionState::Attempting(index) = state {
            let strategy = &self.strategies[index];
            log::debug!("Trying strategy {} ({})", strategy.name(), state);

            match guarded_attempt(strategy.as_ref(), data) {
                StrategyOutcome::Success(document) => {
                    state = ConversionState::Succeeded(index);
                    log::info!(
                        "Strategy {} produced {} paragraphs ({})",
                        strategy.name(),
                        document.len(),
                        state
                    );
                    return Ok(Extraction {
                        document,
                        strategy: strategy.name().to_string(),
                        attempts,
                    });
                }
                StrategyOutcome::Unavailable(reason) => {
                    log::info!("Strategy {} unavailable: {}", strategy.name(), reason);
                    attempts.push(AttemptRecord {
                        strategy: strategy.name().to_string(),
                        failure: AttemptFailure::Unavailable(reason),
                    });
                }
                StrategyOutcome::Failed(reason) => {
                    log::warn!("Strategy {} failed: {}", strategy.name(), reason);
                    attempts.push(AttemptRecord {
                        strategy: strategy.name().to_string(),
                        failure: AttemptFailure::Failed(reason),
                    });
                }
            }

            state = ConversionState::after_failure(index, total);
        }

        log::warn!("All {} strategies failed ({})", total, state);
        Err(Error::StrategiesExhausted { attempts })
    }

    /// Convert `data` and write the result to `path`.
    ///
    /// On any error, nothing is left at `path`.
    pub fn convert_to_path(&self, data: &[u8], path: &Path) -> Result<ConvertResult> {
        self.convert_inner(data, path, None)
    }

    /// Convert `data` into `dir`, naming the output after `name`.
    ///
    /// The output is `<dir>/<stem>.<ext>`, where `stem` is the base name of
    /// `name` without its extension (`document` when there is none) and `ext`
    /// comes from the writer.
    pub fn convert_to_dir(&self, data: &[u8], name: &str, dir: &Path) -> Result<ConvertResult> {
        let file_name = output_file_name(name, self.writer.extension());
        let path = dir.join(&file_name);
        let title = file_stem(name);
        self.convert_inner(data, &path, Some(title))
    }

    fn convert_inner(&self, data: &[u8], path: &Path, title: Option<&str>) -> Result<ConvertResult> {
        let extraction = match self.extract(data) {
            Ok(extraction) => extraction,
            Err(e) => {
                remove_output(path);
                return Err(e);
            }
        };

        let Extraction {
            document,
            strategy,
            attempts,
        } = extraction;

        let document = match title {
            Some(title) if document.metadata().title.is_none() => {
                let (mut metadata, paragraphs) = document.into_parts();
                metadata.title = Some(title.to_string());
                Document::new(metadata, paragraphs)
            }
            _ => document,
        };

        if let Err(e) = self.writer.write(&document, path) {
            remove_output(path);
            return Err(match e {
                Error::WriteFailed { .. } => e,
                other => Error::WriteFailed {
                    path: path.to_path_buf(),
                    reason: other.to_string(),
                },
            });
        }

        log::info!("Wrote {} via {}", path.display(), strategy);

        Ok(ConvertResult {
            output_path: path.to_path_buf(),
            strategy,
            paragraph_count: document.len(),
            attempts,
        })
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("strategies", &self.strategy_names())
            .field("extension", &self.writer.extension())
            .finish()
    }
}

/// Output file name for an input called `name`: its stem plus `extension`.
pub fn output_file_name(name: &str, extension: &str) -> String {
    format!("{}.{}", file_stem(name), extension)
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(FALLBACK_STEM)
}

/// Run one attempt, reporting a panic inside it as a failure.
fn guarded_attempt(strategy: &dyn Strategy, data: &[u8]) -> StrategyOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| strategy.attempt(data))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown cause".to_string());
            StrategyOutcome::Failed(format!("panicked: {}", message))
        }
    }
}

/// Remove whatever sits at `path` after a fatal outcome.
fn remove_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
    }
}
