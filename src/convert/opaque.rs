//! Whole-document fallback through an external converter.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::postprocess::PostProcessPass;
use super::{Strategy, StrategyOutcome};
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, ParagraphStyle};

/// A converter that turns the whole document into paragraphs in one step,
/// with no access to layout.
pub trait OpaqueConverter: Send + Sync {
    /// Short name used in logs and attempt records.
    fn name(&self) -> &str;

    /// Convert the document.
    ///
    /// Returns [`Error::CapabilityUnavailable`] when the converter cannot run.
    fn convert(&self, data: &[u8]) -> Result<Document>;
}

/// An external program invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments; the document arrives on stdin
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Default for CommandSpec {
    /// `pdftotext -enc UTF-8 - -`: PDF on stdin, text on stdout.
    fn default() -> Self {
        Self::new("pdftotext").with_args(["-enc", "UTF-8", "-", "-"])
    }
}

/// Runs an external program that reads the document on stdin and writes
/// plain text on stdout.
///
/// Every non-blank output line becomes a paragraph; form feeds separate
/// pages.
#[derive(Debug, Clone, Default)]
pub struct CommandConverter {
    spec: CommandSpec,
}

impl CommandConverter {
    /// Create a converter for the given command.
    pub fn new(spec: CommandSpec) -> Self {
        Self { spec }
    }

    /// The command this converter runs.
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    fn run(&self, data: &[u8]) -> Result<Vec<u8>> {
        let program = &self.spec.program;
        let mut child = Command::new(program)
            .args(&self.spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::CapabilityUnavailable(format!("{} not found", program)),
                _ => Error::CapabilityUnavailable(format!("cannot run {}: {}", program, e)),
            })?;

        let stdin = child.stdin.take();
        let (output, fed) = std::thread::scope(|scope| {
            // Feed stdin while stdout drains so neither pipe fills up.
            let feeder = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(data),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (output, fed)
        });

        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ExtractionFailed(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        // Programs may exit without draining stdin.
        if let Err(e) = fed {
            if e.kind() != ErrorKind::BrokenPipe {
                return Err(Error::ExtractionFailed(format!(
                    "writing to {} failed: {}",
                    program, e
                )));
            }
        }

        Ok(output.stdout)
    }
}

impl OpaqueConverter for CommandConverter {
    fn name(&self) -> &str {
        &self.spec.program
    }

    fn convert(&self, data: &[u8]) -> Result<Document> {
        let stdout = self.run(data)?;
        let text = String::from_utf8_lossy(&stdout);

        let pages = text.split('\x0C').filter(|page| !page.trim().is_empty());
        let mut page_count = 0u32;
        let mut lines = Vec::new();
        for page in pages {
            page_count += 1;
            lines.extend(page.lines().map(|line| (line, ParagraphStyle::Normal)));
        }

        let metadata = Metadata {
            page_count,
            ..Default::default()
        };
        Ok(Document::from_texts(metadata, lines))
    }
}

/// Strategy wrapping an [`OpaqueConverter`]; its output always goes through
/// the [`PostProcessPass`].
pub struct OpaqueStrategy {
    converter: Arc<dyn OpaqueConverter>,
    pass: PostProcessPass,
}

impl OpaqueStrategy {
    /// Create a strategy for `converter`.
    pub fn new(converter: Arc<dyn OpaqueConverter>) -> Self {
        Self {
            converter,
            pass: PostProcessPass::new(),
        }
    }
}

impl Strategy for OpaqueStrategy {
    fn name(&self) -> &str {
        self.converter.name()
    }

    fn attempt(&self, data: &[u8]) -> StrategyOutcome {
        let result = self.converter.convert(data).map(|doc| self.pass.apply(doc));
        result.into()
    }
}

impl std::fmt::Debug for OpaqueStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpaqueStrategy")
            .field("converter", &self.converter.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static [(&'static str, ParagraphStyle)]);

    impl OpaqueConverter for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        fn convert(&self, _data: &[u8]) -> Result<Document> {
            Ok(Document::from_texts(Metadata::default(), self.0.iter().copied()))
        }
    }

    #[test]
    fn test_default_command() {
        let spec = CommandSpec::default();
        assert_eq!(spec.program, "pdftotext");
        assert_eq!(spec.args, vec!["-enc", "UTF-8", "-", "-"]);
    }

    #[test]
    fn test_command_spec_from_json() {
        let spec: CommandSpec = serde_json::from_str(r#"{"program": "mutool"}"#).unwrap();
        assert_eq!(spec, CommandSpec::new("mutool"));
    }

    #[test]
    fn test_strategy_post_processes() {
        let strategy = OpaqueStrategy::new(Arc::new(Canned(&[
            ("Heading", ParagraphStyle::Normal),
            ("\u{F0B7}Task one", ParagraphStyle::Normal),
        ])));
        let StrategyOutcome::Success(doc) = strategy.attempt(b"") else {
            panic!("expected success");
        };
        assert_eq!(doc.paragraphs()[1].text(), "Task one");
        assert!(doc.paragraphs()[1].is_list_item());
        assert!(!doc.paragraphs()[0].is_list_item());
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let converter = CommandConverter::new(CommandSpec::new("pdfdocx-no-such-program"));
        assert!(matches!(
            converter.convert(b"%PDF-1.4"),
            Err(Error::CapabilityUnavailable(_))
        ));
        let strategy = OpaqueStrategy::new(Arc::new(converter));
        assert!(matches!(
            strategy.attempt(b"%PDF-1.4"),
            StrategyOutcome::Unavailable(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_lines_become_paragraphs() {
        let converter = CommandConverter::new(CommandSpec::new("cat"));
        let doc = converter
            .convert("Intro\n\n\u{F0B7} Task one\n\x0CSecond page\n".as_bytes())
            .unwrap();
        assert_eq!(doc.metadata().page_count, 2);
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.paragraphs()[1].text(), "\u{F0B7} Task one");
        assert_eq!(doc.paragraphs()[2].text(), "Second page");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_failure() {
        let converter = CommandConverter::new(CommandSpec::new("sh").with_args(["-c", "exit 3"]));
        assert!(matches!(
            converter.convert(b"data"),
            Err(Error::ExtractionFailed(_))
        ));
    }
}
