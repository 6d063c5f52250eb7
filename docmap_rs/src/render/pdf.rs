//! PDF hand-off.
//!
//! The engine only produces one markdown string; turning it into a PDF is
//! delegated to a [`PdfRenderer`]. When that fails the markdown is written
//! next to the requested path instead.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::RenderError;

pub trait PdfRenderer {
    /// Render `markdown` into a PDF at `output`.
    fn render_pdf(&self, markdown: &str, output: &Path) -> Result<(), RenderError>;
}

/// Pipes the markdown into `pandoc` on stdin.
#[derive(Clone, Debug)]
pub struct PandocRenderer {
    pub program: String,
    pub extra_args: Vec<String>,
}

impl Default for PandocRenderer {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl PdfRenderer for PandocRenderer {
    fn render_pdf(&self, markdown: &str, output: &Path) -> Result<(), RenderError> {
        let mut child = Command::new(&self.program)
            .args(["--from", "markdown", "--output"])
            .arg(output)
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Pdf(format!("cannot start {}: {e}", self.program)))?;

        // stdin is fed from its own thread while stderr is drained here.
        let writer = child.stdin.take().map(|mut stdin| {
            let markdown = markdown.to_owned();
            thread::spawn(move || stdin.write_all(markdown.as_bytes()))
        });
        let result = child
            .wait_with_output()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let written = writer.map(|handle| handle.join());

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::Pdf(format!(
                "{} exited with {}: {}",
                self.program,
                result.status,
                stderr.trim()
            )));
        }
        match written {
            Some(Ok(Err(e))) => {
                return Err(RenderError::Pdf(format!("cannot write to {}: {e}", self.program)));
            }
            Some(Err(_)) => {
                return Err(RenderError::Pdf(format!("stdin writer for {} panicked", self.program)));
            }
            Some(Ok(Ok(()))) | None => {}
        }
        debug!(output = %output.display(), "pdf written");
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PdfOutcome {
    Pdf(PathBuf),
    /// The renderer failed; the markdown went to `path`.
    MarkdownFallback { path: PathBuf, reason: String },
}

/// Hand `markdown` to `renderer`. A renderer failure writes the markdown to
/// `output` with an `.md` extension and reports why; only failing to write
/// that fallback is an error.
pub fn write_pdf<R: PdfRenderer + ?Sized>(
    markdown: &str,
    output: &Path,
    renderer: &R,
) -> Result<PdfOutcome, RenderError> {
    match renderer.render_pdf(markdown, output) {
        Ok(()) => Ok(PdfOutcome::Pdf(output.to_path_buf())),
        Err(err) => {
            let fallback = output.with_extension("md");
            warn!(error = %err, fallback = %fallback.display(), "pdf rendering failed, writing markdown");
            std::fs::write(&fallback, markdown).map_err(|source| RenderError::Io {
                path: fallback.clone(),
                source,
            })?;
            Ok(PdfOutcome::MarkdownFallback {
                path: fallback,
                reason: err.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Failing;

    impl PdfRenderer for Failing {
        fn render_pdf(&self, _markdown: &str, _output: &Path) -> Result<(), RenderError> {
            Err(RenderError::Pdf("no renderer".into()))
        }
    }

    struct Copying;

    impl PdfRenderer for Copying {
        fn render_pdf(&self, markdown: &str, output: &Path) -> Result<(), RenderError> {
            std::fs::write(output, markdown).map_err(|source| RenderError::Io {
                path: output.to_path_buf(),
                source,
            })
        }
    }

    #[test]
    fn renderer_receives_the_whole_document() {
        let tmp = TempDir::new().expect("tmp");
        let output = tmp.path().join("docs.pdf");
        let outcome = write_pdf("# Doc\n\n## A\n", &output, &Copying).expect("pdf");
        assert_eq!(outcome, PdfOutcome::Pdf(output.clone()));
        assert_eq!(std::fs::read_to_string(&output).expect("read"), "# Doc\n\n## A\n");
    }

    #[test]
    fn failure_falls_back_to_markdown() {
        let tmp = TempDir::new().expect("tmp");
        let output = tmp.path().join("docs.pdf");
        let outcome = write_pdf("# Doc\n", &output, &Failing).expect("fallback");
        let md = tmp.path().join("docs.md");
        match outcome {
            PdfOutcome::MarkdownFallback { path, reason } => {
                assert_eq!(path, md);
                assert!(reason.contains("no renderer"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(md).expect("read"), "# Doc\n");
        assert!(!output.exists());
    }

    #[test]
    fn missing_program_is_a_pdf_error() {
        let tmp = TempDir::new().expect("tmp");
        let renderer = PandocRenderer {
            program: "docmap-no-such-pdf-tool".into(),
            extra_args: Vec::new(),
        };
        let err = renderer
            .render_pdf("# x\n", &tmp.path().join("x.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Pdf(_)));
    }

    #[cfg(unix)]
    #[test]
    fn large_input_to_a_failing_tool_reports_its_exit() {
        // `cat` rejects the pandoc flags, exits early and never drains stdin.
        let tmp = TempDir::new().expect("tmp");
        let renderer = PandocRenderer {
            program: "cat".into(),
            extra_args: Vec::new(),
        };
        let markdown = "## Section\n".repeat(200_000);
        let err = renderer
            .render_pdf(&markdown, &tmp.path().join("x.pdf"))
            .unwrap_err();
        match err {
            RenderError::Pdf(message) => assert!(message.starts_with("cat exited with"), "{message}"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
