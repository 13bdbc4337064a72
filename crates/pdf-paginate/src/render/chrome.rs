//! Printing through a headless Chromium process

use super::{RenderedDocument, Renderer};
use crate::io::{extract_page_texts, load_pdf_bytes};
use crate::source::SourceDocument;
use crate::types::*;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Renders with `chrome --headless --print-to-pdf`.
///
/// Paper size and margins reach the browser as an `@page` rule injected into
/// the document head. The process is killed if the render future is dropped,
/// which is how the pagination driver's timeout takes effect.
///
/// With a virtual time budget set, Chromium runs the page's scripts, web fonts
/// and image loads until they settle or the budget runs out, and only then
/// prints.
#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    executable: PathBuf,
    extra_args: Vec<String>,
    virtual_time_budget: Option<Duration>,
}

impl Default for ChromeRenderer {
    fn default() -> Self {
        Self::new("chromium")
    }
}

impl ChromeRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
            virtual_time_budget: None,
        }
    }

    /// Let the page settle for up to `budget` of virtual time before printing
    pub fn with_virtual_time_budget(mut self, budget: Duration) -> Self {
        self.virtual_time_budget = Some(budget);
        self
    }

    pub fn virtual_time_budget(&self) -> Option<Duration> {
        self.virtual_time_budget
    }

    /// Additional command-line flags, e.g. `--no-sandbox` inside containers
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-pdf-header-footer".to_string(),
        ];
        if let Some(budget) = self.virtual_time_budget {
            args.push("--run-all-compositor-stages-before-draw".to_string());
            args.push(format!("--virtual-time-budget={}", budget.as_millis()));
        }
        args.push(format!("--print-to-pdf={}", output.display()));
        args.extend(self.extra_args.iter().cloned());
        args.push(format!("file://{}", input.display()));
        args
    }
}

impl Renderer for ChromeRenderer {
    async fn render(
        &self,
        source: &SourceDocument,
        geometry: &PageGeometry,
    ) -> Result<RenderedDocument> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("manual.html");
        let output = workdir.path().join("manual.pdf");

        tokio::fs::write(&input, source.with_page_rule(&geometry.page_rule())).await?;

        debug!(
            "Printing {} with {}",
            input.display(),
            self.executable.display()
        );
        let result = Command::new(&self.executable)
            .args(self.command_args(&input, &output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                PaginateError::Render(format!(
                    "Failed to start {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(PaginateError::Render(format!(
                "{} exited with {}: {}",
                self.executable.display(),
                result.status,
                stderr.trim()
            )));
        }

        let bytes = tokio::fs::read(&output).await.map_err(|e| {
            PaginateError::Render(format!("Browser produced no PDF: {}", e))
        })?;
        let document = load_pdf_bytes(bytes).await?;

        let (document, page_text) = tokio::task::spawn_blocking(move || {
            let texts = extract_page_texts(&document);
            (document, texts)
        })
        .await?;

        info!("Browser printed {} pages", page_text.len());
        Ok(RenderedDocument {
            document,
            page_text,
        })
    }
}
