use crate::types::*;
use pdf_paginate::constants::CHROME_VIRTUAL_TIME_BUDGET_MS;
use pdf_paginate::{AnyRenderer, ChromeRenderer, LayoutConfig, TextRenderer};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Publish configuration, as written in config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PublishConfig {
    pub layout: LayoutConfig,
    pub renderer: RendererConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chromium printing to PDF
    #[default]
    Chrome,
    /// Built-in monospace pager
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    /// Chromium executable, looked up on `PATH` when not absolute
    pub chrome_path: PathBuf,
    /// Extra command-line arguments for Chromium
    pub args: Vec<String>,
    /// Time Chromium lets the page settle before printing; `null` prints as
    /// soon as the document has loaded
    pub virtual_time_budget_ms: Option<u64>,
    /// Upper bound for each render pass
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the version file and the published PDFs
    pub root: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Chrome,
            chrome_path: PathBuf::from("chromium"),
            args: Vec::new(),
            virtual_time_budget_ms: Some(CHROME_VIRTUAL_TIME_BUDGET_MS),
            timeout_secs: 120,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("manual-store"),
        }
    }
}

impl PublishConfig {
    /// Load configuration from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&bytes)
            .map_err(|e| PublishError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        if self.renderer.timeout_secs == 0 {
            return Err(PublishError::Config(
                "renderer.timeout_secs must be positive".to_string(),
            ));
        }
        if self.store.root.as_os_str().is_empty() {
            return Err(PublishError::Config("store.root must be set".to_string()));
        }
        Ok(())
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn build(&self) -> AnyRenderer {
        match self.kind {
            RendererKind::Chrome => {
                let mut chrome =
                    ChromeRenderer::new(&self.chrome_path).with_args(self.args.iter().cloned());
                if let Some(ms) = self.virtual_time_budget_ms {
                    chrome = chrome.with_virtual_time_budget(Duration::from_millis(ms));
                }
                AnyRenderer::Chrome(chrome)
            }
            RendererKind::Text => AnyRenderer::Text(TextRenderer::default()),
        }
    }
}
