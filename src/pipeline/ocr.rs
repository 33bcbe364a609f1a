//! Text recognition via the tesseract subprocess.
//!
//! ## Why a subprocess rather than bindings?
//!
//! Tesseract's C API is stateful and awkward to hold across await points;
//! the CLI gives the same recognition quality with process-level isolation —
//! a crashed recognition takes down one page, not the server. The pattern
//! (probe for the binary once, shell out per call, degrade on failure)
//! matches how this service treats every external engine.
//!
//! ## Degradation contract
//!
//! `recognize` never fails. Engine missing, subprocess error, non-zero exit,
//! or timeout all log and yield an empty string; callers cannot distinguish
//! "no text on the page" from "recognition failed".

use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::{error, info, warn};

use crate::error::PipelineError;

/// Handle to the external OCR engine.
///
/// Construct once at startup with [`OcrEngine::probe`] and share via
/// application state. The availability flag is captured at probe time and
/// reported by the health endpoint.
#[derive(Debug, Clone)]
pub struct OcrEngine {
    cmd: String,
    timeout: Duration,
    available: bool,
}

impl OcrEngine {
    /// Probe for the engine by running `<cmd> --version`.
    pub async fn probe(cmd: impl Into<String>, timeout_secs: u64) -> Self {
        let cmd = cmd.into();
        let available = match Command::new(&cmd).arg("--version").output().await {
            Ok(out) => out.status.success(),
            Err(e) => {
                warn!("OCR engine '{cmd}' not available: {e}");
                false
            }
        };
        if available {
            info!("OCR engine '{cmd}' available");
        }
        Self {
            cmd,
            timeout: Duration::from_secs(timeout_secs),
            available,
        }
    }

    /// An engine that is permanently unavailable. Used in tests and when
    /// running without OCR support.
    pub fn disabled() -> Self {
        Self {
            cmd: "tesseract".to_string(),
            timeout: Duration::from_secs(1),
            available: false,
        }
    }

    /// Whether the engine responded to the startup probe.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Recognise text in the image at `path`.
    ///
    /// Returns the engine's raw text output, or an empty string if the
    /// engine is unavailable, errors, or exceeds its time budget.
    pub async fn recognize(&self, path: &Path) -> String {
        if !self.available {
            return String::new();
        }
        match self.run(path).await {
            Ok(text) => text,
            Err(e) => {
                error!("OCR failed for '{}': {e}", path.display());
                String::new()
            }
        }
    }

    async fn run(&self, path: &Path) -> Result<String, PipelineError> {
        // `tesseract <image> stdout` prints recognised text to stdout.
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.cmd).arg(path).arg("stdout").output(),
        )
        .await
        .map_err(|_| PipelineError::OcrTimeout {
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| PipelineError::Ocr(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Ocr(format!(
                "exit {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_engine_yields_empty_text() {
        let engine = OcrEngine::disabled();
        assert!(!engine.available());
        let text = engine.recognize(Path::new("whatever.png")).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn probe_of_missing_binary_is_unavailable() {
        let engine = OcrEngine::probe("definitely-not-a-real-ocr-binary", 5).await;
        assert!(!engine.available());
        let text = engine.recognize(Path::new("whatever.png")).await;
        assert_eq!(text, "");
    }
}
