//! The dashboard: share link, scan code, download and copy actions.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::clipboard::ClipboardSink;
use crate::error::{Error, Result};
use crate::profile::ProfileRecord;
use crate::scancode::{CodeGenerator, CodeOptions, CodeState};

/// File name used for downloads when the slug is empty.
pub const FALLBACK_CODE_FILE: &str = "card-qr.png";

/// Canonical public link for a slug.
#[must_use]
pub fn public_url(base_url: &str, slug: &str) -> String {
    format!("{}/u/{slug}", base_url.trim_end_matches('/'))
}

/// Download file name for a slug's scan code.
#[must_use]
pub fn code_file_name(slug: &str) -> String {
    if slug.is_empty() {
        FALLBACK_CODE_FILE.to_string()
    } else {
        format!("{slug}-qr.png")
    }
}

/// Dashboard state derived from the record.
#[derive(Debug)]
pub struct Dashboard {
    base_url: String,
    codes: CodeGenerator,
}

impl Dashboard {
    /// Create a dashboard for links under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, options: CodeOptions) -> Self {
        Self {
            base_url: base_url.into(),
            codes: CodeGenerator::new(options),
        }
    }

    /// The public link for the record.
    #[must_use]
    pub fn url(&self, record: &ProfileRecord) -> String {
        public_url(&self.base_url, &record.slug)
    }

    /// State of the scan code area.
    #[must_use]
    pub fn code(&self) -> &CodeState {
        self.codes.state()
    }

    /// Request a new code if the link changed since the last request.
    ///
    /// Returns whether a request was issued.
    pub fn refresh(&mut self, record: &ProfileRecord) -> bool {
        self.codes.poll();
        let url = self.url(record);
        if self.codes.state().url() == Some(url.as_str()) {
            return false;
        }
        self.codes.request(&url);
        true
    }

    /// Re-issue the request for the current link, even if unchanged.
    pub fn retry(&mut self, record: &ProfileRecord) {
        let url = self.url(record);
        info!(url = %url, "Retrying scan code generation");
        self.codes.request(&url);
    }

    /// Wait for the in-flight render, if any.
    pub async fn settle(&mut self) {
        self.codes.settle().await;
    }

    /// Write the scan code as a PNG into `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CodeNotReady`] while no finished code for the current
    /// link exists, [`Error::CodeGeneration`] with the renderer's message if
    /// the code for the current link failed, or an I/O error if the file
    /// cannot be written.
    pub fn download(&mut self, record: &ProfileRecord, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(code_file_name(&record.slug));
        self.download_to(record, &path)?;
        Ok(path)
    }

    /// Write the scan code as a PNG to an explicit path.
    ///
    /// # Errors
    ///
    /// Same as [`Dashboard::download`].
    pub fn download_to(&mut self, record: &ProfileRecord, path: &Path) -> Result<()> {
        self.codes.poll();
        let url = self.url(record);
        let png = match self.codes.state() {
            CodeState::Ready(code) if code.url == url => &code.png,
            CodeState::Failed { url: failed, message } if *failed == url => {
                return Err(Error::code_generation(message.clone()));
            }
            _ => return Err(Error::CodeNotReady),
        };
        std::fs::write(path, png)?;
        info!(path = %path.display(), "Scan code saved");
        Ok(())
    }

    /// Copy the public link to `clipboard`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    pub fn copy_url(
        &self,
        record: &ProfileRecord,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<String> {
        let url = self.url(record);
        clipboard.set_text(&url)?;
        debug!(url = %url, "Public link copied");
        Ok(url)
    }
}
