//! Clipboard access for the "copy link" action.

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::debug;

use crate::error::{Error, Result};

/// Something text can be copied into.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard is unavailable.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The system clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let ctx = ClipboardContext::new().map_err(|e| Error::clipboard(e.to_string()))?;
        ctx.set_text(text.to_string())
            .map_err(|e| Error::clipboard(e.to_string()))?;
        debug!(len = text.len(), "Copied text to system clipboard");
        Ok(())
    }
}

/// An in-process clipboard, for headless use and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// What was last copied.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
