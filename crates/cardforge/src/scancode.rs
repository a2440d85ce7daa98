//! QR code generation for the public link.
//!
//! Rendering runs on the tokio blocking pool. Every request is tagged with
//! a token; only the result carrying the most recently issued token is ever
//! applied, so a slow render for an old link can never overwrite the code
//! for a newer one.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeOptions {
    /// Minimum width and height of the image in pixels.
    pub size_px: u32,
    /// Whether to keep the white border around the code.
    pub quiet_zone: bool,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            size_px: 256,
            quiet_zone: true,
        }
    }
}

/// Render `payload` as a PNG-encoded QR code.
///
/// # Errors
///
/// Returns [`Error::CodeGeneration`] if the payload does not fit in a QR
/// code or the image cannot be encoded.
pub fn render_png(payload: &str, options: CodeOptions) -> Result<Vec<u8>> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| Error::code_generation(e.to_string()))?;
    let pixels = code
        .render::<Luma<u8>>()
        .min_dimensions(options.size_px, options.size_px)
        .quiet_zone(options.quiet_zone)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(pixels)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| Error::code_generation(e.to_string()))?;
    Ok(png)
}

/// A finished code for a specific link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCode {
    /// The encoded link.
    pub url: String,
    /// PNG bytes.
    pub png: Vec<u8>,
}

/// What the code area should show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CodeState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A render is in flight.
    Pending {
        /// Link being rendered.
        url: String,
    },
    /// The latest render succeeded.
    Ready(ScanCode),
    /// The latest render failed.
    Failed {
        /// Link that failed to render.
        url: String,
        /// Error text shown to the user.
        message: String,
    },
}

impl CodeState {
    /// The link this state refers to, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending { url } | Self::Failed { url, .. } => Some(url),
            Self::Ready(code) => Some(&code.url),
        }
    }

    /// Whether a render is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

#[derive(Debug)]
struct Rendered {
    token: u64,
    url: String,
    outcome: std::result::Result<Vec<u8>, String>,
}

/// Issues render requests and keeps only the newest result.
#[derive(Debug)]
pub struct CodeGenerator {
    options: CodeOptions,
    latest: u64,
    state: CodeState,
    inflight: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Rendered>,
    rx: mpsc::UnboundedReceiver<Rendered>,
}

impl CodeGenerator {
    /// Create a generator with the given rendering options.
    #[must_use]
    pub fn new(options: CodeOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            options,
            latest: 0,
            state: CodeState::Idle,
            inflight: None,
            tx,
            rx,
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &CodeState {
        &self.state
    }

    /// Start rendering `url`, superseding any earlier request.
    ///
    /// Inside a tokio runtime the render runs on the blocking pool and its
    /// result is picked up by [`CodeGenerator::poll`] or
    /// [`CodeGenerator::settle`]. Without a runtime it renders inline.
    pub fn request(&mut self, url: &str) -> u64 {
        self.latest += 1;
        let token = self.latest;

        if let Some(previous) = self.inflight.take() {
            trace!(token, "Aborting superseded render");
            previous.abort();
        }

        debug!(token, url = %url, "Requesting scan code");
        self.state = CodeState::Pending {
            url: url.to_string(),
        };

        let tx = self.tx.clone();
        let options = self.options;
        let url = url.to_string();
        let job = move || {
            // The encoder panics on some inputs; a panic must still resolve
            // the request, or `settle` would wait forever.
            let outcome = std::panic::catch_unwind(|| render_png(&url, options))
                .unwrap_or_else(|_| Err(Error::code_generation("QR encoder panicked")))
                .map_err(|e| e.to_string());
            // The receiver lives as long as the generator.
            let _ = tx.send(Rendered {
                token,
                url,
                outcome,
            });
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.inflight = Some(handle.spawn_blocking(job)),
            Err(_) => {
                job();
                self.poll();
            }
        }
        token
    }

    /// Apply every result that has already arrived.
    pub fn poll(&mut self) {
        while let Ok(rendered) = self.rx.try_recv() {
            self.apply(rendered);
        }
    }

    /// Wait until the latest request has resolved.
    pub async fn settle(&mut self) {
        self.poll();
        while self.state.is_pending() {
            match self.rx.recv().await {
                Some(rendered) => self.apply(rendered),
                None => break,
            }
        }
    }

    fn apply(&mut self, rendered: Rendered) {
        if rendered.token != self.latest {
            debug!(
                token = rendered.token,
                latest = self.latest,
                "Dropping stale scan code"
            );
            return;
        }
        self.inflight = None;
        self.state = match rendered.outcome {
            Ok(png) => CodeState::Ready(ScanCode {
                url: rendered.url,
                png,
            }),
            Err(message) => {
                warn!(error = %message, "Scan code generation failed");
                CodeState::Failed {
                    url: rendered.url,
                    message,
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_render_png_produces_png() {
        let png = render_png("http://localhost:5173/u/acme", CodeOptions::default()).unwrap();
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn test_render_respects_min_size() {
        let options = CodeOptions {
            size_px: 300,
            quiet_zone: false,
        };
        let png = render_png("http://localhost:5173/u/acme", options).unwrap();
        let img = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert!(img.width() >= 300);
        assert!(img.height() >= 300);
    }

    #[test]
    fn test_render_rejects_oversized_payload() {
        let payload = "x".repeat(8000);
        let err = render_png(&payload, CodeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::CodeGeneration(_)));
    }

    #[test]
    fn test_request_without_runtime_renders_inline() {
        let mut generator = CodeGenerator::new(CodeOptions::default());
        assert_eq!(generator.state(), &CodeState::Idle);

        let token = generator.request("http://localhost:5173/u/acme");
        assert_eq!(token, 1);
        let CodeState::Ready(code) = generator.state() else {
            panic!("expected ready state, got {:?}", generator.state());
        };
        assert_eq!(code.url, "http://localhost:5173/u/acme");
    }

    #[test]
    fn test_failed_render_is_visible() {
        let mut generator = CodeGenerator::new(CodeOptions::default());
        let payload = "x".repeat(8000);
        generator.request(&payload);

        let CodeState::Failed { url, message } = generator.state() else {
            panic!("expected failed state, got {:?}", generator.state());
        };
        assert_eq!(url, &payload);
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_request_in_runtime_settles() {
        let mut generator = CodeGenerator::new(CodeOptions::default());
        generator.request("http://localhost:5173/u/one");
        assert!(generator.state().is_pending());

        generator.settle().await;
        assert!(matches!(generator.state(), CodeState::Ready(_)));
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let mut generator = CodeGenerator::new(CodeOptions::default());
        assert_eq!(generator.request("http://localhost:5173/u/first"), 1);
        assert_eq!(generator.request("http://localhost:5173/u/second"), 2);
        generator.settle().await;

        assert_eq!(
            generator.state().url(),
            Some("http://localhost:5173/u/second")
        );
    }

    #[tokio::test]
    async fn test_encoder_panic_settles_as_failed() {
        // An absurd edge length overflows inside the encoder.
        let mut generator = CodeGenerator::new(CodeOptions {
            size_px: u32::MAX,
            quiet_zone: true,
        });
        generator.request("http://localhost:5173/u/acme");

        tokio::time::timeout(std::time::Duration::from_secs(20), generator.settle())
            .await
            .expect("settle must return once the render fails");
        assert!(matches!(generator.state(), CodeState::Failed { .. }));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut generator = CodeGenerator::new(CodeOptions::default());
        generator.request("http://localhost:5173/u/new");
        let current = generator.state().clone();

        // A result for an older token arriving late must be ignored.
        generator.apply(Rendered {
            token: 0,
            url: "http://localhost:5173/u/old".to_string(),
            outcome: Ok(vec![0]),
        });
        assert_eq!(generator.state(), &current);
    }

    #[test]
    fn test_code_state_url() {
        assert_eq!(CodeState::Idle.url(), None);
        let pending = CodeState::Pending {
            url: "a".to_string(),
        };
        assert_eq!(pending.url(), Some("a"));
        assert!(pending.is_pending());
    }
}
