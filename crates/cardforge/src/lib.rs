//! `cardforge` - a local builder for digital business cards
//!
//! A guided wizard collects the card's details into a single
//! [`ProfileRecord`], which is kept in a local SQLite store. Once the record
//! is complete it can be shown as a public card, shared by link, and
//! exported as a scannable code.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod avatar;
pub mod card;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod profile;
pub mod render;
pub mod router;
pub mod scancode;
pub mod session;
pub mod settings;
pub mod store;
pub mod sync;
pub mod validate;
pub mod wizard;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use profile::{ProfileField, ProfileRecord};
pub use router::View;
pub use store::Store;
pub use validate::is_complete;
