//! Headless browser integration for Lumen.
//!
//! Provides Chromium sessions managed through the aggregator's shared
//! session service, and a contrast engine that measures computed styles on
//! rendered pages.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod contrast_engine;
#[allow(missing_docs)]
pub mod error;
pub mod session;

pub use contrast_engine::PageContrastEngine;
pub use error::{BrowserError, Result};
pub use session::{validate_url, BrowserSession, BrowserSessionFactory, SharedBrowser};
