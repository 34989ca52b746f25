//! Soundboard CLI Library
//!
//! Headless host for the soundboard panel: an in-memory document store, a
//! simulated audio host that ends sounds after their probed duration, and a
//! console rendition of the panel view.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod error;
pub mod host;
pub mod view;

pub use config::{AppConfig, StorageSettings};
pub use error::{CliError, Result};
pub use host::HostSimulator;
pub use view::ConsoleView;
