//! Shared configuration, locale, and error handling for Practica
//!
//! This crate provides common functionality used across the Practica workspace:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Locale selection for user-facing text
//! - State machine errors shared by the workflow domains

pub mod config;
pub mod error;
pub mod locale;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use locale::Locale;
pub use state::StateError;
