//! Popguard Telemetry - logging setup for the popguard tools.
//!
//! This crate provides:
//! - A [`LogConfig`] builder with several output formats
//! - Stdout, stderr, or daily-rotated file output
//! - A single [`setup_logging`] entry point wiring `tracing-subscriber`
//!
//! # Example
//!
//! ```rust,no_run
//! use popguard_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), popguard_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("popguard_core=debug");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
