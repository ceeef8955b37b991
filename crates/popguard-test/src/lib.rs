//! Popguard Test - Shared test utilities for the popguard engine.
//!
//! This crate provides a controllable clock, a recording host and element
//! and event fixtures that can be used across popguard crates as a
//! dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! popguard-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use popguard_test::prelude::*;
//!
//! #[test]
//! fn test_popup_after_click() {
//!     let clock = ManualClock::shared(1_000);
//!     let mut host = RecordingHost::new();
//!     let mut engine = test_engine(insecure_policy(100), "http://x.com/p", &clock);
//!
//!     engine.on_event(click(link("/next")));
//!     clock.advance(10);
//!
//!     assert!(engine.open_window("/popup", None, &mut host).proceeded());
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
