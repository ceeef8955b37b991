//! Prelude module - commonly used types for convenient import.
//!
//! Use `use popguard_test::prelude::*;` to import the test utilities
//! together with the engine's own prelude.

pub use crate::fixtures::*;
pub use crate::harness::*;
pub use crate::mocks::*;

pub use popguard_core::prelude::*;
