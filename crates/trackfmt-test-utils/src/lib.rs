#![deny(unsafe_code)]

//! Shared test utilities for the trackfmt workspace.
//!
//! Provides reusable metadata fixtures, config builders, and tracing
//! helpers so that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! trackfmt-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod fixtures;
pub mod tracing_setup;
