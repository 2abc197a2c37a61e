//! Domain model for ramtrace
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Step attribution for every failure in the extraction pipeline
//! - Structured error handling

pub mod errors;
pub mod types;

pub use types::{Stage, VirtAddr};

pub use errors::{ExtractError, ResolveError};
