//! # fnhost common
//!
//! Shared error types, logging setup and small utilities for the fnhost
//! workspace.
//!
//! This crate provides the foundational pieces used by both the
//! configuration engine and the command line front end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{FnHostError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use utils::*;
