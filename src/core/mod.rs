//! Core types and error handling for MCM.
//!
//! - [`Fork`] / [`ForkTag`] - the server distributions MCM can install and
//!   the tag form stored in the registry
//! - [`McmError`], [`ErrorContext`], [`user_friendly_error`] - the CLI-facing
//!   error layer

pub mod error;
mod fork;

pub use error::{ErrorContext, McmError, user_friendly_error};
pub use fork::{Fork, ForkTag};
