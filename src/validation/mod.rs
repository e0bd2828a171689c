//! Checks performed by callers before a configuration reaches the engine
//!
//! - Root validation (existence, absolute form, no nesting)
//! - Filter validation (include/exclude exclusivity, deletion exclusions)

use std::error::Error;
use std::fmt;

pub mod config;
pub mod path;

pub use config::*;
pub use path::*;

/// Generic validation error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
	/// Invalid configuration
	ConfigError(String),
	/// Invalid path
	PathError(String),
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValidationError::ConfigError(msg) => write!(f, "Config validation error: {}", msg),
			ValidationError::PathError(msg) => write!(f, "Path validation error: {}", msg),
		}
	}
}

impl Error for ValidationError {}


// vim: ts=4
