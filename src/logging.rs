//! Logging prelude module for convenient access to tracing macros.
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Copying {}", path.display());
//! warn!("Synchronisation stopped early");
//! ```
//!
//! Diagnostics go to stderr. The result log printed on stdout is separate and is
//! never routed through tracing.

pub use tracing::{debug, error, info, warn};

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level
///
/// `quiet` wins over any verbosity. Each `-v` raises the level by one step from the
/// default of `warn`.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
	if quiet {
		return "error";
	}
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

/// Initialize the tracing subscriber with environment filter support.
///
/// The `RUST_LOG` environment variable takes precedence over the verbosity flags:
///
/// ```bash
/// RUST_LOG=debug treesync src dst
/// RUST_LOG=treesync::delete=debug treesync -d src dst
/// ```
pub fn init_tracing(verbosity: u8, quiet: bool) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(level_for(verbosity, quiet)));

	// A second initialisation (e.g. from tests) keeps the first subscriber
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_verbosity_levels() {
		assert_eq!(level_for(0, false), "warn");
		assert_eq!(level_for(1, false), "info");
		assert_eq!(level_for(2, false), "debug");
		assert_eq!(level_for(7, false), "trace");
	}

	#[test]
	fn test_quiet_overrides_verbosity() {
		assert_eq!(level_for(3, true), "error");
	}
}

// vim: ts=4
