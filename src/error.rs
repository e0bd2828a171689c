//! Error types for treesync operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::exclusion::ExclusionError;
use crate::validation::ValidationError;

/// A filesystem operation that failed during a run
///
/// These never escape the engine: each one is turned into an `Error:` trace result
/// and stops the branch of the walk that hit it.
#[derive(Debug)]
pub enum SyncError {
	/// Destination directory could not be created
	CreateDirectory { path: PathBuf, source: io::Error },

	/// Source file could not be copied over the destination
	CopyFile { from: PathBuf, to: PathBuf, source: io::Error },

	/// Destination-only file could not be removed
	DeleteFile { path: PathBuf, source: io::Error },

	/// Destination-only directory tree could not be removed
	DeleteDirectory { path: PathBuf, source: io::Error },

	/// Files of a directory could not be enumerated
	ListFiles { path: PathBuf, source: io::Error },

	/// Subdirectories of a directory could not be enumerated
	ListDirectories { path: PathBuf, source: io::Error },
}

impl SyncError {
	/// Text recorded in the result log for this failure
	pub fn trace_message(&self) -> String {
		format!("Error: {}", self)
	}
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::CreateDirectory { path, source } => {
				write!(f, "failed to create directory {}. {}", path.display(), source)
			}
			SyncError::CopyFile { from, to, source } => {
				write!(
					f,
					"failed to copy file from {} to {}. {}",
					from.display(),
					to.display(),
					source
				)
			}
			SyncError::DeleteFile { path, source } => {
				write!(f, "failed to delete file from {}. {}", path.display(), source)
			}
			SyncError::DeleteDirectory { path, source } => {
				write!(f, "failed to delete directory {}. {}", path.display(), source)
			}
			SyncError::ListFiles { path, source } => {
				write!(f, "failed to get files for directory {}. {}", path.display(), source)
			}
			SyncError::ListDirectories { path, source } => {
				write!(f, "failed to get sub-directories for directory {}. {}", path.display(), source)
			}
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::CreateDirectory { source, .. }
			| SyncError::CopyFile { source, .. }
			| SyncError::DeleteFile { source, .. }
			| SyncError::DeleteDirectory { source, .. }
			| SyncError::ListFiles { source, .. }
			| SyncError::ListDirectories { source, .. } => Some(source),
		}
	}
}

/// Errors raised while loading or compiling a job description
#[derive(Debug)]
pub enum JobError {
	/// Job file could not be read
	Read { path: PathBuf, source: io::Error },

	/// Job file could not be parsed
	Parse { path: PathBuf, message: String },

	/// Job file has an extension we do not know how to read
	UnsupportedFormat { path: PathBuf },

	/// A filter pattern failed to compile
	Pattern(ExclusionError),

	/// The resulting configuration is not acceptable
	Invalid(ValidationError),
}

impl fmt::Display for JobError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			JobError::Read { path, source } => {
				write!(f, "Cannot read job file {}: {}", path.display(), source)
			}
			JobError::Parse { path, message } => {
				write!(f, "Cannot parse job file {}: {}", path.display(), message)
			}
			JobError::UnsupportedFormat { path } => {
				write!(
					f,
					"Unsupported job file format: {} (expected .toml, .json or .json5)",
					path.display()
				)
			}
			JobError::Pattern(e) => write!(f, "{}", e),
			JobError::Invalid(e) => write!(f, "{}", e),
		}
	}
}

impl Error for JobError {}

impl From<ExclusionError> for JobError {
	fn from(e: ExclusionError) -> Self {
		JobError::Pattern(e)
	}
}

impl From<ValidationError> for JobError {
	fn from(e: ValidationError) -> Self {
		JobError::Invalid(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_trace_message_wording() {
		let err = SyncError::CreateDirectory {
			path: PathBuf::from("/dst/sub"),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
		};
		assert_eq!(err.trace_message(), "Error: failed to create directory /dst/sub. denied");
	}

	#[test]
	fn test_copy_error_mentions_both_paths() {
		let err = SyncError::CopyFile {
			from: PathBuf::from("/src/a"),
			to: PathBuf::from("/dst/a"),
			source: io::Error::new(io::ErrorKind::Other, "disk full"),
		};
		let msg = err.to_string();
		assert!(msg.contains("/src/a"));
		assert!(msg.contains("/dst/a"));
		assert!(err.source().is_some());
	}
}

// vim: ts=4
