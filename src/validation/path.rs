//! Path validation functions

use std::path::{Path, PathBuf};

use super::ValidationError;

/// Check if path is within a root directory
///
/// Comparison is component-wise, so `/data/src2` is not within `/data/src`.
pub fn is_path_within_root(path: &Path, root: &Path) -> bool {
	path.starts_with(root)
}

/// Validate that neither root contains the other
///
/// # Arguments
/// * `source` - Source root
/// * `destination` - Destination root
///
/// # Returns
/// `Ok(())` if the trees are disjoint, `Err(ValidationError)` otherwise
pub fn validate_roots_disjoint(source: &Path, destination: &Path) -> Result<(), ValidationError> {
	if source.as_os_str().is_empty() || destination.as_os_str().is_empty() {
		return Err(ValidationError::PathError(
			"Source and destination directories are required".to_string(),
		));
	}
	if is_path_within_root(destination, source) || is_path_within_root(source, destination) {
		return Err(ValidationError::PathError(format!(
			"source directory {} and destination directory {} cannot contain each other",
			source.display(),
			destination.display()
		)));
	}
	Ok(())
}

/// Resolve both roots to absolute paths and check that they are disjoint
///
/// Nothing is read from the filesystem.
pub fn resolve_roots(
	source: &Path,
	destination: &Path,
) -> Result<(PathBuf, PathBuf), ValidationError> {
	validate_roots_disjoint(source, destination)?;
	let source = absolute(source)?;
	let destination = absolute(destination)?;
	validate_roots_disjoint(&source, &destination)?;
	Ok((source, destination))
}

/// Resolve both roots to absolute paths and check them
///
/// The source must exist and be a directory; the destination may be missing and is
/// then created by the first run. Returns the resolved `(source, destination)` pair.
pub fn validate_roots(
	source: &Path,
	destination: &Path,
) -> Result<(PathBuf, PathBuf), ValidationError> {
	let (source, destination) = resolve_roots(source, destination)?;

	if !source.is_dir() {
		return Err(ValidationError::PathError(format!(
			"source directory {} does not exist",
			source.display()
		)));
	}

	Ok((source, destination))
}

fn absolute(path: &Path) -> Result<PathBuf, ValidationError> {
	std::path::absolute(path).map_err(|e| {
		ValidationError::PathError(format!("Cannot resolve {}: {}", path.display(), e))
	})
}


// vim: ts=4
