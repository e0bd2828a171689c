//! File comparison and copying
//!
//! Two files are considered the same when their modification times and lengths are
//! equal. File contents are never read for comparison.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use super::listing::Entry;
use super::{display_name, Recorder};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::logging::*;
use crate::metadata_utils;
use crate::results::{ItemKind, Reason, Side};

/// The attributes that decide whether two files match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
	pub modified: Option<SystemTime>,
	pub len: u64,
}

impl FileIdentity {
	pub fn from_metadata(metadata: &Metadata) -> Self {
		FileIdentity { modified: metadata.modified().ok(), len: metadata.len() }
	}
}

/// Outcome of comparing a source file with its destination counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
	/// No destination file with that name
	OnlyInSource,
	ModifiedTimeDiffers,
	/// Same modification time, different length
	LengthDiffers,
	Identical,
}

impl Comparison {
	/// Whether the destination can be left alone
	pub fn is_match(self) -> bool {
		self == Comparison::Identical
	}

	pub fn reason(self) -> Reason {
		match self {
			Comparison::OnlyInSource => Reason::OnlyIn,
			Comparison::ModifiedTimeDiffers => Reason::ModifiedTime,
			Comparison::LengthDiffers => Reason::Length,
			Comparison::Identical => Reason::Identical,
		}
	}

	pub fn side(self) -> Side {
		match self {
			Comparison::OnlyInSource => Side::Source,
			_ => Side::NotApplicable,
		}
	}
}

/// Classify a source file against an optional destination file
///
/// Checks are made in order: presence, modification time, length.
pub fn classify(source: &FileIdentity, dest: Option<&FileIdentity>) -> Comparison {
	match dest {
		None => Comparison::OnlyInSource,
		Some(dest) if dest.modified != source.modified => Comparison::ModifiedTimeDiffers,
		Some(dest) if dest.len != source.len => Comparison::LengthDiffers,
		Some(_) => Comparison::Identical,
	}
}

/// Compare one source file with the destination directory and copy it if needed
///
/// Exactly one result is recorded for the file, except that identical files are left
/// out of the log when `exclude_identical_files` is set. Returns `false` if the copy
/// failed.
pub(crate) fn synchronise_file(
	config: &SyncConfig,
	recorder: &mut Recorder<'_>,
	source: &Entry,
	dest_dir: &Path,
	dest_files: &HashMap<&OsStr, &Entry>,
) -> bool {
	let stale = dest_files.get(source.name.as_os_str()).copied();
	let comparison = classify(
		&FileIdentity::from_metadata(&source.metadata),
		stale.map(|d| FileIdentity::from_metadata(&d.metadata)).as_ref(),
	);

	if !(comparison.is_match() && config.exclude_identical_files) {
		recorder.item(
			ItemKind::File,
			comparison.reason(),
			comparison.side(),
			display_name(&source.path, &config.source),
			&config.source,
		);
	}

	if config.analyse_only || comparison.is_match() {
		return true;
	}

	let dest_path = dest_dir.join(&source.name);
	info!("Copying {} -> {}", source.path.display(), dest_path.display());
	recorder.trace(format!("Copying: {} -> {}", source.path.display(), dest_path.display()));

	match copy_file(source, &dest_path, stale) {
		Ok(()) => true,
		Err(e) => {
			recorder.error(&e);
			false
		}
	}
}

/// Copy a source file over the destination, then carry over its attributes
///
/// A destination symlink is replaced by a regular file, never written through.
fn copy_file(source: &Entry, dest_path: &Path, stale: Option<&Entry>) -> Result<(), SyncError> {
	let fail = |e| SyncError::CopyFile {
		from: source.path.clone(),
		to: dest_path.to_path_buf(),
		source: e,
	};

	if let Some(stale) = stale {
		if stale.is_symlink() {
			metadata_utils::remove_symlink(&stale.path).map_err(fail)?;
		} else if stale.metadata.permissions().readonly() {
			metadata_utils::clear_readonly(&stale.path).map_err(fail)?;
		}
	}

	fs::copy(&source.path, dest_path).map_err(fail)?;
	metadata_utils::copy_attributes(&source.metadata, dest_path).map_err(fail)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn identity(secs: u64, len: u64) -> FileIdentity {
		FileIdentity { modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs)), len }
	}

	#[test]
	fn test_missing_destination() {
		assert_eq!(classify(&identity(10, 5), None), Comparison::OnlyInSource);
	}

	#[test]
	fn test_time_checked_before_length() {
		assert_eq!(classify(&identity(10, 5), Some(&identity(20, 7))), Comparison::ModifiedTimeDiffers);
		assert_eq!(classify(&identity(10, 5), Some(&identity(20, 5))), Comparison::ModifiedTimeDiffers);
	}

	#[test]
	fn test_length_differs() {
		assert_eq!(classify(&identity(10, 5), Some(&identity(10, 6))), Comparison::LengthDiffers);
	}

	#[test]
	fn test_identical() {
		let comparison = classify(&identity(10, 5), Some(&identity(10, 5)));
		assert_eq!(comparison, Comparison::Identical);
		assert!(comparison.is_match());
		assert_eq!(comparison.reason(), Reason::Identical);
		assert_eq!(comparison.side(), Side::NotApplicable);
	}

	#[test]
	fn test_only_in_source_side() {
		assert_eq!(Comparison::OnlyInSource.side(), Side::Source);
		assert_eq!(Comparison::OnlyInSource.reason(), Reason::OnlyIn);
		assert!(!Comparison::LengthDiffers.is_match());
	}
}

// vim: ts=4
