//! Directory listing with optional filtering

use std::borrow::Cow;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use super::Recorder;
use crate::error::SyncError;
use crate::exclusion::EntryFilter;
use crate::logging::*;
use crate::metadata_utils;
use crate::results::Side;

/// A file or directory found in a listing
#[derive(Debug, Clone)]
pub struct Entry {
	/// Bare entry name, used to pair source and destination entries
	pub name: OsString,
	pub path: PathBuf,
	/// Followed metadata for source entries, the entry's own for destination entries
	pub metadata: Metadata,
}

impl Entry {
	/// Entry name as text, for pattern matching
	pub fn name_lossy(&self) -> Cow<'_, str> {
		self.name.to_string_lossy()
	}

	pub fn is_symlink(&self) -> bool {
		self.metadata.file_type().is_symlink()
	}

	pub fn full_path(&self) -> String {
		self.path.to_string_lossy().into_owned()
	}

	pub fn is_hidden(&self) -> bool {
		metadata_utils::is_hidden(&self.name_lossy(), &self.metadata)
	}
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Wanted {
	Files,
	Directories,
}

/// Read all entries of one kind, in the order the filesystem returns them
///
/// Source symlinks are followed; entries whose metadata cannot be read (broken links,
/// races) are skipped. Destination symlinks are never followed: a link of any kind is
/// listed as a file, so it can be replaced or deleted but is never written through.
fn read_entries(dir: &Path, wanted: Wanted, side: Side) -> io::Result<Vec<Entry>> {
	let mut entries = Vec::new();

	for dir_entry in fs::read_dir(dir)? {
		let dir_entry = dir_entry?;
		let path = dir_entry.path();
		let metadata = match side {
			Side::Destination => fs::symlink_metadata(&path),
			_ => fs::metadata(&path),
		};
		let metadata = match metadata {
			Ok(metadata) => metadata,
			Err(e) => {
				debug!("Skipping {}: {}", path.display(), e);
				continue;
			}
		};

		let keep = match wanted {
			Wanted::Files => metadata.is_file() || metadata.file_type().is_symlink(),
			Wanted::Directories => metadata.is_dir(),
		};
		if keep {
			entries.push(Entry { name: dir_entry.file_name(), path, metadata });
		}
	}

	Ok(entries)
}

fn apply_filter(entries: Vec<Entry>, filter: &EntryFilter<'_>, top_level: bool) -> Vec<Entry> {
	if !filter.is_active() {
		return entries;
	}

	entries
		.into_iter()
		.filter(|e| filter.admits(&e.name_lossy(), &e.full_path(), e.is_hidden(), top_level))
		.collect()
}

/// List the files of `dir` on one side of the sync, filtered when a filter is given
///
/// A listing failure is recorded and yields an empty list.
pub(crate) fn list_files(
	dir: &Path,
	side: Side,
	filter: Option<&EntryFilter<'_>>,
	top_level: bool,
	recorder: &mut Recorder<'_>,
) -> Vec<Entry> {
	match read_entries(dir, Wanted::Files, side) {
		Ok(entries) => match filter {
			Some(filter) => apply_filter(entries, filter, top_level),
			None => entries,
		},
		Err(source) => {
			recorder.error(&SyncError::ListFiles { path: dir.to_path_buf(), source });
			Vec::new()
		}
	}
}

/// List the subdirectories of `dir` that pass the directory filter
///
/// A listing failure is recorded and yields an empty list.
pub(crate) fn list_directories(
	dir: &Path,
	side: Side,
	filter: &EntryFilter<'_>,
	top_level: bool,
	recorder: &mut Recorder<'_>,
) -> Vec<Entry> {
	match read_entries(dir, Wanted::Directories, side) {
		Ok(entries) => apply_filter(entries, filter, top_level),
		Err(source) => {
			recorder.error(&SyncError::ListDirectories { path: dir.to_path_buf(), source });
			Vec::new()
		}
	}
}


// vim: ts=4
