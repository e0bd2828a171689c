//! Handling of destination-only entries
//!
//! Every destination-only entry is reported. It is removed only when the run is not
//! analysing, the matching delete flag is set and no deletion-exclusion rule protects
//! it. Directories are force deleted: read-only attributes are cleared on the whole
//! tree first.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::logging::*;
use crate::metadata_utils;
use crate::results::{ItemKind, Reason, Side};
use crate::sync::listing::Entry;
use crate::sync::{display_name, Recorder};

/// Applies the deletion settings of a configuration
pub(crate) struct DeleteHandler<'a> {
	config: &'a SyncConfig,
}

impl<'a> DeleteHandler<'a> {
	pub(crate) fn new(config: &'a SyncConfig) -> Self {
		DeleteHandler { config }
	}

	/// Handle a file that exists only in the destination
	///
	/// Returns `false` if the removal was attempted and failed.
	pub(crate) fn delete_file(
		&self,
		recorder: &mut Recorder<'_>,
		entry: &Entry,
		top_level: bool,
	) -> bool {
		let protected =
			self.config.delete_exclude_files.matches_any(&entry.name_lossy(), &entry.full_path(), top_level);
		self.report(recorder, ItemKind::File, entry);

		if protected || self.config.analyse_only || !self.config.delete_files {
			if protected {
				debug!("Keeping protected file {}", entry.path.display());
			}
			return true;
		}

		info!("Deleting {}", entry.path.display());
		recorder.trace(format!("Deleting: {}", entry.path.display()));
		let removed = if entry.is_symlink() {
			metadata_utils::remove_symlink(&entry.path)
		} else {
			metadata_utils::clear_readonly(&entry.path).and_then(|()| fs::remove_file(&entry.path))
		};
		match removed {
			Ok(()) => true,
			Err(source) => {
				recorder.error(&SyncError::DeleteFile { path: entry.path.clone(), source });
				false
			}
		}
	}

	/// Handle a directory that exists only in the destination
	///
	/// Returns `false` if the removal was attempted and failed.
	pub(crate) fn delete_directory(
		&self,
		recorder: &mut Recorder<'_>,
		entry: &Entry,
		top_level: bool,
	) -> bool {
		let protected =
			self.config.delete_exclude_dirs.matches_any(&entry.name_lossy(), &entry.full_path(), top_level);
		self.report(recorder, ItemKind::Directory, entry);

		if protected || self.config.analyse_only || !self.config.delete_directories {
			if protected {
				debug!("Keeping protected directory {}", entry.path.display());
			}
			return true;
		}

		info!("Deleting directory {}", entry.path.display());
		recorder.trace(format!("Deleting directory: {}", entry.path.display()));
		match force_remove_dir_all(&entry.path) {
			Ok(()) => true,
			Err(source) => {
				recorder.error(&SyncError::DeleteDirectory { path: entry.path.clone(), source });
				false
			}
		}
	}

	fn report(&self, recorder: &mut Recorder<'_>, kind: ItemKind, entry: &Entry) {
		recorder.item(
			kind,
			Reason::OnlyIn,
			Side::Destination,
			display_name(&entry.path, &self.config.destination),
			&self.config.destination,
		);
	}
}

/// Remove a directory tree, clearing read-only attributes first
///
/// A symlink is removed itself; its target is left alone.
pub fn force_remove_dir_all(path: &Path) -> io::Result<()> {
	let metadata = fs::symlink_metadata(path)?;
	if metadata.file_type().is_symlink() {
		return metadata_utils::remove_symlink(path);
	}

	clear_readonly_tree(path)?;
	fs::remove_dir_all(path)
}

fn clear_readonly_tree(dir: &Path) -> io::Result<()> {
	metadata_utils::clear_readonly(dir)?;
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let file_type = entry.file_type()?;
		if file_type.is_symlink() {
			continue;
		}
		if file_type.is_dir() {
			clear_readonly_tree(&entry.path())?;
		} else {
			metadata_utils::clear_readonly(&entry.path())?;
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::exclusion::{DirectoryFilter, Pattern};
	use crate::results::SyncResults;
	use tempfile::TempDir;

	fn entry(path: &Path) -> Entry {
		Entry {
			name: path.file_name().unwrap().to_os_string(),
			path: path.to_path_buf(),
			metadata: fs::symlink_metadata(path).unwrap(),
		}
	}

	fn config(dest: &Path) -> SyncConfig {
		SyncConfig { destination: dest.to_path_buf(), ..Default::default() }
	}

	#[test]
	fn test_file_reported_but_kept_without_flag() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("old.txt");
		fs::write(&file, "x").unwrap();

		let config = config(temp_dir.path());
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(handler.delete_file(&mut recorder, &entry(&file), true));
		let results = recorder.finish(true);

		assert!(file.exists());
		assert_eq!(results.len(), 1);
		let result = results.iter().next().unwrap();
		assert_eq!(result.reason(), Some(Reason::OnlyIn));
		assert_eq!(result.side(), Side::Destination);
		assert_eq!(result.message(), "/old.txt");
		assert_eq!(result.container(), Some(temp_dir.path()));
	}

	#[test]
	fn test_file_deleted_with_flag() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("old.txt");
		fs::write(&file, "x").unwrap();

		let config = SyncConfig { delete_files: true, ..config(temp_dir.path()) };
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(handler.delete_file(&mut recorder, &entry(&file), true));
		let results = recorder.finish(true);

		assert!(!file.exists());
		let messages: Vec<&str> = results.iter().map(|r| r.message()).collect();
		assert_eq!(messages[0], "/old.txt");
		assert!(messages[1].starts_with("Deleting: "));
	}

	#[test]
	fn test_protected_file_survives() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("keep.log");
		fs::write(&file, "x").unwrap();

		let config = SyncConfig {
			delete_files: true,
			delete_exclude_files: vec![DirectoryFilter::new(Pattern::regex(r"\.log$").unwrap())]
				.into(),
			..config(temp_dir.path())
		};
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(handler.delete_file(&mut recorder, &entry(&file), true));
		let results = recorder.finish(true);

		assert!(file.exists());
		assert_eq!(results.len(), 1);
		assert_eq!(results.iter().next().unwrap().side(), Side::Destination);
	}

	#[test]
	fn test_analyse_only_never_deletes() {
		let temp_dir = TempDir::new().unwrap();
		let dir = temp_dir.path().join("stale");
		fs::create_dir(&dir).unwrap();

		let config = SyncConfig { delete_directories: true, ..config(temp_dir.path()) }.analysis();
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(handler.delete_directory(&mut recorder, &entry(&dir), true));
		assert!(dir.exists());
		assert_eq!(recorder.finish(true).len(), 1);
	}

	#[test]
	fn test_file_deletion_failure_reported() {
		let temp_dir = TempDir::new().unwrap();
		let file = temp_dir.path().join("old.txt");
		fs::write(&file, "x").unwrap();
		let vanished = entry(&file);
		fs::remove_file(&file).unwrap();

		let config = SyncConfig { delete_files: true, ..config(temp_dir.path()) };
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(!handler.delete_file(&mut recorder, &vanished, true));
		let results = recorder.finish(false);

		assert_eq!(results.summary().errors, 1);
		let last = results.iter().last().unwrap();
		assert!(last.message().starts_with("Error: failed to delete file from "));
	}

	#[test]
	fn test_directory_deletion_failure_reported() {
		let temp_dir = TempDir::new().unwrap();
		let dir = temp_dir.path().join("stale");
		fs::create_dir(&dir).unwrap();
		let vanished = entry(&dir);
		fs::remove_dir(&dir).unwrap();

		let config = SyncConfig { delete_directories: true, ..config(temp_dir.path()) };
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(!handler.delete_directory(&mut recorder, &vanished, true));
		let results = recorder.finish(false);

		assert_eq!(results.summary().errors, 1);
		let last = results.iter().last().unwrap();
		assert!(last.message().starts_with("Error: failed to delete directory "));
	}

	#[test]
	#[cfg(unix)]
	fn test_force_remove_read_only_tree() {
		use std::os::unix::fs::PermissionsExt;

		let temp_dir = TempDir::new().unwrap();
		let dir = temp_dir.path().join("stale");
		let nested = dir.join("nested");
		fs::create_dir_all(&nested).unwrap();
		let file = nested.join("locked.txt");
		fs::write(&file, "x").unwrap();
		fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();
		fs::set_permissions(&nested, fs::Permissions::from_mode(0o555)).unwrap();

		force_remove_dir_all(&dir).unwrap();
		assert!(!dir.exists());
	}

	#[test]
	#[cfg(unix)]
	fn test_deleting_linked_file_keeps_target() {
		let temp_dir = TempDir::new().unwrap();
		let outside = TempDir::new().unwrap();
		let target = outside.path().join("precious.txt");
		fs::write(&target, "precious").unwrap();
		let link = temp_dir.path().join("link.txt");
		std::os::unix::fs::symlink(&target, &link).unwrap();

		let config = SyncConfig { delete_files: true, ..config(temp_dir.path()) };
		let handler = DeleteHandler::new(&config);
		let mut recorder = Recorder::new(SyncResults::new(), None);

		assert!(handler.delete_file(&mut recorder, &entry(&link), true));
		assert!(fs::symlink_metadata(&link).is_err());
		assert_eq!(fs::read_to_string(&target).unwrap(), "precious");
	}

	#[test]
	#[cfg(unix)]
	fn test_force_remove_symlink_keeps_target() {
		let temp_dir = TempDir::new().unwrap();
		let target = temp_dir.path().join("target");
		fs::create_dir(&target).unwrap();
		fs::write(target.join("data.txt"), "x").unwrap();
		let link = temp_dir.path().join("link");
		std::os::unix::fs::symlink(&target, &link).unwrap();

		force_remove_dir_all(&link).unwrap();
		assert!(!link.exists());
		assert!(target.join("data.txt").exists());
	}
}

// vim: ts=4
