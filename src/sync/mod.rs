//! Recursive one-way tree synchronisation
//!
//! The walk is depth-first and single threaded. For every directory pair the files
//! are compared first, destination-only files are handled next, then each selected
//! source subdirectory is visited and finally destination-only subdirectories are
//! handled. The first filesystem failure stops the whole walk: the failing branch
//! returns `false` and every ancestor skips its remaining work.

pub mod compare;
pub mod listing;

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use crate::callbacks::ResultObserver;
use crate::config::SyncConfig;
use crate::delete::DeleteHandler;
use crate::error::SyncError;
use crate::logging::*;
use crate::metadata_utils;
use crate::results::{ItemKind, Reason, Side, SyncResults};

use listing::Entry;

/// Appends results to the log and forwards each one to the observer
pub(crate) struct Recorder<'a> {
	results: SyncResults,
	observer: Option<&'a dyn ResultObserver>,
}

impl<'a> Recorder<'a> {
	pub(crate) fn new(results: SyncResults, observer: Option<&'a dyn ResultObserver>) -> Self {
		Recorder { results, observer }
	}

	pub(crate) fn trace(&mut self, message: impl Into<String>) {
		let result = self.results.add_trace(message);
		if let Some(observer) = self.observer {
			observer.on_result(result);
		}
	}

	pub(crate) fn item(
		&mut self,
		kind: ItemKind,
		reason: Reason,
		side: Side,
		item: impl Into<String>,
		container: &Path,
	) {
		let result = self.results.add_item(kind, reason, side, item, container);
		if let Some(observer) = self.observer {
			observer.on_result(result);
		}
	}

	/// Record a failed filesystem operation
	pub(crate) fn error(&mut self, error: &SyncError) {
		warn!("{}", error);
		self.trace(error.trace_message());
	}

	pub(crate) fn finish(mut self, complete: bool) -> SyncResults {
		self.results.set_complete(complete);
		self.results
	}
}

/// Path of `full` relative to `root` for display, keeping the leading separator
pub(crate) fn display_name(full: &Path, root: &Path) -> String {
	let full = full.to_string_lossy();
	let root = root.to_string_lossy();
	if let Some(rest) = full.strip_prefix(&*root) {
		return rest.to_string();
	}
	full.into_owned()
}

/// Whether `dest_dir` is a directory the walk may write into
///
/// The destination root may be reached through a symlink; below it a symlink never
/// counts as a directory.
fn destination_is_dir(dest_dir: &Path, top_level: bool) -> bool {
	if top_level {
		dest_dir.is_dir()
	} else {
		fs::symlink_metadata(dest_dir).map(|m| m.is_dir()).unwrap_or(false)
	}
}

/// One-way synchronizer bound to a configuration
pub struct Synchronizer<'a> {
	config: &'a SyncConfig,
	observer: Option<&'a dyn ResultObserver>,
}

impl<'a> Synchronizer<'a> {
	pub fn new(config: &'a SyncConfig) -> Self {
		Synchronizer { config, observer: None }
	}

	/// Stream every result to `observer` as it is recorded
	pub fn with_observer(mut self, observer: &'a dyn ResultObserver) -> Self {
		self.observer = Some(observer);
		self
	}

	/// Run the synchronisation and return the full result log
	///
	/// Filesystem failures do not produce an `Err`; they are recorded as `Error:`
	/// trace results and end the walk early, which is visible through
	/// [`SyncResults::is_complete`].
	pub fn start(&self) -> SyncResults {
		info!(
			"Synchronising {} -> {}{}",
			self.config.source.display(),
			self.config.destination.display(),
			if self.config.analyse_only { " (analysis only)" } else { "" }
		);

		let mut run = Run {
			config: self.config,
			deleter: DeleteHandler::new(self.config),
			recorder: Recorder::new(
				SyncResults::for_source(&self.config.source),
				self.observer,
			),
		};
		let complete =
			run.process_directory(&self.config.source, &self.config.destination, true);
		if !complete {
			warn!("Synchronisation stopped early after an error");
		}
		run.recorder.finish(complete)
	}
}

/// State of one `start()` call
struct Run<'a> {
	config: &'a SyncConfig,
	deleter: DeleteHandler<'a>,
	recorder: Recorder<'a>,
}

impl<'a> Run<'a> {
	fn process_directory(&mut self, source_dir: &Path, dest_dir: &Path, top_level: bool) -> bool {
		debug!("Processing {}", source_dir.display());

		if !self.create_destination_if_missing(dest_dir, top_level) {
			return false;
		}

		// When analysing, a missing destination stays missing and there is nothing
		// to compare against
		if !destination_is_dir(dest_dir, top_level) {
			return true;
		}

		self.synchronise_files(source_dir, dest_dir, top_level)
			&& self.synchronise_subdirectories(source_dir, dest_dir, top_level)
	}

	fn create_destination_if_missing(&mut self, dest_dir: &Path, top_level: bool) -> bool {
		if destination_is_dir(dest_dir, top_level) {
			return true;
		}

		self.recorder.item(
			ItemKind::Directory,
			Reason::OnlyIn,
			Side::Destination,
			display_name(dest_dir, &self.config.destination),
			&self.config.source,
		);

		if self.config.analyse_only {
			return true;
		}

		let fail = |source| SyncError::CreateDirectory { path: dest_dir.to_path_buf(), source };
		if metadata_utils::is_symlink(dest_dir) {
			info!("Replacing symlink {}", dest_dir.display());
			self.recorder.trace(format!("Deleting: {}", dest_dir.display()));
			if let Err(source) = metadata_utils::remove_symlink(dest_dir) {
				self.recorder.error(&fail(source));
				return false;
			}
		}

		info!("Creating directory {}", dest_dir.display());
		self.recorder.trace(format!("Creating directory: {}", dest_dir.display()));
		match fs::create_dir_all(dest_dir) {
			Ok(()) => true,
			Err(source) => {
				self.recorder.error(&fail(source));
				false
			}
		}
	}

	fn synchronise_files(&mut self, source_dir: &Path, dest_dir: &Path, top_level: bool) -> bool {
		let config = self.config;
		let file_filter = config.file_filter();
		let source_files = listing::list_files(
			source_dir,
			Side::Source,
			Some(&file_filter),
			top_level,
			&mut self.recorder,
		);
		let dest_files =
			listing::list_files(dest_dir, Side::Destination, None, top_level, &mut self.recorder);

		let dest_lookup: HashMap<&OsStr, &Entry> =
			dest_files.iter().map(|e| (e.name.as_os_str(), e)).collect();

		for source_file in &source_files {
			let copied = compare::synchronise_file(
				config,
				&mut self.recorder,
				source_file,
				dest_dir,
				&dest_lookup,
			);
			if !copied {
				return false;
			}
		}

		let source_names: HashSet<&OsStr> =
			source_files.iter().map(|e| e.name.as_os_str()).collect();
		for dest_file in dest_files.iter().filter(|e| !source_names.contains(e.name.as_os_str())) {
			if !self.deleter.delete_file(&mut self.recorder, dest_file, top_level) {
				return false;
			}
		}

		true
	}

	fn synchronise_subdirectories(
		&mut self,
		source_dir: &Path,
		dest_dir: &Path,
		top_level: bool,
	) -> bool {
		let config = self.config;
		let dir_filter = config.directory_filter();
		let source_dirs = listing::list_directories(
			source_dir,
			Side::Source,
			&dir_filter,
			top_level,
			&mut self.recorder,
		);
		let dest_dirs = listing::list_directories(
			dest_dir,
			Side::Destination,
			&dir_filter,
			top_level,
			&mut self.recorder,
		);

		for source_subdir in &source_dirs {
			let target = dest_dir.join(&source_subdir.name);
			if !self.process_directory(&source_subdir.path, &target, false) {
				return false;
			}
		}

		let source_names: HashSet<&OsStr> =
			source_dirs.iter().map(|e| e.name.as_os_str()).collect();
		for dest_subdir in dest_dirs.iter().filter(|e| !source_names.contains(e.name.as_os_str())) {
			if !self.deleter.delete_directory(&mut self.recorder, dest_subdir, top_level) {
				return false;
			}
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::callbacks::observer_fn;
	use std::sync::{Arc, Mutex};

	#[test]
	fn test_display_name_strips_root() {
		assert_eq!(display_name(Path::new("/src/sub/a.txt"), Path::new("/src")), "/sub/a.txt");
		assert_eq!(display_name(Path::new("/src"), Path::new("/src")), "");
		assert_eq!(display_name(Path::new("/other/a.txt"), Path::new("/src")), "/other/a.txt");
	}

	#[test]
	fn test_recorder_forwards_in_order() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let sink = seen.clone();
		let observer = observer_fn(move |r| sink.lock().unwrap().push(r.message().to_string()));

		let mut recorder = Recorder::new(SyncResults::new(), Some(&observer as &dyn ResultObserver));
		recorder.trace("one");
		recorder.item(ItemKind::File, Reason::Identical, Side::NotApplicable, "/a", Path::new("/s"));
		let results = recorder.finish(true);

		let logged: Vec<String> = results.iter().map(|r| r.message().to_string()).collect();
		assert_eq!(*seen.lock().unwrap(), logged);
		assert!(results.is_complete());
	}
}

// vim: ts=4
