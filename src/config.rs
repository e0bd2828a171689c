//! Configuration of a single synchronisation run
//!
//! A [`SyncConfig`] is plain data. It is handed to the engine by reference and never
//! changed during a run; a two-pass caller derives separate values for the analysis
//! pass and the synchronisation pass with [`SyncConfig::analysis`] and
//! [`SyncConfig::synchronisation`].

use crate::exclusion::{DirectoryFilter, EntryFilter, FilterList};
use crate::validation::{self, ValidationError};
use std::path::{Path, PathBuf};

/// Settings for one run of the synchronizer
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
	// ========================================================================
	// ROOTS
	// ========================================================================
	/// Absolute source root
	pub source: PathBuf,

	/// Absolute destination root
	pub destination: PathBuf,

	// ========================================================================
	// BEHAVIOUR
	// ========================================================================
	/// Classify and report only, never touch the filesystem
	pub analyse_only: bool,

	/// Skip hidden files and directories in the source
	pub exclude_hidden: bool,

	/// Leave identical files out of the result log
	pub exclude_identical_files: bool,

	/// Remove files that only exist in the destination
	pub delete_files: bool,

	/// Remove directories that only exist in the destination
	pub delete_directories: bool,

	// ========================================================================
	// FILTERS
	// ========================================================================
	pub exclude_files: FilterList,
	pub include_files: FilterList,
	pub exclude_dirs: FilterList,
	pub include_dirs: FilterList,

	/// Destination-only files matching these are never deleted
	pub delete_exclude_files: FilterList,

	/// Destination-only directories matching these are never deleted
	pub delete_exclude_dirs: FilterList,
}

impl SyncConfig {
	pub fn builder() -> SyncBuilder {
		SyncBuilder::new()
	}

	/// Copy of this configuration that only analyses
	pub fn analysis(&self) -> SyncConfig {
		SyncConfig { analyse_only: true, ..self.clone() }
	}

	/// Copy of this configuration that applies changes
	pub fn synchronisation(&self) -> SyncConfig {
		SyncConfig { analyse_only: false, ..self.clone() }
	}

	/// Filter applied to source files
	pub fn file_filter(&self) -> EntryFilter<'_> {
		EntryFilter::new(self.exclude_hidden, &self.exclude_files, &self.include_files)
	}

	/// Filter applied to source and destination subdirectories
	pub fn directory_filter(&self) -> EntryFilter<'_> {
		EntryFilter::new(self.exclude_hidden, &self.exclude_dirs, &self.include_dirs)
	}
}

/// Fluent builder for [`SyncConfig`]
#[derive(Debug, Clone, Default)]
pub struct SyncBuilder {
	config: SyncConfig,
}

impl SyncBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn source(mut self, path: impl AsRef<Path>) -> Self {
		self.config.source = path.as_ref().to_path_buf();
		self
	}

	pub fn destination(mut self, path: impl AsRef<Path>) -> Self {
		self.config.destination = path.as_ref().to_path_buf();
		self
	}

	pub fn analyse_only(mut self, analyse_only: bool) -> Self {
		self.config.analyse_only = analyse_only;
		self
	}

	pub fn exclude_hidden(mut self, exclude_hidden: bool) -> Self {
		self.config.exclude_hidden = exclude_hidden;
		self
	}

	pub fn exclude_identical_files(mut self, exclude: bool) -> Self {
		self.config.exclude_identical_files = exclude;
		self
	}

	pub fn delete_files(mut self, delete: bool) -> Self {
		self.config.delete_files = delete;
		self
	}

	pub fn delete_directories(mut self, delete: bool) -> Self {
		self.config.delete_directories = delete;
		self
	}

	pub fn exclude_files(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.exclude_files = rules.into();
		self
	}

	pub fn include_files(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.include_files = rules.into();
		self
	}

	pub fn exclude_dirs(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.exclude_dirs = rules.into();
		self
	}

	pub fn include_dirs(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.include_dirs = rules.into();
		self
	}

	pub fn delete_exclude_files(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.delete_exclude_files = rules.into();
		self
	}

	pub fn delete_exclude_dirs(mut self, rules: Vec<DirectoryFilter>) -> Self {
		self.config.delete_exclude_dirs = rules.into();
		self
	}

	/// Access the configuration under construction
	pub fn config(&self) -> &SyncConfig {
		&self.config
	}

	/// Check the configuration and return it
	///
	/// Relative roots are resolved against the current directory. Rejects overlapping
	/// roots, include and exclude lists given together for the same kind of entry, and
	/// deletion exclusions without the matching delete flag.
	pub fn build(mut self) -> Result<SyncConfig, ValidationError> {
		let (source, destination) =
			validation::resolve_roots(&self.config.source, &self.config.destination)?;
		self.config.source = source;
		self.config.destination = destination;
		validation::validate_filters(&self.config)?;
		Ok(self.config)
	}
}


// vim: ts=4
