//! Result log of a synchronisation run
//!
//! Every decision the engine takes is recorded as a [`SyncResult`] and appended to a
//! [`SyncResults`] log in the order it was taken. Results are never modified once
//! created.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a result is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
	File,
	Directory,
	/// Free-text progress or error message
	Trace,
}

/// Why an item was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
	/// Present in one tree only, see [`Side`]
	OnlyIn,
	/// Same modification time, different length
	Length,
	ModifiedTime,
	Identical,
}

/// Which tree an `OnlyIn` result refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Side {
	Source,
	Destination,
	NotApplicable,
}

/// A single engine decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
	kind: ItemKind,
	#[serde(skip_serializing_if = "Option::is_none")]
	reason: Option<Reason>,
	side: Side,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	container: Option<PathBuf>,
}

impl SyncResult {
	/// Create a trace message
	pub fn trace(message: impl Into<String>) -> Self {
		SyncResult {
			kind: ItemKind::Trace,
			reason: None,
			side: Side::NotApplicable,
			message: message.into(),
			container: None,
		}
	}

	/// Create a fully specified file or directory result
	pub fn item(
		kind: ItemKind,
		reason: Reason,
		side: Side,
		item: impl Into<String>,
		container: impl Into<PathBuf>,
	) -> Self {
		SyncResult {
			kind,
			reason: Some(reason),
			side,
			message: item.into(),
			container: Some(container.into()),
		}
	}

	pub fn kind(&self) -> ItemKind {
		self.kind
	}

	/// `None` for trace messages
	pub fn reason(&self) -> Option<Reason> {
		self.reason
	}

	pub fn side(&self) -> Side {
		self.side
	}

	/// Display path of the item relative to its root, or the trace text
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Root directory the item belongs to
	pub fn container(&self) -> Option<&Path> {
		self.container.as_deref()
	}

	pub fn is_trace(&self) -> bool {
		self.kind == ItemKind::Trace
	}

	/// Trace messages reporting a failed filesystem operation
	pub fn is_error(&self) -> bool {
		self.is_trace() && self.message.starts_with("Error:")
	}

	/// File results that call for a copy or a deletion
	pub fn is_pending_file(&self) -> bool {
		self.kind == ItemKind::File
			&& matches!(self.reason, Some(Reason::OnlyIn | Reason::Length | Reason::ModifiedTime))
	}

	/// Directory results that require a directory to be created or removed
	pub fn is_pending_directory(&self) -> bool {
		self.kind == ItemKind::Directory && self.reason == Some(Reason::OnlyIn)
	}
}

/// Counts of result categories, used for reporting and sync limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
	pub files_only_in_source: usize,
	pub files_only_in_destination: usize,
	pub files_modified_time: usize,
	pub files_length: usize,
	pub files_identical: usize,
	pub directories_only_in_source: usize,
	pub directories_only_in_destination: usize,
	pub errors: usize,
}

impl ResultSummary {
	/// Number of file results that call for synchronisation work
	pub fn pending_files(&self) -> usize {
		self.files_only_in_source
			+ self.files_only_in_destination
			+ self.files_modified_time
			+ self.files_length
	}

	/// Number of directory results that call for synchronisation work
	pub fn pending_directories(&self) -> usize {
		self.directories_only_in_source + self.directories_only_in_destination
	}
}

/// Ordered, append-only log of the results of one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncResults {
	results: Vec<SyncResult>,
	complete: bool,
	#[serde(skip)]
	source_root: Option<PathBuf>,
}

impl SyncResults {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a log for a run from `source_root`, so directories that only exist in
	/// the source can be told apart from those that only exist in the destination
	pub fn for_source(source_root: impl Into<PathBuf>) -> Self {
		SyncResults { source_root: Some(source_root.into()), ..Self::default() }
	}

	/// Append a trace message and return it
	pub fn add_trace(&mut self, message: impl Into<String>) -> &SyncResult {
		self.push(SyncResult::trace(message))
	}

	/// Append a file or directory result and return it
	pub fn add_item(
		&mut self,
		kind: ItemKind,
		reason: Reason,
		side: Side,
		item: impl Into<String>,
		container: impl Into<PathBuf>,
	) -> &SyncResult {
		self.push(SyncResult::item(kind, reason, side, item, container))
	}

	fn push(&mut self, result: SyncResult) -> &SyncResult {
		self.results.push(result);
		let last = self.results.len() - 1;
		&self.results[last]
	}

	pub fn iter(&self) -> std::slice::Iter<'_, SyncResult> {
		self.results.iter()
	}

	pub fn len(&self) -> usize {
		self.results.len()
	}

	pub fn is_empty(&self) -> bool {
		self.results.is_empty()
	}

	/// Whether the walk reached the end without a fatal filesystem error
	pub fn is_complete(&self) -> bool {
		self.complete
	}

	pub(crate) fn set_complete(&mut self, complete: bool) {
		self.complete = complete;
	}

	/// File and directory results only
	pub fn items(&self) -> impl Iterator<Item = &SyncResult> {
		self.results.iter().filter(|r| !r.is_trace())
	}

	pub fn summary(&self) -> ResultSummary {
		let mut summary = ResultSummary::default();
		for result in &self.results {
			match (result.kind, result.reason, result.side) {
				(ItemKind::Trace, _, _) => {
					if result.is_error() {
						summary.errors += 1;
					}
				}
				(ItemKind::File, Some(Reason::OnlyIn), Side::Destination) => {
					summary.files_only_in_destination += 1
				}
				(ItemKind::File, Some(Reason::OnlyIn), _) => summary.files_only_in_source += 1,
				(ItemKind::File, Some(Reason::ModifiedTime), _) => summary.files_modified_time += 1,
				(ItemKind::File, Some(Reason::Length), _) => summary.files_length += 1,
				(ItemKind::File, Some(Reason::Identical), _) => summary.files_identical += 1,
				// New directories are reported against the source root, removals against
				// the destination root.
				(ItemKind::Directory, Some(Reason::OnlyIn), _) => {
					if self.source_root.is_some() && result.container == self.source_root {
						summary.directories_only_in_source += 1
					} else {
						summary.directories_only_in_destination += 1
					}
				}
				(ItemKind::Directory, _, _) | (ItemKind::File, None, _) => {}
			}
		}
		summary
	}
}

impl<'a> IntoIterator for &'a SyncResults {
	type Item = &'a SyncResult;
	type IntoIter = std::slice::Iter<'a, SyncResult>;

	fn into_iter(self) -> Self::IntoIter {
		self.results.iter()
	}
}


// vim: ts=4
