//! Per-entity filter combining the hidden-entry rule with the pattern lists

use super::{should_exclude, FilterList};

/// Filter applied to one kind of entry (files or directories) in a listing
#[derive(Debug, Clone, Copy)]
pub struct EntryFilter<'a> {
	pub exclude_hidden: bool,
	pub exclude: &'a FilterList,
	pub include: &'a FilterList,
}

impl<'a> EntryFilter<'a> {
	pub fn new(exclude_hidden: bool, exclude: &'a FilterList, include: &'a FilterList) -> Self {
		Self { exclude_hidden, exclude, include }
	}

	/// Whether the filter can reject anything at all
	pub fn is_active(&self) -> bool {
		self.exclude_hidden || !self.exclude.is_empty() || !self.include.is_empty()
	}

	/// Check if an entry survives the filter
	///
	/// Hidden entries are rejected first when `exclude_hidden` is set, whatever the
	/// pattern rules say.
	pub fn admits(&self, name: &str, full_path: &str, hidden: bool, is_top_level: bool) -> bool {
		if self.exclude_hidden && hidden {
			return false;
		}

		!should_exclude(self.exclude, self.include, name, full_path, is_top_level)
	}
}


// vim: ts=4
