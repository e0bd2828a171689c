//! Include/exclude filtering of directory entries
//!
//! The same rule lists are used for files and for directories. A rule matches either
//! the bare entry name or its full path, and is either restricted to the root of the
//! walk or applied at every level.

mod filters;
mod patterns;

pub use filters::EntryFilter;
pub use patterns::{DirectoryFilter, Pattern, PatternSyntax};

/// Ordered list of filter rules
#[derive(Debug, Clone, Default)]
pub struct FilterList {
	rules: Vec<DirectoryFilter>,
}

impl FilterList {
	pub fn new(rules: Vec<DirectoryFilter>) -> Self {
		Self { rules }
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn rules(&self) -> &[DirectoryFilter] {
		&self.rules
	}

	pub fn push(&mut self, rule: DirectoryFilter) {
		self.rules.push(rule);
	}

	/// True if any rule in scope at this level matches the entry
	pub fn matches_any(&self, name: &str, full_path: &str, is_top_level: bool) -> bool {
		self.rules.iter().any(|rule| rule.applies_at(is_top_level) && rule.matches(name, full_path))
	}

	/// True if any rule matches the entry, ignoring the level restriction
	pub fn matches_any_unscoped(&self, name: &str, full_path: &str) -> bool {
		self.rules.iter().any(|rule| rule.matches(name, full_path))
	}
}

impl From<Vec<DirectoryFilter>> for FilterList {
	fn from(rules: Vec<DirectoryFilter>) -> Self {
		Self::new(rules)
	}
}

impl FromIterator<DirectoryFilter> for FilterList {
	fn from_iter<I: IntoIterator<Item = DirectoryFilter>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

/// Decide whether an entry is filtered out
///
/// A non-empty exclude list takes precedence and the include list is then ignored.
/// Otherwise a non-empty include list excludes everything it does not match, but only
/// at the top level; below it the include list has no effect.
pub fn should_exclude(
	exclude: &FilterList,
	include: &FilterList,
	name: &str,
	full_path: &str,
	is_top_level: bool,
) -> bool {
	if !exclude.is_empty() {
		exclude.matches_any(name, full_path, is_top_level)
	} else if !include.is_empty() && is_top_level {
		!include.matches_any_unscoped(name, full_path)
	} else {
		false
	}
}

/// Errors that can occur while building filters
#[derive(Debug)]
pub enum ExclusionError {
	/// Failed to compile a regex or glob
	InvalidPattern(String),
}

impl std::fmt::Display for ExclusionError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ExclusionError::InvalidPattern(msg) => {
				write!(f, "Invalid filter pattern: {}", msg)
			}
		}
	}
}

impl std::error::Error for ExclusionError {}


// vim: ts=4
