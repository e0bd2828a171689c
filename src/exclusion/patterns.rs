//! Compiled name patterns used by filter rules

use super::ExclusionError;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a filter specification string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PatternSyntax {
	/// Regular expression, matching anywhere in the subject
	#[default]
	Regex,
	/// Shell-style glob, matching the whole subject
	Glob,
}

impl FromStr for PatternSyntax {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"regex" | "re" => Ok(Self::Regex),
			"glob" | "filespec" => Ok(Self::Glob),
			_ => Err(format!("Unknown pattern syntax: {}. Valid options: regex, glob", s)),
		}
	}
}

/// A compiled match expression
#[derive(Clone)]
pub enum Pattern {
	Regex(Regex),
	Glob { source: String, matcher: GlobMatcher },
}

impl Pattern {
	pub fn regex(pattern: &str) -> Result<Self, ExclusionError> {
		Regex::new(pattern)
			.map(Pattern::Regex)
			.map_err(|e| ExclusionError::InvalidPattern(format!("{}: {}", pattern, e)))
	}

	pub fn glob(pattern: &str) -> Result<Self, ExclusionError> {
		let glob = GlobBuilder::new(pattern)
			.literal_separator(false)
			.build()
			.map_err(|e| ExclusionError::InvalidPattern(format!("{}: {}", pattern, e)))?;
		Ok(Pattern::Glob { source: pattern.to_string(), matcher: glob.compile_matcher() })
	}

	pub fn parse(pattern: &str, syntax: PatternSyntax) -> Result<Self, ExclusionError> {
		match syntax {
			PatternSyntax::Regex => Self::regex(pattern),
			PatternSyntax::Glob => Self::glob(pattern),
		}
	}

	pub fn is_match(&self, subject: &str) -> bool {
		match self {
			Pattern::Regex(re) => re.is_match(subject),
			Pattern::Glob { matcher, .. } => matcher.is_match(subject),
		}
	}

	/// The pattern text as it was written
	pub fn as_str(&self) -> &str {
		match self {
			Pattern::Regex(re) => re.as_str(),
			Pattern::Glob { source, .. } => source,
		}
	}
}

impl fmt::Debug for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Pattern::Regex(re) => write!(f, "Regex({:?})", re.as_str()),
			Pattern::Glob { source, .. } => write!(f, "Glob({:?})", source),
		}
	}
}

impl fmt::Display for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One include or exclude rule
#[derive(Debug, Clone)]
pub struct DirectoryFilter {
	pub pattern: Pattern,

	/// Match against the full path instead of the bare entry name
	pub match_full_path: bool,

	/// Only apply this rule at the root of the walk
	pub top_level_only: bool,
}

impl DirectoryFilter {
	/// A name-matching rule restricted to the top level
	pub fn new(pattern: Pattern) -> Self {
		Self { pattern, match_full_path: false, top_level_only: true }
	}

	pub fn full_path(mut self, match_full_path: bool) -> Self {
		self.match_full_path = match_full_path;
		self
	}

	pub fn top_level_only(mut self, top_level_only: bool) -> Self {
		self.top_level_only = top_level_only;
		self
	}

	/// Whether this rule is in effect at the current depth
	pub fn applies_at(&self, is_top_level: bool) -> bool {
		is_top_level || !self.top_level_only
	}

	pub fn matches(&self, name: &str, full_path: &str) -> bool {
		self.pattern.is_match(if self.match_full_path { full_path } else { name })
	}
}


// vim: ts=4
