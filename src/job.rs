//! Job descriptions and the two-pass run
//!
//! A job file names the two roots, the behaviour flags and the filter lists of one
//! backup. It is read from TOML or JSON5:
//!
//! ```toml
//! name = "photos"
//! source = "/home/me/Pictures"
//! destination = "/mnt/backup/Pictures"
//! analyseFirst = true
//! fileSyncLimit = 500
//! deleteFiles = true
//! excludeFiles = ["\\.tmp$", { pattern = "^thumbs\\.db$", topLevelOnly = false }]
//! ```
//!
//! With `analyseFirst` the job is analysed before anything is touched, and the real run
//! only happens when the amount of pending work is within the configured limits.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::callbacks::ResultObserver;
use crate::config::SyncConfig;
use crate::error::JobError;
use crate::exclusion::{DirectoryFilter, FilterList, Pattern, PatternSyntax};
use crate::logging::*;
use crate::results::{ResultSummary, SyncResults};
use crate::sync::Synchronizer;
use crate::validation;

/// A single filter entry: either a bare pattern or a rule with options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterSpec {
	Pattern(String),
	Rule(FilterRule),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
	pub pattern: String,

	/// Match the full path instead of the bare name
	#[serde(default)]
	pub full_path: bool,

	#[serde(default = "default_true")]
	pub top_level_only: bool,
}

fn default_true() -> bool {
	true
}

impl FilterSpec {
	fn compile(&self, syntax: PatternSyntax) -> Result<DirectoryFilter, JobError> {
		let filter = match self {
			FilterSpec::Pattern(pattern) => DirectoryFilter::new(Pattern::parse(pattern, syntax)?),
			FilterSpec::Rule(rule) => DirectoryFilter::new(Pattern::parse(&rule.pattern, syntax)?)
				.full_path(rule.full_path)
				.top_level_only(rule.top_level_only),
		};
		Ok(filter)
	}
}

impl From<&str> for FilterSpec {
	fn from(pattern: &str) -> Self {
		FilterSpec::Pattern(pattern.to_string())
	}
}

/// Serialized form of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobFile {
	/// Descriptive name, shown in logs
	pub name: String,

	pub source: PathBuf,
	pub destination: PathBuf,

	pub analyse_only: bool,

	/// Analyse first and only synchronise when within the limits
	pub analyse_first: bool,

	pub exclude_hidden: bool,
	pub exclude_identical: bool,
	pub delete_files: bool,
	pub delete_directories: bool,

	/// Treat filter patterns as regular expressions rather than globs
	pub use_regex: bool,

	/// Maximum number of pending directories when analysing first (absent = unlimited)
	pub directory_sync_limit: Option<usize>,

	/// Maximum number of pending files when analysing first (absent = unlimited)
	pub file_sync_limit: Option<usize>,

	pub exclude_files: Vec<FilterSpec>,
	pub include_files: Vec<FilterSpec>,
	pub exclude_dirs: Vec<FilterSpec>,
	pub include_dirs: Vec<FilterSpec>,
	pub delete_exclude_files: Vec<FilterSpec>,
	pub delete_exclude_dirs: Vec<FilterSpec>,
}

impl Default for JobFile {
	fn default() -> Self {
		JobFile {
			name: String::new(),
			source: PathBuf::new(),
			destination: PathBuf::new(),
			analyse_only: false,
			analyse_first: false,
			exclude_hidden: false,
			exclude_identical: false,
			delete_files: false,
			delete_directories: false,
			use_regex: true,
			directory_sync_limit: None,
			file_sync_limit: None,
			exclude_files: Vec::new(),
			include_files: Vec::new(),
			exclude_dirs: Vec::new(),
			include_dirs: Vec::new(),
			delete_exclude_files: Vec::new(),
			delete_exclude_dirs: Vec::new(),
		}
	}
}

impl JobFile {
	/// Parse a job file, choosing the format from its extension
	///
	/// Relative roots are resolved against the directory holding the file.
	pub fn load(path: &Path) -> Result<JobFile, JobError> {
		let contents = fs::read_to_string(path)
			.map_err(|source| JobError::Read { path: path.to_path_buf(), source })?;
		let parse_error = |message: String| JobError::Parse { path: path.to_path_buf(), message };

		let mut job: JobFile = match path.extension().and_then(|e| e.to_str()) {
			Some("toml") => toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))?,
			Some("json") | Some("json5") => {
				json5::from_str(&contents).map_err(|e| parse_error(e.to_string()))?
			}
			_ => return Err(JobError::UnsupportedFormat { path: path.to_path_buf() }),
		};

		if let Some(base) = path.parent() {
			job.source = resolve_against(base, &job.source);
			job.destination = resolve_against(base, &job.destination);
		}
		if job.name.is_empty() {
			job.name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
		}
		Ok(job)
	}

	/// Validate the job and turn it into a runnable [`Job`]
	pub fn compile(&self) -> Result<Job, JobError> {
		let (source, destination) = validation::validate_roots(&self.source, &self.destination)?;
		let syntax = if self.use_regex { PatternSyntax::Regex } else { PatternSyntax::Glob };
		let rules = |specs: &[FilterSpec]| -> Result<FilterList, JobError> {
			specs.iter().map(|spec| spec.compile(syntax)).collect()
		};

		let config = SyncConfig {
			source,
			destination,
			analyse_only: self.analyse_only,
			exclude_hidden: self.exclude_hidden,
			exclude_identical_files: self.exclude_identical,
			delete_files: self.delete_files,
			delete_directories: self.delete_directories,
			exclude_files: rules(&self.exclude_files)?,
			include_files: rules(&self.include_files)?,
			exclude_dirs: rules(&self.exclude_dirs)?,
			include_dirs: rules(&self.include_dirs)?,
			delete_exclude_files: rules(&self.delete_exclude_files)?,
			delete_exclude_dirs: rules(&self.delete_exclude_dirs)?,
		};
		validation::validate_filters(&config)?;

		Ok(Job {
			name: self.name.clone(),
			analyse_first: self.analyse_first,
			limits: SyncLimits {
				files: self.file_sync_limit,
				directories: self.directory_sync_limit,
			},
			config,
		})
	}
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
	if path.as_os_str().is_empty() || path.is_absolute() {
		path.to_path_buf()
	} else {
		base.join(path)
	}
}

/// Upper bounds on the pending work found by an analysis pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncLimits {
	pub files: Option<usize>,
	pub directories: Option<usize>,
}

impl SyncLimits {
	/// Whether the pending work in `summary` is above either limit
	pub fn exceeded_by(&self, summary: &ResultSummary) -> bool {
		let above = |limit: Option<usize>, count: usize| limit.is_some_and(|limit| count > limit);
		above(self.files, summary.pending_files())
			|| above(self.directories, summary.pending_directories())
	}
}

/// A validated job, ready to run
#[derive(Debug, Clone)]
pub struct Job {
	pub name: String,
	pub analyse_first: bool,
	pub limits: SyncLimits,
	pub config: SyncConfig,
}

impl Job {
	/// Load and compile a job file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Job, JobError> {
		JobFile::load(path.as_ref())?.compile()
	}
}

/// How a job ended
#[derive(Debug)]
pub enum JobOutcome {
	/// The last run walked the whole tree
	Completed(SyncResults),

	/// A filesystem error stopped the run
	Halted(SyncResults),

	/// The analysis found more work than the limits allow; nothing was changed
	LimitExceeded { analysis: SyncResults, summary: ResultSummary },
}

impl JobOutcome {
	fn from_results(results: SyncResults) -> Self {
		if results.is_complete() {
			JobOutcome::Completed(results)
		} else {
			JobOutcome::Halted(results)
		}
	}

	/// Result log of the last run that was made
	pub fn results(&self) -> &SyncResults {
		match self {
			JobOutcome::Completed(results) | JobOutcome::Halted(results) => results,
			JobOutcome::LimitExceeded { analysis, .. } => analysis,
		}
	}

	pub fn exit_code(&self) -> i32 {
		match self {
			JobOutcome::Completed(_) => 0,
			JobOutcome::Halted(_) => 1,
			JobOutcome::LimitExceeded { .. } => 3,
		}
	}
}

/// Run a job, streaming every result to `observer`
///
/// Analysis-only jobs make a single pass. With `analyse_first` the analysis pass is
/// reported too, and the synchronisation pass only follows when the analysis completed
/// within the limits.
pub fn run_job(job: &Job, observer: &dyn ResultObserver) -> JobOutcome {
	info!("Running job '{}'", job.name);

	if !job.analyse_first || job.config.analyse_only {
		let results = Synchronizer::new(&job.config).with_observer(observer).start();
		return JobOutcome::from_results(results);
	}

	let analysis_config = job.config.analysis();
	let analysis = Synchronizer::new(&analysis_config).with_observer(observer).start();
	if !analysis.is_complete() {
		return JobOutcome::Halted(analysis);
	}

	let summary = analysis.summary();
	if job.limits.exceeded_by(&summary) {
		warn!(
			"Job '{}' not synchronised: {} files and {} directories pending (limits {:?} / {:?})",
			job.name,
			summary.pending_files(),
			summary.pending_directories(),
			job.limits.files,
			job.limits.directories
		);
		return JobOutcome::LimitExceeded { analysis, summary };
	}

	let sync_config = job.config.synchronisation();
	let results = Synchronizer::new(&sync_config).with_observer(observer).start();
	JobOutcome::from_results(results)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::callbacks::NoObserver;
	use tempfile::TempDir;

	fn roots() -> (TempDir, PathBuf, PathBuf) {
		let temp_dir = TempDir::new().unwrap();
		let source = temp_dir.path().join("src");
		let dest = temp_dir.path().join("dst");
		fs::create_dir(&source).unwrap();
		(temp_dir, source, dest)
	}

	#[test]
	fn test_toml_job_with_mixed_filters() {
		let temp_dir = TempDir::new().unwrap();
		fs::create_dir(temp_dir.path().join("src")).unwrap();
		let path = temp_dir.path().join("photos.toml");
		fs::write(
			&path,
			r#"
source = "src"
destination = "dst"
deleteFiles = true
fileSyncLimit = 10
excludeFiles = ['\.tmp$', { pattern = '^cache$', fullPath = false, topLevelOnly = false }]
"#,
		)
		.unwrap();

		let file = JobFile::load(&path).unwrap();
		assert_eq!(file.name, "photos");
		assert_eq!(file.source, temp_dir.path().join("src"));
		assert_eq!(file.exclude_files[0], FilterSpec::from(r"\.tmp$"));
		assert!(file.use_regex);

		let job = file.compile().unwrap();
		assert_eq!(job.limits.files, Some(10));
		assert_eq!(job.limits.directories, None);
		assert_eq!(job.config.exclude_files.len(), 2);
		assert!(!job.config.exclude_files.rules()[1].top_level_only);
		assert!(job.config.delete_files);
	}

	#[test]
	fn test_json5_job() {
		let temp_dir = TempDir::new().unwrap();
		fs::create_dir(temp_dir.path().join("src")).unwrap();
		let path = temp_dir.path().join("job.json5");
		fs::write(
			&path,
			r#"{
	// trailing commas and comments are fine
	name: "docs",
	source: "src",
	destination: "dst",
	useRegex: false,
	includeFiles: ["*.md",],
}"#,
		)
		.unwrap();

		let job = Job::from_file(&path).unwrap();
		assert_eq!(job.name, "docs");
		assert!(job.config.include_files.rules()[0].matches("README.md", "/x/README.md"));
	}

	#[test]
	fn test_unknown_extension_rejected() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("job.yaml");
		fs::write(&path, "source: a").unwrap();

		assert!(matches!(JobFile::load(&path), Err(JobError::UnsupportedFormat { .. })));
	}

	#[test]
	fn test_invalid_pattern_rejected() {
		let (_temp_dir, source, dest) = roots();
		let file = JobFile {
			source,
			destination: dest,
			exclude_files: vec![FilterSpec::from("(unclosed")],
			..Default::default()
		};

		assert!(matches!(file.compile(), Err(JobError::Pattern(_))));
	}

	#[test]
	fn test_nested_roots_rejected() {
		let (_temp_dir, source, _) = roots();
		let file = JobFile {
			destination: source.join("inner"),
			source,
			..Default::default()
		};

		assert!(matches!(file.compile(), Err(JobError::Invalid(_))));
	}

	#[test]
	fn test_limits() {
		let summary = ResultSummary { files_only_in_source: 3, ..Default::default() };

		assert!(!SyncLimits::default().exceeded_by(&summary));
		assert!(!SyncLimits { files: Some(3), directories: None }.exceeded_by(&summary));
		assert!(SyncLimits { files: Some(2), directories: None }.exceeded_by(&summary));
		assert!(!SyncLimits { files: None, directories: Some(0) }.exceeded_by(&summary));
	}

	#[test]
	fn test_limit_exceeded_leaves_destination_alone() {
		let (_temp_dir, source, dest) = roots();
		fs::write(source.join("a.txt"), "a").unwrap();
		fs::write(source.join("b.txt"), "b").unwrap();
		fs::create_dir(&dest).unwrap();

		let job = JobFile {
			source,
			destination: dest.clone(),
			analyse_first: true,
			file_sync_limit: Some(1),
			..Default::default()
		}
		.compile()
		.unwrap();

		let outcome = run_job(&job, &NoObserver);
		assert_eq!(outcome.exit_code(), 3);
		assert_eq!(outcome.results().summary().files_only_in_source, 2);
		assert!(!dest.join("a.txt").exists());
	}

	#[test]
	fn test_analyse_first_within_limits_synchronises() {
		let (_temp_dir, source, dest) = roots();
		fs::write(source.join("a.txt"), "a").unwrap();

		let job = JobFile {
			source,
			destination: dest.clone(),
			analyse_first: true,
			file_sync_limit: Some(5),
			directory_sync_limit: Some(5),
			..Default::default()
		}
		.compile()
		.unwrap();

		let outcome = run_job(&job, &NoObserver);
		assert_eq!(outcome.exit_code(), 0);
		assert!(dest.join("a.txt").is_file());
		assert!(outcome.results().is_complete());
	}
}

// vim: ts=4
