use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use treesync::callbacks::ObserverSet;
use treesync::job::{run_job, FilterSpec, JobFile};
use treesync::logging::*;
use treesync::report::{ConsoleReporter, ReportFile};

///////////////////////
// Utility functions //
///////////////////////

/// Split a comma or space separated list of patterns
fn pattern_list(list: &str) -> Vec<FilterSpec> {
	list.split([',', ' ']).filter(|s| !s.is_empty()).map(FilterSpec::from).collect()
}

fn append_patterns(target: &mut Vec<FilterSpec>, matches: &ArgMatches, id: &str) {
	if let Some(values) = matches.get_many::<String>(id) {
		for value in values {
			target.extend(pattern_list(value));
		}
	}
}

fn cli() -> Command {
	let flag = |id: &'static str, long: &'static str, help: &'static str| {
		Arg::new(id).long(long).action(ArgAction::SetTrue).help(help)
	};
	let list = |id: &'static str, long: &'static str, help: &'static str| {
		Arg::new(id).long(long).value_name("PATTERNS").action(ArgAction::Append).help(help)
	};

	Command::new("treesync")
		.version(env!("CARGO_PKG_VERSION"))
		.author("Szilard Hajba <szilu@symbion.hu>")
		.about("One-way directory tree synchronizer")
		.after_help(
			"Include and exclude options for the same kind of entry may not be combined.\n\
			 --no-delete-files and --no-delete-dirs require the matching deletion to be enabled.",
		)
		.arg(Arg::new("source").value_name("SOURCE").required_unless_present("job"))
		.arg(Arg::new("destination").value_name("DESTINATION").required_unless_present("job"))
		.arg(
			Arg::new("job")
				.long("job")
				.value_name("FILE")
				.conflicts_with_all(["source", "destination"])
				.help("Run the job described in a TOML or JSON5 file"),
		)
		.arg(flag("analyse", "analyse", "Analysis only, no synchronisation").short('a'))
		.arg(flag("analyse-first", "analyse-first", "Analyse, then synchronise only within the limits"))
		.arg(flag("exclude-hidden", "exclude-hidden", "Exclude hidden files and directories"))
		.arg(flag("exclude-identical", "exclude-identical", "Leave identical files out of the report"))
		.arg(flag("delete", "delete", "Delete destination-only files and directories").short('d'))
		.arg(flag("delete-files", "delete-files", "Delete destination-only files"))
		.arg(flag("delete-dirs", "delete-dirs", "Delete destination-only directories"))
		.arg(list("exclude-files", "exclude-files", "Exclude source files matching any pattern"))
		.arg(list("exclude-dirs", "exclude-dirs", "Exclude source directories matching any pattern"))
		.arg(list("include-files", "include-files", "Only include top-level files matching a pattern"))
		.arg(list("include-dirs", "include-dirs", "Only include top-level directories matching a pattern"))
		.arg(list("no-delete-files", "no-delete-files", "Never delete files matching any pattern"))
		.arg(list("no-delete-dirs", "no-delete-dirs", "Never delete directories matching any pattern"))
		.arg(flag("glob", "glob", "Treat patterns as globs instead of regular expressions"))
		.arg(
			Arg::new("file-limit")
				.long("file-limit")
				.value_name("COUNT")
				.value_parser(value_parser!(usize))
				.help("Maximum number of files to synchronise with --analyse-first"),
		)
		.arg(
			Arg::new("dir-limit")
				.long("dir-limit")
				.value_name("COUNT")
				.value_parser(value_parser!(usize))
				.help("Maximum number of directories to synchronise with --analyse-first"),
		)
		.arg(
			Arg::new("report-dir")
				.long("report-dir")
				.value_name("DIR")
				.value_parser(value_parser!(PathBuf))
				.help("Also append the report to Diff<date>.txt in this directory"),
		)
		.arg(flag("json", "json", "Print the result log as JSON when finished"))
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::Count)
				.help("Increase diagnostic output (repeatable)"),
		)
		.arg(flag("quiet", "quiet", "Only print errors to stderr").short('q'))
}

/// Build the job from a job file or the positional arguments, then apply the flags
fn job_from_args(matches: &ArgMatches) -> Result<JobFile, Box<dyn Error>> {
	let mut job = match matches.get_one::<String>("job") {
		Some(path) => JobFile::load(Path::new(path))?,
		None => JobFile {
			source: matches.get_one::<String>("source").ok_or("SOURCE is required")?.into(),
			destination: matches
				.get_one::<String>("destination")
				.ok_or("DESTINATION is required")?
				.into(),
			..Default::default()
		},
	};

	let set = |id: &str| matches.get_flag(id);
	job.analyse_only |= set("analyse");
	job.analyse_first |= set("analyse-first");
	job.exclude_hidden |= set("exclude-hidden");
	job.exclude_identical |= set("exclude-identical");
	job.delete_files |= set("delete") || set("delete-files");
	job.delete_directories |= set("delete") || set("delete-dirs");
	if set("glob") {
		job.use_regex = false;
	}

	append_patterns(&mut job.exclude_files, matches, "exclude-files");
	append_patterns(&mut job.exclude_dirs, matches, "exclude-dirs");
	append_patterns(&mut job.include_files, matches, "include-files");
	append_patterns(&mut job.include_dirs, matches, "include-dirs");
	append_patterns(&mut job.delete_exclude_files, matches, "no-delete-files");
	append_patterns(&mut job.delete_exclude_dirs, matches, "no-delete-dirs");

	if let Some(limit) = matches.get_one::<usize>("file-limit") {
		job.file_sync_limit = Some(*limit);
	}
	if let Some(limit) = matches.get_one::<usize>("dir-limit") {
		job.directory_sync_limit = Some(*limit);
	}

	Ok(job)
}

fn run(matches: &ArgMatches) -> Result<i32, Box<dyn Error>> {
	let job = job_from_args(matches)?.compile()?;
	let json = matches.get_flag("json");

	let mut observers = ObserverSet::new();
	if !json {
		observers.push(Box::new(ConsoleReporter));
	}
	if let Some(dir) = matches.get_one::<PathBuf>("report-dir") {
		let report = ReportFile::open_in(dir)?;
		info!("Writing report to {}", report.path().display());
		observers.push(Box::new(report));
	}

	if !json {
		println!(
			"Synchronising source '{}' and destination '{}'",
			job.config.source.display(),
			job.config.destination.display()
		);
	}

	let outcome = run_job(&job, &observers);
	if json {
		println!("{}", serde_json::to_string_pretty(outcome.results())?);
	}

	let summary = outcome.results().summary();
	info!(
		"Finished: {} files and {} directories pending, {} errors",
		summary.pending_files(),
		summary.pending_directories(),
		summary.errors
	);

	Ok(outcome.exit_code())
}

fn main() {
	let matches = cli().get_matches();
	init_tracing(matches.get_count("verbose"), matches.get_flag("quiet"));

	let code = match run(&matches) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("treesync: {}", e);
			eprintln!("Try 'treesync --help' for more information");
			2
		}
	};
	process::exit(code);
}


// vim: ts=4
