//! Human readable rendering of the result log
//!
//! Each result becomes at most one line. The same lines can go to the console and to a
//! daily report file named `Diff<yyyymmdd>.txt`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{Local, NaiveDate};

use crate::callbacks::ResultObserver;
use crate::logging::*;
use crate::results::{ItemKind, Reason, SyncResult, SyncResults};

/// Render one result as a report line
///
/// Returns `None` for results that are not reported, i.e. directory results other
/// than presence on one side.
pub fn format_result(result: &SyncResult) -> Option<String> {
	let item = result.message();
	let container = || result.container().map(|c| c.display().to_string()).unwrap_or_default();

	match (result.kind(), result.reason()) {
		(ItemKind::Trace, _) => Some(item.to_string()),
		(_, Some(Reason::OnlyIn)) => Some(format!("'{}' only in '{}'", item, container())),
		(ItemKind::File, Some(Reason::Identical)) => Some(format!("'{}' identical", item)),
		(ItemKind::File, Some(Reason::ModifiedTime)) => {
			Some(format!("'{}' different modified times", item))
		}
		(ItemKind::File, Some(Reason::Length)) => Some(format!("'{}' different lengths", item)),
		_ => None,
	}
}

/// Write every reportable line of a finished log
pub fn write_report<W: Write>(out: &mut W, results: &SyncResults) -> io::Result<()> {
	for line in results.iter().filter_map(format_result) {
		writeln!(out, "{}", line)?;
	}
	Ok(())
}

/// Prints results to stdout as they arrive
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ResultObserver for ConsoleReporter {
	fn on_result(&self, result: &SyncResult) {
		if let Some(line) = format_result(result) {
			println!("{}", line);
		}
	}
}

/// Name of the report file for a given day
pub fn report_file_name(date: NaiveDate) -> String {
	format!("Diff{}.txt", date.format("%Y%m%d"))
}

/// Appends results to the report file of the current day
///
/// Every line is flushed as soon as it is written, so an interrupted run still leaves
/// a usable report.
#[derive(Debug)]
pub struct ReportFile {
	path: PathBuf,
	file: Mutex<File>,
}

impl ReportFile {
	/// Open (or create) today's report file in `dir`
	pub fn open_in(dir: &Path) -> io::Result<Self> {
		Self::open(dir.join(report_file_name(Local::now().date_naive())))
	}

	pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
		let path = path.into();
		let file = OpenOptions::new().create(true).append(true).open(&path)?;
		debug!("Appending report to {}", path.display());
		Ok(ReportFile { path, file: Mutex::new(file) })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Append one line and flush it
	pub fn write_line(&self, line: &str) -> io::Result<()> {
		let mut file = self
			.file
			.lock()
			.map_err(|_| io::Error::new(io::ErrorKind::Other, "report file lock poisoned"))?;
		writeln!(file, "{}", line)?;
		file.flush()
	}
}

impl ResultObserver for ReportFile {
	fn on_result(&self, result: &SyncResult) {
		if let Some(line) = format_result(result) {
			if let Err(e) = self.write_line(&line) {
				warn!("Cannot write to report {}: {}", self.path.display(), e);
			}
		}
	}
}


// vim: ts=4
