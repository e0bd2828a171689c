//! # treesync - One-way Directory Tree Synchronizer
//!
//! treesync makes a destination tree match a source tree: new and changed files are
//! copied, missing directories are created and, optionally, entries that only exist in
//! the destination are removed. Every decision is recorded in an ordered result log.
//!
//! Files are compared by modification time and length only; contents are never read.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use treesync::{SyncConfig, Synchronizer};
//!
//! let config = SyncConfig::builder()
//!     .source("/data/photos")
//!     .destination("/mnt/backup/photos")
//!     .delete_files(true)
//!     .build()?;
//!
//! let results = Synchronizer::new(&config).start();
//! for result in &results {
//!     println!("{:?} {}", result.reason(), result.message());
//! }
//! # Ok::<(), treesync::ValidationError>(())
//! ```
//!
//! ## Analyse First
//!
//! ```rust,no_run
//! use treesync::callbacks::observer_fn;
//! use treesync::{SyncConfig, Synchronizer};
//!
//! let config = SyncConfig::builder().source("/src").destination("/dst").build()?;
//! let printer = observer_fn(|r| println!("{}", r.message()));
//!
//! let analysis = Synchronizer::new(&config.analysis()).with_observer(&printer).start();
//! if analysis.summary().pending_files() < 100 {
//!     Synchronizer::new(&config.synchronisation()).start();
//! }
//! # Ok::<(), treesync::ValidationError>(())
//! ```

pub mod callbacks;
pub mod config;
pub mod delete;
pub mod error;
pub mod exclusion;
pub mod job;
pub mod logging;
pub mod metadata_utils;
pub mod report;
pub mod results;
pub mod sync;
pub mod validation;

// Re-export commonly used types and functions
pub use callbacks::ResultObserver;
pub use config::{SyncBuilder, SyncConfig};
pub use error::{JobError, SyncError};
pub use exclusion::{DirectoryFilter, FilterList, Pattern, PatternSyntax};
pub use job::{run_job, Job, JobFile, JobOutcome};
pub use results::{ItemKind, Reason, Side, SyncResult, SyncResults};
pub use sync::Synchronizer;
pub use validation::ValidationError;

// vim: ts=4
