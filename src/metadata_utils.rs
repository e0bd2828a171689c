//! Platform helpers for entry attributes (hidden, read-only, timestamps)

use filetime::FileTime;
use std::fs::{self, Metadata, Permissions};
use std::io;
use std::path::Path;

/// Check if an entry is hidden
///
/// On Unix an entry is hidden when its name starts with a dot; on Windows the hidden
/// attribute bit is checked.
pub fn is_hidden(name: &str, metadata: &Metadata) -> bool {
	#[cfg(windows)]
	{
		use std::os::windows::fs::MetadataExt;
		const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
		let _ = name;
		metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
	}

	#[cfg(not(windows))]
	{
		let _ = metadata;
		name.starts_with('.')
	}
}

/// Permissions with the owner write bit set
fn writable(mut permissions: Permissions) -> Permissions {
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		let mode = permissions.mode();
		permissions.set_mode(mode | 0o200);
	}

	#[cfg(not(unix))]
	{
		#[allow(clippy::permissions_set_readonly_false)]
		permissions.set_readonly(false);
	}

	permissions
}

/// Make an entry writable if it is read-only
///
/// Symlinks are not followed.
pub fn clear_readonly(path: &Path) -> io::Result<()> {
	let metadata = fs::symlink_metadata(path)?;
	if metadata.file_type().is_symlink() {
		return Ok(());
	}
	if metadata.permissions().readonly() {
		fs::set_permissions(path, writable(metadata.permissions()))?;
	}
	Ok(())
}

/// Check if `path` is a symlink, without following it
pub fn is_symlink(path: &Path) -> bool {
	fs::symlink_metadata(path).map(|m| m.file_type().is_symlink()).unwrap_or(false)
}

/// Remove a symlink itself, whatever it points to
pub fn remove_symlink(path: &Path) -> io::Result<()> {
	#[cfg(windows)]
	{
		// Directory symlinks and junctions are removed as directories on Windows
		fs::remove_dir(path).or_else(|_| fs::remove_file(path))
	}

	#[cfg(not(windows))]
	{
		fs::remove_file(path)
	}
}

/// Give `dest` the modification time and permission bits of the source file
///
/// The timestamp is written first, while the destination is still writable.
pub fn copy_attributes(source: &Metadata, dest: &Path) -> io::Result<()> {
	filetime::set_file_mtime(dest, FileTime::from_last_modification_time(source))?;
	fs::set_permissions(dest, source.permissions())
}


// vim: ts=4
