//! Configuration validation functions

use super::ValidationError;
use crate::config::SyncConfig;

/// Validate the filter lists of a configuration
///
/// Include and exclude lists may not both be given for files, nor for directories.
/// Deletion exclusions are only meaningful when the matching delete flag is set.
pub fn validate_filters(config: &SyncConfig) -> Result<(), ValidationError> {
	if !config.include_files.is_empty() && !config.exclude_files.is_empty() {
		return Err(ValidationError::ConfigError(
			"cannot include and exclude files at the same time".to_string(),
		));
	}
	if !config.include_dirs.is_empty() && !config.exclude_dirs.is_empty() {
		return Err(ValidationError::ConfigError(
			"cannot include and exclude directories at the same time".to_string(),
		));
	}
	if !config.delete_exclude_files.is_empty() && !config.delete_files {
		return Err(ValidationError::ConfigError(
			"excluding files from deletion requires file deletion to be enabled".to_string(),
		));
	}
	if !config.delete_exclude_dirs.is_empty() && !config.delete_directories {
		return Err(ValidationError::ConfigError(
			"excluding directories from deletion requires directory deletion to be enabled"
				.to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::exclusion::{DirectoryFilter, Pattern};

	fn rules() -> crate::exclusion::FilterList {
		vec![DirectoryFilter::new(Pattern::regex("x").unwrap())].into()
	}

	#[test]
	fn test_empty_filters_valid() {
		assert!(validate_filters(&SyncConfig::default()).is_ok());
	}

	#[test]
	fn test_file_include_and_exclude() {
		let config =
			SyncConfig { include_files: rules(), exclude_files: rules(), ..Default::default() };
		let result = validate_filters(&config);
		assert!(result.unwrap_err().to_string().contains("files"));
	}

	#[test]
	fn test_dir_include_and_exclude() {
		let config =
			SyncConfig { include_dirs: rules(), exclude_dirs: rules(), ..Default::default() };
		let result = validate_filters(&config);
		assert!(result.unwrap_err().to_string().contains("directories"));
	}

	#[test]
	fn test_file_include_with_dir_exclude_allowed() {
		let config =
			SyncConfig { include_files: rules(), exclude_dirs: rules(), ..Default::default() };
		assert!(validate_filters(&config).is_ok());
	}

	#[test]
	fn test_delete_exclusions_need_delete_flag() {
		let config = SyncConfig { delete_exclude_files: rules(), ..Default::default() };
		assert!(validate_filters(&config).is_err());

		let config =
			SyncConfig { delete_exclude_files: rules(), delete_files: true, ..Default::default() };
		assert!(validate_filters(&config).is_ok());

		let config = SyncConfig { delete_exclude_dirs: rules(), ..Default::default() };
		assert!(validate_filters(&config).is_err());
	}
}

// vim: ts=4
