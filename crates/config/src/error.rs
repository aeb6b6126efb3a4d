//! Error types for option parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading navigation options.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading an options file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is out of range.
	#[error("invalid option: {0}")]
	Invalid(String),
}

/// Result type for option loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
