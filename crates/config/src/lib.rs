//! Options for navigation-bar synchronization.
//!
//! Options are written in TOML. Every key is optional; unknown keys are
//! rejected so typos surface at load time.
//!
//! ```toml
//! [navigation]
//! enabled = true
//! bar-priority = 2
//! language = "powershell"
//!
//! [idle]
//! max-windows-per-tick = 0
//! ```

use std::path::Path;

use serde::Deserialize;

pub mod error;

pub use error::{ConfigError, Result};

/// Default slot priority for the dropdown bar.
pub const DEFAULT_BAR_PRIORITY: i32 = 2;
/// Content type whose buffers carry a pre-installed tokenizer.
pub const DEFAULT_LANGUAGE: &str = "powershell";

/// Top-level navigation options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationOptions {
	pub navigation: NavigationSection,
	pub idle: IdleSection,
}

/// `[navigation]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct NavigationSection {
	/// Whether windows get a navigation bar when adorned.
	pub enabled: bool,
	/// Priority slot passed to the host when installing the bar.
	pub bar_priority: i32,
	/// Content type owned by the pre-installed tokenizer.
	pub language: String,
}

impl Default for NavigationSection {
	fn default() -> Self {
		Self {
			enabled: true,
			bar_priority: DEFAULT_BAR_PRIORITY,
			language: DEFAULT_LANGUAGE.to_string(),
		}
	}
}

/// `[idle]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct IdleSection {
	/// Upper bound on windows visited per idle tick. `0` means unbounded.
	pub max_windows_per_tick: usize,
}

impl IdleSection {
	/// Returns the per-tick cap, if any.
	pub fn window_cap(&self) -> Option<usize> {
		(self.max_windows_per_tick > 0).then_some(self.max_windows_per_tick)
	}
}

impl NavigationOptions {
	/// Parses and validates options from TOML text.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let opts: Self = toml::from_str(input)?;
		opts.validate()?;
		Ok(opts)
	}

	/// Reads and parses an options file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	fn validate(&self) -> Result<()> {
		if self.navigation.bar_priority < 0 {
			return Err(ConfigError::Invalid(format!(
				"navigation.bar-priority must be non-negative, got {}",
				self.navigation.bar_priority
			)));
		}
		if self.navigation.language.trim().is_empty() {
			return Err(ConfigError::Invalid("navigation.language must not be empty".into()));
		}
		Ok(())
	}
}
