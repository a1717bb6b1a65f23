use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::RulesError;
use crate::RulesResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["rules.toml", ".rules.toml", ".config/rules.toml"];

/// Environment variable that overrides `default_format`.
pub const DEFAULT_FORMAT_ENV: &str = "RULES_DEFAULT_FORMAT";

/// Configuration loaded from a `rules.toml` file.
///
/// ```toml
/// source = ".rules"
/// default_format = "cursor"
///
/// [exclude]
/// patterns = ["drafts/", "*.wip.md"]
/// ```
#[derive(Debug, Deserialize)]
pub struct RulesConfig {
	/// Directory holding the canonical rules, relative to the project root.
	#[serde(default = "default_source")]
	pub source: PathBuf,
	/// Format rendered by `rules render` when none is given.
	#[serde(default)]
	pub default_format: Option<String>,
	/// Rules to leave out of every render.
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

/// Gitignore-style patterns, relative to the source directory, for rules
/// that are never rendered.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_source() -> PathBuf {
	PathBuf::from(".rules")
}

impl Default for RulesConfig {
	fn default() -> Self {
		Self {
			source: default_source(),
			default_format: None,
			exclude: ExcludeConfig::default(),
		}
	}
}

impl RulesConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> RulesResult<Option<RulesConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: RulesConfig =
			toml::from_str(&content).map_err(|e| RulesError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults when there is none.
	pub fn load_or_default(root: &Path) -> RulesResult<RulesConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// The source rule tree, resolved against `root`.
	pub fn source_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.source)
	}

	/// The format to render when the command line names none:
	/// `RULES_DEFAULT_FORMAT` first, then `default_format`.
	pub fn default_format(&self) -> Option<String> {
		std::env::var(DEFAULT_FORMAT_ENV)
			.ok()
			.filter(|name| !name.is_empty())
			.or_else(|| self.default_format.clone())
	}
}
