//! The assistants that rules can be rendered for.
//!
//! Every target is a static [`Format`] entry in [`FORMATS`]. Adding a target
//! means adding a row to that table; the behaviour of each row is fully
//! described by its [`Output`] and [`MetadataPolicy`].

use std::path::Path;

use crate::RulesError;
use crate::RulesResult;
use crate::metadata::ALWAYS_APPLY;
use crate::metadata::DESCRIPTION;
use crate::metadata::GLOBS;

/// Name of the canonical format that every other format is rendered from.
pub const DEFAULT_FORMAT: &str = "default";

/// Where a format writes its rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
	/// One file per rule, mirroring the source tree under `prefix`.
	Directory {
		prefix: &'static str,
		/// Replaces the trailing `.md` of each source file. May itself
		/// contain dots, e.g. `.instructions.md`.
		extension: &'static str,
	},
	/// Every applicable rule concatenated into one file at `path`.
	SingleFile { path: &'static str },
}

/// How a format's frontmatter is derived from the canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataPolicy {
	/// Keep the listed fields and drop everything else. With `seed_empty`,
	/// a rule without any metadata gets an empty `description`, an empty
	/// `globs` and `alwaysApply: true`.
	Passthrough {
		keep: &'static [&'static str],
		seed_empty: bool,
	},
	/// Replace `alwaysApply` with `trigger: always_on | manual`.
	Trigger { keep: &'static [&'static str] },
	/// Replace `globs` with `applyTo`, falling back to `**`.
	ApplyTo { keep: &'static [&'static str] },
	/// Keep only `description`.
	DescriptionOnly,
	/// Emit no frontmatter at all.
	Suppress,
}

/// Static description of one render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
	pub name: &'static str,
	pub description: &'static str,
	pub output: Output,
	pub policy: MetadataPolicy,
}

const CANONICAL_FIELDS: &[&str] = &[ALWAYS_APPLY, DESCRIPTION, GLOBS];

/// Every supported format, in the order `rules formats` lists them.
pub const FORMATS: &[Format] = &[
	Format {
		name: DEFAULT_FORMAT,
		description: "Canonical rules, the source for every other format",
		output: Output::Directory {
			prefix: ".rules",
			extension: ".md",
		},
		policy: MetadataPolicy::Passthrough {
			keep: CANONICAL_FIELDS,
			seed_empty: false,
		},
	},
	Format {
		name: "continue",
		description: "Continue rules",
		output: Output::Directory {
			prefix: ".continue/rules",
			extension: ".md",
		},
		policy: MetadataPolicy::Passthrough {
			keep: CANONICAL_FIELDS,
			seed_empty: false,
		},
	},
	Format {
		name: "cursor",
		description: "Cursor project rules",
		output: Output::Directory {
			prefix: ".cursor/rules",
			extension: ".mdc",
		},
		policy: MetadataPolicy::Passthrough {
			keep: CANONICAL_FIELDS,
			seed_empty: true,
		},
	},
	Format {
		name: "windsurf",
		description: "Windsurf rules",
		output: Output::Directory {
			prefix: ".windsurf/rules",
			extension: ".md",
		},
		policy: MetadataPolicy::Trigger {
			keep: &["trigger", DESCRIPTION, GLOBS],
		},
	},
	Format {
		name: "copilot",
		description: "GitHub Copilot custom instructions",
		output: Output::Directory {
			prefix: ".github/instructions",
			extension: ".instructions.md",
		},
		policy: MetadataPolicy::ApplyTo {
			keep: &["applyTo", DESCRIPTION],
		},
	},
	Format {
		name: "cline",
		description: "Cline rules",
		output: Output::Directory {
			prefix: ".clinerules",
			extension: ".md",
		},
		policy: MetadataPolicy::DescriptionOnly,
	},
	Format {
		name: "cody",
		description: "Sourcegraph Cody rules",
		output: Output::Directory {
			prefix: ".sourcegraph",
			extension: ".rule.md",
		},
		policy: MetadataPolicy::DescriptionOnly,
	},
	Format {
		name: "claude",
		description: "Claude project memory",
		output: Output::SingleFile { path: "CLAUDE.md" },
		policy: MetadataPolicy::Suppress,
	},
	Format {
		name: "codex",
		description: "Codex agent instructions",
		output: Output::SingleFile { path: "AGENT.md" },
		policy: MetadataPolicy::Suppress,
	},
	Format {
		name: "amp",
		description: "Amp agent instructions",
		output: Output::SingleFile { path: "AGENT.md" },
		policy: MetadataPolicy::Suppress,
	},
];

impl Format {
	/// Resolve a format by name. An empty name resolves to the default
	/// format.
	pub fn lookup(name: &str) -> RulesResult<&'static Format> {
		let name = if name.is_empty() { DEFAULT_FORMAT } else { name };
		FORMATS
			.iter()
			.find(|format| format.name == name)
			.ok_or_else(|| RulesError::UnknownFormat(name.to_string()))
	}

	pub fn is_single_file(&self) -> bool {
		matches!(self.output, Output::SingleFile { .. })
	}

	pub fn is_default(&self) -> bool {
		self.name == DEFAULT_FORMAT
	}

	/// Output location relative to the project root: the directory prefix
	/// or the single file path.
	pub fn location(&self) -> &'static str {
		match self.output {
			Output::Directory { prefix, .. } => prefix,
			Output::SingleFile { path } => path,
		}
	}
}

/// Names of formats that already have a `.<name>/rules` directory at `root`,
/// sorted.
pub fn detect_formats(root: &Path) -> RulesResult<Vec<String>> {
	let entries = std::fs::read_dir(root).map_err(|source| {
		RulesError::Walk {
			path: root.display().to_string(),
			source,
		}
	})?;

	let mut names = Vec::new();
	for entry in entries {
		let entry = entry.map_err(|source| {
			RulesError::Walk {
				path: root.display().to_string(),
				source,
			}
		})?;
		let path = entry.path();
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		let Some(format_name) = name.strip_prefix('.') else {
			continue;
		};
		if path.is_dir() && path.join("rules").is_dir() {
			names.push(format_name.to_string());
		}
	}
	names.sort();

	Ok(names)
}
