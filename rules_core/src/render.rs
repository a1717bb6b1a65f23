use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::RulesError;
use crate::RulesResult;
use crate::config::RulesConfig;
use crate::format::Format;
use crate::format::Output;
use crate::transform::check_applicability;
use crate::transform::render_document;
use crate::transform::render_section;
use crate::transform::target_path;
use crate::walk::RuleFile;
use crate::walk::build_exclude_matcher;
use crate::walk::collect_rule_files;

/// Header that opens every single-file output.
pub const SINGLE_FILE_HEADER: &str = "# Rules\n\n";

/// What a render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
	/// Name of the format that was rendered.
	pub format: &'static str,
	/// Files written, in walk order.
	pub outputs: Vec<PathBuf>,
	/// Rules that made it into the output.
	pub rendered: usize,
	/// Rules left out because they do not apply to the format.
	pub skipped: usize,
}

/// Options shared by both renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
	/// Directory holding the canonical rules.
	pub source: PathBuf,
	/// Project root that format locations are relative to.
	pub root: PathBuf,
	/// Matcher for rules that are never rendered.
	pub exclude: Gitignore,
}

impl RenderOptions {
	/// Options without any exclusions.
	pub fn new(source: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
		Self {
			source: source.into(),
			root: root.into(),
			exclude: Gitignore::empty(),
		}
	}

	/// Construct [`RenderOptions`] for the project at `root` from its
	/// [`RulesConfig`].
	pub fn from_config(root: &Path, config: &RulesConfig) -> RulesResult<Self> {
		let source = config.source_dir(root);
		let exclude = build_exclude_matcher(&source, &config.exclude.patterns)?;

		Ok(Self {
			source,
			root: root.to_path_buf(),
			exclude,
		})
	}
}

/// Render every rule under `options.source` into `format`.
///
/// Directory formats go through [`render_directory`], single-file formats
/// through [`aggregate`].
pub fn render_rules(options: &RenderOptions, format: &Format) -> RulesResult<RenderReport> {
	ensure_source(&options.source)?;

	let report = match format.output {
		Output::Directory { prefix, .. } => {
			let target = options.root.join(prefix);
			create_dir(&target)?;
			render_directory(options, format)?
		}
		Output::SingleFile { path } => {
			if let Some(parent) = options.root.join(path).parent() {
				create_dir(parent)?;
			}
			aggregate(options, format)?
		}
	};

	info!(
		format = format.name,
		rendered = report.rendered,
		skipped = report.skipped,
		"rendered rules"
	);

	Ok(report)
}

/// Write each rule to its mirrored path under the format's directory.
///
/// Existing files at the target are overwritten and unrelated files are left
/// alone. The first error aborts the render; files written before it stay on
/// disk.
pub fn render_directory(options: &RenderOptions, format: &Format) -> RulesResult<RenderReport> {
	ensure_source(&options.source)?;

	let mut report = RenderReport {
		format: format.name,
		outputs: Vec::new(),
		rendered: 0,
		skipped: 0,
	};

	for rule in collect_rule_files(&options.source, &options.exclude)? {
		let content = read_rule(&rule)?;

		if !rule_applies(&rule, &content, format) {
			debug!(path = %rule.relative_path.display(), "skipping rule");
			report.skipped += 1;
			continue;
		}

		let Some(relative_target) = target_path(&rule.relative_path, format) else {
			continue;
		};
		let target = options.root.join(relative_target);

		let rendered = render_document(&content, format).map_err(|source| {
			RulesError::Frontmatter {
				path: rule.path.display().to_string(),
				source,
			}
		})?;

		if let Some(parent) = target.parent() {
			create_dir(parent)?;
		}
		write_file(&target, &rendered)?;

		debug!(path = %rule.relative_path.display(), target = %target.display(), "rendered rule");
		report.outputs.push(target);
		report.rendered += 1;
	}

	Ok(report)
}

/// Concatenate every applicable rule into the format's single file.
///
/// The output starts with [`SINGLE_FILE_HEADER`] followed by one `## title`
/// section per rule in walk order, and never contains frontmatter.
pub fn aggregate(options: &RenderOptions, format: &Format) -> RulesResult<RenderReport> {
	ensure_source(&options.source)?;

	let mut report = RenderReport {
		format: format.name,
		outputs: Vec::new(),
		rendered: 0,
		skipped: 0,
	};
	let mut combined = String::from(SINGLE_FILE_HEADER);

	for rule in collect_rule_files(&options.source, &options.exclude)? {
		let content = read_rule(&rule)?;

		if !rule_applies(&rule, &content, format) {
			debug!(path = %rule.relative_path.display(), "skipping rule");
			report.skipped += 1;
			continue;
		}

		debug!(path = %rule.relative_path.display(), "adding rule");
		combined.push_str(&render_section(&content, &rule.relative_path));
		report.rendered += 1;
	}

	let target = options.root.join(format.location());
	write_file(&target, &combined)?;
	report.outputs.push(target);

	Ok(report)
}

fn ensure_source(source: &Path) -> RulesResult<()> {
	if source.is_dir() {
		Ok(())
	} else {
		Err(RulesError::SourceNotFound {
			path: source.display().to_string(),
		})
	}
}

/// A malformed header never keeps a rule out, but the user is told which
/// file it was.
fn rule_applies(rule: &RuleFile, content: &str, format: &Format) -> bool {
	check_applicability(content, format).unwrap_or_else(|error| {
		warn!(
			path = %rule.relative_path.display(),
			%error,
			"ignoring malformed frontmatter for applicability"
		);
		true
	})
}

fn read_rule(rule: &RuleFile) -> RulesResult<String> {
	std::fs::read_to_string(&rule.path).map_err(|source| {
		RulesError::Read {
			path: rule.path.display().to_string(),
			source,
		}
	})
}

fn create_dir(path: &Path) -> RulesResult<()> {
	if path.as_os_str().is_empty() {
		return Ok(());
	}

	std::fs::create_dir_all(path).map_err(|source| {
		RulesError::Write {
			path: path.display().to_string(),
			source,
		}
	})
}

fn write_file(path: &Path, content: &str) -> RulesResult<()> {
	std::fs::write(path, content).map_err(|source| {
		RulesError::Write {
			path: path.display().to_string(),
			source,
		}
	})
}
