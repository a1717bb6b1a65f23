use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::RulesError;
use crate::RulesResult;

/// A markdown rule found in the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFile {
	/// Full path, `source` joined with `relative_path`.
	pub path: PathBuf,
	/// Position inside the source tree.
	pub relative_path: PathBuf,
}

/// Build a `Gitignore` matcher for the `[exclude]` patterns in `rules.toml`,
/// anchored at the source tree.
pub fn build_exclude_matcher(source: &Path, patterns: &[String]) -> RulesResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(source);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			RulesError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| RulesError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Collect every `.md` file below `source`.
///
/// Each directory's entries are visited in file name order and directories
/// are descended into as they are met, so the result is a stable depth-first
/// listing. Other file types are skipped.
pub fn collect_rule_files(source: &Path, exclude: &Gitignore) -> RulesResult<Vec<RuleFile>> {
	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(source, source, exclude, &mut files, &mut visited_dirs)?;
	Ok(files)
}

fn walk_dir(
	source: &Path,
	dir: &Path,
	exclude: &Gitignore,
	files: &mut Vec<RuleFile>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> RulesResult<()> {
	let walk_error = |source: std::io::Error| {
		RulesError::Walk {
			path: dir.display().to_string(),
			source,
		}
	};

	// Detect symlink cycles by tracking the canonical paths of ancestors.
	let canonical = dir.canonicalize().map_err(walk_error)?;
	if !visited_dirs.insert(canonical.clone()) {
		return Err(RulesError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	let mut entries = std::fs::read_dir(dir)
		.map_err(walk_error)?
		.map(|entry| entry.map(|entry| entry.path()))
		.collect::<Result<Vec<_>, _>>()
		.map_err(walk_error)?;
	entries.sort();

	for path in entries {
		let is_dir = path.is_dir();
		if exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(source, &path, exclude, files, visited_dirs)?;
		} else if is_rule_file(&path) {
			let relative_path = path.strip_prefix(source).unwrap_or(&path).to_path_buf();
			files.push(RuleFile {
				path,
				relative_path,
			});
		}
	}

	visited_dirs.remove(&canonical);

	Ok(())
}

/// Rules are selected by the `.md` suffix of the file name alone.
fn is_rule_file(path: &Path) -> bool {
	path.is_file()
		&& path
			.file_name()
			.is_some_and(|name| name.as_encoded_bytes().ends_with(b".md"))
}
