use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::FrontmatterError;
use crate::format::Format;
use crate::format::MetadataPolicy;
use crate::format::Output;
use crate::frontmatter;
use crate::metadata::ALWAYS_APPLY;
use crate::metadata::DESCRIPTION;
use crate::metadata::GLOBS;
use crate::metadata::MetaValue;
use crate::metadata::Metadata;

const TRIGGER: &str = "trigger";
const APPLY_TO: &str = "applyTo";
const ALL_FILES: &str = "**";

/// Map canonical metadata onto the fields `format` understands.
///
/// This never fails: fields the policy does not know are dropped and fields
/// it needs but cannot find fall back to their defaults.
pub fn transform_metadata(metadata: &Metadata, format: &Format) -> Metadata {
	match format.policy {
		MetadataPolicy::Passthrough { keep, seed_empty } => {
			if seed_empty && metadata.is_empty() {
				return Metadata::new()
					.with(DESCRIPTION, MetaValue::Null)
					.with(GLOBS, MetaValue::Null)
					.with(ALWAYS_APPLY, true);
			}
			metadata.clone().retain_fields(keep)
		}
		MetadataPolicy::Trigger { keep } => {
			// A missing `alwaysApply` means manual here, unlike the
			// single-file applicability check.
			let trigger = match metadata.get(ALWAYS_APPLY) {
				Some(MetaValue::Bool(true)) => "always_on",
				_ => "manual",
			};
			metadata
				.clone()
				.with(TRIGGER, trigger)
				.retain_fields(keep)
		}
		MetadataPolicy::ApplyTo { keep } => {
			let apply_to = match metadata.get(GLOBS) {
				Some(MetaValue::List(globs)) if !globs.is_empty() => {
					MetaValue::String(globs.join(","))
				}
				Some(globs @ MetaValue::String(_)) if !globs.is_blank() => globs.clone(),
				_ => MetaValue::from(ALL_FILES),
			};
			metadata
				.clone()
				.with(APPLY_TO, apply_to)
				.retain_fields(keep)
		}
		MetadataPolicy::DescriptionOnly => metadata.clone().retain_fields(&[DESCRIPTION]),
		MetadataPolicy::Suppress => Metadata::new(),
	}
}

/// Whether the rule in `content` belongs in the output of `format`.
///
/// Directory formats take every rule. Single-file formats take a rule when it
/// has no metadata at all or when `alwaysApply` is truthy. A header that fails
/// to parse counts as no metadata.
pub fn is_applicable(content: &str, format: &Format) -> bool {
	check_applicability(content, format).unwrap_or(true)
}

/// Like [`is_applicable`], but hands back the parse error of a malformed
/// header so the caller can report it before including the rule.
pub fn check_applicability(content: &str, format: &Format) -> Result<bool, FrontmatterError> {
	if !format.is_single_file() {
		return Ok(true);
	}

	let (metadata, _) = frontmatter::parse(content)?;
	Ok(is_always_applied(&metadata))
}

/// Applicability of already parsed metadata for single-file formats.
pub fn is_always_applied(metadata: &Metadata) -> bool {
	metadata.is_empty() || metadata.get(ALWAYS_APPLY).is_some_and(MetaValue::is_truthy)
}

/// Produce the text written for one rule in a directory format.
///
/// The body is trimmed. When the transformed metadata is empty only the body
/// is returned, otherwise it is preceded by a `---` delimited header and a
/// blank line.
pub fn render_document(content: &str, format: &Format) -> Result<String, FrontmatterError> {
	let (metadata, body) = frontmatter::parse(content)?;
	let transformed = transform_metadata(&metadata, format);
	let body = body.trim();

	if transformed.is_empty() {
		return Ok(body.to_string());
	}

	Ok(format!(
		"---\n{}---\n\n{body}",
		frontmatter::serialize(&transformed)
	))
}

/// Produce the `## title` section for one rule in a single-file format.
pub fn render_section(content: &str, relative_path: &Path) -> String {
	let body = frontmatter::split(content).body;
	let body = body.trim();
	let title = extract_title(body).map_or_else(|| rule_name(relative_path), str::to_string);

	format!("## {title}\n\n{body}\n\n")
}

/// The text of the first `# heading` line in `body`.
///
/// Only level one headings count: a single `#` followed by whitespace.
pub fn extract_title(body: &str) -> Option<&str> {
	body.lines().find_map(|line| {
		let rest = line.strip_prefix('#')?;
		if !rest.starts_with([' ', '\t']) {
			return None;
		}
		let title = rest.trim();
		(!title.is_empty()).then_some(title)
	})
}

/// A rule's name: its relative path without the extension, `/` separated.
pub fn rule_name(relative_path: &Path) -> String {
	let stem = relative_path.with_extension("");
	stem.components()
		.filter_map(|component| {
			match component {
				Component::Normal(part) => Some(part.to_string_lossy()),
				_ => None,
			}
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// The output path of a rule relative to the project root, or `None` for
/// single-file formats.
///
/// Only the final `.md` is replaced, so `a.instructions.md` rendered with the
/// extension `.mdc` becomes `a.instructions.mdc`.
pub fn target_path(relative_path: &Path, format: &Format) -> Option<PathBuf> {
	let Output::Directory { prefix, extension } = format.output else {
		return None;
	};

	let file_name = relative_path.file_name()?;
	let mut name = if relative_path.extension() == Some(OsStr::new("md")) {
		relative_path.file_stem().unwrap_or(file_name).to_os_string()
	} else {
		file_name.to_os_string()
	};
	name.push(extension);

	Some(Path::new(prefix).join(relative_path.with_file_name(name)))
}
