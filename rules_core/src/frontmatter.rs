//! Reading and writing the YAML header of a rule document.
//!
//! A header is only recognised when the very first line is `---`. Everything
//! up to the next bare `---` line is the header, the rest is the body. An
//! empty header parses to empty [`Metadata`], which callers treat exactly like
//! a document without one.

use std::borrow::Cow;
use std::fmt::Write;

use serde_yaml_ng::Value;

use crate::FrontmatterError;
use crate::metadata::MetaValue;
use crate::metadata::Metadata;

const DELIMITER: &str = "---";

/// The structural split of a document, before the header is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument<'a> {
	/// The header lines joined by `\n`, or `None` when there is no header.
	pub header: Option<String>,
	/// The body. Borrowed unchanged when there is no header.
	pub body: Cow<'a, str>,
}

fn is_delimiter(line: &str) -> bool {
	line.trim_end() == DELIMITER
}

/// Returns true when the first line of `content` opens a header block.
pub fn has_frontmatter(content: &str) -> bool {
	content.lines().next().is_some_and(is_delimiter)
}

/// Separate the header from the body without parsing the header.
///
/// An unterminated header swallows the remainder of the document, leaving the
/// body empty.
pub fn split(content: &str) -> RawDocument<'_> {
	if !has_frontmatter(content) {
		return RawDocument {
			header: None,
			body: content.into(),
		};
	}

	let mut lines = content.lines().skip(1);
	let mut header = Vec::new();
	for line in lines.by_ref() {
		if is_delimiter(line) {
			break;
		}
		header.push(line);
	}
	let body = lines.collect::<Vec<_>>().join("\n");

	RawDocument {
		header: Some(header.join("\n")),
		body: body.into(),
	}
}

/// Parse the header of `content` into [`Metadata`] and return it with the
/// body.
pub fn parse(content: &str) -> Result<(Metadata, Cow<'_, str>), FrontmatterError> {
	let RawDocument { header, body } = split(content);
	let metadata = match header {
		Some(header) => parse_header(&header)?,
		None => Metadata::new(),
	};

	Ok((metadata, body))
}

fn parse_header(header: &str) -> Result<Metadata, FrontmatterError> {
	match serde_yaml_ng::from_str::<Value>(header)? {
		Value::Null => Ok(Metadata::new()),
		Value::Mapping(mapping) => {
			Ok(mapping
				.into_iter()
				.map(|(key, value)| (key_to_string(key), MetaValue::from(value)))
				.collect())
		}
		Value::Bool(_) => Err(FrontmatterError::NotAMapping("a boolean")),
		Value::Number(_) => Err(FrontmatterError::NotAMapping("a number")),
		Value::String(_) => Err(FrontmatterError::NotAMapping("a string")),
		Value::Sequence(_) => Err(FrontmatterError::NotAMapping("a list")),
		Value::Tagged(_) => Err(FrontmatterError::NotAMapping("a tagged value")),
	}
}

fn key_to_string(key: Value) -> String {
	match key {
		Value::String(key) => key,
		other => {
			match MetaValue::from(other) {
				MetaValue::String(key) => key,
				MetaValue::Bool(key) => key.to_string(),
				MetaValue::Null => "null".to_string(),
				MetaValue::List(items) => items.join(","),
			}
		}
	}
}

/// Serialize `metadata` as header lines, without the `---` delimiters.
///
/// Blank values are written as a bare `key:` rather than `key: null` or
/// `key: ""`, which several assistants fail to read.
pub fn serialize(metadata: &Metadata) -> String {
	let mut output = String::new();
	for (key, value) in metadata.iter() {
		match value {
			MetaValue::Null => {
				let _ = writeln!(output, "{key}:");
			}
			MetaValue::String(value) if value.is_empty() => {
				let _ = writeln!(output, "{key}:");
			}
			MetaValue::String(value) => {
				let _ = writeln!(output, "{key}: {}", quote_scalar(value));
			}
			MetaValue::Bool(value) => {
				let _ = writeln!(output, "{key}: {value}");
			}
			MetaValue::List(items) if items.is_empty() => {
				let _ = writeln!(output, "{key}: []");
			}
			MetaValue::List(items) => {
				let _ = writeln!(output, "{key}:");
				for item in items {
					let _ = writeln!(output, "  - {}", quote_scalar(item));
				}
			}
		}
	}
	output
}

/// Wrap `value` in double quotes when a YAML reader would not read it back as
/// the same plain string.
fn quote_scalar(value: &str) -> String {
	if is_plain_safe(value) {
		return value.to_string();
	}

	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');
	for ch in value.chars() {
		match ch {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			'\r' => quoted.push_str("\\r"),
			'\t' => quoted.push_str("\\t"),
			ch if ch.is_control() => {
				let _ = write!(quoted, "\\u{:04x}", u32::from(ch));
			}
			ch => quoted.push(ch),
		}
	}
	quoted.push('"');
	quoted
}

fn is_plain_safe(value: &str) -> bool {
	const INDICATORS: &[char] = &[
		'-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
		'`',
	];
	const RESERVED: &[&str] = &["true", "false", "null", "~", "yes", "no", "on", "off"];

	let Some(first) = value.chars().next() else {
		return false;
	};

	!INDICATORS.contains(&first)
		&& value.trim() == value
		&& !value.contains(": ")
		&& !value.contains(" #")
		&& !value.ends_with(':')
		&& !value.chars().any(char::is_control)
		&& !RESERVED.iter().any(|word| value.eq_ignore_ascii_case(word))
		&& !looks_numeric(value)
}

fn looks_numeric(value: &str) -> bool {
	let unsigned = value.trim_start_matches(['+', '-']);
	value.parse::<f64>().is_ok()
		|| unsigned.starts_with("0x")
		|| unsigned.starts_with("0o")
		|| unsigned.eq_ignore_ascii_case(".inf")
		|| value.eq_ignore_ascii_case(".nan")
}
