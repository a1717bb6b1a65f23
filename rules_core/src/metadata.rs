use std::collections::BTreeMap;

use derive_more::Deref;
use derive_more::DerefMut;
use serde_yaml_ng::Value;
use tracing::warn;

/// Field names with a known meaning in the canonical rule format.
pub const DESCRIPTION: &str = "description";
pub const GLOBS: &str = "globs";
pub const ALWAYS_APPLY: &str = "alwaysApply";
pub const TAGS: &str = "tags";

/// A single frontmatter value.
///
/// Rule frontmatter is a flat mapping, so anything richer than a list of
/// scalars is flattened into a string when it is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
	Null,
	Bool(bool),
	String(String),
	List(Vec<String>),
}

impl MetaValue {
	/// Returns true for values that serialize as a bare `key:`.
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Null => true,
			Self::String(value) => value.is_empty(),
			Self::Bool(_) | Self::List(_) => false,
		}
	}

	/// Boolean `true`, or a string equal to `"true"` ignoring case.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Bool(value) => *value,
			Self::String(value) => value.eq_ignore_ascii_case("true"),
			Self::Null | Self::List(_) => false,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}
}

impl From<&str> for MetaValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<bool> for MetaValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<Value> for MetaValue {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::Null,
			Value::Bool(value) => Self::Bool(value),
			Value::Sequence(items) => Self::List(items.into_iter().map(scalar_to_string).collect()),
			Value::Tagged(tagged) => Self::from(tagged.value),
			other => Self::String(scalar_to_string(other)),
		}
	}
}

fn scalar_to_string(value: Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::Bool(value) => value.to_string(),
		Value::Number(value) => value.to_string(),
		Value::String(value) => value,
		Value::Tagged(tagged) => scalar_to_string(tagged.value),
		nested @ (Value::Sequence(_) | Value::Mapping(_)) => {
			match serde_yaml_ng::to_string(&nested) {
				Ok(yaml) => yaml.trim_end().to_string(),
				Err(error) => {
					warn!(%error, "dropping nested frontmatter value that could not be flattened");
					String::new()
				}
			}
		}
	}
}

/// Frontmatter fields of a rule document, ordered by key so that
/// serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Metadata(BTreeMap<String, MetaValue>);

impl Metadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert used by the format policies and tests.
	#[must_use]
	pub fn with(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
		self.0.insert(key.to_string(), value.into());
		self
	}

	/// Keep only the named fields.
	#[must_use]
	pub fn retain_fields(mut self, keep: &[&str]) -> Self {
		self.0.retain(|key, _| keep.contains(&key.as_str()));
		self
	}
}

impl FromIterator<(String, MetaValue)> for Metadata {
	fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
