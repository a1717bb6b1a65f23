use miette::Diagnostic;
use thiserror::Error;

/// A frontmatter block that could not be read as a key-value mapping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrontmatterError {
	#[error("invalid yaml: {0}")]
	Yaml(#[from] serde_yaml_ng::Error),

	#[error("expected a mapping of fields, found {0}")]
	NotAMapping(&'static str),
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum RulesError {
	#[error(transparent)]
	#[diagnostic(code(rules::io_error))]
	Io(#[from] std::io::Error),

	#[error("source directory {path} does not exist")]
	#[diagnostic(
		code(rules::source_not_found),
		help("create the directory or point `--source` at an existing rule tree")
	)]
	SourceNotFound { path: String },

	#[error("failed to parse frontmatter in `{path}`")]
	#[diagnostic(
		code(rules::frontmatter),
		help("the block between the leading `---` lines must be a yaml mapping")
	)]
	Frontmatter {
		path: String,
		#[source]
		source: FrontmatterError,
	},

	#[error("failed to read source file `{path}`")]
	#[diagnostic(code(rules::read))]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to write `{path}`")]
	#[diagnostic(code(rules::write))]
	Write {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to walk directory `{path}`")]
	#[diagnostic(code(rules::walk))]
	Walk {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(rules::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("unknown format: `{0}`")]
	#[diagnostic(
		code(rules::unknown_format),
		help("run `rules formats` to list the supported formats")
	)]
	UnknownFormat(String),

	#[error("cannot render to the default format as it is the source")]
	#[diagnostic(
		code(rules::render_to_source),
		help("pick a target such as `cursor`, `copilot` or `claude`")
	)]
	RenderToSource,

	#[error("no format given")]
	#[diagnostic(
		code(rules::missing_format),
		help("pass a format, set RULES_DEFAULT_FORMAT, or add `default_format` to rules.toml")
	)]
	MissingFormat,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(rules::config_parse),
		help("check that rules.toml is valid TOML with `source`, `default_format` and [exclude]")
	)]
	ConfigParse(String),
}

pub type RulesResult<T> = Result<T, RulesError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
