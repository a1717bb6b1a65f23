use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render one set of markdown rules for every AI coding assistant.",
	long_about = "rules keeps a single canonical set of markdown rules in `.rules/` and renders \
	              it into the files each AI coding assistant reads: Cursor, Windsurf, Copilot, \
	              Cline, Continue, Cody, Claude, Codex and Amp.\n\nQuick start:\n  rules init             \
	                        Create the source directory and a sample config\n  rules \
	              formats          List the supported formats\n  rules render cursor    Render \
	              the rules for Cursor"
)]
pub struct RulesCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render the source rules into a format.
	///
	/// Directory formats mirror the source tree under the format's directory,
	/// rewriting each rule's frontmatter for the assistant. Single-file
	/// formats concatenate every always-applied rule into one document.
	///
	/// When no format is given, `RULES_DEFAULT_FORMAT` or the
	/// `default_format` from `rules.toml` is used.
	Render {
		/// Name of the format to render, e.g. `cursor` or `claude`.
		format: Option<String>,

		/// Directory holding the canonical rules. Overrides `source` in
		/// `rules.toml`.
		#[arg(long, short)]
		source: Option<PathBuf>,
	},
	/// List the supported formats and where each one is written.
	Formats {
		/// Output format for the listing. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Initialize a project by creating the rules source directory.
	///
	/// Creates `.rules/` and a sample `rules.toml` in the project root.
	/// Existing files are never overwritten.
	Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
