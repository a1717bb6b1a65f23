use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use rules_cli::Commands;
use rules_cli::OutputFormat;
use rules_cli::RulesCli;
use rules_core::FORMATS;
use rules_core::Format;
use rules_core::RenderOptions;
use rules_core::RulesConfig;
use rules_core::RulesError;
use rules_core::detect_formats;
use rules_core::render_rules;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,dimmed) => {
		if color_enabled() {
			format!("{}", $text.dimmed())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = RulesCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render { format, source }) => {
			run_render(&args, format.as_deref(), source.as_deref())
		}
		Some(Commands::Formats { format }) => run_formats(*format),
		Some(Commands::Init) => run_init(&args),
		None => {
			eprintln!("No subcommand specified. Run `rules --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<RulesError>() {
			Ok(rules_err) => {
				let report: miette::Report = (*rules_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so rendered output on stdout stays clean. `RUST_LOG`
/// overrides the level picked from `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &RulesCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn run_render(args: &RulesCli, format: Option<&str>, source: Option<&Path>) -> CliResult {
	let root = resolve_root(args);
	let mut config = RulesConfig::load_or_default(&root)?;

	let name = format
		.map(str::to_string)
		.or_else(|| config.default_format())
		.ok_or(RulesError::MissingFormat)?;
	let format = Format::lookup(&name)?;
	if format.is_default() {
		return Err(RulesError::RenderToSource.into());
	}

	if let Some(source) = source {
		config.source = source.to_path_buf();
	}
	let options = RenderOptions::from_config(&root, &config)?;

	println!("Rendering rules to {} format...", colored!(format.name, bold));
	let report = render_rules(&options, format)?;

	if args.verbose {
		for output in &report.outputs {
			println!("  {}", colored!(make_relative(output, &root), dimmed));
		}
		if report.skipped > 0 {
			println!(
				"  {}",
				colored!(
					format!("{} rule(s) skipped as not always applied", report.skipped),
					dimmed
				)
			);
		}
	}

	println!(
		"{} {} rule(s) to {}",
		colored!("Successfully rendered", green),
		report.rendered,
		format.location()
	);

	Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatEntry {
	name: &'static str,
	description: &'static str,
	single_file: bool,
	location: &'static str,
}

fn run_formats(output: OutputFormat) -> CliResult {
	match output {
		OutputFormat::Json => {
			let entries: Vec<FormatEntry> = FORMATS
				.iter()
				.map(|format| {
					FormatEntry {
						name: format.name,
						description: format.description,
						single_file: format.is_single_file(),
						location: format.location(),
					}
				})
				.collect();
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Text => {
			println!("{}", colored!("Available formats:", bold));
			for format in FORMATS {
				let kind = if format.is_single_file() {
					"file"
				} else {
					"dir "
				};
				println!(
					"  {} {kind} {:<24} {}",
					colored!(format!("{:<10}", format.name), bold),
					format.location(),
					colored!(format.description, dimmed)
				);
			}
		}
	}

	Ok(())
}

const SAMPLE_CONFIG: &str = "# rules configuration\n\n# Directory holding the canonical rules, \
                             relative to the project root.\nsource = \".rules\"\n\n# Format \
                             rendered by `rules render` when none is given. The \
                             RULES_DEFAULT_FORMAT\n# environment variable takes precedence.\n# \
                             default_format = \"cursor\"\n\n# Gitignore-style patterns, relative \
                             to the source directory, for rules that\n# are never rendered.\n# \
                             [exclude]\n# patterns = [\"drafts/\"]\n";

fn run_init(args: &RulesCli) -> CliResult {
	let root = resolve_root(args);
	let config = RulesConfig::load_or_default(&root)?;
	let source = config.source_dir(&root);

	if source.is_dir() {
		println!("Source directory already exists: {}", source.display());
	} else {
		std::fs::create_dir_all(&source).map_err(|error| {
			RulesError::Write {
				path: source.display().to_string(),
				source: error,
			}
		})?;
		println!("Created source directory: {}", source.display());
	}

	if let Some(config_path) = RulesConfig::resolve_path(&root) {
		println!("Config file already exists: {}", config_path.display());
	} else {
		let config_path = root.join("rules.toml");
		std::fs::write(&config_path, SAMPLE_CONFIG).map_err(|error| {
			RulesError::Write {
				path: config_path.display().to_string(),
				source: error,
			}
		})?;
		println!("Created rules.toml");
	}

	let detected: Vec<String> = detect_formats(&root)?
		.into_iter()
		.filter(|name| Format::lookup(name).is_ok_and(|format| !format.is_default()))
		.collect();
	if !detected.is_empty() {
		println!();
		println!("Detected existing format folders. Keep them in sync with:");
		for name in &detected {
			println!("  rules render {name}");
		}
	}

	println!();
	println!("Next steps:");
	println!(
		"  1. Add markdown rules to {}",
		make_relative(&source, &root)
	);
	println!("  2. Run `rules formats` to see the supported formats");
	println!("  3. Run `rules render <format>` to generate them");

	Ok(())
}
