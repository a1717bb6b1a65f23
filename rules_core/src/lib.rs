//! `rules_core` renders one canonical set of markdown rules into the formats
//! read by AI coding assistants such as Cursor, Windsurf, Copilot and Claude.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source rule tree (.rules/**/*.md)
//!   → Walker (depth-first, file name order, `.md` files only)
//!   → Frontmatter codec (splits the `---` header from the body)
//!   → Applicability filter (single-file formats keep always-applied rules)
//!   → Metadata transformer (per-format field policy)
//!   → Directory renderer (mirrored tree) or single-file aggregator (one document)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Loads `rules.toml` with the source directory,
//!   default format and exclude patterns.
//! - [`format`]: The static table of supported formats.
//! - [`frontmatter`]: Parsing and serializing rule headers.
//! - [`transform`]: Pure per-document transforms, usable without a
//!   filesystem.
//! - [`render`]: The directory renderer and the single-file aggregator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rules_core::Format;
//! use rules_core::RenderOptions;
//! use rules_core::render_rules;
//!
//! let format = Format::lookup("cursor").unwrap();
//! let options = RenderOptions::new(".rules", ".");
//! let report = render_rules(&options, format).unwrap();
//! println!("wrote {} file(s)", report.outputs.len());
//! ```

pub use config::*;
pub use error::*;
pub use format::*;
pub use metadata::*;
pub use render::*;
pub use transform::*;
pub use walk::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod format;
pub mod frontmatter;
mod metadata;
pub mod render;
pub mod transform;
mod walk;
