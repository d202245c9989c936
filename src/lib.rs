//! **Breaking-change detection for OpenAPI documents.**
//!
//! `api-diff` compares two revisions of an OpenAPI 3 description and reports
//! what changed, classified by how likely each change is to break existing
//! clients. It powers both a command-line tool for CI gates and changelogs
//! and a Rust library for programmatic use.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the parsed document: paths, operations, parameters,
//!   schemas and security definitions.
//! - **[`diff`]**: the [`DiffEngine`], which aligns the two documents and
//!   builds a structural [`DocumentDiff`](diff::DocumentDiff) tree. Schema
//!   references are followed on both sides, cycles included.
//! - **[`checks`]**: the rule catalogue. Each [`Check`](checks::Check) turns
//!   one area of the diff into classified [`Change`]s.
//! - **[`policy`]**: deprecation and sunset rules, including the minimum
//!   notice required per stability level.
//! - **[`checker`]**: runs the enabled checks and orders their output.
//! - **[`reports`]**: text, JSON and YAML renderers.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use api_diff::{parse_document, Checker, DiffEngine, Level, SourceLocations};
//! use api_diff::config::CheckConfig;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base = parse_document(Path::new("base.yaml"))?;
//!     let revision = parse_document(Path::new("revision.yaml"))?;
//!
//!     let diff = DiffEngine::new().diff(&base.document, &revision.document);
//!     let sources = SourceLocations::new(base.locations, revision.locations);
//!     let changes = Checker::new(CheckConfig::default()).run_filtered(&diff, &sources, Level::Warn);
//!
//!     for change in &changes {
//!         println!("{}", change.summary());
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Check bodies walk long diff trees; splitting hurts readability
    clippy::too_many_lines,
    // Variable names like `base`/`rev` are clear in context
    clippy::similar_names
)]

pub mod changes;
pub mod checker;
pub mod checks;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod policy;
pub mod reports;

// Re-export main types for convenience
pub use changes::{Change, ChangeContext, Level};
pub use checker::Checker;
pub use config::{AppConfig, AppConfigBuilder, CheckConfig, CheckConfigBuilder};
pub use config::{BehaviorConfig, ChecksConfig, MatchingConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{DiffEngine, DiffOptions, DocumentDiff};
pub use error::{ApiDiffError, ErrorContext, OptionContext, Result};
pub use loader::{parse_document, parse_document_str, LoadedDocument};
pub use model::{Document, SourceLocation, SourceLocations};
pub use policy::{DeprecationPolicy, Stability};
pub use reports::{ReportFormat, ReportGenerator};
