//! Structural diff engine for API documents.
//!
//! The diff is built bottom-up: schemas, then parameters, bodies and
//! responses, then operations and paths, then the whole document. Every
//! keyed collection follows the same added / deleted / modified contract
//! (see [`primitives`]), and "no change" is never represented: an unchanged
//! subtree is simply absent.
//!
//! # Architecture
//!
//! - [`DiffEngine`]: entry point with path-matching options
//! - [`diff_schema`]: lockstep schema walk with a cycle guard
//! - [`SchemaPath`]: canonical branch-qualified location of a nested node
//!
//! # Example
//!
//! ```ignore
//! use api_diff::diff::DiffEngine;
//!
//! let engine = DiffEngine::new().match_path_params(true);
//! let diff = engine.diff(&base, &revision);
//! if diff.is_empty() {
//!     println!("no differences");
//! }
//! ```

mod combinator;
mod document;
mod engine;
mod operation;
mod path;
pub mod primitives;
mod schema;

pub use combinator::{signature, CombinatorKind, Subschema, SubschemaDiff};
pub use document::{
    ComponentsDiff, DocumentDiff, OAuthFlowDiff, PathDiff, SecuritySchemeDiff,
};
pub use engine::{DiffEngine, DiffOptions};
pub use operation::{
    diff_security_requirements, effective_parameters, ContentDiff, HeaderDiff, OperationDiff,
    ParameterDiff, RequestBodyDiff, ResponseDiff, SecurityRequirementsDiff,
};
pub use path::{PathSegment, SchemaPath};
pub use primitives::{diff_keyed, diff_string_sets, value_diff, KeyedDiff, StringSetDiff, ValueDiff};
pub use schema::{diff_schema, DiscriminatorDiff, EnumDiff, SchemaDiff, ROOT_IDENTITY};
