//! In-memory representation of an API description.
//!
//! A [`Document`] holds paths, operations and a [`Components`] arena of
//! reusable schemas, parameters, bodies, responses, headers and security
//! schemes. Schemas reference each other by `$ref`, so the schema graph may
//! contain cycles; everything here is plain data and never follows them.

mod document;
mod schema;
mod source;

pub use document::*;
pub use schema::*;
pub use source::*;
