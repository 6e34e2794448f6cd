//! GitHub Actions workflow documents
//!
//! [`schema`] holds the serializable workflow types, [`render`] turns a
//! workflow into YAML or JSON text.

pub mod render;
pub mod schema;

pub use render::OutputFormat;
pub use schema::*;
