//! # kb-curate core
//!
//! Pure logic for curating a markdown knowledge base: the header parser,
//! section scanner, schema validator, slug normalization, the batch slug
//! registry, review annotation, and index rendering.
//!
//! This crate performs no filesystem I/O and spawns no processes; the
//! `kb-curate` crate supplies directories, clocks, and version control.

pub mod curate;
pub mod header;
pub mod index;
pub mod registry;
pub mod review;
pub mod schema;
pub mod sections;
pub mod slug;
pub mod validate;

pub use curate::{Curator, Outcome};
pub use header::{parse_header, Header, HeaderError, HeaderValue};
pub use registry::SlugRegistry;
pub use schema::{CategoryMap, Profile, Schema};
pub use validate::{validate, ValidationResult};
