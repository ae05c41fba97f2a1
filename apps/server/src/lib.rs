//! PhotoShare API surface.
//!
//! async-graphql schema over the core stores, served by axum. The graph is
//! resolved lazily: relational fields fan out to the stores only when a
//! query selects them.

pub mod error;
pub mod schema;
