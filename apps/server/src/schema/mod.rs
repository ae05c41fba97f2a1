//! Executable GraphQL schema.
//!
//! Long-lived context (the store library and the GitHub client) is attached
//! at build time; the per-request identity is injected by the HTTP handler
//! before execution.

use async_graphql::{EmptySubscription, Schema};
use ps_core::auth::github::GithubClient;
use ps_core::store::Library;

mod mutation;
mod photo;
mod query;
mod user;

pub use mutation::MutationRoot;
pub use photo::{Photo, PhotoCategory, PostPhotoInput};
pub use query::QueryRoot;
pub use user::{AuthPayload, User};

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build(library: Library, github: GithubClient) -> AppSchema {
	Schema::build(QueryRoot, MutationRoot, EmptySubscription)
		.data(library)
		.data(github)
		.finish()
}
