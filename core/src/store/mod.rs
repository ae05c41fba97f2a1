//! Store abstractions.
//!
//! The backing document store is an external collaborator. The core talks to
//! it through these traits and receives them through a per-request
//! [`Library`] handle, never through module-level state. Backends are
//! expected to provide atomic single-document primitives; in particular
//! [`UserStore::upsert_user`] and [`TagIndex::tag`] must be native
//! replace-or-insert operations with no read-then-write window.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Photo, User};

pub mod memory;

/// Failure talking to the backing store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("store backend failure: {0}")]
	Backend(String),
}

/// Accounts collection, keyed by GitHub login.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Atomically insert the account or replace the existing one with the
	/// same `github_login`. The login is preserved; everything else,
	/// including the bearer token, is overwritten.
	async fn upsert_user(&self, user: User) -> Result<User, StoreError>;

	/// Bulk insert, used for fake-user seeding. No upsert semantics.
	async fn insert_users(&self, users: Vec<User>) -> Result<Vec<User>, StoreError>;

	async fn find_user(&self, login: &str) -> Result<Option<User>, StoreError>;

	/// Look up the account whose current bearer token matches.
	async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

	async fn all_users(&self) -> Result<Vec<User>, StoreError>;

	async fn total_users(&self) -> Result<u64, StoreError>;
}

/// Photos collection.
#[async_trait]
pub trait PhotoStore: Send + Sync {
	async fn insert_photo(&self, photo: Photo) -> Result<Photo, StoreError>;

	async fn find_photo(&self, id: Uuid) -> Result<Option<Photo>, StoreError>;

	async fn photos_by_owner(&self, login: &str) -> Result<Vec<Photo>, StoreError>;

	async fn all_photos(&self) -> Result<Vec<Photo>, StoreError>;

	async fn total_photos(&self) -> Result<u64, StoreError>;
}

/// Many-to-many association between photos and users.
///
/// Projections are sets; no ordering is guaranteed. Neither side of a pair
/// is validated here; stale references are filtered out at resolution time
/// instead.
#[async_trait]
pub trait TagIndex: Send + Sync {
	/// Record that `user_login` is tagged in `photo_id`. Idempotent: the
	/// pair is upserted, so tagging twice leaves exactly one record.
	async fn tag(&self, photo_id: Uuid, user_login: &str) -> Result<(), StoreError>;

	/// Logins tagged in the given photo.
	async fn users_tagged_in(&self, photo_id: Uuid) -> Result<Vec<String>, StoreError>;

	/// Photos the given login is tagged in.
	async fn photos_tagged_with(&self, user_login: &str) -> Result<Vec<Uuid>, StoreError>;
}

/// Handle to the collections a request operates on.
///
/// Cloning is cheap; each request gets its own copy through the GraphQL
/// context.
#[derive(Clone)]
pub struct Library {
	pub users: Arc<dyn UserStore>,
	pub photos: Arc<dyn PhotoStore>,
	pub tags: Arc<dyn TagIndex>,
}

impl Library {
	/// Library backed by a single in-memory store.
	pub fn in_memory() -> Self {
		let store = Arc::new(memory::MemoryStore::default());
		Self {
			users: store.clone(),
			photos: store.clone(),
			tags: store,
		}
	}
}
