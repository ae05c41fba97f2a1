//! In-memory store.
//!
//! Backs all three collection traits for tests and single-node deployments.
//! Each operation takes one lock for its whole critical section, which gives
//! the same atomicity the traits demand from a real document store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{PhotoStore, StoreError, TagIndex, UserStore};
use crate::domain::{Photo, Tag, User};

#[derive(Default)]
pub struct MemoryStore {
	users: RwLock<HashMap<String, User>>,
	photos: RwLock<BTreeMap<Uuid, Photo>>,
	tags: RwLock<BTreeSet<Tag>>,
}

#[async_trait]
impl UserStore for MemoryStore {
	async fn upsert_user(&self, user: User) -> Result<User, StoreError> {
		let mut users = self.users.write().await;
		let replaced = users
			.insert(user.github_login.clone(), user.clone())
			.is_some();
		info!(login = %user.github_login, replaced, "upserted user");
		Ok(user)
	}

	async fn insert_users(&self, new: Vec<User>) -> Result<Vec<User>, StoreError> {
		let mut users = self.users.write().await;
		for user in &new {
			users.insert(user.github_login.clone(), user.clone());
		}
		Ok(new)
	}

	async fn find_user(&self, login: &str) -> Result<Option<User>, StoreError> {
		Ok(self.users.read().await.get(login).cloned())
	}

	async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
		Ok(self
			.users
			.read()
			.await
			.values()
			.find(|user| user.github_token == token)
			.cloned())
	}

	async fn all_users(&self) -> Result<Vec<User>, StoreError> {
		Ok(self.users.read().await.values().cloned().collect())
	}

	async fn total_users(&self) -> Result<u64, StoreError> {
		Ok(self.users.read().await.len() as u64)
	}
}

#[async_trait]
impl PhotoStore for MemoryStore {
	async fn insert_photo(&self, photo: Photo) -> Result<Photo, StoreError> {
		let mut photos = self.photos.write().await;
		photos.insert(photo.id, photo.clone());
		info!(id = %photo.id, owner = %photo.owner_login, "inserted photo");
		Ok(photo)
	}

	async fn find_photo(&self, id: Uuid) -> Result<Option<Photo>, StoreError> {
		Ok(self.photos.read().await.get(&id).cloned())
	}

	async fn photos_by_owner(&self, login: &str) -> Result<Vec<Photo>, StoreError> {
		Ok(self
			.photos
			.read()
			.await
			.values()
			.filter(|photo| photo.owner_login == login)
			.cloned()
			.collect())
	}

	async fn all_photos(&self) -> Result<Vec<Photo>, StoreError> {
		Ok(self.photos.read().await.values().cloned().collect())
	}

	async fn total_photos(&self) -> Result<u64, StoreError> {
		Ok(self.photos.read().await.len() as u64)
	}
}

#[async_trait]
impl TagIndex for MemoryStore {
	async fn tag(&self, photo_id: Uuid, user_login: &str) -> Result<(), StoreError> {
		// BTreeSet::insert is the pair upsert: a duplicate pair is a no-op.
		self.tags.write().await.insert(Tag {
			photo_id,
			user_login: user_login.to_owned(),
		});
		Ok(())
	}

	async fn users_tagged_in(&self, photo_id: Uuid) -> Result<Vec<String>, StoreError> {
		Ok(self
			.tags
			.read()
			.await
			.iter()
			.filter(|tag| tag.photo_id == photo_id)
			.map(|tag| tag.user_login.clone())
			.collect())
	}

	async fn photos_tagged_with(&self, user_login: &str) -> Result<Vec<Uuid>, StoreError> {
		Ok(self
			.tags
			.read()
			.await
			.iter()
			.filter(|tag| tag.user_login == user_login)
			.map(|tag| tag.photo_id)
			.collect())
	}
}
