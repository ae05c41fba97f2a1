use async_graphql::{Context, Enum, InputObject, Object, Result, ID};
use chrono::{DateTime, Utc};
use futures::future;
use ps_core::store::Library;
use tracing::warn;

use super::user::User;
use crate::error;

/// GraphQL view of a stored photo.
pub struct Photo(pub ps_core::domain::Photo);

#[derive(Enum, Copy, Clone, Eq, PartialEq, Default)]
#[graphql(remote = "ps_core::domain::PhotoCategory")]
pub enum PhotoCategory {
	Selfie,
	#[default]
	Portrait,
	Action,
	Landscape,
	Graphic,
}

#[derive(InputObject)]
pub struct PostPhotoInput {
	pub name: String,
	pub description: Option<String>,
	#[graphql(default)]
	pub category: PhotoCategory,
	/// Discarded: the owner is always the authenticated user, never
	/// client-supplied.
	pub github_user: Option<String>,
}

#[Object]
impl Photo {
	async fn id(&self) -> ID {
		ID(self.0.id.to_string())
	}

	async fn url(&self) -> String {
		self.0.url()
	}

	async fn name(&self) -> &str {
		&self.0.name
	}

	async fn description(&self) -> Option<&str> {
		self.0.description.as_deref()
	}

	async fn category(&self) -> PhotoCategory {
		self.0.category.into()
	}

	async fn created(&self) -> DateTime<Utc> {
		self.0.created_at
	}

	/// The account that posted this photo.
	///
	/// An owner that no longer resolves is a field-scoped
	/// `DANGLING_REFERENCE` error; sibling fields still resolve.
	async fn posted_by(&self, ctx: &Context<'_>) -> Result<User> {
		let library = ctx.data::<Library>()?;
		library
			.users
			.find_user(&self.0.owner_login)
			.await
			.map_err(error::store)?
			.map(User::from)
			.ok_or_else(|| error::dangling_reference("user", &self.0.owner_login))
	}

	/// Accounts tagged in this photo.
	///
	/// Tags pointing at since-deleted accounts are dropped from the list
	/// rather than failing it.
	async fn tagged_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		let library = ctx.data::<Library>()?;
		let logins = library
			.tags
			.users_tagged_in(self.0.id)
			.await
			.map_err(error::store)?;

		let resolved = future::try_join_all(
			logins.iter().map(|login| library.users.find_user(login)),
		)
		.await
		.map_err(error::store)?;

		let mut users = Vec::with_capacity(resolved.len());
		for (login, user) in logins.iter().zip(resolved) {
			match user {
				Some(user) => users.push(User::from(user)),
				None => warn!(login = %login, "dropping tag pointing at a missing user"),
			}
		}
		Ok(users)
	}
}

impl From<ps_core::domain::Photo> for Photo {
	fn from(photo: ps_core::domain::Photo) -> Self {
		Self(photo)
	}
}
