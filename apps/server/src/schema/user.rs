use async_graphql::{Context, Object, Result, SimpleObject};
use futures::future;
use ps_core::store::Library;
use tracing::warn;

use super::photo::Photo;
use crate::error;

/// GraphQL view of an account.
pub struct User(pub ps_core::domain::User);

/// Result of a sign-in mutation: the account plus the bearer token to use
/// on subsequent requests.
#[derive(SimpleObject)]
pub struct AuthPayload {
	pub token: String,
	pub user: User,
}

#[Object]
impl User {
	async fn github_login(&self) -> &str {
		&self.0.github_login
	}

	async fn name(&self) -> Option<&str> {
		self.0.name.as_deref()
	}

	async fn avatar(&self) -> Option<&str> {
		self.0.avatar.as_deref()
	}

	/// Photos this account posted.
	async fn posted_photos(&self, ctx: &Context<'_>) -> Result<Vec<Photo>> {
		let library = ctx.data::<Library>()?;
		Ok(library
			.photos
			.photos_by_owner(&self.0.github_login)
			.await
			.map_err(error::store)?
			.into_iter()
			.map(Photo::from)
			.collect())
	}

	/// Photos this account is tagged in.
	///
	/// Same tolerant-drop policy as `Photo.taggedUsers`: a tag whose photo
	/// is gone is skipped, not an error.
	async fn in_photos(&self, ctx: &Context<'_>) -> Result<Vec<Photo>> {
		let library = ctx.data::<Library>()?;
		let photo_ids = library
			.tags
			.photos_tagged_with(&self.0.github_login)
			.await
			.map_err(error::store)?;

		let resolved =
			future::try_join_all(photo_ids.iter().map(|id| library.photos.find_photo(*id)))
				.await
				.map_err(error::store)?;

		let mut photos = Vec::with_capacity(resolved.len());
		for (id, photo) in photo_ids.iter().zip(resolved) {
			match photo {
				Some(photo) => photos.push(Photo::from(photo)),
				None => warn!(photo_id = %id, "dropping tag pointing at a missing photo"),
			}
		}
		Ok(photos)
	}
}

impl From<ps_core::domain::User> for User {
	fn from(user: ps_core::domain::User) -> Self {
		Self(user)
	}
}
