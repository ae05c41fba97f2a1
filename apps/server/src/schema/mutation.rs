use async_graphql::{Context, Object, Result, ID};
use ps_core::auth::github::GithubClient;
use ps_core::auth::{self, CurrentUser};
use ps_core::domain;
use ps_core::store::Library;
use tracing::info;
use uuid::Uuid;

use super::photo::{Photo, PostPhotoInput};
use super::user::{AuthPayload, User};
use crate::error;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
	/// Post a photo as the authenticated user.
	async fn post_photo(&self, ctx: &Context<'_>, input: PostPhotoInput) -> Result<Photo> {
		let library = ctx.data::<Library>()?;
		let anonymous = CurrentUser::Anonymous;
		let current = ctx.data_opt::<CurrentUser>().unwrap_or(&anonymous);
		let user = current.require("post a photo").map_err(error::auth)?;

		// The owner always comes from the credential; whatever the client
		// put in `input.github_user` is discarded.
		let photo = domain::Photo::new(
			input.name,
			input.description,
			input.category.into(),
			user.github_login.clone(),
		);
		let photo = library
			.photos
			.insert_photo(photo)
			.await
			.map_err(error::store)?;
		Ok(Photo::from(photo))
	}

	/// Exchange a GitHub authorization code for a bearer token, creating or
	/// refreshing the account it belongs to.
	async fn github_auth(&self, ctx: &Context<'_>, code: String) -> Result<AuthPayload> {
		let library = ctx.data::<Library>()?;
		let github = ctx.data::<GithubClient>()?;

		let user = auth::github_auth(library, github, &code)
			.await
			.map_err(error::auth)?;
		Ok(AuthPayload {
			token: user.github_token.clone(),
			user: User::from(user),
		})
	}

	/// Tag a user in a photo. Idempotent: repeating the pair is a no-op.
	async fn create_tag(
		&self,
		ctx: &Context<'_>,
		#[graphql(name = "userID")] user_id: ID,
		#[graphql(name = "photoID")] photo_id: ID,
	) -> Result<bool> {
		let library = ctx.data::<Library>()?;

		let photo_id =
			Uuid::parse_str(&photo_id).map_err(|_| error::invalid_id(&photo_id))?;

		// Both referents are checked before the write; the index itself
		// stays a pure pair-upsert. Entities deleted after tagging still
		// leave stale pairs behind, which the read path filters out.
		if library
			.photos
			.find_photo(photo_id)
			.await
			.map_err(error::store)?
			.is_none()
		{
			return Err(error::not_found("photo", &photo_id.to_string()));
		}
		if library
			.users
			.find_user(&user_id)
			.await
			.map_err(error::store)?
			.is_none()
		{
			return Err(error::not_found("user", &user_id));
		}

		library
			.tags
			.tag(photo_id, &user_id)
			.await
			.map_err(error::store)?;
		info!(photo = %photo_id, user = %*user_id, "created tag");
		Ok(true)
	}

	/// Seed the accounts collection with random fake users.
	async fn add_fake_users(
		&self,
		ctx: &Context<'_>,
		#[graphql(default = 1)] count: u32,
	) -> Result<Vec<User>> {
		let library = ctx.data::<Library>()?;
		let github = ctx.data::<GithubClient>()?;

		let users = auth::fake::random_users(github.http(), count)
			.await
			.map_err(error::auth)?;
		let users = library
			.users
			.insert_users(users)
			.await
			.map_err(error::store)?;
		Ok(users.into_iter().map(User::from).collect())
	}

	/// Sign in as a fake-seeded user without a GitHub round trip.
	async fn fake_user_auth(
		&self,
		ctx: &Context<'_>,
		github_login: ID,
	) -> Result<AuthPayload> {
		let library = ctx.data::<Library>()?;

		let user = auth::fake_user_auth(library, &github_login)
			.await
			.map_err(error::auth)?;
		Ok(AuthPayload {
			token: user.github_token.clone(),
			user: User::from(user),
		})
	}
}
