use async_graphql::{Context, Object, Result};
use ps_core::auth::CurrentUser;
use ps_core::store::Library;

use super::photo::Photo;
use super::user::User;
use crate::error;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
	/// The account behind the request's bearer credential, if any.
	async fn me(&self, ctx: &Context<'_>) -> Option<User> {
		ctx.data_opt::<CurrentUser>()
			.and_then(CurrentUser::user)
			.cloned()
			.map(User::from)
	}

	async fn total_photos(&self, ctx: &Context<'_>) -> Result<u64> {
		let library = ctx.data::<Library>()?;
		library.photos.total_photos().await.map_err(error::store)
	}

	async fn all_photos(&self, ctx: &Context<'_>) -> Result<Vec<Photo>> {
		let library = ctx.data::<Library>()?;
		Ok(library
			.photos
			.all_photos()
			.await
			.map_err(error::store)?
			.into_iter()
			.map(Photo::from)
			.collect())
	}

	async fn total_users(&self, ctx: &Context<'_>) -> Result<u64> {
		let library = ctx.data::<Library>()?;
		library.users.total_users().await.map_err(error::store)
	}

	async fn all_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
		let library = ctx.data::<Library>()?;
		Ok(library
			.users
			.all_users()
			.await
			.map_err(error::store)?
			.into_iter()
			.map(User::from)
			.collect())
	}
}
