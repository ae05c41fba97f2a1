//! Identity and authorization.
//!
//! The acting identity is re-derived from the bearer credential on every
//! request; nothing resembling a session outlives the lookup.

use tracing::info;

use crate::domain::User;
use crate::store::{Library, StoreError};

pub mod fake;
pub mod github;

/// Failure in the sign-in flow or an authorization check.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// Transport failure or malformed body from the identity provider.
	#[error("identity provider unreachable: {0}")]
	ProviderUnreachable(String),

	/// The provider answered with a structured error instead of data.
	#[error("{0}")]
	ProviderRejected(String),

	/// A mutation that needs an authenticated user was attempted anonymously.
	#[error("Only an authorized user can {0}")]
	Unauthorized(&'static str),

	/// Fake sign-in referenced an account that does not exist.
	#[error("cannot find user with github login {0}")]
	UnknownUser(String),

	#[error(transparent)]
	Store(#[from] StoreError),
}

/// Identity derived from a request's bearer credential.
#[derive(Debug, Clone, Default)]
pub enum CurrentUser {
	#[default]
	Anonymous,
	Authenticated(User),
}

impl CurrentUser {
	pub fn user(&self) -> Option<&User> {
		match self {
			CurrentUser::Anonymous => None,
			CurrentUser::Authenticated(user) => Some(user),
		}
	}

	/// The authenticated user, or [`AuthError::Unauthorized`] naming the
	/// attempted action.
	pub fn require(&self, action: &'static str) -> Result<&User, AuthError> {
		self.user().ok_or(AuthError::Unauthorized(action))
	}
}

/// Resolve the acting identity for one request.
///
/// A missing credential or one matching no account both land on
/// [`CurrentUser::Anonymous`]; only a live token authenticates.
pub async fn current_user(
	library: &Library,
	bearer: Option<&str>,
) -> Result<CurrentUser, StoreError> {
	let Some(token) = bearer else {
		return Ok(CurrentUser::Anonymous);
	};
	Ok(match library.users.find_user_by_token(token).await? {
		Some(user) => CurrentUser::Authenticated(user),
		None => CurrentUser::Anonymous,
	})
}

/// Run the full GitHub sign-in flow: exchange the code, then upsert the
/// account.
///
/// The upsert is a single atomic replace-or-insert keyed on the login, so
/// concurrent sign-ins of the same account cannot interleave. The returned
/// user carries the freshly issued bearer token.
pub async fn github_auth(
	library: &Library,
	github: &github::GithubClient,
	code: &str,
) -> Result<User, AuthError> {
	let account = github.authorize(code).await?;
	let user = library
		.users
		.upsert_user(User {
			github_login: account.login,
			name: account.name,
			avatar: account.avatar_url,
			github_token: account.access_token,
		})
		.await?;
	info!(login = %user.github_login, "github sign-in");
	Ok(user)
}

/// Sign in as an existing account without talking to GitHub.
///
/// Returns the account's current token; intended for demos against
/// fake-seeded users.
pub async fn fake_user_auth(library: &Library, github_login: &str) -> Result<User, AuthError> {
	library
		.users
		.find_user(github_login)
		.await?
		.ok_or_else(|| AuthError::UnknownUser(github_login.to_owned()))
}
