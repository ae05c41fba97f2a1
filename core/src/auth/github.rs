//! GitHub OAuth code exchange.
//!
//! Two provider calls: POST the code to the token endpoint, then GET the
//! account profile with the returned token. Authorization codes are
//! single-use, so nothing here retries; a provider error is surfaced
//! straight to the caller, who must start over with a fresh code.

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::AuthError;

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

/// Client for the GitHub identity endpoints.
pub struct GithubClient {
	http: Client,
	client_id: String,
	client_secret: String,
	token_url: String,
	user_url: String,
}

/// Profile and credential returned by a successful exchange.
#[derive(Debug, Clone)]
pub struct GithubAccount {
	pub login: String,
	pub name: Option<String>,
	pub avatar_url: Option<String>,
	pub access_token: String,
}

impl GithubClient {
	pub fn new(client_id: String, client_secret: String) -> Self {
		Self::with_endpoints(
			client_id,
			client_secret,
			TOKEN_URL.to_owned(),
			USER_URL.to_owned(),
		)
	}

	/// Client against non-standard endpoints, so tests can point the
	/// exchange at a local stub.
	pub fn with_endpoints(
		client_id: String,
		client_secret: String,
		token_url: String,
		user_url: String,
	) -> Self {
		Self {
			http: Client::new(),
			client_id,
			client_secret,
			token_url,
			user_url,
		}
	}

	pub fn http(&self) -> &Client {
		&self.http
	}

	/// Exchange an authorization code for an access token and fetch the
	/// account behind it.
	///
	/// Both calls run inside this one future, so dropping it cancels
	/// whichever provider call is in flight.
	pub async fn authorize(&self, code: &str) -> Result<GithubAccount, AuthError> {
		let token = self.request_token(code).await?;
		let profile = self.request_account(&token).await?;
		Ok(GithubAccount {
			login: profile.login,
			name: profile.name,
			avatar_url: profile.avatar_url,
			access_token: token,
		})
	}

	async fn request_token(&self, code: &str) -> Result<String, AuthError> {
		self.http
			.post(&self.token_url)
			.header(ACCEPT, "application/json")
			.json(&json!({
				"client_id": self.client_id,
				"client_secret": self.client_secret,
				"code": code,
			}))
			.send()
			.await
			.map_err(transport)?
			.json::<TokenResponse>()
			.await
			.map_err(transport)?
			.into_token()
	}

	async fn request_account(&self, token: &str) -> Result<Profile, AuthError> {
		self.http
			.get(&self.user_url)
			.query(&[("access_token", token)])
			.header(USER_AGENT, "photoshare")
			.send()
			.await
			.map_err(transport)?
			.json::<AccountResponse>()
			.await
			.map_err(transport)?
			.into_profile()
	}
}

fn transport(err: reqwest::Error) -> AuthError {
	error!("identity provider request failed: {err}");
	AuthError::ProviderUnreachable(err.to_string())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

impl TokenResponse {
	fn into_token(self) -> Result<String, AuthError> {
		if let Some(token) = self.access_token {
			return Ok(token);
		}
		// GitHub reports bad codes as a 200 with an error body.
		match self.error_description.or(self.error) {
			Some(message) => Err(AuthError::ProviderRejected(message)),
			None => Err(AuthError::ProviderUnreachable(
				"token response carried neither a token nor an error".to_owned(),
			)),
		}
	}
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
	message: Option<String>,
	login: Option<String>,
	name: Option<String>,
	avatar_url: Option<String>,
}

#[derive(Debug)]
struct Profile {
	login: String,
	name: Option<String>,
	avatar_url: Option<String>,
}

impl AccountResponse {
	fn into_profile(self) -> Result<Profile, AuthError> {
		if let Some(message) = self.message {
			return Err(AuthError::ProviderRejected(message));
		}
		let Some(login) = self.login else {
			return Err(AuthError::ProviderUnreachable(
				"account response carried no login".to_owned(),
			));
		};
		Ok(Profile {
			login,
			name: self.name,
			avatar_url: self.avatar_url,
		})
	}
}
