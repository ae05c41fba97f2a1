//! Fake identities for demos.
//!
//! Pulls profiles from the randomuser.me API and reshapes them into
//! accounts, with the generated sha1 standing in for a GitHub token.

use reqwest::Client;
use serde::Deserialize;

use super::AuthError;
use crate::domain::User;

const RANDOM_USER_URL: &str = "https://randomuser.me/api/";

/// Fetch `count` random profiles as ready-to-insert accounts.
pub async fn random_users(http: &Client, count: u32) -> Result<Vec<User>, AuthError> {
	let response = http
		.get(RANDOM_USER_URL)
		.query(&[("results", count)])
		.send()
		.await
		.map_err(|err| AuthError::ProviderUnreachable(err.to_string()))?
		.json::<RandomUserResponse>()
		.await
		.map_err(|err| AuthError::ProviderUnreachable(err.to_string()))?;

	Ok(response.results.into_iter().map(User::from).collect())
}

#[derive(Debug, Deserialize)]
struct RandomUserResponse {
	results: Vec<RandomUser>,
}

#[derive(Debug, Deserialize)]
struct RandomUser {
	login: RandomLogin,
	name: RandomName,
	picture: RandomPicture,
}

#[derive(Debug, Deserialize)]
struct RandomLogin {
	username: String,
	sha1: String,
}

#[derive(Debug, Deserialize)]
struct RandomName {
	first: String,
	last: String,
}

#[derive(Debug, Deserialize)]
struct RandomPicture {
	thumbnail: String,
}

impl From<RandomUser> for User {
	fn from(random: RandomUser) -> Self {
		User {
			github_login: random.login.username,
			name: Some(format!("{} {}", random.name.first, random.name.last)),
			avatar: Some(random.picture.thumbnail),
			github_token: random.login.sha1,
		}
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn random_profile_becomes_an_account() {
		let response: RandomUserResponse = serde_json::from_value(json!({
			"results": [{
				"login": { "username": "purplefrog123", "sha1": "deadbeef" },
				"name": { "first": "Ada", "last": "Lovelace" },
				"picture": { "thumbnail": "https://randomuser.me/portraits/thumb/1.jpg" }
			}],
			"info": { "results": 1 }
		}))
		.unwrap();

		let users: Vec<User> = response.results.into_iter().map(User::from).collect();
		assert_eq!(users.len(), 1);
		assert_eq!(users[0].github_login, "purplefrog123");
		assert_eq!(users[0].name.as_deref(), Some("Ada Lovelace"));
		assert_eq!(users[0].github_token, "deadbeef");
	}
}
