use serde::{Deserialize, Serialize};

/// An account established through GitHub sign-in.
///
/// `github_login` is the stable external identifier and primary key;
/// `github_token` is the bearer credential issued at the most recent
/// sign-in. Re-authenticating replaces the token wholesale, which implicitly
/// invalidates the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub github_login: String,
	pub name: Option<String>,
	pub avatar: Option<String>,
	pub github_token: String,
}
