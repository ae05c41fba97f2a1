//! Schema integration tests.
//!
//! These execute real GraphQL operations against an in-memory library, with
//! the acting identity resolved through the authorization gate exactly as
//! the HTTP handler does it.

use std::collections::BTreeSet;

use async_graphql::{Request, Variables};
use chrono::Utc;
use ps_core::auth::github::GithubClient;
use ps_core::auth::{self, CurrentUser};
use ps_core::domain::{Photo, PhotoCategory, User};
use ps_core::store::Library;
use ps_server::schema::{self, AppSchema};
use serde_json::{json, Value};
use uuid::Uuid;

fn photo_id(n: u128) -> Uuid {
	Uuid::from_u128(n)
}

fn test_schema(library: &Library) -> AppSchema {
	schema::build(
		library.clone(),
		GithubClient::new("client-id".to_owned(), "client-secret".to_owned()),
	)
}

async fn seed_user(library: &Library, login: &str, name: &str, token: &str) {
	library
		.users
		.upsert_user(User {
			github_login: login.to_owned(),
			name: Some(name.to_owned()),
			avatar: None,
			github_token: token.to_owned(),
		})
		.await
		.unwrap();
}

async fn seed_photo(library: &Library, id: u128, owner: &str) {
	library
		.photos
		.insert_photo(Photo {
			id: photo_id(id),
			name: format!("Image {id}"),
			description: None,
			category: PhotoCategory::Portrait,
			owner_login: owner.to_owned(),
			created_at: Utc::now(),
		})
		.await
		.unwrap();
}

/// Two users, three photos, tags (1,1) (2,1) (2,2) (3,1).
async fn seeded_library() -> Library {
	let library = Library::in_memory();
	seed_user(&library, "1", "Piter Parker", "token-1").await;
	seed_user(&library, "2", "John Snow", "token-2").await;
	for (id, owner) in [(1, "1"), (2, "1"), (3, "2")] {
		seed_photo(&library, id, owner).await;
	}
	for (photo, user) in [(1, "1"), (2, "1"), (2, "2"), (3, "1")] {
		library.tags.tag(photo_id(photo), user).await.unwrap();
	}
	library
}

async fn execute(schema: &AppSchema, request: impl Into<Request>) -> Value {
	let response = schema.execute(request).await;
	assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
	response.data.into_json().unwrap()
}

fn error_code(response: &async_graphql::Response) -> String {
	let error = serde_json::to_value(&response.errors[0]).unwrap();
	error["extensions"]["code"].as_str().unwrap_or_default().to_owned()
}

#[tokio::test]
async fn counts_cover_both_collections() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let data = execute(&schema, "{ totalUsers totalPhotos }").await;
	assert_eq!(data, json!({ "totalUsers": 2, "totalPhotos": 3 }));
}

#[tokio::test]
async fn photo_two_is_tagged_with_both_users() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let data = execute(&schema, "{ allPhotos { id taggedUsers { githubLogin } } }").await;
	let photos = data["allPhotos"].as_array().unwrap();
	let photo2 = photos
		.iter()
		.find(|photo| photo["id"] == photo_id(2).to_string())
		.unwrap();

	let tagged: BTreeSet<&str> = photo2["taggedUsers"]
		.as_array()
		.unwrap()
		.iter()
		.map(|user| user["githubLogin"].as_str().unwrap())
		.collect();
	assert_eq!(tagged, BTreeSet::from(["1", "2"]));
}

#[tokio::test]
async fn user_one_is_in_all_three_photos() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let data = execute(&schema, "{ allUsers { githubLogin inPhotos { id } } }").await;
	let users = data["allUsers"].as_array().unwrap();
	let user1 = users
		.iter()
		.find(|user| user["githubLogin"] == "1")
		.unwrap();

	let in_photos: BTreeSet<String> = user1["inPhotos"]
		.as_array()
		.unwrap()
		.iter()
		.map(|photo| photo["id"].as_str().unwrap().to_owned())
		.collect();
	let expected: BTreeSet<String> =
		[1, 2, 3].iter().map(|n| photo_id(*n).to_string()).collect();
	assert_eq!(in_photos, expected);
}

#[tokio::test]
async fn tagged_users_and_in_photos_are_symmetric() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let from_photos = execute(&schema, "{ allPhotos { id taggedUsers { githubLogin } } }").await;
	let mut photo_side = BTreeSet::new();
	for photo in from_photos["allPhotos"].as_array().unwrap() {
		for user in photo["taggedUsers"].as_array().unwrap() {
			photo_side.insert((
				photo["id"].as_str().unwrap().to_owned(),
				user["githubLogin"].as_str().unwrap().to_owned(),
			));
		}
	}

	let from_users = execute(&schema, "{ allUsers { githubLogin inPhotos { id } } }").await;
	let mut user_side = BTreeSet::new();
	for user in from_users["allUsers"].as_array().unwrap() {
		for photo in user["inPhotos"].as_array().unwrap() {
			user_side.insert((
				photo["id"].as_str().unwrap().to_owned(),
				user["githubLogin"].as_str().unwrap().to_owned(),
			));
		}
	}

	assert_eq!(photo_side, user_side);
	assert_eq!(photo_side.len(), 4);
}

#[tokio::test]
async fn anonymous_post_photo_is_rejected() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let response = schema
		.execute(r#"mutation { postPhoto(input: { name: "Fenrir" }) { id } }"#)
		.await;

	assert_eq!(response.errors.len(), 1);
	assert_eq!(
		response.errors[0].message,
		"Only an authorized user can post a photo"
	);
	assert_eq!(error_code(&response), "UNAUTHORIZED");
}

#[tokio::test]
async fn post_photo_owner_comes_from_the_credential() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	// Authenticate as user 2 through the gate, while the input claims the
	// photo belongs to user 1.
	let current = auth::current_user(&library, Some("token-2")).await.unwrap();
	let request = Request::new(
		r#"mutation {
			postPhoto(input: { name: "Fenrir", githubUser: "1" }) {
				name
				category
				postedBy { githubLogin }
			}
		}"#,
	)
	.data(current);

	let data = execute(&schema, request).await;
	assert_eq!(
		data["postPhoto"],
		json!({
			"name": "Fenrir",
			"category": "PORTRAIT",
			"postedBy": { "githubLogin": "2" }
		})
	);
}

#[tokio::test]
async fn dangling_owner_fails_only_the_posted_by_field() {
	let library = Library::in_memory();
	seed_photo(&library, 9, "ghost").await;
	let schema = test_schema(&library);

	// Without the relation the photo resolves fine.
	let data = execute(&schema, "{ allPhotos { name } }").await;
	assert_eq!(data["allPhotos"][0]["name"], "Image 9");

	// Selecting the relation surfaces a field-scoped error.
	let response = schema
		.execute("{ allPhotos { name postedBy { githubLogin } } }")
		.await;
	assert_eq!(response.errors.len(), 1);
	assert_eq!(error_code(&response), "DANGLING_REFERENCE");
	let path = serde_json::to_value(&response.errors[0]).unwrap()["path"].clone();
	assert_eq!(path, json!(["allPhotos", 0, "postedBy"]));
}

#[tokio::test]
async fn stale_tags_are_dropped_from_list_relations() {
	let library = seeded_library().await;
	// A tag referencing an account that was never created.
	library.tags.tag(photo_id(1), "deleted-user").await.unwrap();
	let schema = test_schema(&library);

	let data = execute(&schema, "{ allPhotos { id taggedUsers { githubLogin } } }").await;
	let photos = data["allPhotos"].as_array().unwrap();
	let photo1 = photos
		.iter()
		.find(|photo| photo["id"] == photo_id(1).to_string())
		.unwrap();

	// Only the resolvable login remains, with no error raised.
	assert_eq!(photo1["taggedUsers"], json!([{ "githubLogin": "1" }]));
}

#[tokio::test]
async fn me_reflects_the_authorization_gate() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let data = execute(&schema, "{ me { githubLogin } }").await;
	assert_eq!(data, json!({ "me": null }));

	let current = auth::current_user(&library, Some("token-1")).await.unwrap();
	let data = execute(&schema, Request::new("{ me { githubLogin name } }").data(current)).await;
	assert_eq!(
		data,
		json!({ "me": { "githubLogin": "1", "name": "Piter Parker" } })
	);
}

#[tokio::test]
async fn create_tag_is_idempotent() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let mutation = "mutation Tag($user: ID!, $photo: ID!) {
		createTag(userID: $user, photoID: $photo)
	}";
	let variables = json!({ "user": "2", "photo": photo_id(1).to_string() });

	for _ in 0..2 {
		let request =
			Request::new(mutation).variables(Variables::from_json(variables.clone()));
		let data = execute(&schema, request).await;
		assert_eq!(data, json!({ "createTag": true }));
	}

	let tagged = library.tags.users_tagged_in(photo_id(1)).await.unwrap();
	let tagged: BTreeSet<_> = tagged.iter().map(String::as_str).collect();
	assert_eq!(tagged, BTreeSet::from(["1", "2"]));
}

#[tokio::test]
async fn create_tag_validates_its_referents() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let mutation = "mutation Tag($user: ID!, $photo: ID!) {
		createTag(userID: $user, photoID: $photo)
	}";

	let response = schema
		.execute(Request::new(mutation).variables(Variables::from_json(
			json!({ "user": "1", "photo": photo_id(99).to_string() }),
		)))
		.await;
	assert_eq!(error_code(&response), "NOT_FOUND");

	let response = schema
		.execute(Request::new(mutation).variables(Variables::from_json(
			json!({ "user": "nobody", "photo": photo_id(1).to_string() }),
		)))
		.await;
	assert_eq!(error_code(&response), "NOT_FOUND");

	let response = schema
		.execute(Request::new(mutation).variables(Variables::from_json(
			json!({ "user": "1", "photo": "not-a-uuid" }),
		)))
		.await;
	assert_eq!(error_code(&response), "INVALID_ID");
}

#[tokio::test]
async fn fake_user_auth_returns_the_current_token() {
	let library = seeded_library().await;
	let schema = test_schema(&library);

	let data = execute(
		&schema,
		r#"mutation { fakeUserAuth(githubLogin: "1") { token user { githubLogin } } }"#,
	)
	.await;
	assert_eq!(
		data,
		json!({ "fakeUserAuth": { "token": "token-1", "user": { "githubLogin": "1" } } })
	);

	let response = schema
		.execute(r#"mutation { fakeUserAuth(githubLogin: "nobody") { token } }"#)
		.await;
	assert_eq!(error_code(&response), "NOT_FOUND");
	assert_eq!(
		response.errors[0].message,
		"cannot find user with github login nobody"
	);
}

#[tokio::test]
async fn reauthentication_rotates_the_credential() {
	let library = seeded_library().await;

	// Same login signs in again with a fresh token.
	seed_user(&library, "1", "Piter Parker", "token-1-rotated").await;

	assert!(matches!(
		auth::current_user(&library, Some("token-1")).await.unwrap(),
		CurrentUser::Anonymous
	));
	let current = auth::current_user(&library, Some("token-1-rotated"))
		.await
		.unwrap();
	assert_eq!(current.user().unwrap().github_login, "1");
	assert_eq!(library.users.total_users().await.unwrap(), 2);
}
