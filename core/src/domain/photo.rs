use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A photo posted by a user.
///
/// Photos are created by the post-photo mutation and never modified
/// afterwards. `owner_login` references the posting account by its GitHub
/// login; the account may be deleted later, so the reference is resolved
/// leniently at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
	pub id: Uuid,
	pub name: String,
	pub description: Option<String>,
	pub category: PhotoCategory,
	pub owner_login: String,
	pub created_at: DateTime<Utc>,
}

/// Category a photo is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoCategory {
	Selfie,
	#[default]
	Portrait,
	Action,
	Landscape,
	Graphic,
}

impl Photo {
	/// Create a new photo owned by `owner_login`.
	///
	/// The id and creation time are assigned here and nowhere else; stores
	/// persist the record as-is.
	pub fn new(
		name: String,
		description: Option<String>,
		category: PhotoCategory,
		owner_login: String,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			name,
			description,
			category,
			owner_login,
			created_at: Utc::now(),
		}
	}

	/// Public URL the image is served from.
	pub fn url(&self) -> String {
		format!("/img/photos/{}.jpg", self.id)
	}
}
