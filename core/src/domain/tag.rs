use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join record marking `user_login` as tagged in `photo_id`.
///
/// A tag has no identity beyond the pair it holds; the store keeps at most
/// one record per pair. Neither side is validated at write time, so a tag
/// can outlive the photo or user it points at.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
	pub photo_id: Uuid,
	pub user_login: String,
}
