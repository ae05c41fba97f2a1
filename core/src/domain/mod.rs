//! Domain entities.
//!
//! Photos and users live in independent collections; tags are join records
//! linking the two. References between collections are plain identifiers and
//! may go stale; the resolution layer is expected to tolerate that.

mod photo;
mod tag;
mod user;

pub use photo::{Photo, PhotoCategory};
pub use tag::Tag;
pub use user::User;
