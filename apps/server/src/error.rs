//! Mapping from core failures to GraphQL errors.
//!
//! Every error carries a machine-readable `code` extension so clients can
//! switch on it without parsing messages. Provider transport failures are
//! reported to the client as a generic authentication failure; the detail
//! stays in the server log.

use async_graphql::{Error, ErrorExtensions};
use ps_core::{AuthError, StoreError};
use tracing::error;

pub mod code {
	pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
	pub const PROVIDER_UNREACHABLE: &str = "PROVIDER_UNREACHABLE";
	pub const PROVIDER_REJECTED: &str = "PROVIDER_REJECTED";
	pub const NOT_FOUND: &str = "NOT_FOUND";
	pub const DANGLING_REFERENCE: &str = "DANGLING_REFERENCE";
	pub const INVALID_ID: &str = "INVALID_ID";
	pub const STORE_FAILURE: &str = "STORE_FAILURE";
}

fn with_code(message: impl Into<String>, code: &'static str) -> Error {
	Error::new(message).extend_with(|_, ext| ext.set("code", code))
}

pub fn auth(err: AuthError) -> Error {
	match err {
		AuthError::ProviderUnreachable(detail) => {
			error!("authentication failed: {detail}");
			with_code("authentication failed", code::PROVIDER_UNREACHABLE)
		}
		AuthError::ProviderRejected(message) => with_code(message, code::PROVIDER_REJECTED),
		AuthError::Unauthorized(_) => with_code(err.to_string(), code::UNAUTHORIZED),
		AuthError::UnknownUser(_) => with_code(err.to_string(), code::NOT_FOUND),
		AuthError::Store(err) => store(err),
	}
}

pub fn store(err: StoreError) -> Error {
	error!("store call failed: {err}");
	with_code("store call failed", code::STORE_FAILURE)
}

/// A relation points at an entity that no longer exists. Scoped to the field
/// being resolved; sibling fields are unaffected.
pub fn dangling_reference(kind: &str, reference: &str) -> Error {
	with_code(
		format!("{kind} {reference} no longer exists"),
		code::DANGLING_REFERENCE,
	)
}

pub fn not_found(kind: &str, reference: &str) -> Error {
	with_code(format!("cannot find {kind} {reference}"), code::NOT_FOUND)
}

pub fn invalid_id(value: &str) -> Error {
	with_code(format!("malformed id {value:?}"), code::INVALID_ID)
}
