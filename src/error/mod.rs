//! Error types for the state primitives.
//!
//! The primitives distinguish four kinds of failure:
//!
//! | Kind | Type | Reaches the consumer |
//! |------|------|----------------------|
//! | Operation failure | [`ApiError`] | Yes, as a message string |
//! | Validation failure | [`SubmitError::Invalid`] | Yes, as field-keyed messages |
//! | Persistence failure | [`StoreError`] | No, logged |
//! | Malformed persisted data | [`StoreError::Malformed`] | No, logged |
//!
//! Only the first two are ever returned from a public method. Store failures
//! are logged and absorbed by [`crate::state::PersistentValue`].

mod api;
mod store;
mod submit;

pub use api::{ApiError, ErrorResponse};
pub use store::StoreError;
pub use submit::SubmitError;
