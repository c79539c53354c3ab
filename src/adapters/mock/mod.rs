//! Mock implementations for testing.
//!
//! These doubles let the primitives be exercised without network access or
//! file system access.
//!
//! # Available Mocks
//!
//! - [`InMemoryStore`] - Key/value store with configurable failures
//! - [`MockBackend`] - API backend with configurable responses

pub mod backend;
pub mod store;

pub use backend::{MockBackend, RecordedRequest};
pub use store::InMemoryStore;
