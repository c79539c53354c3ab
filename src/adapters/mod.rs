//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`FileStore`] - Durable [`KeyValueStore`](crate::traits::KeyValueStore)
//!   backed by a JSON file
//! - [`RestClient`] - [`ApiBackend`](crate::traits::ApiBackend) over reqwest
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::InMemoryStore`] - In-memory store with injectable failures
//! - [`mock::MockBackend`] - Canned API responses and request recording

pub mod file_store;
pub mod mock;
pub mod rest;

pub use file_store::FileStore;
pub use mock::{InMemoryStore, MockBackend};
pub use rest::RestClient;
