//! Trait abstractions for the primitives' external collaborators.
//!
//! The primitives never reach for a global: the durable store and the REST
//! backend are injected as capability objects so tests can substitute
//! in-memory doubles.
//!
//! # Traits
//!
//! - [`KeyValueStore`] - Durable string key/value storage
//! - [`ApiBackend`] - Async REST calls returning JSON

pub mod backend;
pub mod store;

pub use backend::{ApiBackend, ApiRequest, Method};
pub use store::KeyValueStore;
