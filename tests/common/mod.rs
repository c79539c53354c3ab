//! Common test utilities for integration tests.
//!
//! Fixtures for the list endpoint used across the suites and small helpers
//! around the mock adapters.
//!
//! # Example
//!
//! ```ignore
//! let backend = mock_backend_with_projects(3);
//! let resource = ApiResource::get(backend.clone(), PROJECTS_PATH, ApiOptions::default());
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use panel_state::adapters::{InMemoryStore, MockBackend};
use panel_state::traits::{KeyValueStore, Method};
use panel_state::ApiError;
use serde_json::{json, Value};

pub const PROJECTS_PATH: &str = "/projects";

/// A list response body in the `{data: {items, total}}` envelope.
pub fn project_page(count: usize, total: u64) -> Value {
    let items: Vec<Value> = (1..=count)
        .map(|id| json!({"id": id, "name": format!("Project {}", id)}))
        .collect();
    json!({"data": {"items": items, "total": total}})
}

/// Backend whose project list always returns `count` projects.
pub fn mock_backend_with_projects(count: usize) -> MockBackend {
    let backend = MockBackend::new();
    backend.respond(Method::Get, PROJECTS_PATH, Ok(project_page(count, count as u64)));
    backend
}

/// A failed response carrying a server `detail`.
pub fn detail_error(status: u16, detail: &str) -> ApiError {
    ApiError::from_response(status, json!({"detail": detail}))
}

/// Shared store handle plus the concrete mock for toggling failures.
pub fn shared_store() -> (Arc<dyn KeyValueStore>, InMemoryStore) {
    let store = InMemoryStore::new();
    (Arc::new(store.clone()), store)
}
