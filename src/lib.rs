//! Panel State - client state primitives for admin panel front ends
//!
//! Async operations, API resources and mutations, debouncing, pagination,
//! filters, forms, modals, toggles and persisted values, each a small state
//! machine owned by the component that creates it.

pub mod adapters;
pub mod config;
pub mod error;
pub mod state;
pub mod timer;
pub mod traits;

pub use config::StateConfig;
pub use error::{ApiError, StoreError, SubmitError};
