//! Client state primitives.
//!
//! Each primitive is a small state machine owned by the component that
//! creates it:
//!
//! - [`AsyncOperation`] - `idle → pending → success | error` around any future
//! - [`ApiResource`] / [`ApiMutation`] - backend reads and writes with
//!   user-facing error messages
//! - [`DebouncedValue`] / [`DebouncedCallback`] - quiet-period propagation
//! - [`Paginator`] - clamped page navigation
//! - [`FilterSet`] - filter criteria and their query projection
//! - [`FormController`] - values, errors, touched fields and submission
//! - [`ModalController`] - open/close with a transient payload
//! - [`ToggleState`] - boolean flag
//! - [`PersistentValue`] - a value mirrored into a durable store

mod api;
mod async_op;
mod debounce;
mod filter;
mod form;
mod merge;
mod modal;
mod pagination;
mod persistent;
mod toggle;

pub use api::{ApiMutation, ApiOptions, ApiResource, MutationOptions, Payload, ResourceSnapshot};
pub use async_op::{AsyncOperation, AsyncSnapshot, AsyncStatus, SettlePolicy};
pub use debounce::{DebouncedCallback, DebouncedValue};
pub use filter::{is_sentinel, FilterSet, FilterValues};
pub use form::{
    ChangeEvent, FieldErrors, FieldState, FieldValues, FormController, InputKind, FORM_ERROR_KEY,
};
pub use merge::ShallowMerge;
pub use modal::ModalController;
pub use pagination::{PageParams, PageUpdate, Paginator};
pub use persistent::PersistentValue;
pub use toggle::ToggleState;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a primitive's state, recovering it if a callback panicked mid-update.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
