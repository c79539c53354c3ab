//! Form session state: values, field errors, touched fields, submission.
//!
//! An error disappears as soon as its field changes; the field is only
//! judged again on the next validation pass (explicit or on submit).

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use serde_json::Value;

use super::lock;
use crate::config::DEFAULT_OPERATION_FAILED_MESSAGE;
use crate::error::{ApiError, SubmitError};

/// Field values by field name.
pub type FieldValues = IndexMap<String, Value>;

/// Error messages by field name.
pub type FieldErrors = IndexMap<String, String>;

/// Error key for failures that belong to the whole form.
pub const FORM_ERROR_KEY: &str = "_form";

type Validator = Arc<dyn Fn(&FieldValues) -> FieldErrors + Send + Sync>;
type SubmitHandler = Arc<dyn Fn(FieldValues) -> BoxFuture<'static, Result<Value, ApiError>> + Send + Sync>;

/// Kind of input a change event came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    Number,
    Select,
    Textarea,
    Checkbox,
}

/// A change event from a form field.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub name: String,
    pub kind: InputKind,
    pub value: Value,
    pub checked: bool,
}

impl ChangeEvent {
    /// Change of a text-like input.
    pub fn input(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Text,
            value: value.into(),
            checked: false,
        }
    }

    /// Change of a checkbox.
    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Checkbox,
            value: Value::Null,
            checked,
        }
    }

    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    /// The value the field takes: `checked` for checkboxes, `value` otherwise.
    pub fn field_value(&self) -> Value {
        match self.kind {
            InputKind::Checkbox => Value::Bool(self.checked),
            _ => self.value.clone(),
        }
    }
}

/// Everything a field renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub value: Option<Value>,
    pub error: Option<String>,
    pub touched: bool,
}

#[derive(Debug, Clone, Default)]
struct FormState {
    values: FieldValues,
    errors: FieldErrors,
    touched: IndexMap<String, bool>,
    submitting: bool,
}

/// Controller for one form session.
///
/// # Example
///
/// ```ignore
/// use panel_state::state::{FieldErrors, FormController};
///
/// let form = FormController::new(initial)
///     .with_validator(|values| {
///         let mut errors = FieldErrors::new();
///         if values["name"] == "" {
///             errors.insert("name".into(), "必填".into());
///         }
///         errors
///     })
///     .with_submit(move |values| create_project(values));
///
/// match form.handle_submit().await {
///     Ok(created) => close_dialog(created),
///     Err(err) => tracing::debug!(%err, "Form not submitted"),
/// }
/// ```
pub struct FormController {
    initial: FieldValues,
    state: Mutex<FormState>,
    validator: Option<Validator>,
    on_submit: Option<SubmitHandler>,
    default_error: String,
}

impl FormController {
    pub fn new(initial: FieldValues) -> Self {
        Self {
            state: Mutex::new(FormState {
                values: initial.clone(),
                ..FormState::default()
            }),
            initial,
            validator: None,
            on_submit: None,
            default_error: DEFAULT_OPERATION_FAILED_MESSAGE.to_string(),
        }
    }

    /// Build from `(field, value)` pairs, keeping their order.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Validation pass: returns an error message per invalid field.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&FieldValues) -> FieldErrors + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Submission handler; its success value is returned by `handle_submit`.
    pub fn with_submit<F, Fut>(mut self, on_submit: F) -> Self
    where
        F: Fn(FieldValues) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        self.on_submit = Some(Arc::new(move |values| on_submit(values).boxed()));
        self
    }

    /// Message stored under `_form` when a failed submission carries none.
    pub fn with_default_error(mut self, message: impl Into<String>) -> Self {
        self.default_error = message.into();
        self
    }

    /// Set one field and drop its error without re-validating.
    pub fn set_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let mut state = lock(&self.state);
        state.errors.shift_remove(&name);
        state.values.insert(name, value.into());
    }

    /// Set several fields, dropping their errors.
    pub fn set_values<I, K>(&self, patch: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut state = lock(&self.state);
        for (name, value) in patch {
            let name = name.into();
            state.errors.shift_remove(&name);
            state.values.insert(name, value);
        }
    }

    pub fn set_field_error(&self, name: impl Into<String>, message: impl Into<String>) {
        lock(&self.state).errors.insert(name.into(), message.into());
    }

    pub fn set_field_touched(&self, name: impl Into<String>, touched: bool) {
        lock(&self.state).touched.insert(name.into(), touched);
    }

    /// Apply a field change event.
    pub fn handle_change(&self, event: &ChangeEvent) {
        self.set_value(event.name.clone(), event.field_value());
    }

    /// Mark a field touched after it loses focus.
    pub fn handle_blur(&self, name: impl Into<String>) {
        self.set_field_touched(name, true);
    }

    /// Run the validator and store its result, replacing previous errors.
    ///
    /// Without a validator the errors become empty.
    pub fn validate_form(&self) -> FieldErrors {
        let values = lock(&self.state).values.clone();
        let errors = self
            .validator
            .as_ref()
            .map(|validate| validate(&values))
            .unwrap_or_default();
        lock(&self.state).errors = errors.clone();
        errors
    }

    /// Validate and, if valid, submit.
    ///
    /// Every known field is marked touched first. The submit handler is never
    /// called while the form has errors. `submitting` is true only while the
    /// handler runs, including when this future is dropped midway.
    pub async fn handle_submit(&self) -> Result<Value, SubmitError> {
        {
            let mut state = lock(&self.state);
            let names: Vec<String> = state.values.keys().cloned().collect();
            for name in names {
                state.touched.insert(name, true);
            }
        }

        let errors = self.validate_form();
        if !errors.is_empty() {
            tracing::debug!(invalid_fields = errors.len(), "Form submission blocked by validation");
            return Err(SubmitError::Invalid(errors));
        }

        let Some(on_submit) = self.on_submit.clone() else {
            return Ok(Value::Null);
        };

        let values = {
            let mut state = lock(&self.state);
            state.submitting = true;
            state.values.clone()
        };
        let _submitting = SubmittingGuard { state: &self.state };

        match on_submit(values).await {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::debug!(error = %err, "Form submission failed");
                let message = err.user_message(&self.default_error);
                lock(&self.state)
                    .errors
                    .insert(FORM_ERROR_KEY.to_string(), message);
                Err(SubmitError::Failed(err))
            }
        }
    }

    /// Back to the initial values with no errors, nothing touched.
    pub fn reset(&self) {
        *lock(&self.state) = FormState {
            values: self.initial.clone(),
            ..FormState::default()
        };
    }

    pub fn values(&self) -> FieldValues {
        lock(&self.state).values.clone()
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        lock(&self.state).values.get(name).cloned()
    }

    pub fn errors(&self) -> FieldErrors {
        lock(&self.state).errors.clone()
    }

    pub fn error(&self, name: &str) -> Option<String> {
        lock(&self.state).errors.get(name).cloned()
    }

    pub fn is_touched(&self, name: &str) -> bool {
        lock(&self.state).touched.get(name).copied().unwrap_or(false)
    }

    pub fn field(&self, name: &str) -> FieldState {
        let state = lock(&self.state);
        FieldState {
            value: state.values.get(name).cloned(),
            error: state.errors.get(name).cloned(),
            touched: state.touched.get(name).copied().unwrap_or(false),
        }
    }

    pub fn is_submitting(&self) -> bool {
        lock(&self.state).submitting
    }

    /// Whether any value differs from the initial values.
    pub fn is_dirty(&self) -> bool {
        lock(&self.state).values != self.initial
    }

    /// Whether there are no errors recorded.
    pub fn is_valid(&self) -> bool {
        lock(&self.state).errors.is_empty()
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("state", &*lock(&self.state))
            .field("has_validator", &self.validator.is_some())
            .field("has_submit", &self.on_submit.is_some())
            .finish()
    }
}

/// Clears `submitting` when the submission ends, however it ends.
struct SubmittingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).submitting = false;
    }
}
