//! Form state container driving the submit pipeline.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::{ErrorMap, FormValues, ValidationSchema, Validator};

/// Handler invoked with the current values once a form passes validation.
///
/// A returned failure is logged by the container and never mapped back
/// into field errors; callers that want user-visible messages for
/// business failures translate them themselves.
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Submit the validated values.
    async fn submit(&self, values: &FormValues) -> Result<()>;
}

/// A name/value pair extracted from a UI input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    /// Name of the field the event targets.
    pub name: String,

    /// The field's new value.
    pub value: Value,
}

impl InputEvent {
    /// Create an input event.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Tracks current values and errors for a structured record and drives
/// the submit pipeline.
///
/// The field set is fixed at construction: writes only mutate seeded
/// fields, never add new ones. Each instance owns an isolated copy of
/// its values and errors.
pub struct FormState {
    values: FormValues,
    validator: Validator,
    submitting: Arc<AtomicBool>,
    handler: Arc<dyn SubmitHandler>,
}

impl FormState {
    /// Create a form seeded with initial values, a validation schema,
    /// and the submit handler. The error map starts empty.
    pub fn new(
        initial: FormValues,
        schema: ValidationSchema,
        handler: Arc<dyn SubmitHandler>,
    ) -> Self {
        Self {
            values: initial,
            validator: Validator::new(schema),
            submitting: Arc::new(AtomicBool::new(false)),
            handler,
        }
    }

    /// Overwrite a field's value and optimistically clear its error.
    ///
    /// The error is only re-established on the next validation pass; the
    /// new value is not live-rechecked here. Writes to names that were
    /// never seeded are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        let Some(slot) = self.values.get_mut(name) else {
            warn!(field = %name, "ignoring write to unknown form field");
            return;
        };
        *slot = value.into();
        self.validator.clear_error(name);
    }

    /// Convenience wrapper over [`set_field`](Self::set_field) for UI
    /// input events.
    pub fn handle_change(&mut self, event: InputEvent) {
        self.set_field(&event.name, event.value);
    }

    /// Validate the full record and, if it passes, run the submit handler.
    ///
    /// On validation failure the error map is replaced with the fresh
    /// failures and the handler is not invoked; returns false. Otherwise
    /// the `submitting` flag is set around the handler call and the
    /// handler's own failure, if any, is logged without touching the
    /// error map; returns true.
    ///
    /// There is no retry, timeout, or concurrent-submit guard: callers
    /// are expected to disable their trigger while
    /// [`is_submitting`](Self::is_submitting) reports true. The flag is
    /// shared; [`submitting_handle`](Self::submitting_handle) lets other
    /// tasks watch it while this call is in flight.
    pub async fn submit(&mut self) -> bool {
        if !self.validator.validate_form(&self.values) {
            debug!(
                errors = self.validator.errors().len(),
                "form submission blocked by validation"
            );
            return false;
        }

        self.submitting.store(true, Ordering::SeqCst);
        let result = self.handler.submit(&self.values).await;
        self.submitting.store(false, Ordering::SeqCst);

        if let Err(e) = result {
            warn!(error = %e, "form submit handler failed");
        }
        true
    }

    /// Current field values.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// A single field's current value.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Current per-field errors.
    pub fn errors(&self) -> &ErrorMap {
        self.validator.errors()
    }

    /// A single field's current error message.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.validator.errors().get(name).map(String::as_str)
    }

    /// Whether a submit handler call is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Shared handle to the submitting flag.
    ///
    /// [`submit`](Self::submit) borrows the container exclusively across
    /// its await, so observers that gate a trigger while a submission is
    /// pending read the flag through this handle instead.
    pub fn submitting_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.submitting)
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("values", &self.values)
            .field("errors", self.validator.errors())
            .field("submitting", &self.submitting.load(Ordering::SeqCst))
            .finish()
    }
}
