//! Form state container and declarative validation engine.
//!
//! The form system supports:
//! - A generic values/errors container driving a submit pipeline
//! - Declarative per-field rules with first-failure-wins evaluation
//! - Optimistic error clearing on field change
//! - An async submit handler seam for wiring forms to storage
//!
//! Each [`FormState`] owns an isolated copy of its values and errors;
//! independent form instances never share state.

mod error;
mod schema;
mod state;

pub use error::FormsError;
pub use schema::{ErrorMap, FormValues, Rule, ValidationSchema, Validator};
pub use state::{FormState, InputEvent, SubmitHandler};
