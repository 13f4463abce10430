//! Declarative validation rules and the validation engine.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::error::FormsError;

/// Current form values, keyed by field name.
///
/// The field set is fixed when the owning form is created; values are
/// mutated afterwards but fields are never added or removed.
pub type FormValues = BTreeMap<String, Value>;

/// Per-field validation failure messages.
///
/// A field present here is invalid; absence means valid. Keys are always
/// a subset of the schema's field set.
pub type ErrorMap = BTreeMap<String, String>;

/// Custom predicate over a field value and the full record.
///
/// Returns an error message, or `None` for no-error. Predicates are pure:
/// they never panic and have no failure path of their own.
type Predicate = Arc<dyn Fn(&Value, &FormValues) -> Option<String> + Send + Sync>;

/// Shared pattern for the email rule.
///
/// # Panics
///
/// Panics if the hard-coded regex literal is invalid (impossible in practice).
#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex literal"));

static NULL: Value = Value::Null;

/// A single validation constraint for one field.
#[derive(Clone)]
pub enum Rule {
    /// Value must be present and non-empty.
    Required,

    /// Minimum length: characters for strings, elements for lists.
    MinLength(usize),

    /// Maximum length: characters for strings, elements for lists.
    MaxLength(usize),

    /// Value must be a plausible email address.
    Email,

    /// Value must match a regular expression.
    Pattern {
        regex: Regex,
        /// Message reported when the pattern does not match.
        message: String,
    },

    /// Value must equal another field's current value.
    Matches(String),

    /// Custom predicate receiving the value and the full record.
    Custom(Predicate),
}

impl Rule {
    /// Create a pattern rule from a regex literal.
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, FormsError> {
        Ok(Rule::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Create a custom rule from a predicate.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &FormValues) -> Option<String> + Send + Sync + 'static,
    {
        Rule::Custom(Arc::new(predicate))
    }

    fn kind(&self) -> RuleKind {
        match self {
            Rule::Required => RuleKind::Required,
            Rule::MinLength(_) => RuleKind::MinLength,
            Rule::MaxLength(_) => RuleKind::MaxLength,
            Rule::Email => RuleKind::Email,
            Rule::Pattern { .. } => RuleKind::Pattern,
            Rule::Matches(_) => RuleKind::Matches,
            Rule::Custom(_) => RuleKind::Custom,
        }
    }

    /// Evaluate this rule against a non-empty value.
    ///
    /// `Required` always passes here: presence is handled by the engine's
    /// empty-value check before per-rule evaluation begins.
    fn check(&self, name: &str, value: &Value, record: &FormValues) -> Option<String> {
        match self {
            Rule::Required => None,
            Rule::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => {
                    Some(format!("{name} must be at least {min} characters"))
                }
                _ => None,
            },
            Rule::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => {
                    Some(format!("{name} must be at most {max} characters"))
                }
                _ => None,
            },
            Rule::Email => match value.as_str() {
                Some(s) if EMAIL_PATTERN.is_match(s) => None,
                _ => Some("Email is invalid".to_string()),
            },
            Rule::Pattern { regex, message } => match value.as_str() {
                Some(s) if regex.is_match(s) => None,
                _ => Some(message.clone()),
            },
            Rule::Matches(other) => {
                if record.get(other.as_str()) == Some(value) {
                    None
                } else {
                    Some(format!("{name} does not match {other}"))
                }
            }
            Rule::Custom(predicate) => predicate(value, record),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("Required"),
            Rule::MinLength(min) => write!(f, "MinLength({min})"),
            Rule::MaxLength(max) => write!(f, "MaxLength({max})"),
            Rule::Email => f.write_str("Email"),
            Rule::Pattern { regex, .. } => write!(f, "Pattern({})", regex.as_str()),
            Rule::Matches(other) => write!(f, "Matches({other})"),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Rule discriminant used to pin evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Email,
    Pattern,
    Matches,
    Custom,
}

impl RuleKind {
    /// Evaluation order for non-empty values. Fixed regardless of the
    /// order rules were declared in.
    const ORDER: [RuleKind; 6] = [
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Email,
        RuleKind::Pattern,
        RuleKind::Matches,
        RuleKind::Custom,
    ];
}

/// Per-field rule declarations, keyed by field name.
///
/// Fields absent from the schema are never validated.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    fields: BTreeMap<String, Vec<Rule>>,
}

impl ValidationSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare rules for a field.
    pub fn field(
        mut self,
        name: impl Into<String>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.fields.entry(name.into()).or_default().extend(rules);
        self
    }

    /// Add a single rule to a field.
    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.fields.entry(name.into()).or_default().push(rule);
        self
    }

    /// Whether the schema declares rules for a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Names of all declared fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// The validation engine: evaluates a schema against candidate values
/// and stores the resulting [`ErrorMap`].
#[derive(Debug, Clone, Default)]
pub struct Validator {
    schema: ValidationSchema,
    errors: ErrorMap,
}

impl Validator {
    /// Create a validator for the given schema with an empty error map.
    pub fn new(schema: ValidationSchema) -> Self {
        Self {
            schema,
            errors: ErrorMap::new(),
        }
    }

    /// Validate a single field value against its declared rules.
    ///
    /// Returns the first failing rule's message, or `None` when the field
    /// is valid or undeclared. Evaluation short-circuits: a `Required`
    /// failure stops everything, an empty optional value passes without
    /// consulting the remaining rules, and otherwise rules run in fixed
    /// order (min length, max length, email, pattern, match, custom) with
    /// first-failure-wins.
    pub fn validate_field(&self, name: &str, value: &Value, record: &FormValues) -> Option<String> {
        let rules = self.schema.fields.get(name)?;

        if is_empty(value) {
            if rules.iter().any(|r| matches!(r, Rule::Required)) {
                return Some(format!("{name} is required"));
            }
            // Remaining rules never run against empty optional input.
            return None;
        }

        for kind in RuleKind::ORDER {
            let Some(rule) = rules.iter().find(|r| r.kind() == kind) else {
                continue;
            };
            if let Some(message) = rule.check(name, value, record) {
                return Some(message);
            }
        }

        None
    }

    /// Validate every declared field and replace the stored error map
    /// wholesale. Returns whether the record is valid.
    ///
    /// Fields missing from the record are validated as null. Stale errors
    /// for fields that no longer fail are cleared by the replacement.
    pub fn validate_form(&mut self, record: &FormValues) -> bool {
        let mut errors = ErrorMap::new();
        for name in self.schema.fields.keys() {
            let value = record.get(name).unwrap_or(&NULL);
            if let Some(message) = self.validate_field(name, value, record) {
                errors.insert(name.clone(), message);
            }
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Current per-field errors.
    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Whether the stored error map is empty.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Remove a single field's error, if present.
    pub fn clear_error(&mut self, name: &str) {
        self.errors.remove(name);
    }

    /// The schema this validator evaluates.
    pub fn schema(&self) -> &ValidationSchema {
        &self.schema
    }
}

/// Empty/falsy test for field values: null, empty string, false, numeric
/// zero, or an empty list.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Length of a value for the length rules: characters for strings,
/// elements for lists, inapplicable otherwise.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
