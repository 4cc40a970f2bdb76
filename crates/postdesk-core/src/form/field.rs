//! Form fields and their validation rules.

use super::mime::{AcceptedTypes, check_mime_type};
use crate::domain::ImageValue;

/// Validation rule attached to a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("is required")]
    Required,

    #[error("must be at least {required} characters (got {actual})")]
    MinLength { required: usize, actual: usize },

    #[error("{}", describe_mime(.detected))]
    InvalidMimeType { detected: Option<String> },
}

fn describe_mime(detected: &Option<String>) -> String {
    match detected {
        Some(mime) => format!("has unsupported type {}", mime),
        None => "is not a recognised image".to_string(),
    }
}

/// Validation state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    Valid,
    Invalid,
    /// A value was set but its validation has not completed yet.
    Pending,
}

/// Run text rules against a value.
///
/// `MinLength` only applies to non-empty values; emptiness is the job of
/// `Required`.
pub fn validate_text(value: &str, rules: &[Rule]) -> Vec<FieldError> {
    rules
        .iter()
        .filter_map(|rule| match *rule {
            Rule::Required if value.is_empty() => Some(FieldError::Required),
            Rule::MinLength(required) => {
                let actual = value.chars().count();
                (actual > 0 && actual < required)
                    .then_some(FieldError::MinLength { required, actual })
            }
            _ => None,
        })
        .collect()
}

/// Validate the image field value.
pub fn validate_image(
    value: Option<&ImageValue>,
    required: bool,
    accepted: &AcceptedTypes,
) -> Vec<FieldError> {
    match value {
        None if required => vec![FieldError::Required],
        None => Vec::new(),
        Some(ImageValue::Stored(_)) => Vec::new(),
        Some(ImageValue::File(file)) => match check_mime_type(file, accepted) {
            Ok(_) => Vec::new(),
            Err(err) => vec![err],
        },
    }
}

/// Text input with a fixed rule set.
#[derive(Debug, Clone)]
pub struct TextField {
    value: String,
    rules: Vec<Rule>,
    errors: Vec<FieldError>,
}

impl TextField {
    pub fn new(rules: Vec<Rule>) -> Self {
        let errors = validate_text("", &rules);
        Self {
            value: String::new(),
            rules,
            errors,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.errors = validate_text(&self.value, &self.rules);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn status(&self) -> FieldStatus {
        if self.errors.is_empty() {
            FieldStatus::Valid
        } else {
            FieldStatus::Invalid
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status() == FieldStatus::Valid
    }

    pub fn reset(&mut self) {
        self.set(String::new());
    }
}

/// Image input; required only while creating a post.
#[derive(Debug, Clone)]
pub struct ImageField {
    value: Option<ImageValue>,
    required: bool,
    status: FieldStatus,
    errors: Vec<FieldError>,
}

impl ImageField {
    pub fn new(required: bool) -> Self {
        let mut field = Self {
            value: None,
            required,
            status: FieldStatus::Valid,
            errors: Vec::new(),
        };
        field.refresh_required();
        field
    }

    pub fn value(&self) -> Option<&ImageValue> {
        self.value.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn status(&self) -> FieldStatus {
        self.status
    }

    pub fn is_valid(&self) -> bool {
        self.status == FieldStatus::Valid
    }

    pub fn has_invalid_mime_type(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, FieldError::InvalidMimeType { .. }))
    }

    /// Store a new value and mark it pending until [`validate`](Self::validate) runs.
    pub fn set_pending(&mut self, value: ImageValue) {
        self.value = Some(value);
        self.errors.clear();
        self.status = FieldStatus::Pending;
    }

    /// Resolve the field's validation state against the accepted types.
    pub fn validate(&mut self, accepted: &AcceptedTypes) -> FieldStatus {
        self.errors = validate_image(self.value.as_ref(), self.required, accepted);
        self.status = if self.errors.is_empty() {
            FieldStatus::Valid
        } else {
            FieldStatus::Invalid
        };
        self.status
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
        if self.status != FieldStatus::Pending {
            self.refresh_required();
        }
    }

    pub fn reset(&mut self) {
        self.value = None;
        self.errors.clear();
        self.status = FieldStatus::Valid;
        self.refresh_required();
    }

    // A stored or empty value never needs sniffing.
    fn refresh_required(&mut self) {
        if self.value.as_ref().is_none_or(|v| !v.is_file()) {
            self.validate(&AcceptedTypes::default());
        }
    }
}
