//! Input validation for board payloads.
//!
//! Requests are turned into validated values before anything touches the database. Every
//! failing field gets its own message list so clients can tell which inputs to fix.

use crate::config::ValidationConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use shared_types::{CreateAnswerRequest, CreateQuestionAnswerRequest, CreateQuestionRequest};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_UUID: &str = "Must be a valid UUID.";
pub const NULL: &str = "This field may not be null.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Per-field validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Like [`merge`](Self::merge), but skips fields that already have messages.
    pub fn merge_new_fields(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_insert(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(value)` when no errors were collected.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Rules that can be tuned from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ValidationRules {
    /// Require `user_id` to parse as a UUID
    pub strict_user_id: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            strict_user_id: true,
        }
    }
}

impl From<&ValidationConfig> for ValidationRules {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            strict_user_id: config.strict_user_id,
        }
    }
}

/// Checks a free-text field. The text is kept verbatim; only its trimmed form must be non-empty.
fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    blank_message: &str,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, REQUIRED);
            None
        }
        Some(text) if text.trim().is_empty() => {
            errors.add(field, blank_message);
            None
        }
        Some(text) => Some(text),
    }
}

fn check_user_id(
    errors: &mut FieldErrors,
    value: Option<String>,
    rules: &ValidationRules,
) -> Option<String> {
    let user_id = match value {
        None => {
            errors.add("user_id", REQUIRED);
            return None;
        }
        Some(user_id) if user_id.trim().is_empty() => {
            errors.add("user_id", BLANK);
            return None;
        }
        Some(user_id) => user_id,
    };

    if !rules.strict_user_id {
        return Some(user_id);
    }

    match Uuid::parse_str(user_id.trim()) {
        Ok(uuid) => Some(uuid.hyphenated().to_string()),
        Err(_) => {
            errors.add("user_id", INVALID_UUID);
            None
        }
    }
}

/// A question payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub text: String,
}

impl NewQuestion {
    pub fn validate(request: CreateQuestionRequest) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let text = check_text(
            &mut errors,
            "text",
            request.text,
            "Question text cannot be empty.",
        );

        match text {
            Some(text) => errors.into_result(NewQuestion { text }),
            None => Err(errors),
        }
    }
}

/// The client-supplied half of an answer. It has no owning question yet; that is attached
/// with [`ValidatedAnswer::for_question`] once the question is known to exist.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAnswer {
    pub user_id: String,
    pub text: String,
}

impl ValidatedAnswer {
    pub fn validate(
        user_id: Option<String>,
        text: Option<String>,
        rules: &ValidationRules,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let user_id = check_user_id(&mut errors, user_id, rules);
        let text = check_text(&mut errors, "text", text, "Answer text cannot be empty.");

        match (user_id, text) {
            (Some(user_id), Some(text)) => errors.into_result(ValidatedAnswer { user_id, text }),
            _ => Err(errors),
        }
    }

    pub fn from_question_request(
        request: CreateQuestionAnswerRequest,
        rules: &ValidationRules,
    ) -> Result<Self, FieldErrors> {
        Self::validate(request.user_id, request.text, rules)
    }

    pub fn for_question(self, question_id: i64) -> NewAnswer {
        NewAnswer {
            question_id,
            user_id: self.user_id,
            text: self.text,
        }
    }
}

/// An answer ready to insert. Only constructed through [`ValidatedAnswer::for_question`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub question_id: i64,
    pub user_id: String,
    pub text: String,
}

/// Validates a direct `POST /answers/` payload. Returns the claimed question id alongside the
/// answer so the caller can resolve it; a missing `question` is reported with the other fields.
pub fn validate_answer_request(
    request: CreateAnswerRequest,
    rules: &ValidationRules,
) -> Result<(i64, ValidatedAnswer), FieldErrors> {
    let mut errors = FieldErrors::default();
    if request.question.is_none() {
        errors.add("question", REQUIRED);
    }

    let answer = match ValidatedAnswer::validate(request.user_id, request.text, rules) {
        Ok(answer) => Some(answer),
        Err(answer_errors) => {
            errors.merge(answer_errors);
            None
        }
    };

    match (request.question, answer) {
        (Some(question_id), Some(answer)) => errors.into_result((question_id, answer)),
        _ => Err(errors),
    }
}

/// A JSON object body whose fields are decoded one at a time, so a value of the wrong type is
/// reported under its own field name instead of failing the whole body.
#[derive(Debug)]
pub struct JsonFields {
    fields: Map<String, Value>,
    errors: FieldErrors,
}

impl JsonFields {
    /// Malformed JSON, or JSON that is not an object, is a `non_field_errors` failure.
    pub fn parse(body: &[u8]) -> Result<Self, FieldErrors> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| non_field_error(format!("JSON parse error - {e}")))?;

        match value {
            Value::Object(fields) => Ok(JsonFields {
                fields,
                errors: FieldErrors::default(),
            }),
            other => Err(non_field_error(format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(&other)
            ))),
        }
    }

    /// A text field. Numbers are taken in their JSON spelling.
    pub fn string(&mut self, field: &str) -> Option<String> {
        match self.fields.remove(field)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Null => {
                self.errors.add(field, NULL);
                None
            }
            _ => {
                self.errors.add(field, NOT_A_STRING);
                None
            }
        }
    }

    /// A primary-key field, given as an integer or a string of digits.
    pub fn primary_key(&mut self, field: &str) -> Option<i64> {
        let value = self.fields.remove(field)?;
        let parsed = match &value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Null => {
                self.errors.add(field, NULL);
                return None;
            }
            _ => None,
        };

        if parsed.is_none() {
            self.errors.add(
                field,
                format!(
                    "Incorrect type. Expected pk value, received {}.",
                    json_type_name(&value)
                ),
            );
        }
        parsed
    }

    /// Combines decoding errors with the outcome of validating the decoded request. A field
    /// that failed to decode keeps only its decoding message.
    pub fn check<T>(self, validated: Result<T, FieldErrors>) -> Result<T, FieldErrors> {
        let mut errors = self.errors;
        match validated {
            Ok(value) => errors.into_result(value),
            Err(validation_errors) => {
                errors.merge_new_fields(validation_errors);
                Err(errors)
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Decodes and validates a `POST /questions/` body.
pub fn question_from_body(body: &[u8]) -> Result<NewQuestion, FieldErrors> {
    let mut fields = JsonFields::parse(body)?;
    let request = CreateQuestionRequest {
        text: fields.string("text"),
    };
    fields.check(NewQuestion::validate(request))
}

/// Decodes and validates a `POST /questions/{id}/answers/` body. Any `question` field is ignored.
pub fn question_answer_from_body(
    body: &[u8],
    rules: &ValidationRules,
) -> Result<ValidatedAnswer, FieldErrors> {
    let mut fields = JsonFields::parse(body)?;
    let request = CreateQuestionAnswerRequest {
        user_id: fields.string("user_id"),
        text: fields.string("text"),
    };
    fields.check(ValidatedAnswer::from_question_request(request, rules))
}

pub fn non_field_error(message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.add(NON_FIELD_ERRORS, message);
    errors
}

pub fn missing_question_message(question_id: i64) -> String {
    format!("Invalid pk \"{question_id}\" - object does not exist.")
}
