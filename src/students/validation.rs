//! Field constraints applied before any store call.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::types::{Address, Student, StudentId, StudentPayload, StudentUpdate};

/// Minimum number of characters accepted for a student name.
pub const MIN_NAME_LEN: usize = 3;

/// A single violated constraint, addressed by dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path of the offending field (`name`, `address.city`, ...).
    pub field: String,
    /// Human readable description of the constraint.
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Input rejected by schema constraints. Lists every violated field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid student payload ({} violation(s))", .violations.len())]
pub struct ValidationError {
    /// All violations found in the payload.
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Build an error carrying a single violation.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new(field, message)],
        }
    }
}

/// Path identifier that is not a well-formed store id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid ID format: {0}")]
pub struct InvalidIdentifier(pub String);

/// Validate a full student body for creation.
pub fn validate_create(payload: StudentPayload) -> Result<Student, ValidationError> {
    let mut violations = Vec::new();

    let name = required("name", payload.name, &mut violations)
        .and_then(|value| check_name(value, &mut violations));
    let age = required("age", payload.age, &mut violations)
        .and_then(|value| check_age(value, &mut violations));
    let address = required("address", payload.address, &mut violations)
        .and_then(|value| check_address(value, &mut violations));

    match (name, age, address) {
        (Some(name), Some(age), Some(address)) if violations.is_empty() => {
            Ok(Student { name, age, address })
        }
        _ => Err(ValidationError { violations }),
    }
}

/// Validate a partial update. An empty payload is a valid no-op.
pub fn validate_update(payload: StudentPayload) -> Result<StudentUpdate, ValidationError> {
    let mut violations = Vec::new();

    let update = StudentUpdate {
        name: payload
            .name
            .and_then(|value| check_name(value, &mut violations)),
        age: payload
            .age
            .and_then(|value| check_age(value, &mut violations)),
        address: payload
            .address
            .and_then(|value| check_address(value, &mut violations)),
    };

    if violations.is_empty() {
        Ok(update)
    } else {
        Err(ValidationError { violations })
    }
}

/// Parse a path identifier without consulting the store.
pub fn validate_identifier(raw: &str) -> Result<StudentId, InvalidIdentifier> {
    raw.parse()
}

fn required(
    field: &str,
    value: Option<Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    if value.is_none() {
        violations.push(FieldViolation::new(field, "field required"));
    }
    value
}

fn check_name(value: Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let name = text("name", value, violations)?;
    if name.chars().count() < MIN_NAME_LEN {
        violations.push(FieldViolation::new(
            "name",
            format!("must be at least {MIN_NAME_LEN} characters"),
        ));
        return None;
    }
    Some(name)
}

fn check_age(value: Value, violations: &mut Vec<FieldViolation>) -> Option<i64> {
    let Some(age) = value.as_i64() else {
        violations.push(FieldViolation::new("age", "must be an integer"));
        return None;
    };
    if age <= 0 {
        violations.push(FieldViolation::new("age", "must be greater than 0"));
        return None;
    }
    Some(age)
}

fn check_address(value: Value, violations: &mut Vec<FieldViolation>) -> Option<Address> {
    let Value::Object(mut fields) = value else {
        violations.push(FieldViolation::new("address", "must be an object"));
        return None;
    };
    let city = non_empty_text("address.city", fields.remove("city"), violations);
    let country = non_empty_text("address.country", fields.remove("country"), violations);
    Some(Address {
        city: city?,
        country: country?,
    })
}

fn non_empty_text(
    field: &str,
    value: Option<Value>,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let value = match value {
        Some(Value::Null) | None => {
            violations.push(FieldViolation::new(field, "field required"));
            return None;
        }
        Some(value) => value,
    };
    let text = text(field, value, violations)?;
    if text.is_empty() {
        violations.push(FieldViolation::new(field, "must not be empty"));
        return None;
    }
    Some(text)
}

fn text(field: &str, value: Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        _ => {
            violations.push(FieldViolation::new(field, "must be a string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(body: Value) -> StudentPayload {
        serde_json::from_value(body).expect("payload")
    }

    fn student(name: &str, age: i64, city: &str) -> StudentPayload {
        payload(json!({ "name": name, "age": age, "address": { "city": city, "country": "USA" } }))
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn accepts_complete_student() {
        let accepted = validate_create(student("Alice", 21, "NYC")).expect("valid");
        assert_eq!(accepted.name, "Alice");
        assert_eq!(accepted.age, 21);
        assert_eq!(accepted.address.city, "NYC");
        assert_eq!(accepted.address.country, "USA");
    }

    #[test]
    fn name_length_boundary() {
        assert!(validate_create(student("Bob", 1, "NYC")).is_ok());
        let err = validate_create(student("ab", 1, "NYC")).unwrap_err();
        assert_eq!(fields(&err), vec!["name"]);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        // two characters, four bytes
        let err = validate_create(student("éé", 5, "NYC")).unwrap_err();
        assert_eq!(fields(&err), vec!["name"]);
        assert!(validate_create(student("Zoë", 5, "NYC")).is_ok());
    }

    #[test]
    fn rejects_zero_and_negative_age() {
        let err = validate_create(student("Alice", 0, "NYC")).unwrap_err();
        assert_eq!(fields(&err), vec!["age"]);
        let err = validate_create(student("Alice", -4, "NYC")).unwrap_err();
        assert_eq!(fields(&err), vec!["age"]);
    }

    #[test]
    fn whitespace_city_is_not_empty() {
        let accepted = validate_create(student("Alice", 21, " ")).expect("valid");
        assert_eq!(accepted.address.city, " ");

        let err = validate_create(student("Alice", 21, "")).unwrap_err();
        assert_eq!(fields(&err), vec!["address.city"]);
    }

    #[test]
    fn missing_city_is_reported_with_dotted_path() {
        let err = validate_create(payload(json!({
            "name": "Alice",
            "age": 21,
            "address": { "country": "USA" }
        })))
        .unwrap_err();
        assert_eq!(fields(&err), vec!["address.city"]);
    }

    #[test]
    fn lists_every_violation() {
        let err = validate_create(StudentPayload::default()).unwrap_err();
        assert_eq!(fields(&err), vec!["name", "age", "address"]);

        let err = validate_create(payload(json!({
            "name": "Al",
            "age": 0,
            "address": { "city": "" }
        })))
        .unwrap_err();
        assert_eq!(
            fields(&err),
            vec!["name", "age", "address.city", "address.country"]
        );
    }

    #[test]
    fn wrong_types_are_reported_per_field() {
        let err = validate_create(payload(json!({
            "name": "ab",
            "age": "x",
            "address": { "city": 7, "country": "USA" }
        })))
        .unwrap_err();
        assert_eq!(fields(&err), vec!["name", "age", "address.city"]);
        assert_eq!(err.violations[1].message, "must be an integer");
        assert_eq!(err.violations[2].message, "must be a string");

        let err = validate_create(payload(json!({
            "name": 12,
            "age": 2.5,
            "address": "Paris"
        })))
        .unwrap_err();
        assert_eq!(fields(&err), vec!["name", "age", "address"]);
    }

    #[test]
    fn empty_update_is_a_valid_no_op() {
        let update = validate_update(StudentPayload::default()).expect("valid");
        assert!(update.is_empty());
    }

    #[test]
    fn update_checks_only_present_fields() {
        let update = validate_update(payload(json!({ "age": 22 }))).expect("valid");
        assert_eq!(update.age, Some(22));
        assert!(update.name.is_none());
        assert!(update.address.is_none());

        let err = validate_update(payload(json!({ "name": "Jo" }))).unwrap_err();
        assert_eq!(fields(&err), vec!["name"]);
    }

    #[test]
    fn update_address_must_be_complete() {
        let err = validate_update(payload(json!({ "address": { "city": "Paris" } }))).unwrap_err();
        assert_eq!(fields(&err), vec!["address.country"]);
    }

    #[test]
    fn identifier_format_is_checked_without_store() {
        assert!(validate_identifier("65f1c2a9e4b0a1b2c3d4e5f6").is_ok());
        assert_eq!(
            validate_identifier("not-an-id"),
            Err(InvalidIdentifier("not-an-id".into()))
        );
    }
}
