//! Student domain: record types, validation, and the service used by the HTTP surface.

mod service;
pub mod types;
pub mod validation;

pub use service::{StudentError, StudentService};
pub use types::{
    Address, ListFilter, Student, StudentId, StudentPayload, StudentRecord, StudentSummary,
    StudentUpdate,
};
pub use validation::{
    FieldViolation, InvalidIdentifier, ValidationError, validate_create, validate_identifier,
    validate_update,
};
