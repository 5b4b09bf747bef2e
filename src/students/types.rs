//! Student records, partial updates, and the store identifier wrapper.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::validation::InvalidIdentifier;

/// Store-assigned identifier of a student record.
///
/// Wraps the MongoDB object id so raw strings never travel past the HTTP boundary. Rendered
/// externally as a 24 character lowercase hex token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentId(ObjectId);

impl StudentId {
    /// Allocate a fresh identifier (used by stores that do not assign ids themselves).
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Borrow the underlying object id for query construction.
    pub fn as_object_id(&self) -> &ObjectId {
        &self.0
    }
}

impl From<ObjectId> for StudentId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

impl FromStr for StudentId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for StudentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Postal location embedded in every student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// City name; never empty.
    pub city: String,
    /// Country name; never empty. Used by the list filter.
    pub country: String,
}

/// A validated student that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Display name, at least three characters long.
    pub name: String,
    /// Age in years, strictly positive.
    pub age: i64,
    /// Embedded address.
    pub address: Address,
}

/// A persisted student as returned by `GET /students/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRecord {
    /// Identifier assigned by the store on creation.
    pub id: StudentId,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Embedded address.
    pub address: Address,
}

impl StudentRecord {
    /// Attach a store identifier to a validated student.
    pub fn new(id: StudentId, student: Student) -> Self {
        let Student { name, age, address } = student;
        Self {
            id,
            name,
            age,
            address,
        }
    }
}

/// Projection used by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement age.
    pub age: Option<i64>,
    /// Replacement address; always replaces both fields.
    pub address: Option<Address>,
}

impl StudentUpdate {
    /// True when no field is present, making the update a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.address.is_none()
    }
}

/// Filters accepted by the list endpoint. Both constraints combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Exact match on `address.country`.
    pub country: Option<String>,
    /// Inclusive lower bound on `age`.
    pub min_age: Option<i64>,
}

/// Unvalidated student body shared by the create and update routes.
///
/// Fields stay as raw JSON so a mistyped value becomes a violation on that field instead of
/// failing the whole body. JSON `null` decodes to `None`; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPayload {
    /// Raw name value.
    #[serde(default)]
    pub name: Option<Value>,
    /// Raw age value.
    #[serde(default)]
    pub age: Option<Value>,
    /// Raw address value.
    #[serde(default)]
    pub address: Option<Value>,
}
