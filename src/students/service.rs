//! Student operations: validation in front of a record store.

use thiserror::Error;

use super::types::{ListFilter, StudentId, StudentPayload, StudentRecord, StudentSummary};
use super::validation::{
    InvalidIdentifier, ValidationError, validate_create, validate_identifier, validate_update,
};
use crate::store::{StoreError, StudentStore};

/// Failures surfaced by student operations.
#[derive(Debug, Error)]
pub enum StudentError {
    /// Payload violated field constraints; nothing reached the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Path identifier was malformed; nothing reached the store.
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
    /// Well-formed identifier with no matching record.
    #[error("Student not found")]
    NotFound,
    /// Any other store failure, propagated as-is.
    #[error("Store request failed: {0}")]
    Store(StoreError),
}

impl From<StoreError> for StudentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

/// Validates requests and delegates them to a [`StudentStore`].
///
/// Construct once at startup with an explicit store handle and share through an `Arc`.
pub struct StudentService<S> {
    store: S,
}

impl<S> StudentService<S>
where
    S: StudentStore,
{
    /// Wrap a store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and insert a new student, returning its identifier.
    pub async fn create(&self, payload: StudentPayload) -> Result<StudentId, StudentError> {
        let student = validate_create(payload)?;
        Ok(self.store.insert(student).await?)
    }

    /// List `{name, age}` projections matching the filter.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<StudentSummary>, StudentError> {
        Ok(self.store.list(&filter).await?)
    }

    /// Fetch one student by its external identifier.
    pub async fn get(&self, raw_id: &str) -> Result<StudentRecord, StudentError> {
        let id = validate_identifier(raw_id)?;
        Ok(self.store.get(&id).await?)
    }

    /// Apply a partial update. The payload is checked before the identifier, so a request
    /// with both a bad body and a bad id reports the body.
    pub async fn update(&self, raw_id: &str, payload: StudentPayload) -> Result<(), StudentError> {
        let update = validate_update(payload)?;
        let id = validate_identifier(raw_id)?;
        Ok(self.store.update(&id, update).await?)
    }

    /// Remove one student.
    pub async fn delete(&self, raw_id: &str) -> Result<(), StudentError> {
        let id = validate_identifier(raw_id)?;
        Ok(self.store.delete(&id).await?)
    }

    /// Whether the backing store answers a ping. Failures are logged, not returned.
    pub async fn store_reachable(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "Store ping failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStudentStore;
    use serde_json::{Value, json};

    fn payload(body: Value) -> StudentPayload {
        serde_json::from_value(body).expect("payload")
    }

    fn student(name: &str) -> StudentPayload {
        payload(json!({
            "name": name,
            "age": 21,
            "address": { "city": "NYC", "country": "USA" }
        }))
    }

    #[tokio::test]
    async fn invalid_payload_is_not_persisted() {
        let service = StudentService::new(InMemoryStudentStore::new());
        let err = service.create(student("ab")).await.unwrap_err();
        assert!(matches!(err, StudentError::Validation(_)));
        assert!(service.store().is_empty().await);
    }

    #[tokio::test]
    async fn malformed_identifier_short_circuits() {
        let service = StudentService::new(InMemoryStudentStore::new());

        assert!(matches!(
            service.get("not-an-id").await,
            Err(StudentError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            service.update("not-an-id", StudentPayload::default()).await,
            Err(StudentError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            service.delete("not-an-id").await,
            Err(StudentError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn update_reports_body_before_identifier() {
        let service = StudentService::new(InMemoryStudentStore::new());

        let err = service
            .update("not-an-id", payload(json!({ "age": -1 })))
            .await
            .unwrap_err();
        assert!(matches!(err, StudentError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_identifier_maps_to_not_found() {
        let service = StudentService::new(InMemoryStudentStore::new());
        let unknown = StudentId::generate().to_string();

        assert!(matches!(service.get(&unknown).await, Err(StudentError::NotFound)));
        assert!(matches!(
            service.update(&unknown, StudentPayload::default()).await,
            Err(StudentError::NotFound)
        ));
        assert!(matches!(service.delete(&unknown).await, Err(StudentError::NotFound)));
    }

    #[tokio::test]
    async fn empty_update_leaves_record_unchanged() {
        let service = StudentService::new(InMemoryStudentStore::new());
        let id = service.create(student("Alice")).await.expect("create").to_string();
        let before = service.get(&id).await.expect("get");

        service
            .update(&id, StudentPayload::default())
            .await
            .expect("update");

        assert_eq!(service.get(&id).await.expect("get"), before);
    }
}
