//! Record store adapters for the student collection.

pub mod filters;
mod memory;
mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::students::types::{
    ListFilter, Student, StudentId, StudentRecord, StudentSummary, StudentUpdate,
};

pub use memory::InMemoryStudentStore;
pub use mongo::MongoStudentStore;

/// Errors returned by record store adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matched the identifier.
    #[error("no student matches the identifier")]
    NotFound,
    /// MongoDB driver reported a failure (connectivity, server error, decoding).
    #[error("MongoDB request failed: {0}")]
    Mongo(#[from] mongodb::error::Error),
    /// Insert succeeded but the store returned an id of an unexpected type.
    #[error("unexpected inserted id: {0}")]
    UnexpectedInsertedId(String),
}

/// CRUD primitives over the student collection.
///
/// Every operation touches at most one record and relies on the backend's single-document
/// atomicity. Implementations must tolerate concurrent calls from independent requests.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert a validated student and return the identifier the store assigned.
    async fn insert(&self, student: Student) -> Result<StudentId, StoreError>;

    /// Return `{name, age}` projections matching the filter in store-native order.
    async fn list(&self, filter: &ListFilter) -> Result<Vec<StudentSummary>, StoreError>;

    /// Fetch the full record, or [`StoreError::NotFound`].
    async fn get(&self, id: &StudentId) -> Result<StudentRecord, StoreError>;

    /// Apply the present fields of `update`, or fail with [`StoreError::NotFound`].
    async fn update(&self, id: &StudentId, update: StudentUpdate) -> Result<(), StoreError>;

    /// Remove the record, or fail with [`StoreError::NotFound`].
    async fn delete(&self, id: &StudentId) -> Result<(), StoreError>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
