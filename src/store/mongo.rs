//! MongoDB-backed student store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};

use super::filters::{build_list_filter, build_update, id_filter, list_projection};
use super::{StoreError, StudentStore};
use crate::config::Config;
use crate::students::{
    Address, ListFilter, Student, StudentId, StudentRecord, StudentSummary, StudentUpdate,
};

/// Stored shape of a student document, including the driver-assigned `_id`.
#[derive(Debug, Serialize, Deserialize)]
struct StudentDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    age: i64,
    address: Address,
}

impl From<StudentDocument> for StudentRecord {
    fn from(document: StudentDocument) -> Self {
        Self {
            id: document.id.into(),
            name: document.name,
            age: document.age,
            address: document.address,
        }
    }
}

/// Student store backed by a single MongoDB collection.
///
/// The driver client pools connections internally, so one instance is shared by every request.
pub struct MongoStudentStore {
    database: Database,
    students: Collection<StudentDocument>,
}

impl MongoStudentStore {
    /// Build a client from the configured connection string and bind the configured collection.
    ///
    /// The driver connects lazily; use [`StudentStore::ping`] to verify reachability.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.mongo_url).await?;
        let database = client.database(&config.db_name);
        tracing::debug!(
            db = %config.db_name,
            collection = %config.collection_name,
            "Initialized MongoDB client"
        );
        Ok(Self::new(database, &config.collection_name))
    }

    /// Bind an existing database handle to the named collection.
    pub fn new(database: Database, collection_name: &str) -> Self {
        let students = database.collection(collection_name);
        Self { database, students }
    }
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    async fn insert(&self, student: Student) -> Result<StudentId, StoreError> {
        let result = self
            .students
            .clone_with_type::<Student>()
            .insert_one(&student)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Student insert failed"))?;

        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::UnexpectedInsertedId(result.inserted_id.to_string()))?;
        tracing::debug!(id = %id, "Student document inserted");
        Ok(id.into())
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<StudentSummary>, StoreError> {
        let query = build_list_filter(filter);
        tracing::debug!(filter = %query, "Listing students");
        let cursor = self
            .students
            .clone_with_type::<StudentSummary>()
            .find(query)
            .projection(list_projection())
            .await?;
        let summaries: Vec<StudentSummary> = cursor
            .try_collect()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Student listing failed"))?;
        Ok(summaries)
    }

    async fn get(&self, id: &StudentId) -> Result<StudentRecord, StoreError> {
        self.students
            .find_one(id_filter(id))
            .await?
            .map(StudentRecord::from)
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &StudentId, update: StudentUpdate) -> Result<(), StoreError> {
        let Some(modifications) = build_update(&update) else {
            // MongoDB rejects an empty `$set` on older servers; confirm the record exists instead.
            let matched = self.students.count_documents(id_filter(id)).await?;
            return if matched == 0 {
                Err(StoreError::NotFound)
            } else {
                Ok(())
            };
        };

        self.students
            .find_one_and_update(id_filter(id), modifications)
            .await
            .inspect_err(|err| tracing::error!(id = %id, error = %err, "Student update failed"))?
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &StudentId) -> Result<(), StoreError> {
        let result = self
            .students
            .delete_one(id_filter(id))
            .await
            .inspect_err(|err| tracing::error!(id = %id, error = %err, "Student delete failed"))?;
        if result.deleted_count == 0 {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
