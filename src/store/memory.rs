//! Process-local student store for tests and offline development.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StudentStore};
use crate::students::{
    ListFilter, Student, StudentId, StudentRecord, StudentSummary, StudentUpdate,
};

/// Student store holding records in insertion order behind an async lock.
#[derive(Default)]
pub struct InMemoryStudentStore {
    records: RwLock<Vec<StudentRecord>>,
}

impl InMemoryStudentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn filter_matches(filter: &ListFilter, record: &StudentRecord) -> bool {
    let country_ok = match filter.country.as_deref() {
        Some(country) if !country.is_empty() => record.address.country == country,
        _ => true,
    };
    let age_ok = filter.min_age.is_none_or(|min_age| record.age >= min_age);
    country_ok && age_ok
}

fn apply(update: StudentUpdate, record: &mut StudentRecord) {
    if let Some(name) = update.name {
        record.name = name;
    }
    if let Some(age) = update.age {
        record.age = age;
    }
    if let Some(address) = update.address {
        record.address = address;
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn insert(&self, student: Student) -> Result<StudentId, StoreError> {
        let id = StudentId::generate();
        self.records
            .write()
            .await
            .push(StudentRecord::new(id, student));
        Ok(id)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<StudentSummary>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|record| filter_matches(filter, record))
            .map(|record| StudentSummary {
                name: record.name.clone(),
                age: record.age,
            })
            .collect())
    }

    async fn get(&self, id: &StudentId) -> Result<StudentRecord, StoreError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record.id == *id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &StudentId, update: StudentUpdate) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == *id)
            .ok_or(StoreError::NotFound)?;
        apply(update, record);
        Ok(())
    }

    async fn delete(&self, id: &StudentId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.id == *id)
            .ok_or(StoreError::NotFound)?;
        records.remove(position);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::Address;

    fn student(name: &str, age: i64, country: &str) -> Student {
        Student {
            name: name.into(),
            age,
            address: Address {
                city: "Somewhere".into(),
                country: country.into(),
            },
        }
    }

    async fn seeded() -> InMemoryStudentStore {
        let store = InMemoryStudentStore::new();
        for (name, age, country) in [
            ("Alice", 21, "USA"),
            ("Bruno", 19, "Brazil"),
            ("Carla", 25, "USA"),
            ("Dieter", 30, "Germany"),
        ] {
            store.insert(student(name, age, country)).await.expect("insert");
        }
        store
    }

    fn names(summaries: &[StudentSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.name.as_str()).collect()
    }

    #[tokio::test]
    async fn inserted_record_is_returned_by_get() {
        let store = InMemoryStudentStore::new();
        let input = student("Alice", 21, "USA");
        let id = store.insert(input.clone()).await.expect("insert");

        let record = store.get(&id).await.expect("get");
        assert_eq!(record, StudentRecord::new(id, input));
    }

    #[tokio::test]
    async fn list_filters_combine_and_keep_insertion_order() {
        let store = seeded().await;

        let all = store.list(&ListFilter::default()).await.expect("list");
        assert_eq!(names(&all), vec!["Alice", "Bruno", "Carla", "Dieter"]);

        let usa = store
            .list(&ListFilter {
                country: Some("USA".into()),
                min_age: None,
            })
            .await
            .expect("list");
        assert_eq!(names(&usa), vec!["Alice", "Carla"]);

        let adults = store
            .list(&ListFilter {
                country: None,
                min_age: Some(21),
            })
            .await
            .expect("list");
        assert_eq!(names(&adults), vec!["Alice", "Carla", "Dieter"]);

        let both = store
            .list(&ListFilter {
                country: Some("USA".into()),
                min_age: Some(22),
            })
            .await
            .expect("list");
        assert_eq!(names(&both), vec!["Carla"]);
    }

    #[tokio::test]
    async fn update_changes_only_present_fields() {
        let store = seeded().await;
        let id = store.insert(student("Eve", 40, "Spain")).await.expect("insert");

        store
            .update(
                &id,
                StudentUpdate {
                    age: Some(41),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        let record = store.get(&id).await.expect("get");
        assert_eq!(record.age, 41);
        assert_eq!(record.name, "Eve");
        assert_eq!(record.address.country, "Spain");
    }

    #[tokio::test]
    async fn missing_records_report_not_found() {
        let store = seeded().await;
        let unknown = StudentId::generate();

        assert!(matches!(store.get(&unknown).await, Err(StoreError::NotFound)));
        assert!(matches!(
            store.update(&unknown, StudentUpdate::default()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete(&unknown).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn delete_succeeds_once() {
        let store = seeded().await;
        let id = store.insert(student("Frank", 33, "USA")).await.expect("insert");

        store.delete(&id).await.expect("first delete");
        assert!(matches!(store.delete(&id).await, Err(StoreError::NotFound)));
        assert_eq!(store.len().await, 4);
    }
}
