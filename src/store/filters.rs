//! Query, projection, and update documents for the MongoDB adapter.

use mongodb::bson::{Document, doc};

use crate::students::{ListFilter, StudentId, StudentUpdate};

/// Compose the `find` filter from optional list arguments.
///
/// An empty country is ignored; `min_age` is inclusive.
pub fn build_list_filter(filter: &ListFilter) -> Document {
    let mut query = Document::new();

    if let Some(country) = filter.country.as_deref().filter(|c| !c.is_empty()) {
        query.insert("address.country", country);
    }

    if let Some(min_age) = filter.min_age {
        query.insert("age", doc! { "$gte": min_age });
    }

    query
}

/// Projection restricting list results to `{name, age}`.
pub fn list_projection() -> Document {
    doc! { "name": 1, "age": 1, "_id": 0 }
}

/// Filter addressing a single record by identifier.
pub fn id_filter(id: &StudentId) -> Document {
    doc! { "_id": *id.as_object_id() }
}

/// Compose a `$set` update from the present fields. Returns `None` for an empty update.
pub fn build_update(update: &StudentUpdate) -> Option<Document> {
    let mut set = Document::new();

    if let Some(name) = update.name.as_deref() {
        set.insert("name", name);
    }
    if let Some(age) = update.age {
        set.insert("age", age);
    }
    if let Some(address) = update.address.as_ref() {
        set.insert(
            "address",
            doc! { "city": address.city.as_str(), "country": address.country.as_str() },
        );
    }

    if set.is_empty() {
        None
    } else {
        Some(doc! { "$set": set })
    }
}
