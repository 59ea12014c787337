//! Integration tests for `DataAccessor` over the in-process database.
//!
//! Each test starts from a fresh `InMemoryDb` and drives the accessor with an
//! explicit collection name.

use fhlayer::{
    bson::{Bson, Document, doc},
    memory::InMemoryDb,
    prelude::*,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

const USERS: &str = "__users__";

fn sample_user() -> Document {
    doc! { "name": "derp", "age": 22 }
}

fn accessor() -> DataAccessor<InMemoryDb> {
    DataAccessor::new(InMemoryDb::new())
}

fn guid_of(record: &Document) -> String {
    record.guid().expect("record has a guid").to_string()
}

// ============================================================================
// create
// ============================================================================

#[tokio::test]
async fn create_counts_one_record() {
    let db = accessor();

    assert_eq!(db.create(USERS, sample_user()).await.unwrap(), 1);
}

#[tokio::test]
async fn create_many_counts_batch() {
    let db = accessor();

    let created = db
        .create_many(USERS, vec![sample_user(), doc! { "name": "other" }])
        .await
        .unwrap();

    assert_eq!(created, 2);
    assert_eq!(db.find_all(USERS).await.unwrap().len(), 2);
}

// ============================================================================
// read / update
// ============================================================================

#[tokio::test]
async fn read_of_unknown_guid_is_none() {
    let db = accessor();

    assert_eq!(db.read(USERS, "never-created").await.unwrap(), None);
}

#[tokio::test]
async fn update_changes_one_field_and_keeps_the_rest() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();

    let users = db.find_all(USERS).await.unwrap();
    let guid = guid_of(&users[0]);
    assert_eq!(users[0].get_str("name").unwrap(), "derp");

    assert!(db.update(USERS, &guid, doc! { "name": "newName" }).await.unwrap());

    let updated = db.read(USERS, &guid).await.unwrap().unwrap();
    assert_eq!(updated.get_str("name").unwrap(), "newName");
    assert_eq!(updated.get("age"), Some(&Bson::Int32(22)));
    assert_eq!(updated.guid(), Some(guid.as_str()));
}

#[tokio::test]
async fn update_of_unknown_guid_is_false() {
    let db = accessor();

    assert!(!db.update(USERS, "nope", doc! { "name": "x" }).await.unwrap());
    assert!(db.find_all(USERS).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_never_stores_guid_inside_fields() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();
    let guid = guid_of(&db.find_all(USERS).await.unwrap()[0]);

    db.update(USERS, &guid, doc! { "guid": "forged" }).await.unwrap();

    let reply = db
        .client()
        .request(fhlayer::request::DbRequest::read(USERS, &guid))
        .await
        .unwrap();
    assert!(!reply.fields.unwrap().contains_key("guid"));
}

// ============================================================================
// find / findOne
// ============================================================================

#[tokio::test]
async fn find_with_empty_query_and_find_all_agree() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();

    let with_query = db.find(USERS, Query::new()).await.unwrap();
    let without = db.find_all(USERS).await.unwrap();

    assert_eq!(with_query, without);
    assert_eq!(without.len(), 1);
    assert_eq!(without[0].get_str("name").unwrap(), "derp");
    assert_eq!(without[0].get("age"), Some(&Bson::Int32(22)));
}

#[tokio::test]
async fn find_without_matches_is_empty() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();

    let found = db.find(USERS, Query::new().eq("name", "john")).await.unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn reserved_keys_are_rejected_before_any_request() {
    for key in ["act", "type"] {
        let mut filter = Document::new();
        filter.insert(key, "x");

        assert!(matches!(
            Query::try_from(filter),
            Err(LayerError::ReservedQueryKey(found)) if found == key
        ));
    }
}

#[tokio::test]
async fn find_one_returns_first_match_or_none() {
    let db = accessor();

    let none = db
        .find_one(USERS, Query::new().eq("name", "derp"))
        .await
        .unwrap();
    assert_eq!(none, None);

    db.create(USERS, sample_user()).await.unwrap();

    let some = db
        .find_one(USERS, Query::new().eq("name", "derp"))
        .await
        .unwrap();
    assert_eq!(some.unwrap().get_str("name").unwrap(), "derp");
}

// ============================================================================
// remove / truncate
// ============================================================================

#[tokio::test]
async fn remove_returns_deleted_record() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();
    let users = db.find(USERS, Query::new().eq("name", "derp")).await.unwrap();
    assert_eq!(users.len(), 1);
    let guid = guid_of(&users[0]);

    let removed = db.remove(USERS, &guid).await.unwrap().unwrap();

    assert_eq!(removed.guid(), Some(guid.as_str()));
    assert!(db.find_all(USERS).await.unwrap().is_empty());
    assert_eq!(db.remove(USERS, &guid).await.unwrap(), None);
}

#[tokio::test]
async fn truncate_empties_collection() {
    let db = accessor();
    db.create(USERS, sample_user()).await.unwrap();
    db.create(USERS, sample_user()).await.unwrap();

    assert_eq!(db.truncate(USERS).await.unwrap(), 2);
    assert!(db.find_all(USERS).await.unwrap().is_empty());
    assert_eq!(db.truncate(USERS).await.unwrap(), 0);
}
