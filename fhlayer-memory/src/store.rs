//! In-memory implementation of the data API.
//!
//! This module emulates the data API's local database mode in process. Records
//! are kept per collection in insertion order behind an async-aware
//! read-write lock, and every reply uses the same envelope shapes as the
//! hosted service.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Document;
use tracing::trace;
use uuid::Uuid;

use fhlayer_core::{
    client::{DbClient, DbClientBuilder},
    envelope::Envelope,
    error::{LayerError, LayerResult},
    request::{Act, DbRequest, Payload},
};

use crate::evaluator::RecordFilter;

type CollectionRecords = Vec<(String, Document)>;
type StoreMap = HashMap<String, CollectionRecords>;


/// Thread-safe in-memory data API.
///
/// `InMemoryDb` is cloneable and uses an `Arc`-wrapped internal state, allowing
/// it to be shared across async tasks. Clones share the same records.
///
/// # Replies
///
/// - `create` of one record answers with the record envelope, of a batch with
///   `{ status: "OK", count }`
/// - `read`, `update` and `delete` answer with the record envelope, or `{}` if
///   the guid is unknown
/// - `deleteall` answers with `{ status: "ok", count }`
/// - `list` answers with `{ count, list }` in insertion order
///
/// # Example
///
/// ```ignore
/// use fhlayer_memory::InMemoryDb;
/// use fhlayer::{client::DbClient, request::DbRequest};
///
/// let db = InMemoryDb::new();
/// let reply = db.request(DbRequest::read("users", "nope")).await?;
/// assert!(reply.is_empty());
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryDb {
    /// collection name -> records in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryDb {
    /// Creates a new empty in-memory database.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryDb`.
    pub fn builder() -> InMemoryDbBuilder {
        InMemoryDbBuilder::default()
    }

    async fn create(&self, collection: &str, payload: Option<Payload>) -> LayerResult<Envelope> {
        let mut store = self.store.write().await;
        let records = store
            .entry(collection.to_string())
            .or_default();

        match payload {
            Some(Payload::One(fields)) => {
                let guid = new_guid();
                records.push((guid.clone(), fields.clone()));

                Ok(Envelope::record(collection, guid, fields))
            },
            Some(Payload::Many(batch)) => {
                let count = batch.len() as u64;
                records.extend(batch.into_iter().map(|fields| (new_guid(), fields)));

                Ok(Envelope::counted("OK", count))
            },
            None => Err(LayerError::Backend("create requires fields".into())),
        }
    }

    async fn read(&self, collection: &str, guid: &str) -> LayerResult<Envelope> {
        let store = self.store.read().await;

        Ok(
            store
                .get(collection)
                .and_then(|records| records.iter().find(|(id, _)| id == guid))
                .map(|(id, fields)| Envelope::record(collection, id.clone(), fields.clone()))
                .unwrap_or_default()
        )
    }

    async fn update(&self, collection: &str, guid: &str, payload: Option<Payload>) -> LayerResult<Envelope> {
        let fields = match payload {
            Some(Payload::One(fields)) => fields,
            Some(Payload::Many(_)) => {
                return Err(LayerError::Backend("update takes the fields of one record".into()));
            },
            None => return Err(LayerError::Backend("update requires fields".into())),
        };

        let mut store = self.store.write().await;
        let Some(entry) = store
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|(id, _)| id == guid))
        else {
            return Ok(Envelope::empty());
        };

        entry.1 = fields.clone();

        Ok(Envelope::record(collection, guid, fields))
    }

    async fn delete(&self, collection: &str, guid: &str) -> LayerResult<Envelope> {
        let mut store = self.store.write().await;
        let Some(records) = store.get_mut(collection) else {
            return Ok(Envelope::empty());
        };

        match records.iter().position(|(id, _)| id == guid) {
            Some(index) => {
                let (id, fields) = records.remove(index);
                Ok(Envelope::record(collection, id, fields))
            },
            None => Ok(Envelope::empty()),
        }
    }

    async fn delete_all(&self, collection: &str) -> LayerResult<Envelope> {
        let removed = self
            .store
            .write()
            .await
            .remove(collection)
            .map(|records| records.len() as u64)
            .unwrap_or(0);

        Ok(Envelope::counted("ok", removed))
    }

    async fn list(&self, collection: &str, filter: &Document) -> LayerResult<Envelope> {
        let store = self.store.read().await;
        let filter = RecordFilter::new(filter);

        Ok(Envelope::listing(
            store
                .get(collection)
                .map(|records| {
                    records
                        .iter()
                        .filter(|(_, fields)| filter.matches(fields))
                        .map(|(id, fields)| Envelope::record(collection, id.clone(), fields.clone()))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        ))
    }
}

#[async_trait]
impl DbClient for InMemoryDb {
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        trace!(act = %request.act, collection = %request.collection, "local request");

        let DbRequest { act, collection, guid, fields, filter } = request;

        match act {
            Act::Create => self.create(&collection, fields).await,
            Act::Read => self.read(&collection, &required_guid(act, guid)?).await,
            Act::Update => self.update(&collection, &required_guid(act, guid)?, fields).await,
            Act::Delete => self.delete(&collection, &required_guid(act, guid)?).await,
            Act::DeleteAll => self.delete_all(&collection).await,
            Act::List => self.list(&collection, &filter).await,
        }
    }
}

fn required_guid(act: Act, guid: Option<String>) -> LayerResult<String> {
    guid.ok_or_else(|| LayerError::Backend(format!("{act} requires a guid")))
}

fn new_guid() -> String {
    Uuid::new_v4().simple().to_string()
}


/// Builder for constructing [`InMemoryDb`] instances.
#[derive(Default)]
pub struct InMemoryDbBuilder;

#[async_trait]
impl DbClientBuilder for InMemoryDbBuilder {
    type Client = InMemoryDb;

    /// Builds and returns a new [`InMemoryDb`] instance.
    ///
    /// This always succeeds and returns an empty database.
    async fn build(self) -> LayerResult<Self::Client> {
        Ok(InMemoryDb::new())
    }
}
