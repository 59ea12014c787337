//! Data access over the hosted data API.
//!
//! [`DataAccessor`] turns the logical collection operations into requests
//! against a [`DbClient`] and reduces the replies to a small contract:
//!
//! | operation     | result                                           |
//! |---------------|--------------------------------------------------|
//! | `create`      | number of records created                        |
//! | `read`        | the flattened record, or `None`                  |
//! | `update`      | `true` if a record was updated, `false` if none  |
//! | `remove`      | the flattened deleted record, or `None`          |
//! | `find`        | flattened records in reply order                 |
//! | `find_one`    | the first match, or `None`                       |
//! | `truncate`    | number of records deleted                        |
//!
//! Client errors are returned untouched. Nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use fhlayer::{accessor::DataAccessor, memory::InMemoryDb, query::Query};
//! use bson::doc;
//!
//! let accessor = DataAccessor::new(InMemoryDb::new());
//! accessor.create("users", doc! { "name": "derp", "age": 22 }).await?;
//!
//! let user = accessor
//!     .find_one("users", Query::new().eq("name", "derp"))
//!     .await?;
//! ```

use bson::Document;
use tracing::debug;

use crate::{
    client::DbClient,
    collection::CollectionHandle,
    error::LayerResult,
    query::Query,
    record::GUID_KEY,
    request::{DbRequest, Payload},
};

/// Collection operations bound to one client.
///
/// # Type Parameters
///
/// * `C` - The client implementation type. `Box<dyn DbClient>` works when
///   the client is chosen at runtime.
#[derive(Debug)]
pub struct DataAccessor<C: DbClient> {
    client: C,
}

impl<C: DbClient> DataAccessor<C> {
    /// Creates an accessor sending its requests through `client`.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Consumes the accessor, returning the underlying client.
    pub fn into_client(self) -> C {
        self.client
    }

    /// Gets a handle bound to the collection `name`.
    pub fn collection<'a>(&'a self, name: &str) -> CollectionHandle<'a, C> {
        CollectionHandle::new(name.to_string(), self)
    }

    /// Creates one record.
    ///
    /// # Returns
    ///
    /// `1` when the reply wraps the created record, otherwise the count the
    /// reply reports (`0` if it reports none).
    pub async fn create(&self, collection: &str, data: Document) -> LayerResult<u64> {
        debug!(collection, "creating record");

        let reply = self
            .client
            .request(DbRequest::create(collection, Payload::One(data)))
            .await?;

        if reply.has_record() {
            return Ok(1);
        }

        Ok(reply.count_or_zero())
    }

    /// Creates a batch of records in one request.
    ///
    /// An empty batch is answered with `0` without contacting the client.
    pub async fn create_many(&self, collection: &str, data: Vec<Document>) -> LayerResult<u64> {
        if data.is_empty() {
            return Ok(0);
        }

        debug!(collection, records = data.len(), "creating records");

        let reply = self
            .client
            .request(DbRequest::create(collection, Payload::Many(data)))
            .await?;

        if reply.has_record() {
            return Ok(1);
        }

        Ok(reply.count_or_zero())
    }

    /// Reads the record with id `guid`, or `None` if there is no such record.
    pub async fn read(&self, collection: &str, guid: &str) -> LayerResult<Option<Document>> {
        debug!(collection, guid, "reading record");

        Ok(self
            .client
            .request(DbRequest::read(collection, guid))
            .await?
            .into_record())
    }

    /// Merges `fields` into the record with id `guid`.
    ///
    /// The current record is read first, `fields` are laid over it (the
    /// caller's values win) and the merged record is written back whole.
    /// The read and the write are separate requests: a concurrent writer can
    /// land between them and its change is then overwritten.
    ///
    /// # Returns
    ///
    /// `false`, without writing anything, if there is no such record.
    pub async fn update(&self, collection: &str, guid: &str, fields: Document) -> LayerResult<bool> {
        let Some(mut record) = self.read(collection, guid).await? else {
            debug!(collection, guid, "no record to update");
            return Ok(false);
        };

        for (key, value) in fields {
            record.insert(key, value);
        }

        // The id travels next to the fields, never inside them.
        record.remove(GUID_KEY);

        debug!(collection, guid, "updating record");

        self.client
            .request(DbRequest::update(collection, guid, record))
            .await?;

        Ok(true)
    }

    /// Deletes the record with id `guid`, returning it, or `None` if there
    /// was no such record.
    pub async fn remove(&self, collection: &str, guid: &str) -> LayerResult<Option<Document>> {
        debug!(collection, guid, "removing record");

        Ok(self
            .client
            .request(DbRequest::delete(collection, guid))
            .await?
            .into_record())
    }

    /// Lists the records matching `query`, in the order the data API returns them.
    pub async fn find(&self, collection: &str, query: Query) -> LayerResult<Vec<Document>> {
        debug!(collection, filter = ?query.as_filter(), "listing records");

        Ok(self
            .client
            .request(DbRequest::list(collection, query))
            .await?
            .into_records())
    }

    /// Lists every record of the collection. Same as `find` with an empty query.
    pub async fn find_all(&self, collection: &str) -> LayerResult<Vec<Document>> {
        self.find(collection, Query::new()).await
    }

    /// Returns the first record matching `query`, or `None`.
    pub async fn find_one(&self, collection: &str, query: Query) -> LayerResult<Option<Document>> {
        Ok(self
            .find(collection, query)
            .await?
            .into_iter()
            .next())
    }

    /// Deletes every record in the collection, returning how many were removed.
    pub async fn truncate(&self, collection: &str) -> LayerResult<u64> {
        debug!(collection, "truncating collection");

        Ok(self
            .client
            .request(DbRequest::delete_all(collection))
            .await?
            .count_or_zero())
    }
}
