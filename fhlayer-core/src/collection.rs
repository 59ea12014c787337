//! Collection handles.
//!
//! A [`CollectionHandle`] binds every accessor operation to one collection
//! name and stamps write metadata: `createDate` on create, `lastUpdate` on
//! update, both in epoch milliseconds. Everything else is forwarded as is,
//! errors included.
//!
//! [`TypedCollection`] layers serde conversion on top of a handle for
//! applications that model their records as Rust types.
//!
//! Application collections with extra behaviour wrap a handle:
//!
//! ```ignore
//! use fhlayer::prelude::*;
//!
//! struct Users<'a, C: DbClient>(CollectionHandle<'a, C>);
//!
//! impl<'a, C: DbClient> Users<'a, C> {
//!     async fn by_name(&self, name: &str) -> LayerResult<Option<bson::Document>> {
//!         self.0.find_one(Query::new().eq("name", name)).await
//!     }
//! }
//! ```

use bson::Document;
use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;

use crate::{
    accessor::DataAccessor,
    client::DbClient,
    error::LayerResult,
    query::Query,
    record::{CREATE_DATE_KEY, LAST_UPDATE_KEY, from_record, now_millis, to_fields},
};

/// A collection bound to an accessor.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the accessor reference
/// * `C` - The client type of the accessor
#[derive(Debug)]
pub struct CollectionHandle<'a, C: DbClient> {
    name: String,
    accessor: &'a DataAccessor<C>,
}

impl<'a, C: DbClient> CollectionHandle<'a, C> {
    pub(crate) fn new(name: String, accessor: &'a DataAccessor<C>) -> Self {
        Self { name, accessor }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets a typed view of this collection.
    pub fn typed<T>(&self) -> TypedCollection<'a, C, T>
    where
        T: Serialize + DeserializeOwned,
    {
        TypedCollection {
            handle: CollectionHandle::new(self.name.clone(), self.accessor),
            _marker: PhantomData,
        }
    }

    /// Stamps `createDate` on `data` and creates it.
    ///
    /// # Returns
    ///
    /// The number of records created.
    pub async fn create(&self, mut data: Document) -> LayerResult<u64> {
        data.insert(CREATE_DATE_KEY, now_millis());

        self.accessor.create(&self.name, data).await
    }

    /// Stamps `createDate` on every entry and creates them in one request.
    pub async fn create_many(&self, data: Vec<Document>) -> LayerResult<u64> {
        let stamp = now_millis();
        let data = data
            .into_iter()
            .map(|mut entry| {
                entry.insert(CREATE_DATE_KEY, stamp.clone());
                entry
            })
            .collect();

        self.accessor.create_many(&self.name, data).await
    }

    /// Stamps `lastUpdate` on `data` and merges it into the record `guid`.
    ///
    /// # Returns
    ///
    /// `false` if there is no such record.
    pub async fn update(&self, guid: &str, mut data: Document) -> LayerResult<bool> {
        data.insert(LAST_UPDATE_KEY, now_millis());

        self.accessor.update(&self.name, guid, data).await
    }

    /// Reads the record `guid`, or `None` if there is no such record.
    pub async fn read(&self, guid: &str) -> LayerResult<Option<Document>> {
        self.accessor.read(&self.name, guid).await
    }

    /// Deletes the record `guid`, returning it, or `None` if there was none.
    pub async fn remove(&self, guid: &str) -> LayerResult<Option<Document>> {
        self.accessor.remove(&self.name, guid).await
    }

    /// Deletes every record, returning how many were removed.
    pub async fn truncate(&self) -> LayerResult<u64> {
        self.accessor.truncate(&self.name).await
    }

    /// Lists the records matching `query`.
    pub async fn find(&self, query: Query) -> LayerResult<Vec<Document>> {
        self.accessor.find(&self.name, query).await
    }

    /// Lists every record.
    pub async fn find_all(&self) -> LayerResult<Vec<Document>> {
        self.accessor.find_all(&self.name).await
    }

    /// Returns the first record matching `query`, or `None`.
    pub async fn find_one(&self, query: Query) -> LayerResult<Option<Document>> {
        self.accessor.find_one(&self.name, query).await
    }
}

/// A collection whose records are (de)serialized as `T`.
///
/// Records are returned as `(guid, value)` pairs. `T` may declare
/// `createDate` / `lastUpdate` fields to read the stamps back; such fields
/// should skip serializing when unset so writes do not clear the stamps.
#[derive(Debug)]
pub struct TypedCollection<'a, C: DbClient, T> {
    handle: CollectionHandle<'a, C>,
    _marker: PhantomData<T>,
}

impl<'a, C, T> TypedCollection<'a, C, T>
where
    C: DbClient,
    T: Serialize + DeserializeOwned,
{
    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Returns the untyped handle for this collection.
    pub fn untyped(&self) -> &CollectionHandle<'a, C> {
        &self.handle
    }

    pub async fn create(&self, value: &T) -> LayerResult<u64> {
        self.handle.create(to_fields(value)?).await
    }

    pub async fn create_many(&self, values: &[T]) -> LayerResult<u64> {
        self.handle
            .create_many(
                values
                    .iter()
                    .map(to_fields)
                    .collect::<LayerResult<Vec<_>>>()?,
            )
            .await
    }

    pub async fn read(&self, guid: &str) -> LayerResult<Option<(String, T)>> {
        self.handle
            .read(guid)
            .await?
            .map(from_record)
            .transpose()
    }

    /// Overwrites the record's fields with those of `value`, keeping fields
    /// `T` does not declare.
    pub async fn update(&self, guid: &str, value: &T) -> LayerResult<bool> {
        self.handle.update(guid, to_fields(value)?).await
    }

    pub async fn remove(&self, guid: &str) -> LayerResult<Option<(String, T)>> {
        self.handle
            .remove(guid)
            .await?
            .map(from_record)
            .transpose()
    }

    pub async fn find(&self, query: Query) -> LayerResult<Vec<(String, T)>> {
        self.handle
            .find(query)
            .await?
            .into_iter()
            .map(from_record)
            .collect()
    }

    pub async fn find_all(&self) -> LayerResult<Vec<(String, T)>> {
        self.find(Query::new()).await
    }

    pub async fn find_one(&self, query: Query) -> LayerResult<Option<(String, T)>> {
        self.handle
            .find_one(query)
            .await?
            .map(from_record)
            .transpose()
    }

    pub async fn truncate(&self) -> LayerResult<u64> {
        self.handle.truncate().await
    }
}
