//! A thin collection-oriented CRUD layer over a hosted document data API.
//!
//! This crate is the core of the fhlayer project and provides:
//!
//! - **Client abstraction** ([`client`]) - The single request/reply boundary to the data API
//! - **Requests** ([`request`]) - The options mapping the data API understands
//! - **Reply normalization** ([`envelope`]) - Reducing the API's reply shapes to records and counts
//! - **Queries** ([`query`]) - Filter construction for listings
//! - **Data access** ([`accessor`]) - The collection operations over a client
//! - **Collections** ([`collection`]) - Handles bound to one collection, plain or typed
//! - **Records** ([`record`]) - Record keys, stamps and typed conversion
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use fhlayer::prelude::*;
//! use bson::doc;
//!
//! let accessor = DataAccessor::new(InMemoryDb::new());
//! let users = accessor.collection("users");
//!
//! users.create(doc! { "name": "derp", "age": 22 }).await?;
//! let derp = users.find_one(Query::new().eq("name", "derp")).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as fhlayer_core;

pub mod accessor;
pub mod client;
pub mod collection;
pub mod envelope;
pub mod error;
pub mod query;
pub mod record;
pub mod request;

#[cfg(test)]
mod test_utils;
