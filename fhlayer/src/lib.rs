//! Main fhlayer crate: a thin collection-oriented CRUD layer over a hosted
//! document data API.
//!
//! This crate re-exports the core types from the sub-crates and wires up the
//! client implementations.
//!
//! # Features
//!
//! - **Normalized results** - Records with their `guid` flattened in, `None` for missing records, plain counts
//! - **Collection handles** - Bound to one collection, stamping `createDate` / `lastUpdate` on writes
//! - **Typed collections** - Store and load Serde types
//! - **Local and remote modes** - In-process database for development, HTTP client for the hosted API
//!
//! # Quick Start
//!
//! ```ignore
//! use fhlayer::{prelude::*, memory::InMemoryDb};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> LayerResult<()> {
//!     let accessor = DataAccessor::new(InMemoryDb::new());
//!     let users = accessor.collection("users");
//!
//!     users.create(doc! { "name": "derp", "age": 22 }).await?;
//!
//!     let derp = users
//!         .find_one(Query::new().eq("name", "derp"))
//!         .await?
//!         .expect("just created");
//!     let guid = derp.guid().unwrap().to_string();
//!
//!     users.update(&guid, doc! { "name": "newName" }).await?;
//!     println!("{:?}", users.read(&guid).await?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Runtime Selection
//!
//! ```ignore
//! use fhlayer::prelude::*;
//!
//! // FH_USE_LOCAL_DB=true, or FH_DB_URL=https://...
//! let client = ClientConfig::from_environment()?.connect().await?;
//! let accessor = DataAccessor::new(client);
//! ```
//!
//! # Clients
//!
//! - [`memory`] - In-process database for development and tests
//! - [`http`] - Remote data API client (requires `http` feature)

pub mod config;
pub mod prelude;

pub use fhlayer_core::{accessor, client, collection, envelope, error, query, record, request};

// Re-export BSON types for convenience
pub use bson;

/// In-process data API.
pub mod memory {
    pub use fhlayer_memory::{InMemoryDb, InMemoryDbBuilder};
}

/// Remote data API client.
///
/// This module is only available when the `http` feature is enabled.
#[cfg(feature = "http")]
pub mod http {
    pub use fhlayer_http::{HttpDbClient, HttpDbClientBuilder};
}
