//! In-memory data API for fhlayer.
//!
//! This crate provides a thread-safe, in-process implementation of the
//! `DbClient` trait that behaves like the data API's local database mode. It
//! is meant for development and tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Faithful replies** - Same envelope shapes as the hosted service
//! - **Filtering** - Supports the `eq`, `ne`, `lt`, `le`, `gt`, `ge`, `like` and `in` operators
//!
//! # Quick Start
//!
//! ```ignore
//! use fhlayer::{prelude::*, memory::InMemoryDb};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let accessor = DataAccessor::new(InMemoryDb::builder().build().await?);
//!     let users = accessor.collection("users");
//!
//!     users.create(doc! { "name": "derp", "age": 22 }).await?;
//!     assert_eq!(users.find_all().await?.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as fhlayer_memory;

pub mod store;
pub(crate) mod evaluator;

pub use store::{InMemoryDb, InMemoryDbBuilder};
