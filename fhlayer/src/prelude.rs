//! Convenient re-exports of commonly used types from fhlayer.
//!
//! ```ignore
//! use fhlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - The accessor and collection handles
//! - The client trait and builders
//! - Query construction
//! - Record helpers
//! - Error types and configuration

pub use fhlayer_core::{
    accessor::DataAccessor,
    collection::{CollectionHandle, TypedCollection},
    client::{DbClient, DbClientBuilder},
    query::{Query, FilterOp},
    record::RecordExt,
    error::{LayerError, LayerResult},
};

pub use crate::config::{ClientConfig, ClientMode};
