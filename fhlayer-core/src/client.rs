//! Client abstraction over the hosted data API.
//!
//! The data API exposes a single entry point: it takes an options mapping
//! ([`DbRequest`]) and answers with a reply ([`Envelope`]). [`DbClient`]
//! models exactly that, so the accessor can run against the remote service,
//! the in-process local database or a test double without change.
//!
//! # Examples
//!
//! ```ignore
//! use fhlayer::client::DbClient;
//! use fhlayer::request::DbRequest;
//!
//! let client = MyClient::new();
//! let reply = client.request(DbRequest::read("users", "5a1c...")).await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{envelope::Envelope, error::LayerResult, request::DbRequest};

/// Abstract interface to the data API.
///
/// # Error Handling
///
/// Implementations report transport and service failures as
/// [`LayerError::Backend`](crate::error::LayerError::Backend) or
/// [`LayerError::Remote`](crate::error::LayerError::Remote). A record that
/// does not exist is not an error: it is answered with [`Envelope::empty`].
///
/// # Thread Safety
///
/// Implementations must be usable from several tasks at once. No isolation
/// between requests is expected.
#[async_trait]
pub trait DbClient: Send + Sync + Debug {
    /// Sends one request and returns the raw reply.
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope>;
}

#[async_trait]
impl<C> DbClient for &C
where
    C: DbClient + ?Sized,
{
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        (**self).request(request).await
    }
}

#[async_trait]
impl<C> DbClient for Box<C>
where
    C: DbClient + ?Sized,
{
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        (**self).request(request).await
    }
}

#[async_trait]
impl<C> DbClient for Arc<C>
where
    C: DbClient + ?Sized,
{
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        (**self).request(request).await
    }
}

/// Factory trait for creating clients.
#[async_trait]
pub trait DbClientBuilder {
    type Client: DbClient;

    async fn build(self) -> LayerResult<Self::Client>;
}
