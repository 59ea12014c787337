use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use fhlayer_core::{
    client::{DbClient, DbClientBuilder},
    envelope::Envelope,
    error::{LayerError, LayerResult},
    request::DbRequest,
};

use crate::wire::{decode_reply, encode_request};


/// Client for the remote data API.
///
/// Every request is POSTed as JSON to the configured endpoint, and the JSON
/// body of the reply is decoded into an [`Envelope`].
#[derive(Debug, Clone)]
pub struct HttpDbClient {
    http: Client,
    endpoint: Url,
}

impl HttpDbClient {
    pub fn new(http: Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    pub fn builder(endpoint: &str) -> HttpDbClientBuilder {
        HttpDbClientBuilder::new(endpoint)
    }

    /// Returns the URL requests are sent to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl DbClient for HttpDbClient {
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        debug!(
            act = %request.act,
            collection = %request.collection,
            endpoint = %self.endpoint,
            "sending request",
        );

        let response = self.http
            .post(self.endpoint.clone())
            .json(&encode_request(&request)?)
            .send()
            .await
            .map_err(|e| LayerError::Backend(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LayerError::Backend(e.to_string()))?;

        if !status.is_success() {
            warn!(
                act = %request.act,
                collection = %request.collection,
                status = status.as_u16(),
                "data API request failed",
            );

            return Err(LayerError::Remote {
                status: status.as_u16(),
                message: body,
            });
        }

        decode_reply(&body)
    }
}


/// Builder for [`HttpDbClient`].
#[derive(Debug, Clone)]
pub struct HttpDbClientBuilder {
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpDbClientBuilder {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            timeout: None,
        }
    }

    /// Sets a timeout for each request. Requests have no timeout by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl DbClientBuilder for HttpDbClientBuilder {
    type Client = HttpDbClient;

    async fn build(self) -> LayerResult<Self::Client> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| LayerError::Initialization(format!("invalid endpoint {}: {e}", self.endpoint)))?;

        let mut http = Client::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(HttpDbClient::new(
            http.build()
                .map_err(|e| LayerError::Initialization(e.to_string()))?,
            endpoint,
        ))
    }
}
