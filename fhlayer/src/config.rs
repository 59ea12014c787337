//! Client configuration.
//!
//! The data API runs either in-process ("local database" mode, backed by
//! [`InMemoryDb`]) or behind a remote endpoint. [`ClientConfig`] captures
//! that choice explicitly; [`ClientConfig::from_environment`] reads it from
//! the process environment:
//!
//! | variable            | meaning                                                  |
//! |---------------------|----------------------------------------------------------|
//! | `FH_USE_LOCAL_DB`   | `true`/`1`/`yes` selects local mode                       |
//! | `FH_DB_URL`         | endpoint of the remote data API                           |
//! | `FH_DB_TIMEOUT_MS`  | optional per-request timeout for the remote client        |
//!
//! # Example
//!
//! ```ignore
//! use fhlayer::{config::ClientConfig, prelude::*};
//!
//! let client = ClientConfig::from_environment()?.connect().await?;
//! let accessor = DataAccessor::new(client);
//! ```

use std::time::Duration;
use tracing::debug;

use fhlayer_core::{
    client::{DbClient, DbClientBuilder},
    error::{LayerError, LayerResult},
};
use fhlayer_memory::InMemoryDb;

/// Environment variable selecting local mode.
pub const USE_LOCAL_DB_VAR: &str = "FH_USE_LOCAL_DB";
/// Environment variable holding the remote endpoint.
pub const DB_URL_VAR: &str = "FH_DB_URL";
/// Environment variable holding the remote request timeout in milliseconds.
pub const DB_TIMEOUT_VAR: &str = "FH_DB_TIMEOUT_MS";

/// Where requests go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMode {
    /// In-process database.
    Local,
    /// Remote data API at `endpoint`.
    Remote {
        endpoint: String,
    },
}

/// Configuration for connecting to the data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    mode: ClientMode,
    timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl ClientConfig {
    /// Configuration for the in-process database.
    pub fn local() -> Self {
        Self {
            mode: ClientMode::Local,
            timeout: None,
        }
    }

    /// Configuration for the remote data API at `endpoint`.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            mode: ClientMode::Remote {
                endpoint: endpoint.into(),
            },
            timeout: None,
        }
    }

    /// Sets the per-request timeout of the remote client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn mode(&self) -> &ClientMode {
        &self.mode
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Initialization`] if neither mode is configured or
    /// the timeout is not a number.
    pub fn from_environment() -> LayerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps variable names to
    /// values. Local mode wins when both modes are configured.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LayerResult<Self> {
        let timeout = match lookup(DB_TIMEOUT_VAR) {
            Some(raw) => Some(Duration::from_millis(raw.trim().parse::<u64>().map_err(|e| {
                LayerError::Initialization(format!("{DB_TIMEOUT_VAR}={raw}: {e}"))
            })?)),
            None => None,
        };

        if lookup(USE_LOCAL_DB_VAR).is_some_and(|value| is_truthy(&value)) {
            return Ok(Self { mode: ClientMode::Local, timeout });
        }

        match lookup(DB_URL_VAR) {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(Self {
                mode: ClientMode::Remote {
                    endpoint: endpoint.trim().to_string(),
                },
                timeout,
            }),
            _ => Err(LayerError::Initialization(format!(
                "no data API configured: set {USE_LOCAL_DB_VAR}=true or {DB_URL_VAR}"
            ))),
        }
    }

    /// Builds the configured client.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::Initialization`] if the remote client cannot be
    /// built, or if remote mode is requested without the `http` feature.
    pub async fn connect(&self) -> LayerResult<Box<dyn DbClient>> {
        debug!(mode = ?self.mode, "connecting to data API");

        match &self.mode {
            ClientMode::Local => Ok(Box::new(InMemoryDb::builder().build().await?)),
            ClientMode::Remote { endpoint } => self.connect_remote(endpoint).await,
        }
    }

    #[cfg(feature = "http")]
    async fn connect_remote(&self, endpoint: &str) -> LayerResult<Box<dyn DbClient>> {
        let mut builder = fhlayer_http::HttpDbClient::builder(endpoint);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Box::new(builder.build().await?))
    }

    #[cfg(not(feature = "http"))]
    async fn connect_remote(&self, endpoint: &str) -> LayerResult<Box<dyn DbClient>> {
        Err(LayerError::Initialization(format!(
            "remote data API {endpoint} requires the `http` feature"
        )))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> LayerResult<ClientConfig> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();

        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn local_flag_selects_local_mode() {
        let config = config_from(&[(USE_LOCAL_DB_VAR, "true"), (DB_URL_VAR, "http://x")]).unwrap();

        assert_eq!(config.mode(), &ClientMode::Local);
    }

    #[test]
    fn url_selects_remote_mode_with_timeout() {
        let config = config_from(&[
            (USE_LOCAL_DB_VAR, "false"),
            (DB_URL_VAR, " http://localhost:8001/mbaas/db "),
            (DB_TIMEOUT_VAR, "2500"),
        ])
        .unwrap();

        assert_eq!(
            config,
            ClientConfig::remote("http://localhost:8001/mbaas/db")
                .with_timeout(Duration::from_millis(2500))
        );
    }

    #[test]
    fn missing_configuration_is_an_error() {
        assert!(matches!(config_from(&[]), Err(LayerError::Initialization(_))));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let result = config_from(&[(USE_LOCAL_DB_VAR, "1"), (DB_TIMEOUT_VAR, "soon")]);

        assert!(matches!(result, Err(LayerError::Initialization(_))));
    }

    #[tokio::test]
    async fn local_config_connects_in_process() {
        let client = ClientConfig::local().connect().await.unwrap();
        let reply = client
            .request(fhlayer_core::request::DbRequest::delete_all("users"))
            .await
            .unwrap();

        assert_eq!(reply.count_or_zero(), 0);
    }
}
