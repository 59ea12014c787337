//! Remote data API client for fhlayer.
//!
//! This crate provides an HTTP implementation of the `DbClient` trait that
//! talks to the hosted data API. To use it through the facade crate, enable
//! the `http` feature (on by default):
//!
//! ```toml
//! [dependencies]
//! fhlayer = { version = "x.y.z", features = ["http"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fhlayer::{prelude::*, http::HttpDbClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpDbClient::builder("https://data.example.com/mbaas/db")
//!         .timeout(Duration::from_secs(10))
//!         .build()
//!         .await?;
//!     let accessor = DataAccessor::new(client);
//!
//!     let users = accessor.collection("users").find_all().await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as fhlayer_http;

pub mod client;
mod wire;

pub use client::{HttpDbClient, HttpDbClientBuilder};
