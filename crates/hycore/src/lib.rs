//! hycore - async REST client for task-based hyperconverged cluster APIs.
//!
//! The cluster API is asynchronous: every mutating call returns a task
//! handle that must be polled to completion. This library wraps that
//! protocol in synchronous-looking primitives: submit a mutation, wait
//! on the returned [`TaskHandle`], then re-fetch the affected record for
//! ground truth.
//!
//! # Example
//!
//! ```no_run
//! use hycore::{Client, ClusterUrl, Credentials, endpoints};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), hycore::Error> {
//! let url = ClusterUrl::new("https://cluster.lab.local")?;
//! let client = Client::builder(url).build()?;
//! client.login(&Credentials::new("admin", "password")).await?;
//!
//! let handle = client
//!     .create_record(endpoints::VIR_DOMAIN, &json!({"name": "vm-1", "mem": 4096}), None)
//!     .await?;
//! handle.wait(&client).await?;
//!
//! if let Some(uuid) = handle.created_uuid() {
//!     let path = format!("{}/{}", endpoints::VIR_DOMAIN, uuid);
//!     let vm = client.get_record(&path, None, true, None).await?;
//!     println!("{:?}", vm);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod record;
pub mod task;
pub mod types;
pub mod vm;

// Re-export primary types at crate root for convenience
pub use auth::{AuthMethod, Credentials};
pub use client::Client;
pub use error::Error;
pub use record::Record;
pub use task::{TaskHandle, TaskState};
pub use types::ClusterUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
