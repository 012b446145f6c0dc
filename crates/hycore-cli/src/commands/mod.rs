//! Command implementations.

pub mod disk;
pub mod node;
pub mod task;
pub mod vm;

use std::time::Duration;

use anyhow::{Context, Result};
use hycore::{AuthMethod, Client, ClusterUrl, Credentials};
use tracing::{debug, info};

use crate::cli::ConnectionArgs;

/// Build a client from connection options and log in.
pub async fn connect(conn: &ConnectionArgs) -> Result<Client> {
    let url = ClusterUrl::new(&conn.host).context("Invalid cluster URL")?;
    debug!(cluster = %url, insecure = conn.insecure, "Connecting to cluster");

    let client = Client::builder(url)
        .timeout(Duration::from_secs(conn.timeout))
        .accept_invalid_certs(conn.insecure)
        .build()
        .context("Failed to build HTTP client")?;

    let mut credentials = Credentials::new(&conn.username, &conn.password);
    if conn.oidc {
        credentials = credentials.with_auth_method(AuthMethod::Oidc);
    }

    client
        .login(&credentials)
        .await
        .context("Failed to log in to cluster")?;
    info!(username = %conn.username, "Logged in");

    Ok(client)
}
