//! Validated value types for the cluster API.

mod cluster_url;

pub use cluster_url::ClusterUrl;
