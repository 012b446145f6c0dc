//! REST collection paths exposed by the cluster API.
//!
//! Every path is relative to the `/rest/v1/` prefix appended by
//! [`ClusterUrl::endpoint`](crate::ClusterUrl::endpoint).

/// Login handshake.
pub const LOGIN: &str = "login";

/// Virtual machines.
pub const VIR_DOMAIN: &str = "VirDomain";

/// Power-state actions on virtual machines.
pub const VIR_DOMAIN_ACTION: &str = "VirDomain/action";

/// Virtual machine block devices (disks).
pub const VIR_DOMAIN_BLOCK_DEVICE: &str = "VirDomainBlockDevice";

/// Virtual machine network devices (NICs).
pub const VIR_DOMAIN_NET_DEVICE: &str = "VirDomainNetDevice";

/// ISO images.
pub const ISO: &str = "ISO";

/// Virtual disk images.
pub const VIRTUAL_DISK: &str = "VirtualDisk";

/// Virtual machine snapshots.
pub const VIR_DOMAIN_SNAPSHOT: &str = "VirDomainSnapshot";

/// Snapshot schedules.
pub const VIR_DOMAIN_SNAPSHOT_SCHEDULE: &str = "VirDomainSnapshotSchedule";

/// Virtual machine replication links.
pub const VIR_DOMAIN_REPLICATION: &str = "VirDomainReplication";

/// Cluster nodes.
pub const NODE: &str = "Node";

/// Connections to remote clusters.
pub const REMOTE_CLUSTER_CONNECTION: &str = "RemoteClusterConnection";

/// Asynchronous task status, by task tag.
pub const TASK_TAG: &str = "TaskTag";
