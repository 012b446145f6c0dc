//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::disk::DiskCommand;
use crate::commands::node::NodeCommand;
use crate::commands::task::TaskCommand;
use crate::commands::vm::VmCommand;

/// Hyperconverged cluster CLI tool.
#[derive(Parser, Debug)]
#[command(name = "hycore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Cluster connection options, shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Cluster API base URL (e.g. https://cluster.lab.local)
    #[arg(long, env = "HYCORE_HOST")]
    pub host: String,

    /// Cluster username
    #[arg(long, env = "HYCORE_USERNAME")]
    pub username: String,

    /// Cluster password
    #[arg(long, env = "HYCORE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Authenticate via OIDC instead of the local user database
    #[arg(long)]
    pub oidc: bool,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "60")]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Virtual machine operations
    Vm(VmCommand),
    /// Virtual disk operations
    Disk(DiskCommand),
    /// Cluster node operations
    Node(NodeCommand),
    /// Asynchronous task operations
    Task(TaskCommand),
}
