//! hycore - CLI tool for hyperconverged cluster exploration.
//!
//! This is a thin wrapper over the `hycore` library, intended for manual
//! API exploration and debugging against a cluster.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{disk, node, task, vm};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Vm(vm_cmd) => vm::handle(vm_cmd, &cli.connection).await,
        Commands::Disk(disk_cmd) => disk::handle(disk_cmd, &cli.connection).await,
        Commands::Node(node_cmd) => node::handle(node_cmd, &cli.connection).await,
        Commands::Task(task_cmd) => task::handle(task_cmd, &cli.connection).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
