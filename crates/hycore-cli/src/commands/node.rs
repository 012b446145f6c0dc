//! Cluster node commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use hycore::endpoints;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct NodeCommand {
    #[command(subcommand)]
    command: NodeSubcommand,
}

#[derive(Subcommand, Debug)]
enum NodeSubcommand {
    /// List cluster nodes
    List(ListArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

pub async fn handle(cmd: NodeCommand, conn: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        NodeSubcommand::List(args) => list(args, conn).await,
    }
}

async fn list(args: ListArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;

    let records = client
        .list_records(endpoints::NODE, None, None)
        .await
        .context("Failed to list nodes")?;

    if records.is_empty() {
        eprintln!("{}", "No nodes found.".dimmed());
        return Ok(());
    }

    for record in &records {
        if args.pretty {
            output::json_pretty(record)?;
        } else {
            output::json(record)?;
        }
    }
    Ok(())
}
