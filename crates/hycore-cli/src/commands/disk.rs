//! Virtual disk commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;

use hycore::vm::{resize_disk, units};
use hycore::endpoints;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct DiskCommand {
    #[command(subcommand)]
    command: DiskSubcommand,
}

#[derive(Subcommand, Debug)]
enum DiskSubcommand {
    /// List block devices
    List(ListArgs),
    /// Grow a block device to a new capacity
    Resize(ResizeArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only list disks attached to this VM UUID
    #[arg(long)]
    vm: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct ResizeArgs {
    /// Disk UUID
    uuid: String,

    /// New capacity in decimal gigabytes
    #[arg(long)]
    size_gb: f64,
}

pub async fn handle(cmd: DiskCommand, conn: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        DiskSubcommand::List(args) => list(args, conn).await,
        DiskSubcommand::Resize(args) => resize(args, conn).await,
    }
}

async fn list(args: ListArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;

    let filter = args.vm.as_ref().map(|vm| json!({"virDomainUUID": vm}));
    let records = client
        .list_records(endpoints::VIR_DOMAIN_BLOCK_DEVICE, filter.as_ref(), None)
        .await
        .context("Failed to list disks")?;

    if records.is_empty() {
        eprintln!("{}", "No disks found.".dimmed());
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

async fn resize(args: ResizeArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;

    let path = format!("{}/{}", endpoints::VIR_DOMAIN_BLOCK_DEVICE, args.uuid);
    let disk = client
        .get_record(&path, None, true, None)
        .await
        .context("Failed to fetch disk")?
        .context("Disk not found")?;

    let current_bytes = disk
        .u64_field("capacity")
        .context("Disk record has no usable capacity field")?;
    let new_bytes = units::gb_to_bytes(args.size_gb);

    let handle = resize_disk(&client, &args.uuid, current_bytes, new_bytes)
        .await
        .context("Resize rejected")?;
    handle.wait(&client).await.context("Resize did not complete")?;

    let disk = client
        .get_record(&path, None, true, None)
        .await
        .context("Failed to re-fetch disk")?
        .context("Disk vanished after resize")?;

    output::success(&format!(
        "resized {} to {} GB",
        args.uuid,
        units::bytes_to_gb(disk.u64_field("capacity")?)
    ));
    Ok(())
}
