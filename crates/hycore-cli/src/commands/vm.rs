//! Virtual machine commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::json;
use tracing::warn;

use hycore::vm::{PowerAction, power_action};
use hycore::{Error, endpoints};

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct VmCommand {
    #[command(subcommand)]
    command: VmSubcommand,
}

#[derive(Subcommand, Debug)]
enum VmSubcommand {
    /// List virtual machines
    List(ListArgs),
    /// Show one virtual machine
    Show(ShowArgs),
    /// Start a virtual machine
    Start(PowerArgs),
    /// Shut a virtual machine down (guest-cooperative)
    Stop(PowerArgs),
    /// Reboot a virtual machine (guest-cooperative)
    Reboot(PowerArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only list VMs with this name
    #[arg(long)]
    name: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// VM UUID
    uuid: String,
}

#[derive(Args, Debug)]
struct PowerArgs {
    /// VM UUID
    uuid: String,
}

pub async fn handle(cmd: VmCommand, conn: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        VmSubcommand::List(args) => list(args, conn).await,
        VmSubcommand::Show(args) => show(args, conn).await,
        VmSubcommand::Start(args) => power(args, conn, PowerAction::Start).await,
        VmSubcommand::Stop(args) => power(args, conn, PowerAction::Shutdown).await,
        VmSubcommand::Reboot(args) => power(args, conn, PowerAction::Reboot).await,
    }
}

async fn list(args: ListArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;

    let filter = args.name.as_ref().map(|name| json!({"name": name}));
    let records = client
        .list_records(endpoints::VIR_DOMAIN, filter.as_ref(), None)
        .await
        .context("Failed to list VMs")?;

    if records.is_empty() {
        eprintln!("{}", "No VMs found.".dimmed());
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

async fn show(args: ShowArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;

    let path = format!("{}/{}", endpoints::VIR_DOMAIN, args.uuid);
    let record = client
        .get_record(&path, None, true, None)
        .await
        .context("Failed to fetch VM")?
        .context("VM not found")?;

    output::json_pretty(&record)?;
    Ok(())
}

async fn power(args: PowerArgs, conn: &ConnectionArgs, action: PowerAction) -> Result<()> {
    let client = connect(conn).await?;

    let handle = match power_action(&client, &args.uuid, action).await {
        Ok(handle) => handle,
        Err(Error::Api(err)) if err.is_conflict() => {
            // The VM is already in the requested state or another
            // operation holds it; surface as a warning with a retry hint.
            warn!(uuid = %args.uuid, action = action.as_str(), "Power action rejected as conflict");
            output::warn(&format!(
                "cluster rejected {} for {}: {}; retry once the current operation settles",
                action.as_str(),
                args.uuid,
                err
            ));
            return Ok(());
        }
        Err(err) => return Err(anyhow::Error::from(err).context("Power action failed")),
    };

    handle
        .wait(&client)
        .await
        .context("Power action did not complete")?;

    // Re-fetch for ground truth rather than trusting the action response.
    let path = format!("{}/{}", endpoints::VIR_DOMAIN, args.uuid);
    let record = client
        .get_record(&path, None, true, None)
        .await
        .context("Failed to re-fetch VM")?
        .context("VM vanished after power action")?;

    output::success(&format!("{} {}", action.as_str(), args.uuid));
    if let Ok(state) = record.str_field("state") {
        output::field("state", state);
    }
    Ok(())
}
