//! Asynchronous task commands.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use hycore::TaskHandle;

use crate::cli::ConnectionArgs;
use crate::commands::connect;
use crate::output;

#[derive(Args, Debug)]
pub struct TaskCommand {
    #[command(subcommand)]
    command: TaskSubcommand,
}

#[derive(Subcommand, Debug)]
enum TaskSubcommand {
    /// Wait for a task to reach a terminal state
    Wait(WaitArgs),
}

#[derive(Args, Debug)]
struct WaitArgs {
    /// Task tag
    tag: String,

    /// Overall deadline in seconds (unbounded when omitted)
    #[arg(long)]
    deadline: Option<u64>,
}

pub async fn handle(cmd: TaskCommand, conn: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        TaskSubcommand::Wait(args) => wait(args, conn).await,
    }
}

async fn wait(args: WaitArgs, conn: &ConnectionArgs) -> Result<()> {
    let client = connect(conn).await?;
    let handle = TaskHandle::new(Some(args.tag.clone()), None);

    match args.deadline {
        Some(secs) => handle
            .wait_timeout(&client, Duration::from_secs(secs))
            .await
            .context("Task did not complete before the deadline")?,
        None => handle.wait(&client).await.context("Task failed")?,
    }

    output::success(&format!("task {} complete", args.tag));
    Ok(())
}
