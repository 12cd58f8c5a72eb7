//! Run step commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use serde_json::Value;

use alm_core::RunStep;

use crate::cli::ConnectionArgs;
use crate::commands::{LiveSession, apply_fields, parse_field};
use crate::output;

#[derive(Args, Debug)]
pub struct RunStepCommand {
    #[command(subcommand)]
    pub command: RunStepSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RunStepSubcommand {
    /// List the steps of a run
    List {
        /// Run ID
        run_id: String,
    },

    /// Fetch a run step
    Get {
        /// Run ID
        run_id: String,

        /// Run step ID
        id: String,
    },

    /// Add a step to a run
    Create {
        /// Run ID
        run_id: String,

        /// Step name
        #[arg(long)]
        name: String,

        /// Step status
        #[arg(long)]
        status: Option<String>,

        /// Extra field as NAME=VALUE (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Update fields of a run step
    Update {
        /// Run ID
        run_id: String,

        /// Run step ID
        id: String,

        /// New step status
        #[arg(long)]
        status: Option<String>,

        /// Field as NAME=VALUE (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

pub async fn run(args: &ConnectionArgs, cmd: RunStepCommand) -> Result<()> {
    if let RunStepSubcommand::Update { status, fields, .. } = &cmd.command
        && status.is_none()
        && fields.is_empty()
    {
        bail!("Nothing to update. Pass --status or --field.");
    }

    let session = LiveSession::open(args).await?;
    let result = execute(&session, cmd.command).await;
    session.close().await;

    output::json_pretty(&result?)
}

async fn execute(session: &LiveSession, command: RunStepSubcommand) -> Result<Value> {
    let client = &session.client;

    let value = match command {
        RunStepSubcommand::List { run_id } => {
            let steps = client
                .read_run_steps(&run_id)
                .await
                .with_context(|| format!("Failed to list steps of run {}", run_id))?;
            serde_json::to_value(steps)?
        }
        RunStepSubcommand::Get { run_id, id } => {
            let step = client
                .read_run_step(&run_id, &id)
                .await
                .with_context(|| format!("Failed to read step {} of run {}", id, run_id))?;
            serde_json::to_value(step)?
        }
        RunStepSubcommand::Create {
            run_id,
            name,
            status,
            fields,
        } => {
            let mut step = RunStep::new()
                .with_field("parent-id", &run_id)
                .with_field("name", name);
            apply_fields(&mut step, status.as_deref(), &fields);

            let step = client
                .create_run_step(&step)
                .await
                .with_context(|| format!("Failed to create step of run {}", run_id))?;
            serde_json::to_value(step)?
        }
        RunStepSubcommand::Update {
            run_id,
            id,
            status,
            fields,
        } => {
            let mut step = RunStep::new()
                .with_field("parent-id", &run_id)
                .with_field("id", &id);
            apply_fields(&mut step, status.as_deref(), &fields);

            let step = client
                .update_run_step(step)
                .await
                .with_context(|| format!("Failed to update step {} of run {}", id, run_id))?;
            serde_json::to_value(step)?
        }
    };

    Ok(value)
}
