//! Run commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use alm_core::Run;

use crate::cli::ConnectionArgs;
use crate::commands::{LiveSession, apply_fields, parse_field};
use crate::output;

/// Status a new run starts in unless `--status` says otherwise.
const INITIAL_STATUS: &str = "Not Completed";

#[derive(Args, Debug)]
pub struct RunCommand {
    #[command(subcommand)]
    pub command: RunSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RunSubcommand {
    /// Fetch a run
    Get {
        /// Run ID
        id: String,
    },

    /// Start a run of a test instance
    Create(CreateRunArgs),

    /// Update fields of a run
    Update(UpdateRunArgs),
}

#[derive(Args, Debug)]
pub struct CreateRunArgs {
    /// Test instance the run executes
    #[arg(long)]
    pub test_instance: String,

    /// Run name
    #[arg(long)]
    pub name: String,

    /// Run status
    #[arg(long, default_value = INITIAL_STATUS)]
    pub status: String,

    /// Extra field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct UpdateRunArgs {
    /// Run ID
    pub id: String,

    /// New run status
    #[arg(long)]
    pub status: Option<String>,

    /// Field as NAME=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

pub async fn run(args: &ConnectionArgs, cmd: RunCommand) -> Result<()> {
    if let RunSubcommand::Update(update) = &cmd.command
        && update.status.is_none()
        && update.fields.is_empty()
    {
        bail!("Nothing to update. Pass --status or --field.");
    }

    let session = LiveSession::open(args).await?;
    let result = match cmd.command {
        RunSubcommand::Get { id } => session
            .client
            .read_run(&id)
            .await
            .with_context(|| format!("Failed to read run {}", id)),
        RunSubcommand::Create(create) => create_run(&session, create).await,
        RunSubcommand::Update(update) => {
            let mut run = Run::new().with_field("id", &update.id);
            apply_fields(&mut run, update.status.as_deref(), &update.fields);
            session
                .client
                .update_run(run)
                .await
                .with_context(|| format!("Failed to update run {}", update.id))
        }
    };
    session.close().await;

    output::json_pretty(&result?)
}

async fn create_run(session: &LiveSession, args: CreateRunArgs) -> Result<Run> {
    let instance = session
        .client
        .read_test_instance(&args.test_instance)
        .await
        .with_context(|| format!("Failed to read test instance {}", args.test_instance))?;

    let mut run = Run::for_test_instance(&instance, &args.name);
    if let Some(owner) = &session.connection.username {
        run.set_field("owner", owner.as_str());
    }
    apply_fields(&mut run, Some(&args.status), &args.fields);

    session
        .client
        .create_run(&run)
        .await
        .context("Failed to create run")
}
