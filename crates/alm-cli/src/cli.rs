//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::attach::AttachArgs;
use crate::commands::run::RunCommand;
use crate::commands::run_step::RunStepCommand;
use crate::commands::test::{TestCommand, TestInstanceCommand, TestSetCommand};

/// ALM test-management CLI.
#[derive(Parser, Debug)]
#[command(name = "alm")]
#[command(author, version = env!("ALM_VERSION"), about, long_about = None)]
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

/// Where to connect and as whom. Unset values fall back to the saved profile.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Server root URL, e.g. https://alm.example.com
    #[arg(long, env = "ALM_SERVER", global = true)]
    pub server: Option<String>,

    /// ALM domain
    #[arg(long, env = "ALM_DOMAIN", global = true)]
    pub domain: Option<String>,

    /// ALM project
    #[arg(long, env = "ALM_PROJECT", global = true)]
    pub project: Option<String>,

    /// User name
    #[arg(long, env = "ALM_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (never saved)
    #[arg(long, env = "ALM_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether the server considers this client authenticated
    Status,

    /// Verify credentials and save the connection profile
    Login,

    /// End the server session and forget the saved profile
    Logout,

    /// Show the saved connection profile
    Profile,

    /// Test operations
    Test(TestCommand),

    /// Test set operations
    TestSet(TestSetCommand),

    /// Test instance operations
    TestInstance(TestInstanceCommand),

    /// Run operations
    Run(RunCommand),

    /// Run step operations
    RunStep(RunStepCommand),

    /// Upload a file as an attachment of a run or run step
    Attach(AttachArgs),
}
