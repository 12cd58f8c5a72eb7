//! Attachment upload command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};

use alm_core::AttachmentOwner;

use crate::cli::ConnectionArgs;
use crate::commands::LiveSession;
use crate::output;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("owner").required(true).args(["run", "run_step"])))]
pub struct AttachArgs {
    /// Attach to this run
    #[arg(long)]
    pub run: Option<String>,

    /// Attach to this run step
    #[arg(long)]
    pub run_step: Option<String>,

    /// File to upload
    pub file: PathBuf,

    /// Attachment name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

impl AttachArgs {
    fn owner(&self) -> Option<AttachmentOwner> {
        match (&self.run, &self.run_step) {
            (Some(run), _) => Some(AttachmentOwner::Run(run.clone())),
            (None, Some(step)) => Some(AttachmentOwner::RunStep(step.clone())),
            (None, None) => None,
        }
    }

    fn attachment_name(&self) -> Option<String> {
        self.name.clone().or_else(|| {
            self.file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }
}

pub async fn run(args: &ConnectionArgs, cmd: AttachArgs) -> Result<()> {
    let owner = cmd.owner().context("Pass --run or --run-step")?;
    let name = cmd
        .attachment_name()
        .context("Cannot derive an attachment name, pass --name")?;
    let data = tokio::fs::read(&cmd.file)
        .await
        .with_context(|| format!("Failed to read {}", cmd.file.display()))?;

    let session = LiveSession::open(args).await?;
    let result = session
        .client
        .create_attachment(&owner, &name, data)
        .await
        .with_context(|| format!("Failed to upload {}", name));
    session.close().await;

    output::json_pretty(&result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(run: Option<&str>, run_step: Option<&str>, file: &str, name: Option<&str>) -> AttachArgs {
        AttachArgs {
            run: run.map(str::to_string),
            run_step: run_step.map(str::to_string),
            file: PathBuf::from(file),
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn name_defaults_to_file_name() {
        let cmd = args(Some("12"), None, "target/logs/console.log", None);
        assert_eq!(cmd.attachment_name().as_deref(), Some("console.log"));
        assert_eq!(cmd.owner(), Some(AttachmentOwner::Run("12".to_string())));
    }

    #[test]
    fn explicit_name_and_step_owner() {
        let cmd = args(None, Some("55"), "shot.png", Some("failure.png"));
        assert_eq!(cmd.attachment_name().as_deref(), Some("failure.png"));
        assert_eq!(cmd.owner(), Some(AttachmentOwner::RunStep("55".to_string())));
    }
}
