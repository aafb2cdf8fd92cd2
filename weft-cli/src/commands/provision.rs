//! `weft provision` — idempotent workspace + Git link for the current branch.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use weft_api::auth;
use weft_api::fabric::{EnsureOutcome, FabricClient, GitConnectOutcome, GitLink};
use weft_core::config::ProvisionConfig;
use weft_core::types::{workspace_name_for_branch, WorkspaceId};

/// Arguments for `weft provision`. Configuration comes entirely from the
/// environment — see `ProvisionConfig`.
#[derive(Args, Debug)]
pub struct ProvisionArgs {}

impl ProvisionArgs {
    pub fn run(self) -> Result<()> {
        let config = ProvisionConfig::from_env().context("provisioning configuration incomplete")?;
        let name = workspace_name_for_branch(&config.workspace_prefix, &config.branch);

        let token = auth::fetch_token(auth::DEFAULT_AUTHORITY, &config.principal)
            .context("failed to acquire a Fabric token")?;
        let client = match &config.api_base {
            Some(base) => FabricClient::with_base_url(base, token),
            None => FabricClient::new(token),
        };

        let outcome = client
            .ensure_workspace(&name, &config.capacity_id)
            .with_context(|| format!("failed to ensure workspace '{name}'"))?;
        match &outcome {
            EnsureOutcome::Existing(id) => println!("✓ Reusing workspace '{name}' ({id})"),
            EnsureOutcome::Created(id) => println!("✓ Created workspace '{name}' ({id})"),
        }

        let link = GitLink {
            owner: config.repo.owner.clone(),
            repository: config.repo.name.clone(),
            branch: config.branch.clone(),
            directory: config.git_directory.clone(),
            connection_id: config.git_connection_id.clone(),
        };
        match client
            .connect_git(outcome.id(), &link)
            .with_context(|| format!("failed to connect '{name}' to Git"))?
        {
            GitConnectOutcome::Connected => println!(
                "✓ Connected '{name}' to {}/{} @ {}",
                config.repo.owner, config.repo.name, config.branch
            ),
            GitConnectOutcome::AlreadyConnected { code } => println!(
                "{} workspace already connected to Git ({code})",
                "warning:".yellow().bold()
            ),
        }

        emit_workspace_id(outcome.id())
    }
}

/// Print the id and, on an Actions runner, append it to `GITHUB_OUTPUT` so
/// downstream steps can consume it.
fn emit_workspace_id(id: &WorkspaceId) -> Result<()> {
    println!("workspace_id={id}");
    if let Ok(path) = std::env::var("GITHUB_OUTPUT") {
        if !path.is_empty() {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("cannot append to GITHUB_OUTPUT file '{path}'"))?;
            writeln!(file, "workspace_id={id}")
                .with_context(|| format!("cannot append to GITHUB_OUTPUT file '{path}'"))?;
        }
    }
    Ok(())
}
