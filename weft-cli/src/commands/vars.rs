//! `weft vars` — mirror GitHub repository variables into a variable library.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use weft_api::github::GithubClient;
use weft_core::config::RepoSlug;
use weft_sync::{escape, filter, pipeline, SyncReport, WriteResult};

const VALUE_PREVIEW_CHARS: usize = 40;

/// Arguments for `weft vars`.
#[derive(Args, Debug)]
pub struct VarsArgs {
    /// Variable name prefix (first segment of `<prefix>_<environment>_`).
    #[arg(long, env = "VARIABLE_PREFIX")]
    pub prefix: String,

    /// Environment tag (second segment).
    #[arg(long, env = "VARIABLE_ENVIRONMENT")]
    pub environment: String,

    /// Path of the variable-library JSON document to maintain.
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Repository as owner/name (defaults to $GITHUB_REPOSITORY).
    #[arg(long)]
    pub repo: Option<String>,

    /// Report what would change without touching the file.
    #[arg(long)]
    pub dry_run: bool,
}

impl VarsArgs {
    pub fn run(self) -> Result<()> {
        let slug = match &self.repo {
            Some(repo) => repo.clone(),
            None => std::env::var("GITHUB_REPOSITORY")
                .context("provide --repo or set GITHUB_REPOSITORY")?,
        };
        let repo = RepoSlug::parse(&slug)?;
        let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is not set")?;

        let client = match std::env::var("GITHUB_API_URL") {
            Ok(base) if !base.is_empty() => GithubClient::with_base_url(base, token),
            _ => GithubClient::new(token),
        };
        let fetched = client
            .list_repo_variables(&repo)
            .with_context(|| format!("failed to list variables for {}/{}", repo.owner, repo.name))?;

        let scope = filter::scope_prefix(&self.prefix, &self.environment);
        let pairs: Vec<(String, String)> =
            fetched.into_iter().map(|v| (v.name, v.value)).collect();
        let matched = filter::filter_and_strip(&scope, &pairs);

        let report = pipeline::run(&self.file, matched, self.dry_run)
            .with_context(|| format!("failed to sync '{}'", self.file.display()))?;
        print_report(&scope, &report, self.dry_run);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "status")]
    status: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

fn print_report(scope: &str, report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let path = report.path.display();

    if report.fetched == 0 {
        match report.write {
            WriteResult::Unchanged { .. } => {
                println!("{prefix}✓ No variables matched '{scope}*' — left '{path}' untouched");
            }
            _ => {
                println!("{prefix}✓ No variables matched '{scope}*' — wrote empty library to '{path}'");
            }
        }
        return;
    }

    println!(
        "{prefix}✓ '{path}' synced ({} total: {} added, {} updated, {} unchanged)",
        report.stats.total,
        report.stats.added,
        report.stats.updated,
        report.stats.unchanged,
    );

    let rows: Vec<VariableRow> = report
        .entries
        .iter()
        .map(|entry| VariableRow {
            name: entry.variable.name.clone(),
            status: entry.disposition.label(),
            value: preview(&entry.variable.value),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    match &report.write {
        WriteResult::Written { path } => println!("  ✎  {}", path.display()),
        WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
        WriteResult::Unchanged { path } => {
            println!("  ·  {} {}", path.display(), "(up to date)".bright_black());
        }
    }
}

/// Flatten a value onto one line and cap its width for the table.
fn preview(value: &str) -> String {
    let flat = escape::escape_value(value);
    if flat.chars().count() <= VALUE_PREVIEW_CHARS {
        return flat;
    }
    let truncated: String = flat.chars().take(VALUE_PREVIEW_CHARS).collect();
    format!("{truncated}…")
}
