use anyhow::{Context, Result};
use clap::Args;
use gitpatch_core::PullRequestRequest;

use crate::config::Config;
use crate::GlobalArgs;

/// Arguments for `gitpatch pr`.
#[derive(Args, Debug)]
pub struct PrArgs {
    /// Repository, e.g. my-org/my-repo.
    pub repo: String,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub body: String,

    /// Source branch. A prefixed name is generated when omitted.
    #[arg(long)]
    pub source: Option<String>,

    /// Branch the pull request merges into.
    #[arg(long, default_value = "main")]
    pub target: String,

    /// Prefix for a generated source branch (default from config).
    #[arg(long)]
    pub prefix: Option<String>,
}

impl PrArgs {
    pub fn run(self, global: &GlobalArgs, config: &Config) -> Result<()> {
        let updater = super::connect(global, config)?;
        let pr = updater
            .create_pr(&PullRequestRequest {
                repo: self.repo.clone(),
                title: self.title,
                body: self.body,
                source_branch: self.source,
                target_branch: self.target,
                branch_generate_name: self
                    .prefix
                    .unwrap_or_else(|| config.branch_prefix.clone()),
            })
            .with_context(|| format!("pull request failed for '{}'", self.repo))?;
        println!("✓ opened pull request #{}: {}", pr.number, pr.link);
        Ok(())
    }
}
