//! `gitpatch update`: change one file and commit it.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use gitpatch_core::{CommitRequest, PullRequestRequest};
use gitpatch_updater::{ContentUpdater, RemoveYamlKey, ReplaceContents, UpdateYaml};
use serde_yaml::Value;

use crate::config::Config;
use crate::GlobalArgs;

/// Arguments for `gitpatch update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Repository, e.g. my-org/my-repo.
    pub repo: String,

    /// Path of the file relative to the repository root.
    pub path: String,

    /// Base branch to read from and fork from.
    #[arg(long, short = 'b', default_value = "main")]
    pub branch: String,

    /// Prefix for the generated branch (default from config).
    #[arg(long)]
    pub prefix: Option<String>,

    /// Commit directly to the base branch.
    #[arg(long)]
    pub no_pr: bool,

    /// Create the file if it does not exist.
    #[arg(long)]
    pub create_missing: bool,

    /// Commit message (default: "Update <path>" / "Remove <path>").
    #[arg(long, short = 'm')]
    pub message: Option<String>,

    #[command(flatten)]
    pub change: ChangeArgs,

    /// Open a pull request from the generated branch into the base branch.
    #[arg(long, conflicts_with = "no_pr")]
    pub open_pr: bool,

    /// Pull request title (default: the commit message).
    #[arg(long, requires = "open_pr")]
    pub title: Option<String>,

    /// Pull request body.
    #[arg(long, requires = "open_pr")]
    pub body: Option<String>,
}

/// Exactly one way of producing the new content.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ChangeArgs {
    /// Replace the whole file with the contents of FILE.
    #[arg(long, value_name = "FILE")]
    pub content_file: Option<PathBuf>,

    /// Set a dotted YAML key path; VALUE is parsed as YAML.
    #[arg(long, value_name = "KEY=VALUE")]
    pub set: Option<String>,

    /// Remove a dotted YAML key path.
    #[arg(long, value_name = "KEY")]
    pub unset: Option<String>,

    /// Delete the file.
    #[arg(long)]
    pub remove_file: bool,
}

impl ChangeArgs {
    fn transform(&self) -> Result<Box<dyn ContentUpdater>> {
        if let Some(file) = &self.content_file {
            let body = std::fs::read(file)
                .with_context(|| format!("cannot read content file '{}'", file.display()))?;
            return Ok(Box::new(ReplaceContents::new(body)));
        }
        if let Some(assignment) = &self.set {
            let (key, raw) = parse_assignment(assignment)?;
            return Ok(Box::new(UpdateYaml::new(key, parse_value(raw))));
        }
        if let Some(key) = &self.unset {
            return Ok(Box::new(RemoveYamlKey::new(key.as_str())));
        }
        // Deletion ignores the transformed body.
        Ok(Box::new(ReplaceContents::new(Vec::new())))
    }
}

fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("expected KEY=VALUE, got '{assignment}'"),
    }
}

/// YAML scalar or collection if it parses, plain string otherwise.
fn parse_value(raw: &str) -> Value {
    serde_yaml::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

impl UpdateArgs {
    pub fn run(self, global: &GlobalArgs, config: &Config) -> Result<()> {
        let transform = self.change.transform()?;
        let remove_file = self.change.remove_file;
        let commit_message = self.message.clone().unwrap_or_else(|| {
            let verb = if remove_file { "Remove" } else { "Update" };
            format!("{verb} {}", self.path)
        });

        let input = CommitRequest {
            repo: self.repo.clone(),
            path: self.path.clone(),
            branch: self.branch.clone(),
            branch_generate_name: self
                .prefix
                .clone()
                .unwrap_or_else(|| config.branch_prefix.clone()),
            disable_pr_creation: self.no_pr,
            create_missing: self.create_missing,
            remove_file,
            commit_message: commit_message.clone(),
            signature: config.author.clone(),
        };

        let updater = super::connect(global, config)?;
        let outcome = updater
            .apply_update(&input, transform.as_ref())
            .with_context(|| format!("update failed for '{}' in '{}'", self.path, self.repo))?;

        for warning in &outcome.warnings {
            eprintln!("warning: {warning}");
        }
        println!("✓ committed '{}' to branch '{}'", self.path, outcome.branch);

        if self.open_pr {
            let pr = updater
                .create_pr(&PullRequestRequest {
                    repo: self.repo.clone(),
                    title: self.title.unwrap_or(commit_message),
                    body: self.body.unwrap_or_default(),
                    source_branch: Some(outcome.branch),
                    target_branch: self.branch,
                    branch_generate_name: input.branch_generate_name,
                })
                .with_context(|| format!("pull request failed for '{}'", self.repo))?;
            println!("✓ opened pull request #{}: {}", pr.number, pr.link);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("image.tag=a=b").unwrap(),
            ("image.tag", "a=b")
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn values_are_parsed_as_yaml() {
        assert_eq!(parse_value("3"), Value::from(3));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("service-a:1.1.0"), Value::from("service-a:1.1.0"));
        assert!(parse_value("[a, b]").is_sequence());
    }

    #[test]
    fn unparseable_value_falls_back_to_string() {
        assert_eq!(parse_value("[unclosed"), Value::from("[unclosed"));
    }
}
