pub mod pr;
pub mod update;

use std::time::Duration;

use anyhow::{bail, Result};
use gitpatch_github::{GithubClient, GithubConfig};
use gitpatch_updater::Updater;

use crate::config::Config;
use crate::GlobalArgs;

/// Build an updater over the GitHub API from config and flag overrides.
pub fn connect(global: &GlobalArgs, config: &Config) -> Result<Updater<GithubClient>> {
    let token_env = global.token_env.as_deref().unwrap_or(&config.token_env);
    let token = match std::env::var(token_env) {
        Ok(token) if !token.trim().is_empty() => token,
        _ => bail!("{token_env} is not set; export an API token with write access to the repository"),
    };
    let api_url = global
        .api_url
        .clone()
        .unwrap_or_else(|| config.api_url.clone());

    tracing::debug!(api_url = %api_url, token_env, "connecting");
    let client = GithubClient::new(GithubConfig {
        api_url,
        token: Some(token),
        timeout: Duration::from_secs(config.timeout_secs),
        ..GithubConfig::default()
    });
    Ok(Updater::new(client))
}
