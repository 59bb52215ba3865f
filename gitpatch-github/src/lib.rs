//! # gitpatch-github
//!
//! [`GithubClient`] talks to the GitHub REST API (github.com or Enterprise)
//! and implements [`gitpatch_core::ScmGateway`], so it can back a
//! `gitpatch_updater::Updater`.

pub mod client;
mod payload;

pub use client::{GithubClient, GithubConfig, DEFAULT_API_URL};
