//! gitpatch: change a single file in a remote repository.
//!
//! # Usage
//!
//! ```text
//! gitpatch update <repo> <path> (--content-file F | --set KEY=VALUE | --unset KEY | --remove-file)
//!                 [--branch main] [--prefix P] [--no-pr] [--create-missing] [--message M]
//!                 [--open-pr --title T --body B]
//! gitpatch pr <repo> --title T [--body B] [--source S] [--target main] [--prefix P]
//! ```

mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use commands::{pr::PrArgs, update::UpdateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gitpatch",
    version,
    about = "Change a single file in a remote repository, optionally through a pull request",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand. Each overrides `~/.gitpatch/config.yaml`.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// API root, e.g. https://github.example.com/api/v3.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Environment variable holding the API token.
    #[arg(long, global = true, value_name = "VAR")]
    pub token_env: Option<String>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite, patch or remove one file and commit the result.
    Update(UpdateArgs),

    /// Open a pull request between two branches.
    Pr(PrArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);
    let config = config::load().context("failed to load gitpatch config")?;
    match cli.command {
        Commands::Update(args) => args.run(&cli.global, &config),
        Commands::Pr(args) => args.run(&cli.global, &config),
    }
}
