use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "versionbot")]
#[command(about = "Announces new Minecraft and Jira versions in Discord channels")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the version feeds and announce new versions until interrupted
    Run {
        /// Dry run - don't post announcements, just print what would be sent
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch every feed once and print its latest versions
    Latest,
}
