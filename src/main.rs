use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use versionbot::cli::{Cli, Commands};
use versionbot::config::{AnnouncementChannels, Config};
use versionbot::domain::{FeedKind, LatestVersions};
use versionbot::errors::FeederResult;
use versionbot::services::{
    setup_feeds, ChannelSink, CheckOutcome, LogSink, NotificationSink, Scheduler, SchedulerHandle,
};
use versionbot::sources::{HttpFetcher, JiraSource, MinecraftSource, VersionSource};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("versionbot=info,channels=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run() -> FeederResult<()> {
    let cli = Cli::parse();

    // Load configuration (also loads .env, which may set RUST_LOG)
    let config = Config::from_env()?;
    init_tracing();

    match cli.command {
        Commands::Run { dry_run } => cmd_run(&config, dry_run).await,
        Commands::Latest => cmd_latest(&config).await,
    }
}

fn build_sources(config: &Config) -> Vec<Arc<dyn VersionSource>> {
    let fetcher = HttpFetcher::new();

    let minecraft: Arc<dyn VersionSource> = Arc::new(MinecraftSource::new(
        fetcher.clone(),
        config.feed_url(FeedKind::Minecraft),
    ));
    let jira: Arc<dyn VersionSource> =
        Arc::new(JiraSource::new(fetcher, config.feed_url(FeedKind::Jira)));

    vec![minecraft, jira]
}

async fn cmd_run(config: &Config, dry_run: bool) -> FeederResult<()> {
    let client = if dry_run {
        None
    } else {
        let client = channels::create_client(&config.discord_api_url, config.require_token()?)?;
        Some(Arc::new(client))
    };

    let destinations = match AnnouncementChannels::from_env() {
        Ok(Some(destinations)) => destinations,
        Ok(None) => {
            println!(
                "Version check disabled: {} is not set.",
                AnnouncementChannels::MINECRAFT_VAR
            );
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, "Failed to set up version check");
            println!("Version check disabled: {}", e);
            return Ok(());
        }
    };

    if dry_run {
        println!("Dry run: announcements will be printed, not posted.");
    }

    let feeds = build_sources(config)
        .into_iter()
        .map(|source| {
            let kind = source.kind();
            let sink: Arc<dyn NotificationSink> = match &client {
                Some(client) => Arc::new(ChannelSink::new(
                    client.clone(),
                    destinations.for_feed(kind).to_vec(),
                    config.crosspost,
                )),
                None => Arc::new(LogSink::new(kind)),
            };
            (source, sink)
        })
        .collect();

    println!("Fetching initial versions...");
    let feeds = setup_feeds(feeds).await?;

    for feed in &feeds {
        println!(
            "Loaded {} initial {} versions",
            feed.seen_count().await,
            feed.kind()
        );
    }

    let handle = Scheduler::new(feeds, config.check_interval).start();

    println!("Bot is now running. Type \"check\" to check for new versions now.");
    println!("Type \"quit\" or press CTRL-C to exit.");

    let mut commands = spawn_command_reader();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
            line = commands.recv(), if stdin_open => match line {
                Some(line) => match line.trim() {
                    "check" => report_check(&handle).await,
                    "quit" => break,
                    "" => {}
                    other => println!("Unknown command: {}", other),
                },
                // Running detached, only CTRL-C stops the bot
                None => stdin_open = false,
            },
        }
    }

    info!("Shutting down");
    handle.stop();
    handle.join().await;

    Ok(())
}

/// Lines typed on stdin. Read on a plain thread so a pending read never holds
/// up shutdown.
fn spawn_command_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// Manual version check, run on top of the regular ticks
async fn report_check(handle: &SchedulerHandle) {
    for (kind, outcome) in handle.check_now().await {
        match outcome {
            CheckOutcome::Completed(report) => {
                println!("{}: {} new versions", kind, report.new_versions.len());
            }
            CheckOutcome::Failed(e) => println!("{}: check failed: {}", kind, e),
            CheckOutcome::Skipped => println!("{}: check already running", kind),
        }

        print_latest(kind, &handle.latest(kind).unwrap_or_default());
    }
}

fn print_latest(kind: FeedKind, latest: &LatestVersions) {
    let preview_label = match kind {
        FeedKind::Minecraft => "Latest snapshot",
        FeedKind::Jira => "Next version",
    };

    println!(
        "  Latest release: {}",
        latest.release.as_deref().unwrap_or("unknown")
    );
    println!(
        "  {}: {}",
        preview_label,
        latest.preview.as_deref().unwrap_or("unknown")
    );
}

async fn cmd_latest(config: &Config) -> FeederResult<()> {
    for source in build_sources(config) {
        let kind = source.kind();
        let listing = source.fetch().await?;

        println!("{} ({} versions):", kind, listing.records.len());
        print_latest(kind, &listing.latest.unwrap_or_default());
    }

    Ok(())
}
