mod gateway;
mod logging;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use herald_channels::{reddit::RedditClient, telegram::TelegramNotifier};
use herald_core::{
    config::{self, Config},
    intent::RegexClassifier,
    traits::{NoopNotifier, Notifier, TokioPause},
};
use herald_memory::{day_key, Store};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "herald",
    version,
    about = "Herald: soft-ask responder for community threads"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, env = "HERALD_CONFIG", default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start watching the configured subreddits.
    Start,
    /// Show configuration and ledger state.
    Status,
    /// Send the daily activity summary now.
    Summary {
        /// Day to summarize (YYYY-MM-DD, UTC). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Drop expired pending offers.
    Purge,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = load_config(&cli.config)?;
    let _log_guard = logging::init(&cfg.herald)?;

    match cli.command {
        Commands::Start => {
            if !cfg.reddit.is_configured() {
                anyhow::bail!(
                    "Reddit credentials are incomplete. Set client_id, client_secret, \
                     username and password in config.toml or the REDDIT_* env vars."
                );
            }

            let reddit = Arc::new(RedditClient::new(cfg.reddit.clone())?);
            let identity = reddit.identity().to_string();
            let classifier = Arc::new(RegexClassifier::from_config(&cfg.intent)?);
            let memory = Store::new(&cfg.memory).await?;

            println!("Herald: starting as u/{identity}...");
            let gw = gateway::Gateway::new(
                reddit.clone(),
                reddit,
                build_notifier(&cfg),
                classifier,
                Arc::new(TokioPause),
                memory,
                cfg.outreach.clone(),
                cfg.notify.clone(),
                identity,
            );
            gw.run().await?;
        }
        Commands::Status => {
            println!("Herald: Status Check\n");
            println!("Config: {}", cli.config);
            println!(
                "  reddit: {}",
                if cfg.reddit.is_configured() {
                    format!("configured as u/{}", cfg.reddit.username)
                } else {
                    "missing credentials".to_string()
                }
            );
            println!("  subreddits: {}", cfg.reddit.subreddits.join(", "));
            println!(
                "  notifications: {}",
                if cfg.notify.is_active() {
                    "telegram"
                } else if cfg.notify.enabled {
                    "enabled but missing bot_token or chat_id"
                } else {
                    "disabled"
                }
            );
            println!(
                "  ceiling: {}/day per subreddit, offers expire after {}h",
                cfg.outreach.max_prompts_per_day, cfg.outreach.soft_ask_expire_hours
            );
            println!();

            let memory = Store::new(&cfg.memory).await?;
            let today = day_key(Utc::now());
            println!("Database: {}", cfg.memory.db_path);
            println!("  size: {} bytes", memory.db_size().await?);
            println!("  pending offers: {}", memory.pending_count().await?);
            println!("  conversions: {}", memory.replied_count().await?);
            let counts = memory.day_counts(&today).await?;
            if counts.is_empty() {
                println!("  today ({today}): no activity");
            } else {
                println!("  today ({today}):");
                for (channel, n) in counts {
                    println!("    r/{channel}: {n}/{}", cfg.outreach.max_prompts_per_day);
                }
            }
        }
        Commands::Summary { date } => {
            let date = match date {
                Some(d) => {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .map_err(|e| anyhow::anyhow!("invalid --date '{d}': {e}"))?;
                    d
                }
                None => day_key(Utc::now()),
            };
            let memory = Store::new(&cfg.memory).await?;
            let notices = gateway::Notices::new(build_notifier(&cfg), cfg.notify.clone());
            if gateway::send_daily_summary(&memory, &notices, &date).await? {
                println!("Summary for {date} sent.");
            } else {
                println!("Nothing sent for {date} (no activity or notifications off).");
            }
        }
        Commands::Purge => {
            let memory = Store::new(&cfg.memory).await?;
            let purged = memory.purge_expired_pending(Utc::now()).await?;
            println!("Purged {purged} expired pending offers.");
        }
    }

    Ok(())
}

/// Load the config file, overlay the environment and validate.
fn load_config(path: &str) -> anyhow::Result<Config> {
    let mut cfg = config::load(path)?;
    cfg.apply_env();
    cfg.validate()?;
    Ok(cfg)
}

/// Telegram when notifications are on and configured, otherwise a no-op.
fn build_notifier(cfg: &Config) -> Arc<dyn Notifier> {
    if cfg.notify.is_active() {
        Arc::new(TelegramNotifier::new(&cfg.notify, &cfg.reddit.username))
    } else {
        Arc::new(NoopNotifier)
    }
}
