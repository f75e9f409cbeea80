//! dailyshelf - today's quick read, quote and microlearning stories.
//!
//! Picks are drawn once per calendar day from the book catalog and kept in
//! the local data directory, so every run on the same day shows the same
//! content.

mod args;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dailyshelf_core::utils::{format_date_key, truncate_string};
use dailyshelf_core::{
    Catalog, Config, ContentState, DailyCache, DailyContent, FileStore, OnboardingFlags,
    SystemClock, TodaysContent,
};

use args::{Args, Command};

/// Environment variable naming a directory for daily-rotated log files
const LOG_DIR_ENV: &str = "DAILYSHELF_LOG_DIR";

/// Width used when truncating titles in the story list
const TITLE_WIDTH: usize = 48;

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=debug). When
/// DAILYSHELF_LOG_DIR is set, logs are also written to a daily file there.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(PathBuf::from(dir), "dailyshelf.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    let _log_guard = init_tracing();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, args::USAGE);
            std::process::exit(2);
        }
    };
    if matches!(args.command, Command::Help) {
        println!("{}", args::USAGE);
        return Ok(());
    }

    let mut config = Config::load()
        .context("Failed to load config")?
        .with_env_overrides();
    if let Some(path) = args.catalog {
        config.catalog_path = Some(path);
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }

    let data_dir = config.data_dir()?;
    let store = FileStore::open(&data_dir)
        .await
        .with_context(|| format!("Failed to open data directory: {}", data_dir.display()))?;
    info!(data_dir = %data_dir.display(), "dailyshelf starting");

    let cache = DailyCache::new(store.clone(), SystemClock);
    let mut content = DailyContent::open(cache, config.microlearning_count).await;

    match args.command {
        Command::Today => {
            let catalog = Catalog::load_or_default(config.catalog_path.as_deref())?;
            let mut flags = OnboardingFlags::load(&store).await;
            if !flags.has_seen_welcome {
                println!("Welcome to dailyshelf! Gain 10 insights in under 5 minutes.\n");
                if let Err(e) = flags.set_seen_welcome(&store, true).await {
                    warn!(error = %e, "Failed to save onboarding flag");
                }
            }
            let today = content.today(&catalog).await;
            print_today(&content.cache().today(), &today);
        }
        Command::Complete(number) => {
            let catalog = Catalog::load_or_default(config.catalog_path.as_deref())?;
            let stories = content.stories(&catalog).await;
            let Some(stories) = stories.ready() else {
                println!("No stories available yet.");
                return Ok(());
            };
            let Some(story) = number.checked_sub(1).and_then(|i| stories.get(i)) else {
                anyhow::bail!("No story #{} today (there are {})", number, stories.len());
            };
            let title = story.book.title.clone();
            content.mark_story_complete(number - 1).await;
            println!(
                "Finished \"{}\" ({}/{} done today)",
                title,
                content.completion().completed_count(),
                stories.len()
            );
        }
        Command::Status => {
            let status = content.cache().status(&content.namespaces()).await;
            println!("Today: {}", format_date_key(&status.today));
            for entry in &status.entries {
                let marker = if entry.fresh { "fresh" } else { "stale" };
                println!(
                    "  {:<20} {:<12} {}",
                    entry.namespace,
                    status.date_display(&entry.namespace),
                    marker
                );
            }
            let completion = content.completion();
            let total = if completion.is_current_for(&status.today) {
                completion.len()
            } else {
                0
            };
            println!(
                "  stories completed: {}/{}",
                completion.completed_count_for(&status.today),
                total
            );

            let mut flags = OnboardingFlags::load(&store).await;
            if !flags.has_seen_profile {
                println!("\nTip: mark a story finished with `dailyshelf complete <n>`.");
                if let Err(e) = flags.set_seen_profile(&store, true).await {
                    warn!(error = %e, "Failed to save onboarding flag");
                }
            }
        }
        Command::Reset => {
            content.reset().await.context("Failed to reset daily picks")?;
            println!("Today's picks were cleared; the next run draws new ones.");
        }
        Command::Help => println!("{}", args::USAGE),
    }

    Ok(())
}

fn print_today(date: &dailyshelf_core::DateKey, today: &TodaysContent<'_>) {
    println!("{}\n", format_date_key(date));

    match &today.quick_read {
        ContentState::Ready(book) => println!("Quick read: {} by {}", book.title, book.author),
        ContentState::Pending => println!("Quick read: loading..."),
    }

    match &today.quote {
        ContentState::Ready(quote) => println!("\n\"{}\"\n  - {}", quote.quote, quote.author),
        ContentState::Pending => println!("\nQuote of the day: loading..."),
    }

    println!("\nMicrolearning:");
    match &today.stories {
        ContentState::Ready(stories) => {
            for (i, story) in stories.iter().enumerate() {
                let mark = if story.completed { "x" } else { " " };
                println!(
                    "  [{}] {:>2}. {}",
                    mark,
                    i + 1,
                    truncate_string(&story.book.title, TITLE_WIDTH)
                );
            }
        }
        ContentState::Pending => println!("  loading..."),
    }

    for warning in &today.warnings {
        eprintln!("warning: today's picks could not be saved ({})", warning);
    }
}
