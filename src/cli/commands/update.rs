use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::PathBuf;

use super::{load_config, spinner};
use crate::graph::write_snapshot;
use crate::ingest::{EntityApiClient, StopReason, build_snapshot, fetch_all};

static DOWNLOAD: Emoji<'_, '_> = Emoji("📡 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(
    api_url: Option<String>,
    output: Option<PathBuf>,
    limit: Option<usize>,
    max_pages: Option<usize>,
) -> Result<()> {
    println!();
    println!("{}", style(" Gilligan Universe - Update ").bold().reverse());
    println!();

    let mut config = load_config(output)?;
    if let Some(url) = api_url {
        config.api.base_url = url;
    }
    let limit = limit.unwrap_or(config.api.page_limit).max(1);
    let max_pages = max_pages.unwrap_or(config.api.max_pages).max(1);

    let client = EntityApiClient::new(&config.api.base_url);
    println!(
        "{}Fetching entities from {}",
        DOWNLOAD,
        style(client.base_url()).cyan()
    );

    let fetching = spinner(&DOWNLOAD, "Fetching entities...")?;
    let outcome = fetch_all(&client, limit, max_pages).await;
    fetching.finish_and_clear();

    println!(
        "{}Fetched {} entities in {} page(s)",
        CHECK,
        style(outcome.entities.len()).green().bold(),
        style(outcome.pages).green()
    );
    match outcome.stop {
        StopReason::PageError => println!(
            "{}A page request failed; continuing with what was fetched",
            WARN
        ),
        StopReason::PageCap => println!(
            "{}Stopped at the {} page limit",
            WARN,
            style(max_pages).yellow()
        ),
        StopReason::ShortPage | StopReason::MissingEntities => {}
    }

    let fetched = outcome.entities.len();
    let today = chrono::Local::now().date_naive();
    let snapshot = build_snapshot(outcome.entities, &config.api.keywords, today);
    println!(
        "{}Kept {} of {} entities matching the universe keywords",
        CHECK,
        style(snapshot.nodes.len()).green().bold(),
        fetched
    );

    let path = &config.data.snapshot;
    let saving = spinner(&SAVE, "Writing snapshot...")?;
    write_snapshot(&snapshot, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    saving.finish_and_clear();

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!(
        "  {} Entities:      {}",
        style("•").cyan(),
        style(snapshot.metadata.entity_count).green().bold()
    );
    println!(
        "  {} Relationships: {}",
        style("•").cyan(),
        style(snapshot.metadata.relationship_count).green().bold()
    );
    println!(
        "  {} Updated:       {}",
        style("•").cyan(),
        style(snapshot.metadata.last_updated).green()
    );
    println!(
        "  {} Saved to:      {}",
        style("•").cyan(),
        style(path.display()).cyan()
    );
    println!();

    Ok(())
}
