use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::PathBuf;

use super::load_context;
use crate::graph::analytics;
use crate::render::style::node_style;

static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(data: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", style(" Gilligan Universe - Graph Statistics ").bold().reverse());
    println!();

    let ctx = load_context(data)?;
    let state = ctx.current().context("Graph is not loaded")?;
    let snapshot = &state.snapshot;
    let stats = analytics::compute_stats(snapshot, 10);

    println!("{}{}", CHART, style(&snapshot.metadata.title).bold());
    println!("   {}", style(&snapshot.metadata.description).dim());
    println!();
    println!(
        "  {} Nodes:                {}",
        style("•").cyan(),
        style(stats.node_count).green().bold()
    );
    println!(
        "  {} Links:                {}",
        style("•").cyan(),
        style(stats.link_count).green().bold()
    );
    println!(
        "  {} Connected components: {}",
        style("•").cyan(),
        style(stats.connected_components).green().bold()
    );
    println!(
        "  {} Isolated nodes:       {}",
        style("•").cyan(),
        style(stats.isolated_nodes).green()
    );
    println!(
        "  {} Last updated:         {}",
        style("•").cyan(),
        style(snapshot.metadata.last_updated).green()
    );

    let recorded = (
        snapshot.metadata.entity_count,
        snapshot.metadata.relationship_count,
    );
    if recorded != (stats.node_count, stats.link_count) {
        println!();
        println!(
            "{}Metadata records {} entities and {} relationships",
            WARN, recorded.0, recorded.1
        );
    }
    if stats.dangling_links > 0 {
        println!(
            "{}{} link(s) point at missing nodes and will not be drawn",
            WARN,
            style(stats.dangling_links).yellow()
        );
    }

    if !stats.type_counts.is_empty() {
        println!();
        println!("{}Entity Types", CHART);
        println!();
        for (node_type, count) in &stats.type_counts {
            let bar = "█".repeat((*count).min(30));
            println!(
                "  {:<20} {} ({})",
                style(node_style(*node_type).display_name).yellow(),
                style(&bar).green(),
                style(count).dim(),
            );
        }
    }

    if !stats.link_type_counts.is_empty() {
        println!();
        println!("{}Relationship Types", GRAPH);
        println!();
        for (link_type, count) in &stats.link_type_counts {
            let bar = "█".repeat((*count).min(30));
            println!(
                "  {:<20} {} ({})",
                style(link_type).yellow(),
                style(&bar).blue(),
                style(count).dim(),
            );
        }
    }

    if !stats.top_degree.is_empty() {
        println!();
        println!("{}Most Connected", GRAPH);
        println!();
        for (i, (name, degree)) in stats.top_degree.iter().enumerate() {
            let bar = "█".repeat((*degree).min(30));
            println!(
                "  {:>2}. {:<30} {} ({})",
                i + 1,
                style(name).cyan().bold(),
                style(&bar).blue(),
                style(degree).dim(),
            );
        }
    }

    println!();

    Ok(())
}
