use anyhow::Result;
use console::{Emoji, style};
use std::path::PathBuf;

use super::load_context;
use crate::query::QueryResponse;

static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static LINK: Emoji<'_, '_> = Emoji("🔗 ", "");
static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");

pub async fn run(query: String, data: Option<PathBuf>, json: bool) -> Result<()> {
    let ctx = load_context(data)?;
    let Some(state) = ctx.current() else {
        anyhow::bail!("Graph is not loaded");
    };
    let response = state.queries.process_query(&query)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!();
    println!("{}{}", SEARCH, style(&query).bold());
    println!();
    print_response(&response);
    Ok(())
}

pub(crate) fn print_response(response: &QueryResponse) {
    println!("{}", response.response);

    if !response.related_links.is_empty() {
        println!();
        println!("{}Related", LINK);
        for (i, link) in response.related_links.iter().enumerate() {
            println!(
                "  {:>2}. {} {}",
                i + 1,
                style(&link.label).cyan().bold(),
                style(format!("({})", link.link_type)).dim()
            );
        }
    }

    if !response.highlight_nodes.is_empty() {
        println!();
        println!(
            "{}Highlighted: {}",
            TARGET,
            style(response.highlight_nodes.join(", ")).yellow()
        );
    }
    println!();
}
