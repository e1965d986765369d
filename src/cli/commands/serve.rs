use anyhow::Result;
use console::{Emoji, style};
use std::path::PathBuf;

use super::{load_context, spinner};
use crate::server::{self, AppState};

static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static BROWSER: Emoji<'_, '_> = Emoji("🌐 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

pub async fn run(port: Option<u16>, data: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", style(" Gilligan Universe - Explorer ").bold().reverse());
    println!();

    let spinner = spinner(&GRAPH, "Loading graph snapshot...")?;
    let ctx = load_context(data)?;
    spinner.finish_and_clear();

    if let Some(state) = ctx.current() {
        println!(
            "{}Loaded {} nodes, {} links from {}",
            CHECK,
            style(state.snapshot.nodes.len()).green().bold(),
            style(state.snapshot.links.len()).green().bold(),
            style(ctx.snapshot_path().display()).cyan()
        );
    }

    let port = port.unwrap_or(ctx.config().server.port);
    let refresh = ctx.config().server.refresh_interval();
    let app = AppState::new(ctx)?;

    println!(
        "{}Explorer running at {}",
        BROWSER,
        style(format!("http://localhost:{}", port)).blue().underlined()
    );
    if refresh.is_zero() {
        println!("{}Auto-refresh is off", CLOCK);
    } else {
        println!(
            "{}Reloading the snapshot every {}",
            CLOCK,
            style(humanize(refresh.as_secs())).dim()
        );
    }
    println!("  Press {} to stop", style("Ctrl+C").yellow());
    println!();

    server::serve(app, port).await
}

fn humanize(secs: u64) -> String {
    match secs {
        s if s >= 3600 && s % 3600 == 0 => format!("{}h", s / 3600),
        s if s >= 60 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{}s", s),
    }
}
