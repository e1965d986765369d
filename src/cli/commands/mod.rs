pub mod chat;
pub mod init;
pub mod profile;
pub mod query;
pub mod serve;
pub mod stats;
pub mod update;

use anyhow::{Context, Result};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::context::AppContext;

/// Load configuration, letting a command-line snapshot path win
fn load_config(data: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load()
        .context("Failed to load configuration. Run 'gilligan-universe init' to create one.")?;
    if let Some(path) = data {
        config.data.snapshot = path;
    }
    Ok(config)
}

/// Build a context and load the snapshot into it
fn load_context(data: Option<PathBuf>) -> Result<Arc<AppContext>> {
    let ctx = Arc::new(AppContext::new(load_config(data)?));
    ctx.reload().with_context(|| {
        format!(
            "No graph snapshot at {}. Run 'gilligan-universe update' first.",
            ctx.snapshot_path().display()
        )
    })?;
    Ok(ctx)
}

fn spinner(icon: &Emoji<'_, '_>, message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template(&format!("{}{{spinner:.green}} {{msg}}", icon))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}
