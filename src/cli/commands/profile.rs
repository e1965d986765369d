use anyhow::Result;
use console::{Emoji, style};

use crate::profile::{Dossier, dossier, dossier_ids};

static PERSON: Emoji<'_, '_> = Emoji("👤 ", "");
static CALENDAR: Emoji<'_, '_> = Emoji("📅 ", "");
static TROPHY: Emoji<'_, '_> = Emoji("🏆 ", "");
static FILM: Emoji<'_, '_> = Emoji("🎬 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(id: Option<String>) -> Result<()> {
    println!();
    let Some(id) = id else {
        println!("{}Available dossiers", PERSON);
        println!();
        for id in dossier_ids() {
            println!("  {} {}", style("•").cyan(), style(id).bold());
        }
        println!();
        return Ok(());
    };

    match dossier(&id) {
        Some(d) => print_dossier(&d),
        None => {
            tracing::warn!("No profile data for: {}", id);
            println!("{}No dossier for {}", WARN, style(&id).yellow());
            println!(
                "  Available: {}",
                style(dossier_ids().join(", ")).cyan()
            );
            println!();
        }
    }

    Ok(())
}

fn print_dossier(d: &Dossier) {
    println!("{}", style(format!(" {} ", d.kind.heading())).bold().reverse());
    println!();
    println!("{}{}", PERSON, style(d.name).bold());
    println!("   {}", style(d.title).dim());
    println!();
    println!("{}", d.bio);
    println!();

    for (label, value) in &d.stats {
        println!(
            "  {} {:<20} {}",
            style("•").cyan(),
            label,
            style(value).green().bold()
        );
    }

    if !d.characters.is_empty() {
        println!();
        println!("{}Characters", FILM);
        for c in &d.characters {
            println!();
            println!(
                "  {} {} ({})",
                style(c.name).cyan().bold(),
                style(c.show).dim(),
                c.years
            );
            println!("    {}", style(c.archetype).magenta());
            println!("    {}", c.description);
            if let Some(awards) = c.awards {
                println!("    {}{}", TROPHY, awards);
            }
        }
    }

    println!();
    println!("{}Timeline", CALENDAR);
    for event in &d.timeline {
        println!(
            "  {}  {:<20} {}",
            style(event.year).blue().bold(),
            event.title,
            style(event.description).dim()
        );
    }

    println!();
    println!("{}Featured Video Clips", FILM);
    for clip in &d.video_clips {
        println!("  ▶ {} {}", clip.title, style(format!("[{}]", clip.duration)).dim());
    }
    println!();
}
