use anyhow::Result;
use console::{Emoji, style};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::load_context;
use crate::chat::{ChatMessage, ChatPanel, Role, SUGGESTIONS};
use crate::query::RelatedLink;
use crate::render::HighlightSink;

static ROBOT: Emoji<'_, '_> = Emoji("🤖 ", "> ");
static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "* ");
static BULB: Emoji<'_, '_> = Emoji("💡 ", "");

/// Prints highlight requests instead of animating a graph
struct TerminalHighlighter;

impl HighlightSink for TerminalHighlighter {
    fn highlight(&self, ids: &[String], focus: bool) {
        let Some((first, rest)) = ids.split_first() else {
            return;
        };
        if focus {
            println!(
                "{}{} {}",
                TARGET,
                style(first).yellow().bold(),
                style(rest.join(", ")).yellow()
            );
        } else {
            println!("{}{}", TARGET, style(ids.join(", ")).yellow());
        }
    }
}

enum Input<'a> {
    Quit,
    History,
    Link(usize),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        ":quit" | ":q" | ":exit" => Input::Quit,
        ":history" => Input::History,
        _ => match line.strip_prefix(':').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => Input::Link(n),
            None => Input::Question(line),
        },
    }
}

fn print_reply(message: &ChatMessage) {
    println!("{}{}", ROBOT, message.text);
    for (i, link) in message.related_links.iter().enumerate() {
        println!(
            "   {} {} {}",
            style(format!(":{}", i + 1)).dim(),
            style(&link.label).cyan(),
            style(format!("({})", link.link_type)).dim()
        );
    }
}

pub async fn run(data: Option<PathBuf>) -> Result<()> {
    println!();
    println!("{}", style(" Gilligan Universe - Chat ").bold().reverse());
    println!();

    let ctx = load_context(data)?;
    let panel = ChatPanel::new(ctx, std::sync::Arc::new(TerminalHighlighter));

    println!("{}Try asking:", BULB);
    for question in SUGGESTIONS {
        println!("  {} {}", style("•").cyan(), question);
    }
    println!();
    println!(
        "  Type {} to follow a related link, {} to review, {} to leave",
        style(":N").yellow(),
        style(":history").yellow(),
        style(":quit").yellow()
    );
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_links: Vec<RelatedLink> = Vec::new();

    loop {
        print!("{} ", style("you ›").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::History => {
                for message in panel.transcript() {
                    match message.role {
                        Role::User => println!("{} {}", style("you ›").green(), message.text),
                        Role::Assistant => println!("{}{}", ROBOT, message.text),
                    }
                }
            }
            Input::Link(n) => match n.checked_sub(1).and_then(|i| last_links.get(i)) {
                Some(link) => {
                    if let Some(message) = panel.click_entity_link(&link.label) {
                        print_reply(&message);
                    } else {
                        println!("{}", style(format!("{} is not in the graph", link.label)).dim());
                    }
                }
                None => println!("{}", style("No such related link").dim()),
            },
            Input::Question(text) => {
                if let Some(reply) = panel.send(text).await {
                    print_reply(&reply);
                    last_links = reply.related_links;
                }
            }
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert!(matches!(parse_input(":quit"), Input::Quit));
        assert!(matches!(parse_input(":history"), Input::History));
        assert!(matches!(parse_input(" :2 "), Input::Link(2)));
        assert!(matches!(parse_input("who shot it"), Input::Question("who shot it")));
        assert!(matches!(parse_input(":nope"), Input::Question(":nope")));
    }
}
