//! Dossier pages for the handful of entities that have one.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::graph::model::GRAPH_TITLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DossierKind {
    Creator,
    Actor,
}

impl DossierKind {
    pub fn heading(&self) -> &'static str {
        match self {
            DossierKind::Creator => "Creator Dossier",
            DossierKind::Actor => "Actor Dossier",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEvent {
    pub year: u16,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterCard {
    pub name: &'static str,
    pub show: &'static str,
    pub years: &'static str,
    pub image: &'static str,
    pub description: &'static str,
    pub archetype: &'static str,
    pub awards: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoClip {
    pub title: &'static str,
    pub duration: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dossier {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub kind: DossierKind,
    pub hero_image: &'static str,
    pub bio: &'static str,
    pub timeline: Vec<TimelineEvent>,
    /// Label/value pairs in display order
    pub stats: Vec<(&'static str, &'static str)>,
    pub characters: Vec<CharacterCard>,
    pub video_clips: Vec<VideoClip>,
}

fn event(year: u16, title: &'static str, description: &'static str) -> TimelineEvent {
    TimelineEvent {
        year,
        title,
        description,
    }
}

fn clip(title: &'static str, duration: &'static str) -> VideoClip {
    VideoClip { title, duration }
}

fn vince_gilligan() -> Dossier {
    Dossier {
        id: "vince-gilligan",
        name: "Vince Gilligan",
        title: "Creator & Showrunner",
        kind: DossierKind::Creator,
        hero_image: "/images/profiles/vince-gilligan-hero.jpg",
        bio: "Emmy Award-winning creator, writer, and director known for Breaking Bad, Better Call Saul, and Pluribus. Gilligan's work explores moral transformation and the duality of human nature.",
        timeline: vec![
            event(1993, "The X-Files", "Writer/Producer"),
            event(2008, "Breaking Bad", "Creator"),
            event(2015, "Better Call Saul", "Co-Creator"),
            event(2019, "El Camino", "Writer/Director"),
            event(2025, "Pluribus", "Creator"),
        ],
        stats: vec![
            ("Emmy Awards", "10"),
            ("Series Created", "3"),
            ("Episodes Directed", "25+"),
        ],
        characters: Vec::new(),
        video_clips: vec![
            clip("Pluribus Behind the Scenes", "3:24"),
            clip("Breaking Bad Legacy", "8:15"),
            clip("Creating Pluribus", "12:40"),
        ],
    }
}

fn rhea_seehorn() -> Dossier {
    Dossier {
        id: "rhea-seehorn",
        name: "Rhea Seehorn",
        title: "Actor",
        kind: DossierKind::Actor,
        hero_image: "/images/profiles/rhea-seehorn-hero.jpg",
        bio: "Golden Globe-winning actress acclaimed for her nuanced portrayals of complex women. Best known for her transformative performances as Kim Wexler in Better Call Saul (2015-2022) and Carol Sturka in Pluribus (2025-present). Seehorn's work explores the interior lives of women navigating impossible choices, earning critical acclaim and a devoted following.",
        timeline: vec![
            event(2015, "Better Call Saul", "Kim Wexler - Series Regular"),
            event(2019, "TCA Award", "Individual Achievement in Drama"),
            event(2022, "Emmy Nomination", "Outstanding Lead Actress"),
            event(2025, "Pluribus Premiere", "Carol Sturka - Lead Role"),
            event(2026, "Golden Globe Win", "Best Actress - Drama Series"),
        ],
        stats: vec![
            ("Golden Globes", "1"),
            ("Emmy Nominations", "3"),
            ("Years Active", "10+"),
        ],
        characters: vec![
            CharacterCard {
                name: "Carol Sturka",
                show: "Pluribus",
                years: "2025-Present",
                image: "https://via.placeholder.com/400x500/2c3e50/ffffff?text=Carol+Sturka%0APluribus",
                description: "A writer struggling with identity and agency in a post-pandemic world transformed by collective consciousness.",
                archetype: "Unraveled Survivor",
                awards: Some("Golden Globe 2026 - Best Actress"),
            },
            CharacterCard {
                name: "Kim Wexler",
                show: "Better Call Saul",
                years: "2015-2022",
                image: "https://via.placeholder.com/400x500/1a472a/ffffff?text=Kim+Wexler%0ABetter+Call+Saul",
                description: "A morally conflicted attorney whose relationship with Jimmy McGill leads her down an increasingly dark path.",
                archetype: "Stoic Lawyer",
                awards: Some("3 Emmy Nominations"),
            },
        ],
        video_clips: vec![
            clip("Golden Globe Acceptance Speech", "2:45"),
            clip("Creating Carol Sturka", "5:12"),
            clip("Kim Wexler: A Retrospective", "8:30"),
        ],
    }
}

/// Look up the dossier for `id`. The table is closed.
pub fn dossier(id: &str) -> Option<Dossier> {
    match id {
        "vince-gilligan" => Some(vince_gilligan()),
        "rhea-seehorn" => Some(rhea_seehorn()),
        _ => None,
    }
}

pub fn has_dossier(id: &str) -> bool {
    matches!(id, "vince-gilligan" | "rhea-seehorn")
}

pub fn dossier_ids() -> [&'static str; 2] {
    ["vince-gilligan", "rhea-seehorn"]
}

/// What the page swaps in for the graph
#[derive(Debug, Clone, Serialize)]
pub struct RenderedProfile {
    pub id: String,
    pub name: String,
    pub breadcrumb: String,
    pub html: String,
}

/// Tracks which dossier, if any, is on screen
#[derive(Debug, Default)]
pub struct ProfileView {
    current: Mutex<Option<String>>,
    /// Directory behind the `/images` route
    assets: Option<PathBuf>,
}

impl ProfileView {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: impl Into<PathBuf>) -> Self {
        Self {
            current: Mutex::new(None),
            assets: Some(assets.into()),
        }
    }

    /// Whether an image URL will resolve: remote URLs are trusted, site
    /// paths must exist under the assets directory.
    fn has_image(&self, url: &str) -> bool {
        if url.starts_with("http://") || url.starts_with("https://") {
            return true;
        }
        self.assets
            .as_ref()
            .is_some_and(|dir| dir.join(url.trim_start_matches('/')).is_file())
    }

    pub fn current(&self) -> Option<String> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn show(&self, id: &str) -> Option<RenderedProfile> {
        let Some(dossier) = dossier(id) else {
            tracing::warn!("No profile data for: {}", id);
            return None;
        };

        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(dossier.id.to_string());

        Some(RenderedProfile {
            id: dossier.id.to_string(),
            name: dossier.name.to_string(),
            breadcrumb: render_breadcrumb(&dossier),
            html: render_html(&dossier, self.has_image(dossier.hero_image)),
        })
    }

    pub fn hide(&self) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_breadcrumb(dossier: &Dossier) -> String {
    format!(
        r#"<span class="back-to-graph" id="backToGraph">&larr; {}</span><span class="crumb-sep">/</span><span>{}</span>"#,
        escape_html(GRAPH_TITLE),
        escape_html(dossier.name)
    )
}

pub fn render_html(dossier: &Dossier, with_hero: bool) -> String {
    let e = escape_html;
    let mut html = String::new();
    let hero = if with_hero {
        format!(
            "<div class=\"profile-hero\"><img src=\"{}\" alt=\"{}\"></div>\n",
            e(dossier.hero_image),
            e(dossier.name)
        )
    } else {
        String::new()
    };

    // write! into a String cannot fail
    let _ = write!(
        html,
        r#"<div id="profile-view" class="profile-view">
<div class="profile-header"><div class="profile-title-section"><h2 class="profile-type">{}</h2><h3 class="profile-subtitle">{}</h3></div></div>
{}<div class="profile-content">
<div class="profile-bio"><p>{}</p></div>
<div class="profile-stats">"#,
        dossier.kind.heading(),
        e(dossier.title),
        hero,
        e(dossier.bio)
    );

    for (label, value) in &dossier.stats {
        let _ = write!(
            html,
            r#"<div class="stat-item"><div class="stat-label">{}</div><div class="stat-value">{}</div></div>"#,
            e(label),
            e(value)
        );
    }
    html.push_str("</div>\n");

    if !dossier.characters.is_empty() {
        html.push_str(r#"<div class="profile-characters"><h4 class="section-title">Characters</h4><div class="characters-gallery">"#);
        for c in &dossier.characters {
            let awards = c
                .awards
                .map(|a| format!(r#"<div class="character-awards">🏆 {}</div>"#, e(a)))
                .unwrap_or_default();
            let _ = write!(
                html,
                r#"<div class="character-card"><div class="character-image"><img src="{}" alt="{}"></div><div class="character-info"><div class="character-name">{}</div><div class="character-show">{} ({})</div><div class="character-archetype">{}</div><div class="character-description">{}</div>{}</div></div>"#,
                e(c.image),
                e(c.name),
                e(c.name),
                e(c.show),
                e(c.years),
                e(c.archetype),
                e(c.description),
                awards
            );
        }
        html.push_str("</div></div>\n");
    }

    html.push_str(r#"<div class="profile-timeline"><h4 class="section-title">Timeline</h4><div class="timeline-container">"#);
    for ev in &dossier.timeline {
        let _ = write!(
            html,
            r#"<div class="timeline-event"><div class="timeline-year">{}</div><div class="timeline-marker"></div><div class="timeline-content"><div class="timeline-title">{}</div><div class="timeline-description">{}</div></div></div>"#,
            ev.year,
            e(ev.title),
            e(ev.description)
        );
    }
    html.push_str("</div></div>\n");

    html.push_str(r#"<div class="profile-videos"><h4 class="section-title">Featured Video Clips</h4><div class="video-grid">"#);
    for v in &dossier.video_clips {
        let _ = write!(
            html,
            r#"<div class="video-card"><div class="video-thumbnail"><div class="play-icon">▶</div><div class="video-duration">{}</div></div><div class="video-title">{}</div></div>"#,
            e(v.duration),
            e(v.title)
        );
    }
    html.push_str("</div></div>\n</div>\n</div>\n");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_table() {
        assert!(dossier("vince-gilligan").is_some());
        assert!(dossier("rhea-seehorn").is_some());
        assert!(dossier("pluribus").is_none());
        assert!(dossier_ids().iter().all(|id| has_dossier(id)));
    }

    #[test]
    fn test_show_and_hide() {
        let view = ProfileView::new();
        assert!(view.current().is_none());

        let rendered = view.show("vince-gilligan").unwrap();
        assert_eq!(rendered.name, "Vince Gilligan");
        assert!(rendered.html.contains("Creator Dossier"));
        assert!(rendered.html.contains("El Camino"));
        assert!(rendered.breadcrumb.contains("The Gilligan Universe"));
        assert_eq!(view.current().as_deref(), Some("vince-gilligan"));

        view.hide();
        assert!(view.current().is_none());
    }

    #[test]
    fn test_unknown_id_leaves_current_alone() {
        let view = ProfileView::new();
        view.show("rhea-seehorn").unwrap();
        assert!(view.show("breaking-bad").is_none());
        assert_eq!(view.current().as_deref(), Some("rhea-seehorn"));
    }

    #[test]
    fn test_actor_dossier_has_character_gallery() {
        let html = render_html(&dossier("rhea-seehorn").unwrap(), false);
        assert!(html.contains("Actor Dossier"));
        assert!(html.contains("characters-gallery"));
        assert!(html.contains("Unraveled Survivor"));

        let creator = render_html(&dossier("vince-gilligan").unwrap(), false);
        assert!(!creator.contains("characters-gallery"));
    }

    #[test]
    fn test_hero_image_only_when_asset_exists() {
        let dir = tempfile::tempdir().unwrap();
        let view = ProfileView::with_assets(dir.path());
        let html = view.show("vince-gilligan").unwrap().html;
        assert!(!html.contains("profile-hero"));

        let hero = dir.path().join("images/profiles/vince-gilligan-hero.jpg");
        std::fs::create_dir_all(hero.parent().unwrap()).unwrap();
        std::fs::write(&hero, b"jpg").unwrap();
        let html = view.show("vince-gilligan").unwrap().html;
        assert!(html.contains(r#"<img src="/images/profiles/vince-gilligan-hero.jpg""#));

        let bare = ProfileView::new().show("vince-gilligan").unwrap().html;
        assert!(!bare.contains("profile-hero"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        let html = render_html(&dossier("vince-gilligan").unwrap(), false);
        assert!(html.contains("Gilligan&#39;s work"));
        assert!(html.contains("Creator &amp; Showrunner"));
    }
}
