use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const GRAPH_TITLE: &str = "The Gilligan Universe";
pub const GRAPH_DESCRIPTION: &str = "Vince Gilligan's creative universe spanning Pluribus, Breaking Bad, and Better Call Saul";

/// Closed vocabulary of entity kinds drawn in the graph.
///
/// Unknown strings read from a snapshot collapse to [`NodeType::Concept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum NodeType {
    Creator,
    Show,
    Actor,
    Character,
    Crew,
    Episode,
    Critic,
    Theme,
    Concept,
    CulturalRef,
}

impl NodeType {
    pub const ALL: [NodeType; 10] = [
        NodeType::Creator,
        NodeType::Show,
        NodeType::Actor,
        NodeType::Character,
        NodeType::Crew,
        NodeType::Episode,
        NodeType::Critic,
        NodeType::Theme,
        NodeType::Concept,
        NodeType::CulturalRef,
    ];

    pub fn parse(value: &str) -> Self {
        match value {
            "creator" => NodeType::Creator,
            "show" => NodeType::Show,
            "actor" => NodeType::Actor,
            "character" => NodeType::Character,
            "crew" => NodeType::Crew,
            "episode" => NodeType::Episode,
            "critic" => NodeType::Critic,
            "theme" => NodeType::Theme,
            "cultural_ref" => NodeType::CulturalRef,
            _ => NodeType::Concept,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Creator => "creator",
            NodeType::Show => "show",
            NodeType::Actor => "actor",
            NodeType::Character => "character",
            NodeType::Crew => "crew",
            NodeType::Episode => "episode",
            NodeType::Critic => "critic",
            NodeType::Theme => "theme",
            NodeType::Concept => "concept",
            NodeType::CulturalRef => "cultural_ref",
        }
    }
}

impl From<String> for NodeType {
    fn from(value: String) -> Self {
        NodeType::parse(&value)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entity in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A directed, typed relationship between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default = "default_link_type")]
    pub link_type: String,
    #[serde(default)]
    pub description: String,
}

fn default_link_type() -> String {
    "related".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub title: String,
    pub description: String,
    pub entity_count: usize,
    pub relationship_count: usize,
    pub last_updated: NaiveDate,
}

/// The complete graph document persisted as a single JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Snapshot {
    /// Build a snapshot whose counts always agree with its contents
    pub fn new(nodes: Vec<Node>, links: Vec<Link>, last_updated: NaiveDate) -> Self {
        Self {
            metadata: SnapshotMetadata {
                title: GRAPH_TITLE.to_string(),
                description: GRAPH_DESCRIPTION.to_string(),
                entity_count: nodes.len(),
                relationship_count: links.len(),
                last_updated,
            },
            nodes,
            links,
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes reached from `source` over links whose type is one of `link_types`.
    ///
    /// Link order is preserved and dangling targets are dropped.
    pub fn targets_of<'a>(&'a self, source: &str, link_types: &[&str]) -> Vec<&'a Node> {
        self.links
            .iter()
            .filter(|l| l.source == source && link_types.contains(&l.link_type.as_str()))
            .filter_map(|l| self.node(&l.target))
            .collect()
    }

    /// Ids of every node one hop away from `id` in either direction, in link order.
    pub fn connected_ids(&self, id: &str) -> Vec<String> {
        let mut connected: Vec<String> = Vec::new();
        for link in &self.links {
            let other = if link.source == id {
                &link.target
            } else if link.target == id {
                &link.source
            } else {
                continue;
            };
            if !connected.iter().any(|c| c == other) {
                connected.push(other.clone());
            }
        }
        connected
    }

    /// Resolve a display label to a node: exact name, then case-insensitive
    /// name, then slugified label as an id.
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        let label = label.trim();
        if let Some(node) = self.nodes.iter().find(|n| n.name == label) {
            return Some(node);
        }
        let lowered = label.to_lowercase();
        if let Some(node) = self.nodes.iter().find(|n| n.name.to_lowercase() == lowered) {
            return Some(node);
        }
        let slug = slugify(label);
        self.nodes.iter().find(|n| n.id == slug)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }
}

/// Lowercase a name and collapse whitespace runs into single hyphens
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn node(id: &str, name: &str, node_type: NodeType) -> Node {
        Node {
            id: id.to_string(),
            name: name.to_string(),
            node_type,
            description: format!("{} description", name),
            metadata: Map::new(),
        }
    }

    pub fn link(source: &str, target: &str, link_type: &str) -> Link {
        Link {
            source: source.to_string(),
            target: target.to_string(),
            link_type: link_type.to_string(),
            description: String::new(),
        }
    }

    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    /// A trimmed-down universe covering every canned question
    pub fn universe() -> Snapshot {
        let nodes = vec![
            node("vince-gilligan", "Vince Gilligan", NodeType::Creator),
            node("pluribus", "Pluribus", NodeType::Show),
            node("breaking-bad", "Breaking Bad", NodeType::Show),
            node("better-call-saul", "Better Call Saul", NodeType::Show),
            node("rhea-seehorn", "Rhea Seehorn", NodeType::Actor),
            node("kim-wexler", "Kim Wexler", NodeType::Character),
            node("carol-sturka", "Carol Sturka", NodeType::Character),
            node("marshall-adams", "Marshall Adams", NodeType::Crew),
            node("peter-gould", "Peter Gould", NodeType::Creator),
            node("the-hive-mind", "The Hive Mind", NodeType::Concept),
            node("transformation", "Transformation", NodeType::Theme),
            node("collective-consciousness", "Collective Consciousness", NodeType::Theme),
        ];
        let links = vec![
            link("vince-gilligan", "breaking-bad", "created"),
            link("vince-gilligan", "better-call-saul", "co-created"),
            link("vince-gilligan", "pluribus", "created"),
            link("peter-gould", "better-call-saul", "co-created"),
            link("peter-gould", "pluribus", "produced"),
            link("rhea-seehorn", "kim-wexler", "portrayed"),
            link("rhea-seehorn", "carol-sturka", "portrayed"),
            link("kim-wexler", "better-call-saul", "appears-in"),
            link("carol-sturka", "pluribus", "appears-in"),
            link("rhea-seehorn", "better-call-saul", "stars-in"),
            link("rhea-seehorn", "pluribus", "stars-in"),
            link("marshall-adams", "better-call-saul", "cinematography"),
            link("marshall-adams", "pluribus", "cinematography"),
            link("pluribus", "the-hive-mind", "explores"),
            link("pluribus", "collective-consciousness", "explores"),
            link("breaking-bad", "transformation", "explores"),
        ];
        Snapshot::new(nodes, links, date())
    }
}
