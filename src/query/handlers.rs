use super::{QueryHandler, QueryResponse, RelatedLink};
use crate::graph::{Node, NodeType};

const CINEMATOGRAPHER_ID: &str = "marshall-adams";

fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

impl QueryHandler {
    pub fn handle_creator_works(&self, creator_id: &str) -> QueryResponse {
        let shows = self
            .snapshot
            .targets_of(creator_id, &["created", "co-created"]);
        let show_names = shows
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut related_links = vec![RelatedLink::new("creator", "Vince Gilligan")];
        related_links.extend(shows.iter().map(|s| RelatedLink::new("show", s.name.clone())));

        let mut highlight_nodes = vec![creator_id.to_string()];
        highlight_nodes.extend(ids(&shows));

        QueryResponse {
            response: format!(
                "Vince Gilligan has created {} major shows: {}. His work spans from The X-Files to the interconnected universe of Breaking Bad, Better Call Saul, and now Pluribus.",
                shows.len(),
                show_names
            ),
            related_links,
            highlight_nodes,
        }
    }

    pub fn handle_cinematographer(&self) -> QueryResponse {
        if self.snapshot.node(CINEMATOGRAPHER_ID).is_none() {
            return self.handle_generic();
        }

        let shows = self
            .snapshot
            .targets_of(CINEMATOGRAPHER_ID, &["cinematography"]);

        let mut related_links = vec![RelatedLink::new("crew", "Marshall Adams")];
        related_links.extend(shows.iter().map(|s| RelatedLink::new("show", s.name.clone())));

        let mut highlight_nodes = vec![CINEMATOGRAPHER_ID.to_string()];
        highlight_nodes.extend(ids(&shows));

        QueryResponse {
            response: "Marshall Adams is the cinematographer for both Better Call Saul and Pluribus. His signature \"Albuquerque Noir\" lighting style creates the distinctive visual atmosphere you're noticing.".to_string(),
            related_links,
            highlight_nodes,
        }
    }

    pub fn handle_actor_characters(&self, actor_id: &str) -> QueryResponse {
        let Some(actor) = self.snapshot.node(actor_id) else {
            return self.handle_generic();
        };
        if actor.id != "rhea-seehorn" {
            return self.handle_generic();
        }

        let characters = self.snapshot.targets_of(actor_id, &["portrayed"]);
        let mut highlight_nodes = vec![actor_id.to_string()];
        highlight_nodes.extend(ids(&characters));

        QueryResponse {
            response: "Rhea Seehorn has portrayed two iconic characters: Kim Wexler in Better Call Saul (the \"Stoic Lawyer\") and Carol Sturka in Pluribus (the \"Unraveled Survivor\"). She won a Golden Globe for her performance in Pluribus.".to_string(),
            related_links: vec![
                RelatedLink::new("actor", "Rhea Seehorn"),
                RelatedLink::new("character", "Kim Wexler"),
                RelatedLink::new("character", "Carol Sturka"),
            ],
            highlight_nodes,
        }
    }

    pub fn handle_show_connections(&self, first: &str, second: &str) -> QueryResponse {
        let first_neighbours = self.snapshot.connected_ids(first);
        let second_neighbours = self.snapshot.connected_ids(second);

        let shared: Vec<String> = first_neighbours
            .into_iter()
            .filter(|id| second_neighbours.contains(id))
            .collect();
        let entities: Vec<&Node> = shared
            .iter()
            .filter_map(|id| self.snapshot.node(id))
            .collect();
        let entity_names = entities
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut highlight_nodes = vec![first.to_string(), second.to_string()];
        highlight_nodes.extend(shared);

        QueryResponse {
            response: format!(
                "Pluribus and Better Call Saul share several key connections: {}. Most notably, Rhea Seehorn stars in both shows, and they share creative team members like Peter Gould and cinematographer Marshall Adams.",
                entity_names
            ),
            related_links: entities
                .iter()
                .take(4)
                .map(|e| RelatedLink::new(e.node_type.as_str(), e.name.clone()))
                .collect(),
            highlight_nodes,
        }
    }

    pub fn handle_hive_mind(&self) -> QueryResponse {
        QueryResponse {
            response: "The \"Hive\" in Pluribus refers to a collective consciousness created by The Pluribus Virus - a sentient AI that inhabits multiple human bodies simultaneously. It's a central theme exploring what happens when individual identity merges with group consciousness.".to_string(),
            related_links: vec![
                RelatedLink::new("concept", "The Pluribus Virus"),
                RelatedLink::new("concept", "The Hive Mind"),
                RelatedLink::new("theme", "Collective Consciousness"),
            ],
            highlight_nodes: vec![
                "the-pluribus-virus".to_string(),
                "the-hive-mind".to_string(),
                "collective-consciousness".to_string(),
            ],
        }
    }

    pub fn handle_themes(&self) -> QueryResponse {
        let themes: Vec<&Node> = self.snapshot.nodes_of_type(NodeType::Theme).collect();

        QueryResponse {
            response: "The Gilligan universe explores several interconnected themes: Transformation (Breaking Bad, Better Call Saul) and Collective Consciousness (Pluribus). These themes examine how people change and what happens to individual identity under external pressures.".to_string(),
            related_links: themes
                .iter()
                .map(|t| RelatedLink::new("theme", t.name.clone()))
                .collect(),
            highlight_nodes: ids(&themes),
        }
    }

    pub fn handle_generic(&self) -> QueryResponse {
        QueryResponse {
            response: "I'm exploring the Vince Gilligan universe knowledge graph. Try asking about connections between shows, what Vince Gilligan has created, or specific themes like the hive mind in Pluribus.".to_string(),
            related_links: vec![
                RelatedLink::new("entity", "Vince Gilligan"),
                RelatedLink::new("show", "Pluribus"),
                RelatedLink::new("show", "Breaking Bad"),
            ],
            highlight_nodes: vec![
                "vince-gilligan".to_string(),
                "pluribus".to_string(),
                "breaking-bad".to_string(),
            ],
        }
    }
}
