//! Reshapes vendor entity records into graph nodes and links.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::graph::{Link, Node, NodeType, slugify};

/// An entity record as returned by the remote API.
///
/// Fields of the wrong shape are read as absent instead of failing the
/// record; numeric ids and names are kept as their decimal text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntity {
    #[serde(default, deserialize_with = "loose_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "loose_string")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "loose_object")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "loose_relationships")]
    pub relationships: Option<Vec<RawRelationship>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRelationship {
    #[serde(default, deserialize_with = "loose_target")]
    pub target: Option<RawTarget>,
    #[serde(rename = "targetId", default, deserialize_with = "loose_string")]
    pub target_id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "loose_string")]
    pub relation_type: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub description: Option<String>,
}

/// Relationship targets arrive either as a bare id or as an embedded object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTarget {
    Id(String),
    Entity {
        #[serde(default, deserialize_with = "loose_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "loose_string")]
        name: Option<String>,
    },
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_string(Value::deserialize(deserializer)?))
}

fn loose_object<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Map<String, Value>>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(Some(map)),
        _ => Ok(None),
    }
}

fn loose_target<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RawTarget>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => serde_json::from_value(Value::Object(map)).ok(),
        other => value_to_string(other).map(RawTarget::Id),
    })
}

fn loose_relationships<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<RawRelationship>>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let relationships = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(rel) => Some(rel),
            Err(e) => {
                tracing::warn!("Skipping malformed relationship: {}", e);
                None
            }
        })
        .collect();
    Ok(Some(relationships))
}

impl RawEntity {
    /// Read one record from a page, degrading anything that is not an
    /// object into an empty record so the page keeps its length.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(entity) => entity,
            Err(e) => {
                tracing::warn!("Malformed entity record: {}", e);
                Self::default()
            }
        }
    }
}

impl RawRelationship {
    fn resolved_target_id(&self) -> Option<&str> {
        let embedded = match &self.target {
            Some(RawTarget::Entity { id: Some(id), .. }) => Some(id.as_str()),
            _ => None,
        };
        let bare = match &self.target {
            Some(RawTarget::Id(id)) => Some(id.as_str()),
            _ => None,
        };
        embedded
            .or(self.target_id.as_deref())
            .or(bare)
            .filter(|id| !id.is_empty())
    }

    fn target_name(&self) -> Option<&str> {
        match &self.target {
            Some(RawTarget::Entity { name: Some(name), .. }) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Map a vendor entity type onto the internal vocabulary
pub fn map_vendor_type(vendor_type: &str) -> NodeType {
    match vendor_type {
        "creator" | "producer" | "writer" | "director" => NodeType::Creator,
        "show" | "tv-series" | "film" => NodeType::Show,
        "actor" => NodeType::Actor,
        "character" => NodeType::Character,
        "crew" | "cinematographer" => NodeType::Crew,
        "episode" => NodeType::Episode,
        "critic" | "journalist" => NodeType::Critic,
        "theme" => NodeType::Theme,
        "concept" => NodeType::Concept,
        "cultural-reference" | "film-reference" | "tv-reference" | "book-reference" => {
            NodeType::CulturalRef
        }
        _ => NodeType::Concept,
    }
}

fn search_text(entity: &RawEntity) -> String {
    let shows = entity
        .metadata
        .as_ref()
        .and_then(|m| m.get("shows"))
        .and_then(Value::as_array)
        .map(|shows| {
            shows
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    format!(
        "{} {} {}",
        entity.name.as_deref().unwrap_or(""),
        entity.description.as_deref().unwrap_or(""),
        shows
    )
    .to_lowercase()
}

/// Keep records whose name, description or show list mentions any keyword
pub fn filter_relevant(entities: Vec<RawEntity>, keywords: &[String]) -> Vec<RawEntity> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    entities
        .into_iter()
        .filter(|entity| {
            let text = search_text(entity);
            keywords.iter().any(|k| text.contains(k.as_str()))
        })
        .collect()
}

/// Convert filtered records into nodes and flattened links.
///
/// Identifiers come from the record id or the slugified name; the first
/// record seen for an identifier wins and later duplicates are dropped
/// together with their relationships.
pub fn transform(entities: &[RawEntity]) -> (Vec<Node>, Vec<Link>) {
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for entity in entities {
        let name = entity.name.clone().unwrap_or_default();
        let node_id = match entity.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None if !name.trim().is_empty() => slugify(&name),
            None => {
                tracing::warn!("Skipping entity with neither id nor name");
                continue;
            }
        };

        if !seen.insert(node_id.clone()) {
            tracing::debug!("Duplicate entity {} ignored", node_id);
            continue;
        }

        let description = entity
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("{} in the Gilligan universe", name));

        nodes.push(Node {
            id: node_id.clone(),
            name: name.clone(),
            node_type: entity
                .entity_type
                .as_deref()
                .map(map_vendor_type)
                .unwrap_or(NodeType::Concept),
            description,
            metadata: entity.metadata.clone().unwrap_or_default(),
        });

        for rel in entity.relationships.iter().flatten() {
            let Some(target_id) = rel.resolved_target_id() else {
                continue;
            };
            let link_type = rel
                .relation_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "related".to_string());
            let description = rel
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "{} {} {}",
                        name,
                        rel.relation_type
                            .as_deref()
                            .filter(|t| !t.is_empty())
                            .unwrap_or("related to"),
                        rel.target_name().unwrap_or(target_id)
                    )
                });
            links.push(Link {
                source: node_id.clone(),
                target: target_id.to_string(),
                link_type,
                description,
            });
        }
    }

    (nodes, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::DEFAULT_KEYWORDS;
    use serde_json::json;

    fn keywords() -> Vec<String> {
        DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
    }

    fn entity(value: Value) -> RawEntity {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_director_maps_to_creator() {
        assert_eq!(map_vendor_type("director"), NodeType::Creator);
        assert_eq!(map_vendor_type("tv-series"), NodeType::Show);
        assert_eq!(map_vendor_type("book-reference"), NodeType::CulturalRef);
    }

    #[test]
    fn test_unknown_vendor_type_maps_to_concept() {
        assert_eq!(map_vendor_type("spaceship"), NodeType::Concept);
        let (nodes, _) = transform(&[entity(json!({"name": "Thing", "type": "gadget"}))]);
        assert_eq!(nodes[0].node_type, NodeType::Concept);
    }

    #[test]
    fn test_keyword_in_description_is_kept() {
        let kept = filter_relevant(
            vec![
                entity(json!({"name": "Carol", "description": "Lead of PLURIBUS"})),
                entity(json!({"name": "Unrelated", "description": "A cooking show"})),
            ],
            &keywords(),
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name.as_deref(), Some("Carol"));
    }

    #[test]
    fn test_keyword_in_metadata_shows_is_kept() {
        let kept = filter_relevant(
            vec![entity(json!({
                "name": "Giancarlo Esposito",
                "metadata": {"shows": ["Breaking Bad", "The Boys"]}
            }))],
            &keywords(),
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_dedup_first_record_wins() {
        let (nodes, links) = transform(&[
            entity(json!({
                "id": "pluribus",
                "name": "Pluribus",
                "type": "tv-series",
                "relationships": [{"targetId": "vince-gilligan", "type": "created-by"}]
            })),
            entity(json!({
                "id": "pluribus",
                "name": "Pluribus (duplicate)",
                "type": "film",
                "relationships": [{"targetId": "someone"}]
            })),
        ]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "Pluribus");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "vince-gilligan");
    }

    #[test]
    fn test_dedup_by_slug_when_id_missing() {
        let (nodes, _) = transform(&[
            entity(json!({"name": "Kim Wexler", "description": "first"})),
            entity(json!({"id": "kim-wexler", "name": "Kim", "description": "second"})),
        ]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "kim-wexler");
        assert_eq!(nodes[0].description, "first");
    }

    #[test]
    fn test_default_description() {
        let (nodes, _) = transform(&[entity(json!({"name": "Hank Schrader"}))]);
        assert_eq!(nodes[0].description, "Hank Schrader in the Gilligan universe");
        assert!(nodes[0].metadata.is_empty());
    }

    #[test]
    fn test_relationship_target_resolution_and_defaults() {
        let (_, links) = transform(&[entity(json!({
            "id": "vince-gilligan",
            "name": "Vince Gilligan",
            "relationships": [
                {"target": {"id": "pluribus", "name": "Pluribus"}, "type": "created"},
                {"targetId": "breaking-bad"},
                {"target": "el-camino", "description": "Wrote and directed"},
                {"type": "orphan"}
            ]
        }))]);

        assert_eq!(links.len(), 3);
        assert_eq!(links[0].target, "pluribus");
        assert_eq!(links[0].description, "Vince Gilligan created Pluribus");
        assert_eq!(links[1].link_type, "related");
        assert_eq!(
            links[1].description,
            "Vince Gilligan related to breaking-bad"
        );
        assert_eq!(links[2].target, "el-camino");
        assert_eq!(links[2].description, "Wrote and directed");
    }

    #[test]
    fn test_empty_relationship_strings_fall_back_to_defaults() {
        let (_, links) = transform(&[entity(json!({
            "id": "vince-gilligan",
            "name": "Vince Gilligan",
            "relationships": [{"targetId": "pluribus", "type": "", "description": ""}]
        }))]);
        assert_eq!(links[0].link_type, "related");
        assert_eq!(links[0].description, "Vince Gilligan related to pluribus");
    }

    #[test]
    fn test_loosely_typed_fields_are_tolerated() {
        let parsed = entity(json!({
            "id": 42,
            "name": "Episode 42",
            "type": ["episode"],
            "metadata": "none",
            "relationships": [
                {"targetId": 7, "type": "aired-on"},
                "garbage",
                {"target": {"id": "pluribus", "name": 3}}
            ]
        }));
        assert_eq!(parsed.id.as_deref(), Some("42"));
        assert!(parsed.entity_type.is_none());
        assert!(parsed.metadata.is_none());

        let (nodes, links) = transform(&[parsed]);
        assert_eq!(nodes[0].id, "42");
        assert_eq!(nodes[0].node_type, NodeType::Concept);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].target, "7");
        assert_eq!(links[1].description, "Episode 42 related to 3");
    }

    #[test]
    fn test_non_object_record_becomes_empty() {
        let record = RawEntity::from_value(json!("not a record"));
        assert!(record.id.is_none() && record.name.is_none());
        let (nodes, _) = transform(&[record]);
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_entity_without_id_or_name_skipped() {
        let (nodes, _) = transform(&[entity(json!({"description": "mystery"}))]);
        assert!(nodes.is_empty());
    }
}
