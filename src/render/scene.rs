use serde::Serialize;
use std::collections::HashSet;

use super::style::{
    FOCUS_SCALE, LINK_OPACITY, MAX_ZOOM, MIN_ZOOM, NODE_STROKE_WIDTH, TRANSITION_MS, link_style,
    node_style,
};
use crate::graph::Snapshot;

const HIGHLIGHT_RADIUS_FACTOR: f64 = 1.4;
const FADED_NODE_OPACITY: f64 = 0.15;
const FADED_LABEL_OPACITY: f64 = 0.2;
const FADED_LINK_OPACITY: f64 = 0.05;
const ACTIVE_LINK_OPACITY: f64 = 0.9;
const ACTIVE_LINK_WIDTH: f64 = 2.5;
const FADED_LINK_WIDTH: f64 = 1.5;
const ACTIVE_NODE_STROKE: f64 = 3.0;
const ACTIVE_LABEL_WEIGHT: u32 = 600;
const FADED_LABEL_WEIGHT: u32 = 400;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeVisual {
    pub id: String,
    pub radius: f64,
    pub opacity: f64,
    pub stroke_width: f64,
    pub label_opacity: f64,
    pub label_weight: u32,
}

/// Links are addressed by position because parallel links are allowed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkVisual {
    pub index: usize,
    pub stroke_opacity: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub scale: f64,
    /// Node the view is centred on; `None` is the identity transform
    pub focus: Option<String>,
}

impl Viewport {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            focus: None,
        }
    }

    pub fn zoom_to(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// The state the page should animate to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub nodes: Vec<NodeVisual>,
    pub links: Vec<LinkVisual>,
    pub viewport: Viewport,
    pub transition_ms: u64,
}

struct SceneNode {
    id: String,
    base_radius: f64,
    base_label_weight: u32,
}

struct SceneLink {
    source: String,
    target: String,
    base_width: f64,
}

/// Per-element visual attributes for one snapshot
pub struct Scene {
    nodes: Vec<SceneNode>,
    links: Vec<SceneLink>,
    current: SceneFrame,
}

impl Scene {
    pub fn new(snapshot: &Snapshot) -> Self {
        let nodes = snapshot
            .nodes
            .iter()
            .map(|n| {
                let style = node_style(n.node_type);
                SceneNode {
                    id: n.id.clone(),
                    base_radius: style.radius,
                    base_label_weight: style.label_weight,
                }
            })
            .collect();
        let links = snapshot
            .links
            .iter()
            .map(|l| SceneLink {
                source: l.source.clone(),
                target: l.target.clone(),
                base_width: link_style(&l.link_type).stroke_width,
            })
            .collect();

        let mut scene = Self {
            nodes,
            links,
            current: SceneFrame {
                nodes: Vec::new(),
                links: Vec::new(),
                viewport: Viewport::identity(),
                transition_ms: TRANSITION_MS,
            },
        };
        scene.current = scene.resting_frame();
        scene
    }

    pub fn frame(&self) -> &SceneFrame {
        &self.current
    }

    fn resting_frame(&self) -> SceneFrame {
        SceneFrame {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeVisual {
                    id: n.id.clone(),
                    radius: n.base_radius,
                    opacity: 1.0,
                    stroke_width: NODE_STROKE_WIDTH,
                    label_opacity: 1.0,
                    label_weight: n.base_label_weight,
                })
                .collect(),
            links: self
                .links
                .iter()
                .enumerate()
                .map(|(index, l)| LinkVisual {
                    index,
                    stroke_opacity: LINK_OPACITY,
                    stroke_width: l.base_width,
                })
                .collect(),
            viewport: Viewport::identity(),
            transition_ms: TRANSITION_MS,
        }
    }

    /// Emphasise `ids`, fade everything else, and optionally centre on the first id.
    pub fn highlight(&mut self, ids: &[String], focus: bool) -> SceneFrame {
        let members: HashSet<&str> = ids.iter().map(String::as_str).collect();

        let nodes = self
            .nodes
            .iter()
            .map(|n| {
                let active = members.contains(n.id.as_str());
                NodeVisual {
                    id: n.id.clone(),
                    radius: if active {
                        n.base_radius * HIGHLIGHT_RADIUS_FACTOR
                    } else {
                        n.base_radius
                    },
                    opacity: if active { 1.0 } else { FADED_NODE_OPACITY },
                    stroke_width: if active {
                        ACTIVE_NODE_STROKE
                    } else {
                        NODE_STROKE_WIDTH
                    },
                    label_opacity: if active { 1.0 } else { FADED_LABEL_OPACITY },
                    label_weight: if active {
                        ACTIVE_LABEL_WEIGHT
                    } else {
                        FADED_LABEL_WEIGHT
                    },
                }
            })
            .collect();

        let links = self
            .links
            .iter()
            .enumerate()
            .map(|(index, l)| {
                let active = members.contains(l.source.as_str()) && members.contains(l.target.as_str());
                LinkVisual {
                    index,
                    stroke_opacity: if active {
                        ACTIVE_LINK_OPACITY
                    } else {
                        FADED_LINK_OPACITY
                    },
                    stroke_width: if active {
                        ACTIVE_LINK_WIDTH
                    } else {
                        FADED_LINK_WIDTH
                    },
                }
            })
            .collect();

        let mut viewport = self.current.viewport.clone();
        if focus
            && let Some(first) = ids.first()
            && self.nodes.iter().any(|n| &n.id == first)
        {
            viewport.focus = Some(first.clone());
            viewport.zoom_to(FOCUS_SCALE);
        }

        self.current = SceneFrame {
            nodes,
            links,
            viewport,
            transition_ms: TRANSITION_MS,
        };
        self.current.clone()
    }

    /// Return every element to its resting attributes and the identity view
    pub fn reset(&mut self) -> SceneFrame {
        self.current = self.resting_frame();
        self.current.clone()
    }
}
