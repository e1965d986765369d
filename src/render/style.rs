//! Visual and physical parameters keyed by node and link type.
//!
//! Every place that needs a radius, colour, charge or link distance reads it
//! from here, both when drawing and when restoring after a highlight.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::graph::NodeType;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub radius: f64,
    pub color: &'static str,
    pub charge: f64,
    pub label_size: u32,
    pub label_weight: u32,
    pub display_name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkStyle {
    pub distance: f64,
    pub stroke_width: f64,
}

pub const LINK_STRENGTH: f64 = 0.2;
pub const COLLISION_PADDING: f64 = 15.0;
pub const ALPHA_DECAY: f64 = 0.02;
pub const VELOCITY_DECAY: f64 = 0.5;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
pub const FOCUS_SCALE: f64 = 1.5;
pub const TRANSITION_MS: u64 = 300;
pub const FOCUS_TRANSITION_MS: u64 = 750;
pub const LINK_OPACITY: f64 = 0.6;
pub const NODE_STROKE_WIDTH: f64 = 2.0;

pub fn node_style(node_type: NodeType) -> NodeStyle {
    let (radius, color, display_name) = match node_type {
        NodeType::Creator => (24.0, "#e91e63", "Creator"),
        NodeType::Show => (20.0, "#9c27b0", "TV Series"),
        NodeType::Actor => (14.0, "#2196f3", "Actor"),
        NodeType::Character => (14.0, "#00bcd4", "Character"),
        NodeType::Crew => (10.0, "#ff9800", "Crew"),
        NodeType::Episode => (11.0, "#673ab7", "Episode"),
        NodeType::Critic => (11.0, "#795548", "Critic"),
        NodeType::Theme => (12.0, "#4caf50", "Theme"),
        NodeType::Concept => (12.0, "#ba68c8", "Story Concept"),
        NodeType::CulturalRef => (10.0, "#607d8b", "Cultural Reference"),
    };
    let (charge, label_size, label_weight) = match node_type {
        NodeType::Creator => (-1000.0, 14, 500),
        NodeType::Show => (-800.0, 13, 500),
        _ => (-600.0, 12, 400),
    };
    NodeStyle {
        radius,
        color,
        charge,
        label_size,
        label_weight,
        display_name,
    }
}

pub fn link_style(link_type: &str) -> LinkStyle {
    match link_type {
        "created" => LinkStyle {
            distance: 100.0,
            stroke_width: 2.5,
        },
        "portrayed" => LinkStyle {
            distance: 120.0,
            stroke_width: 2.0,
        },
        "appears-in" => LinkStyle {
            distance: 140.0,
            stroke_width: 1.5,
        },
        _ => LinkStyle {
            distance: 150.0,
            stroke_width: 1.5,
        },
    }
}

/// Everything the browser needs to lay out and animate the graph
#[derive(Debug, Clone, Serialize)]
pub struct LayoutConfig {
    pub node_styles: BTreeMap<&'static str, NodeStyle>,
    pub link_styles: BTreeMap<&'static str, LinkStyle>,
    pub default_link_style: LinkStyle,
    pub link_strength: f64,
    pub link_opacity: f64,
    pub node_stroke_width: f64,
    pub collision_padding: f64,
    pub alpha_decay: f64,
    pub velocity_decay: f64,
    pub zoom_extent: [f64; 2],
    pub focus_scale: f64,
    pub transition_ms: u64,
    pub focus_transition_ms: u64,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self {
            node_styles: NodeType::ALL
                .iter()
                .map(|t| (t.as_str(), node_style(*t)))
                .collect(),
            link_styles: ["created", "portrayed", "appears-in"]
                .into_iter()
                .map(|t| (t, link_style(t)))
                .collect(),
            default_link_style: link_style(""),
            link_strength: LINK_STRENGTH,
            link_opacity: LINK_OPACITY,
            node_stroke_width: NODE_STROKE_WIDTH,
            collision_padding: COLLISION_PADDING,
            alpha_decay: ALPHA_DECAY,
            velocity_decay: VELOCITY_DECAY,
            zoom_extent: [MIN_ZOOM, MAX_ZOOM],
            focus_scale: FOCUS_SCALE,
            transition_ms: TRANSITION_MS,
            focus_transition_ms: FOCUS_TRANSITION_MS,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
