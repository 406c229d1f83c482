use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw nested node as returned by (or synthesized in place of) the
/// generation call. Children are owned, so the structure is acyclic by
/// construction; it only lives for the duration of one normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub children: Vec<ConceptNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub level: usize,
    #[serde(default)]
    pub child_ids: Vec<String>,
    #[serde(default)]
    pub parent_connection_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub strength: f32,
}

/// Normalized flat graph. Node order is pre-order traversal order; the
/// topology is immutable once built (viewers mutate their own state, never
/// the map).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MindMap {
    pub title: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

impl MindMap {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.level == 0)
    }

    pub fn by_id(&self) -> HashMap<&str, &GraphNode> {
        self.nodes
            .iter()
            .map(|node| (node.id.as_str(), node))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
