use std::collections::{BTreeMap, HashMap};
use std::f32::consts::PI;

use crate::config::LayoutConfig;
use crate::ir::{GraphNode, MindMap, Position, Viewport};

/// One layout invocation. The id and parent indexes are built once up front
/// instead of re-scanning the node list per lookup, and the memo is owned by
/// the pass so nothing leaks across maps or sessions.
struct RadialPass<'a> {
    parent_of: HashMap<&'a str, &'a GraphNode>,
    positions: BTreeMap<String, Position>,
    evaluations: HashMap<String, u32>,
    viewport: Viewport,
    config: &'a LayoutConfig,
}

impl<'a> RadialPass<'a> {
    fn new(map: &'a MindMap, viewport: Viewport, config: &'a LayoutConfig) -> Self {
        let by_id = map.by_id();
        let mut parent_of: HashMap<&str, &GraphNode> = HashMap::new();
        for node in &map.nodes {
            for child_id in &node.child_ids {
                // Child references to absent nodes are dropped here; the
                // nodes they point at do not exist to place.
                if by_id.contains_key(child_id.as_str()) {
                    parent_of.entry(child_id.as_str()).or_insert(node);
                }
            }
        }
        Self {
            parent_of,
            positions: BTreeMap::new(),
            evaluations: HashMap::new(),
            viewport,
            config,
        }
    }

    fn position_of(&mut self, node: &GraphNode) -> Position {
        if let Some(cached) = self.positions.get(&node.id) {
            return *cached;
        }
        *self.evaluations.entry(node.id.clone()).or_insert(0) += 1;

        let position = if node.level == 0 {
            self.root_anchor()
        } else {
            self.placed_around_parent(node)
        };
        self.positions.insert(node.id.clone(), position);
        position
    }

    /// Horizontally centered, vertically at one third of the viewport so deep
    /// trees keep growth room below the root.
    fn root_anchor(&self) -> Position {
        Position::new(
            self.viewport.width / 2.0,
            (self.viewport.height / self.config.root_height_divisor).floor(),
        )
    }

    fn placed_around_parent(&mut self, node: &GraphNode) -> Position {
        let Some(parent) = self.parent_of.get(node.id.as_str()).copied() else {
            // Violates the builder's connectedness guarantee; recover rather
            // than failing the whole layout.
            log::warn!("node {:?} has no parent in the graph; placing at origin", node.id);
            return Position::ORIGIN;
        };
        let parent_position = self.position_of(parent);

        let siblings = &parent.child_ids;
        let index = siblings
            .iter()
            .position(|id| id == &node.id)
            .unwrap_or(0);
        let angle_step = PI / (siblings.len().saturating_sub(1)).max(1) as f32;
        let base_angle = -PI / 2.0;
        let angle = base_angle + angle_step * index as f32;
        let radius = self.config.radius_base * (node.level as f32).sqrt();

        Position::new(
            parent_position.x + radius * angle.cos(),
            parent_position.y + radius * angle.sin(),
        )
    }

    fn run(mut self, map: &MindMap) -> (BTreeMap<String, Position>, HashMap<String, u32>) {
        for node in &map.nodes {
            self.position_of(node);
        }
        (self.positions, self.evaluations)
    }
}

/// Positions every node of `map` relative to the root anchor. Pure in
/// `(map, viewport, config)`: identical inputs give bit-identical output.
pub fn compute_layout(
    map: &MindMap,
    viewport: Viewport,
    config: &LayoutConfig,
) -> BTreeMap<String, Position> {
    RadialPass::new(map, viewport, config).run(map).0
}

#[cfg(test)]
fn compute_layout_counting(
    map: &MindMap,
    viewport: Viewport,
    config: &LayoutConfig,
) -> (BTreeMap<String, Position>, HashMap<String, u32>) {
    RadialPass::new(map, viewport, config).run(map)
}
