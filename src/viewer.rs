use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ViewerConfig;
use crate::ir::{MindMap, Position};

/// Session-scoped interaction state layered over an immutable `MindMap`.
/// Every transition is a synchronous, immediate state replacement; the graph
/// topology is never touched.
#[derive(Debug, Clone)]
pub struct ViewerState {
    zoom: f32,
    pan: Position,
    drag_anchor: Option<Position>,
    selected_node: Option<String>,
    saved_nodes: BTreeSet<String>,
    notes: BTreeMap<String, String>,
    exam_mode: bool,
    config: ViewerConfig,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            zoom: 1.0,
            pan: Position::ORIGIN,
            drag_anchor: None,
            selected_node: None,
            saved_nodes: BTreeSet::new(),
            notes: BTreeMap::new(),
            exam_mode: false,
            config: config.clone(),
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Position {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_nodes.contains(id)
    }

    pub fn note(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    pub fn exam_mode(&self) -> bool {
        self.exam_mode
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + self.config.zoom_step).min(self.config.zoom_max);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - self.config.zoom_step).max(self.config.zoom_min);
    }

    pub fn reset_view(&mut self) {
        self.zoom = 1.0;
        self.pan = Position::ORIGIN;
    }

    pub fn begin_pan(&mut self, pointer: Position) {
        self.drag_anchor = Some(Position::new(
            pointer.x - self.pan.x,
            pointer.y - self.pan.y,
        ));
    }

    /// No momentum: the pan tracks the pointer exactly while dragging.
    pub fn update_pan(&mut self, pointer: Position) {
        if let Some(anchor) = self.drag_anchor {
            self.pan = Position::new(pointer.x - anchor.x, pointer.y - anchor.y);
        }
    }

    pub fn end_pan(&mut self) {
        self.drag_anchor = None;
    }

    /// Selecting the already-selected node deselects it.
    pub fn select_node(&mut self, id: &str) {
        if self.selected_node.as_deref() == Some(id) {
            self.selected_node = None;
        } else {
            self.selected_node = Some(id.to_string());
        }
    }

    pub fn toggle_saved(&mut self, id: &str) {
        if !self.saved_nodes.remove(id) {
            self.saved_nodes.insert(id.to_string());
        }
    }

    pub fn set_note(&mut self, id: &str, text: &str) {
        self.notes.insert(id.to_string(), text.to_string());
    }

    /// Display-only flag gating saved-node highlighting and the notes
    /// editor; topology and layout are unaffected.
    pub fn toggle_exam_mode(&mut self) {
        self.exam_mode = !self.exam_mode;
    }
}

/// Render-ready view model: everything the drawing surface needs, nothing it
/// has to compute.
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub title: String,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub level: usize,
    pub position: Position,
    pub selected: bool,
    pub saved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneEdge {
    pub from: Position,
    pub to: Position,
    pub strength: f32,
}

pub fn build_scene(
    map: &MindMap,
    positions: &BTreeMap<String, Position>,
    state: &ViewerState,
) -> Scene {
    let nodes = map
        .nodes
        .iter()
        .filter_map(|node| {
            let position = positions.get(&node.id)?;
            Some(SceneNode {
                id: node.id.clone(),
                label: node.label.clone(),
                level: node.level,
                position: *position,
                selected: state.selected_node() == Some(node.id.as_str()),
                saved: state.is_saved(&node.id),
            })
        })
        .collect();
    let edges = map
        .edges
        .iter()
        .filter_map(|edge| {
            Some(SceneEdge {
                from: *positions.get(&edge.from)?,
                to: *positions.get(&edge.to)?,
                strength: edge.strength,
            })
        })
        .collect();
    Scene {
        title: map.title.clone(),
        nodes,
        edges,
    }
}

/// Snapshot of the user-curated viewer fields, keyed by map title. Where it
/// is stored is the surrounding application's business; this only fixes the
/// serializable shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyProgress {
    pub mind_map_id: String,
    pub saved_nodes: Vec<String>,
    pub study_notes: BTreeMap<String, String>,
}

impl StudyProgress {
    pub fn capture(title: &str, state: &ViewerState) -> Self {
        Self {
            mind_map_id: title.to_string(),
            saved_nodes: state.saved_nodes.iter().cloned().collect(),
            study_notes: state.notes.clone(),
        }
    }

    pub fn restore(&self, state: &mut ViewerState) {
        state.saved_nodes = self.saved_nodes.iter().cloned().collect();
        state.notes = self.study_notes.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::parser::fallback_mind_map;

    fn state() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    #[test]
    fn zoom_clamps_at_both_ends() {
        let mut viewer = state();
        for _ in 0..50 {
            viewer.zoom_in();
        }
        assert_eq!(viewer.zoom(), 3.0);
        for _ in 0..50 {
            viewer.zoom_out();
        }
        assert_eq!(viewer.zoom(), 0.5);
    }

    #[test]
    fn reset_restores_identity_transform() {
        let mut viewer = state();
        viewer.zoom_in();
        viewer.begin_pan(Position::new(10.0, 10.0));
        viewer.update_pan(Position::new(40.0, 25.0));
        viewer.end_pan();
        viewer.reset_view();
        assert_eq!(viewer.zoom(), 1.0);
        assert_eq!(viewer.pan(), Position::ORIGIN);
    }

    #[test]
    fn pan_follows_pointer_from_anchor() {
        let mut viewer = state();
        viewer.begin_pan(Position::new(100.0, 100.0));
        assert!(viewer.is_dragging());
        viewer.update_pan(Position::new(130.0, 80.0));
        assert_eq!(viewer.pan(), Position::new(30.0, -20.0));
        viewer.end_pan();
        assert!(!viewer.is_dragging());
        // Moves after end_pan are ignored.
        viewer.update_pan(Position::new(500.0, 500.0));
        assert_eq!(viewer.pan(), Position::new(30.0, -20.0));
    }

    #[test]
    fn pan_resumes_from_previous_offset() {
        let mut viewer = state();
        viewer.begin_pan(Position::new(0.0, 0.0));
        viewer.update_pan(Position::new(50.0, 0.0));
        viewer.end_pan();
        viewer.begin_pan(Position::new(10.0, 10.0));
        viewer.update_pan(Position::new(10.0, 10.0));
        // Re-grabbing without moving keeps the existing pan.
        assert_eq!(viewer.pan(), Position::new(50.0, 0.0));
    }

    #[test]
    fn selection_toggles() {
        let mut viewer = state();
        viewer.select_node("2");
        assert_eq!(viewer.selected_node(), Some("2"));
        viewer.select_node("3");
        assert_eq!(viewer.selected_node(), Some("3"));
        viewer.select_node("3");
        assert_eq!(viewer.selected_node(), None);
    }

    #[test]
    fn saved_toggle_is_idempotent_in_pairs() {
        let mut viewer = state();
        viewer.toggle_saved("2");
        assert!(viewer.is_saved("2"));
        viewer.toggle_saved("2");
        assert!(!viewer.is_saved("2"));
    }

    #[test]
    fn notes_upsert() {
        let mut viewer = state();
        viewer.set_note("2", "chlorophyll absorbs light");
        viewer.set_note("2", "revised note");
        assert_eq!(viewer.note("2"), Some("revised note"));
        assert_eq!(viewer.note("3"), None);
    }

    #[test]
    fn exam_mode_flips() {
        let mut viewer = state();
        assert!(!viewer.exam_mode());
        viewer.toggle_exam_mode();
        assert!(viewer.exam_mode());
        viewer.toggle_exam_mode();
        assert!(!viewer.exam_mode());
    }

    #[test]
    fn scene_reflects_selection_and_bookmarks() {
        let map = fallback_mind_map("Cells");
        let positions = crate::layout::compute_layout(
            &map,
            crate::ir::Viewport::new(1000.0, 800.0),
            &crate::config::LayoutConfig::default(),
        );
        let mut viewer = state();
        viewer.select_node("2");
        viewer.toggle_saved("3");
        let scene = build_scene(&map, &positions, &viewer);
        assert_eq!(scene.nodes.len(), 4);
        assert_eq!(scene.edges.len(), 3);
        let selected: Vec<&str> = scene
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(selected, vec!["2"]);
        assert!(scene.nodes.iter().find(|n| n.id == "3").unwrap().saved);
        assert_eq!(scene.edges[0].strength, 0.8);
    }

    #[test]
    fn progress_round_trips() {
        let mut viewer = state();
        viewer.toggle_saved("2");
        viewer.toggle_saved("4");
        viewer.set_note("2", "appears on the exam");
        let snapshot = StudyProgress::capture("Cells", &viewer);
        let json = serde_json::to_string(&snapshot).unwrap();
        let decoded: StudyProgress = serde_json::from_str(&json).unwrap();

        let mut restored = state();
        decoded.restore(&mut restored);
        assert!(restored.is_saved("2"));
        assert!(restored.is_saved("4"));
        assert!(!restored.is_saved("3"));
        assert_eq!(restored.note("2"), Some("appears on the exam"));
    }
}
