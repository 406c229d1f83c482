use std::collections::HashSet;

use crate::error::BuildError;
use crate::ir::{ConceptNode, Edge, GraphNode, MindMap};

/// Strength decays with the depth of the child end of the edge, so deeper
/// connections draw weaker.
fn edge_strength(child_level: usize) -> f32 {
    1.0 - child_level as f32 * 0.2
}

/// Flattens a concept tree into a `MindMap` by pre-order traversal: `level`
/// is depth from the root, every parent->child pair becomes one edge, and
/// node order is visit order. Duplicate ids anywhere in the tree are
/// rejected rather than silently conflated.
pub fn build(root: &ConceptNode, title: &str) -> Result<MindMap, BuildError> {
    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    visit(root, 0, None, &mut nodes, &mut edges, &mut seen)?;

    Ok(MindMap {
        title: title.to_string(),
        nodes,
        edges,
    })
}

fn visit(
    node: &ConceptNode,
    level: usize,
    parent_id: Option<&str>,
    nodes: &mut Vec<GraphNode>,
    edges: &mut Vec<Edge>,
    seen: &mut HashSet<String>,
) -> Result<(), BuildError> {
    if !seen.insert(node.id.clone()) {
        return Err(BuildError::DuplicateNodeId(node.id.clone()));
    }

    let mut parent_connection_ids = Vec::new();
    if let Some(parent_id) = parent_id {
        edges.push(Edge {
            from: parent_id.to_string(),
            to: node.id.clone(),
            strength: edge_strength(level),
        });
        parent_connection_ids.push(parent_id.to_string());
    }

    nodes.push(GraphNode {
        id: node.id.clone(),
        label: node.label.clone(),
        summary: node.summary.clone(),
        level,
        child_ids: node.children.iter().map(|child| child.id.clone()).collect(),
        parent_connection_ids,
    });

    for child in &node.children {
        visit(child, level + 1, Some(&node.id), nodes, edges, seen)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, label: &str) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: label.to_string(),
            summary: None,
            children: Vec::new(),
        }
    }

    fn branch(id: &str, label: &str, children: Vec<ConceptNode>) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: label.to_string(),
            summary: None,
            children,
        }
    }

    /// Depth 3, branching factor 2: 7 nodes, 6 edges.
    fn binary_tree() -> ConceptNode {
        branch(
            "1",
            "Root",
            vec![
                branch("2", "Left", vec![leaf("4", "LL"), leaf("5", "LR")]),
                branch("3", "Right", vec![leaf("6", "RL"), leaf("7", "RR")]),
            ],
        )
    }

    #[test]
    fn builds_binary_tree() {
        let map = build(&binary_tree(), "Binary").unwrap();
        assert_eq!(map.nodes.len(), 7);
        assert_eq!(map.edges.len(), 6);

        let levels: Vec<usize> = map.nodes.iter().map(|n| n.level).collect();
        // Pre-order: 1, 2, 4, 5, 3, 6, 7
        assert_eq!(levels, vec![0, 1, 2, 2, 1, 2, 2]);
        let mut sorted = levels.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 1, 2, 2, 2, 2]);

        for edge in &map.edges {
            let child_level = map.node(&edge.to).unwrap().level;
            assert_eq!(edge.strength, 1.0 - child_level as f32 * 0.2);
        }
        let level1_strengths: Vec<f32> = map
            .edges
            .iter()
            .filter(|e| map.node(&e.to).unwrap().level == 1)
            .map(|e| e.strength)
            .collect();
        assert_eq!(level1_strengths, vec![0.8, 0.8]);
        let level2_strengths: Vec<f32> = map
            .edges
            .iter()
            .filter(|e| map.node(&e.to).unwrap().level == 2)
            .map(|e| e.strength)
            .collect();
        assert_eq!(level2_strengths.len(), 4);
        for strength in level2_strengths {
            assert!((strength - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn root_has_no_parent_connections() {
        let map = build(&binary_tree(), "Binary").unwrap();
        let root = map.root().unwrap();
        assert_eq!(root.id, "1");
        assert!(root.parent_connection_ids.is_empty());
        assert_eq!(root.child_ids, vec!["2", "3"]);

        let child = map.node("2").unwrap();
        assert_eq!(child.parent_connection_ids, vec!["1"]);
    }

    #[test]
    fn node_order_is_preorder() {
        let map = build(&binary_tree(), "Binary").unwrap();
        let ids: Vec<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4", "5", "3", "6", "7"]);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let tree = branch("1", "Root", vec![leaf("2", "A"), leaf("2", "B")]);
        let err = build(&tree, "Dup").unwrap_err();
        assert_eq!(err, BuildError::DuplicateNodeId("2".to_string()));
    }

    #[test]
    fn single_node_tree() {
        let map = build(&leaf("1", "Only"), "Solo").unwrap();
        assert_eq!(map.nodes.len(), 1);
        assert!(map.edges.is_empty());
        assert_eq!(map.root().unwrap().level, 0);
    }
}
