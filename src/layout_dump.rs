use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::ir::Viewport;
use crate::viewer::Scene;

/// Serializable snapshot of a positioned scene, for downstream renderers and
/// golden tests.
#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub title: String,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub level: usize,
    pub x: f32,
    pub y: f32,
    pub selected: bool,
    pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: [f32; 2],
    pub to: [f32; 2],
    pub strength: f32,
}

impl SceneDump {
    pub fn from_scene(scene: &Scene, viewport: Viewport) -> Self {
        let nodes = scene
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                level: node.level,
                x: node.position.x,
                y: node.position.y,
                selected: node.selected,
                saved: node.saved,
            })
            .collect();
        let edges = scene
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: [edge.from.x, edge.from.y],
                to: [edge.to.x, edge.to.y],
                strength: edge.strength,
            })
            .collect();
        Self {
            title: scene.title.clone(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            nodes,
            edges,
        }
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
