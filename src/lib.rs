pub mod artifacts;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod viewer;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, PromptConfig, ViewerConfig, load_config};
pub use error::{BuildError, FallbackReason, GenerateError, MapOrigin};
pub use ir::{ConceptNode, Edge, GraphNode, MindMap, Position, Viewport};
pub use layout::compute_layout;
pub use parser::{Generator, NormalizedMindMap, fallback_mind_map, normalize};
pub use viewer::{Scene, SceneEdge, SceneNode, StudyProgress, ViewerState, build_scene};
