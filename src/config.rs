use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Base radius multiplied by sqrt(level); deeper rings grow sub-linearly.
    pub radius_base: f32,
    /// Root sits at height / divisor, leaving more room below than above.
    pub root_height_divisor: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_base: 150.0,
            root_height_divisor: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoom_step: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: 0.2,
            zoom_min: 0.5,
            zoom_max: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Character cap on the source-text prefix embedded in the mind map
    /// prompt, bounding request size.
    pub mind_map_char_budget: usize,
    pub summary_char_budget: usize,
    pub flashcard_count: usize,
    pub quiz_question_count: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            mind_map_char_budget: 3000,
            summary_char_budget: 4000,
            flashcard_count: 10,
            quiz_question_count: 5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub viewer: ViewerConfig,
    pub prompt: PromptConfig,
}

/// Loads a JSON config file; a partial file fills the remaining fields from
/// defaults, no file at all yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
