use once_cell::sync::Lazy;
use regex::Regex;

use crate::builder;
use crate::config::PromptConfig;
use crate::error::{FallbackReason, GenerateError, MapOrigin};
use crate::ir::{ConceptNode, Edge, GraphNode, MindMap};

/// Black-box text generation call. One attempt per invocation, no retry;
/// network transport is the embedding application's concern.
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, GenerateError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self(prompt)
    }
}

/// Normalization always yields a renderable map; `origin` records whether it
/// came from the generation call or from the deterministic fallback.
#[derive(Debug, Clone)]
pub struct NormalizedMindMap {
    pub map: MindMap,
    pub origin: MapOrigin,
}

static FENCED_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json5?|JSON)?\s*\n([\s\S]*?)```").unwrap());

pub fn mind_map_prompt(source_text: &str, title: &str, config: &PromptConfig) -> String {
    let content = truncate_chars(source_text, config.mind_map_char_budget);
    format!(
        "Create a mind map structure for this educational content:\n\
         \n\
         Title: {title}\n\
         Content: {content}\n\
         \n\
         Generate a hierarchical mind map with:\n\
         - Main topic as root\n\
         - 3-5 main branches\n\
         - 2-3 sub-branches per main branch\n\
         - A concise label (2-5 words) and a 1-2 sentence summary per node\n\
         - Maximum 3 levels deep\n\
         - Unique id for every node\n\
         \n\
         Format the response as a JSON object with this structure:\n\
         {{\n\
           \"nodes\": [\n\
             {{\n\
               \"id\": \"1\",\n\
               \"label\": \"Main Topic\",\n\
               \"summary\": \"Brief summary of the topic\",\n\
               \"children\": [\n\
                 {{\"id\": \"2\", \"label\": \"Subtopic\", \"summary\": \"Brief summary\", \"children\": []}}\n\
               ]\n\
             }}\n\
           ]\n\
         }}\n"
    )
}

/// Caps `text` at `budget` characters without splitting a UTF-8 scalar.
pub(crate) fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Returns the first top-level `{...}` in `text` by depth-counting brace
/// matching, aware of strings and escapes. A fenced ```json block, when
/// present, is searched first so braces in surrounding prose cannot shadow
/// the payload.
pub fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(captures) = FENCED_JSON_RE.captures(text)
        && let Some(fenced) = captures.get(1)
        && let Some(payload) = extract_balanced(fenced.as_str(), '{', '}')
    {
        return Some(payload);
    }
    extract_balanced(text, '{', '}')
}

/// Array counterpart, used by the flashcard/quiz payloads.
pub fn extract_json_array(text: &str) -> Option<&str> {
    if let Some(captures) = FENCED_JSON_RE.captures(text)
        && let Some(fenced) = captures.get(1)
        && let Some(payload) = extract_balanced(fenced.as_str(), '[', ']')
    {
        return Some(payload);
    }
    extract_balanced(text, '[', ']')
}

fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Lenient parse: strict JSON first, json5 as the second chance for model
/// output with trailing commas or unquoted keys.
pub(crate) fn parse_value(payload: &str) -> Option<serde_json::Value> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(payload) {
        return Some(value);
    }
    json5::from_str::<serde_json::Value>(payload).ok()
}

/// Shapes accepted: `{"nodes": [root, ...]}` (the documented format) or a
/// bare root object. Absent fields deserialize to empty, per the concept
/// node defaults.
fn concept_root(value: serde_json::Value) -> Result<ConceptNode, FallbackReason> {
    match value {
        serde_json::Value::Object(mut object) => {
            if let Some(nodes) = object.remove("nodes") {
                let serde_json::Value::Array(mut items) = nodes else {
                    return Err(FallbackReason::MalformedPayload);
                };
                if items.is_empty() {
                    return Err(FallbackReason::EmptyPayload);
                }
                return serde_json::from_value(items.remove(0))
                    .map_err(|_| FallbackReason::MalformedPayload);
            }
            if object.contains_key("id") || object.contains_key("label") {
                return serde_json::from_value(serde_json::Value::Object(object))
                    .map_err(|_| FallbackReason::MalformedPayload);
            }
            Err(FallbackReason::MalformedPayload)
        }
        _ => Err(FallbackReason::MalformedPayload),
    }
}

/// The deterministic minimal map: one root labeled with the title plus three
/// generic concepts at fixed strengths. Produced whenever generation is
/// unavailable or its output is unusable, so the pipeline always yields a
/// renderable artifact.
pub fn fallback_mind_map(title: &str) -> MindMap {
    let root = GraphNode {
        id: "1".to_string(),
        label: title.to_string(),
        summary: None,
        level: 0,
        child_ids: vec!["2".to_string(), "3".to_string(), "4".to_string()],
        parent_connection_ids: Vec::new(),
    };
    let mut nodes = vec![root];
    let strengths = [0.8_f32, 0.7, 0.6];
    let mut edges = Vec::new();
    for (index, strength) in strengths.iter().enumerate() {
        let id = (index + 2).to_string();
        nodes.push(GraphNode {
            id: id.clone(),
            label: format!("Key Concept {}", index + 1),
            summary: None,
            level: 1,
            child_ids: Vec::new(),
            parent_connection_ids: vec!["1".to_string()],
        });
        edges.push(Edge {
            from: "1".to_string(),
            to: id,
            strength: *strength,
        });
    }
    MindMap {
        title: title.to_string(),
        nodes,
        edges,
    }
}

pub fn normalize<G: Generator>(
    source_text: &str,
    title: &str,
    generator: &G,
    config: &PromptConfig,
) -> NormalizedMindMap {
    let prompt = mind_map_prompt(source_text, title, config);
    let response = match generator.generate(&prompt) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("mind map generation unavailable ({err}); using fallback");
            return fallback(title, FallbackReason::GenerationFailed);
        }
    };
    // Empty responses and transport failures are treated identically.
    if response.trim().is_empty() {
        return fallback(title, FallbackReason::GenerationFailed);
    }
    let Some(payload) = extract_json_object(&response) else {
        log::warn!("mind map response carries no JSON payload; using fallback");
        return fallback(title, FallbackReason::NoJsonPayload);
    };
    let Some(value) = parse_value(payload) else {
        log::warn!("mind map payload failed to parse; using fallback");
        return fallback(title, FallbackReason::MalformedPayload);
    };
    let root = match concept_root(value) {
        Ok(root) => root,
        Err(reason) => {
            log::warn!("mind map payload rejected ({reason:?}); using fallback");
            return fallback(title, reason);
        }
    };
    match builder::build(&root, title) {
        Ok(map) => NormalizedMindMap {
            map,
            origin: MapOrigin::Generated,
        },
        Err(err) => {
            log::warn!("mind map payload rejected ({err}); using fallback");
            fallback(title, FallbackReason::DuplicateNodeIds)
        }
    }
}

fn fallback(title: &str, reason: FallbackReason) -> NormalizedMindMap {
    NormalizedMindMap {
        map: fallback_mind_map(title),
        origin: MapOrigin::Fallback(reason),
    }
}
