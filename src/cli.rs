use anyhow::Result;
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::error::GenerateError;
use crate::ir::Viewport;
use crate::layout::compute_layout;
use crate::layout_dump::SceneDump;
use crate::parser::normalize;
use crate::viewer::{build_scene, ViewerState};

#[derive(Parser, Debug)]
#[command(
    name = "studymap",
    version,
    about = "Generate a positioned study mind map from a text document"
)]
pub struct Args {
    /// Input text file, or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Document title (root label for the fallback map)
    #[arg(short = 't', long = "title", default_value = "Untitled Document")]
    pub title: String,

    /// Pre-fetched generation response file. Without it the deterministic
    /// fallback map is used; this tool performs no network I/O.
    #[arg(short = 'r', long = "response")]
    pub response: Option<PathBuf>,

    /// Output file for the scene dump JSON. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (layout/viewer/prompt tunables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Viewport height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let source_text = read_input(args.input.as_deref())?;
    let canned_response = match args.response.as_deref() {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => None,
    };

    // The generation call is replayed from the response file when given;
    // otherwise it reports itself unavailable and normalization falls back.
    let generator = move |_prompt: &str| -> Result<String, GenerateError> {
        match &canned_response {
            Some(text) => Ok(text.clone()),
            None => Err(GenerateError::Unavailable(
                "no response file supplied".to_string(),
            )),
        }
    };

    let normalized = normalize(&source_text, &args.title, &generator, &config.prompt);
    let viewport = Viewport::new(args.width, args.height);
    let positions = compute_layout(&normalized.map, viewport, &config.layout);
    let state = ViewerState::new(&config.viewer);
    let scene = build_scene(&normalized.map, &positions, &state);
    let dump = SceneDump::from_scene(&scene, viewport);

    if normalized.origin.is_fallback() {
        eprintln!("note: generated content unavailable, emitting fallback map");
    }

    match args.output.as_deref() {
        Some(path) => dump.write_json(path)?,
        None => {
            let json = serde_json::to_string_pretty(&dump)?;
            println!("{json}");
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
