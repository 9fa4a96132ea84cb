//! # sector_edit
//!
//! Headless driver for the map edit service. Loads a map document, applies a
//! list of edit commands against it in order and prints one result envelope
//! per command, followed by the resulting map JSON.
//!
//! ```text
//! sector_edit <map.json> <commands.json> [config.json]
//! ```
//!
//! `commands.json` holds either a single command object or an array of them.
//! Set `RUST_LOG=info` to see accepted edits and rejections.

use log::{error, info};
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use sector_edit::{
    response_json, DocumentStore, EditRequest, EditService, EditorConfig, MapDocument,
    MapEditCommand, MemoryDocumentStore,
};

fn read_json(path: &Path) -> Result<Value, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(value)
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("sector_edit", String::as_str)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!(
            "usage: {} <map.json> <commands.json> [config.json]",
            program_name(&args)
        );
        std::process::exit(2);
    }
    let map_path = PathBuf::from(&args[1]);
    let commands_path = PathBuf::from(&args[2]);

    let config = match args.get(3) {
        Some(path) => EditorConfig::load(Path::new(path))?,
        None => EditorConfig::default(),
    };

    let map = read_json(&map_path)?;
    let commands = match read_json(&commands_path)? {
        Value::Array(items) => items,
        single => vec![single],
    };
    info!(
        "Loaded {} with {} command(s)",
        map_path.display(),
        commands.len()
    );

    let store = MemoryDocumentStore::with_document(MapDocument::new(map_path, map));
    let mut service = EditService::new(store.clone(), config);

    for (i, raw) in commands.iter().enumerate() {
        let revision = store.revision().unwrap_or_default();
        let result = MapEditCommand::from_json(raw).and_then(|command| {
            service.edit(&EditRequest {
                base_revision: revision,
                command,
            })
        });
        if let Err(err) = &result {
            error!("Command {} failed: {}", i, err);
        }
        println!("{}", serde_json::to_string(&response_json(&result))?);
    }

    if let Some(doc) = store.get() {
        println!("{}", serde_json::to_string_pretty(&doc.json)?);
        info!("Finished at revision {}", doc.revision);
    }
    Ok(())
}
