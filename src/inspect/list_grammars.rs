//! List Grammars Tool
//!
//! Reports every grammar the verifier can load: the compiled-in catalogue and
//! any grammar libraries in the configured search directories.

use crate::config::Config;
use crate::grammar::dynamic::discover;
use crate::grammar::Grammar;
use crate::mcp_types::{CallToolResult, CallToolResultExt};
use serde::Serialize;
use std::io;

#[derive(Debug, Serialize)]
struct GrammarEntry {
    id: String,
    name: String,
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Execute the list_grammars tool
///
/// # Returns
/// Returns a `CallToolResult` with a JSON array; each entry has `id`, `name`,
/// `source` (`"builtin"` or `"library"`) and, for libraries, `path`.
pub fn execute(config: &Config) -> Result<CallToolResult, io::Error> {
    let mut entries: Vec<GrammarEntry> = Grammar::ALL
        .iter()
        .map(|grammar| GrammarEntry {
            id: grammar.id().to_string(),
            name: grammar.name().to_string(),
            source: "builtin",
            path: None,
        })
        .collect();

    let libraries = discover(&config.search_paths);
    log::debug!("Discovered {} grammar libraries", libraries.len());

    entries.extend(libraries.into_iter().map(|(name, path)| GrammarEntry {
        id: name.clone(),
        name,
        source: "library",
        path: Some(path.display().to_string()),
    }));

    CallToolResult::json(&entries)
}
