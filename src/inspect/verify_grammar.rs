//! Verify Grammar Tool
//!
//! Runs the load verifier against one grammar and returns its report. A
//! grammar that fails to load is still a successful tool call whose report
//! has `"ok": false`; only malformed arguments are errors.

use crate::config::Config;
use crate::grammar::dynamic::LibraryLoader;
use crate::grammar::{scribl, Grammar};
use crate::mcp_types::{CallToolResult, CallToolResultExt};
use crate::report::VerifyReport;
use crate::verify::GrammarVerifier;
use serde_json::Value;
use std::io;

/// Verify the grammar selected by `arguments`
///
/// # Arguments
/// * `arguments` - JSON object with optional `grammar` (compiled-in id) or
///   `library_path` (compiled grammar library). With neither, the Scribl
///   grammar is resolved from the search paths.
///
/// # Errors
/// Returns an error if:
/// - Both `grammar` and `library_path` are given
/// - Either argument is present but not a string
/// - `grammar` names no compiled-in grammar
/// - `library_path` is not a grammar library file name
pub fn report(arguments: &Value, config: &Config) -> Result<VerifyReport, io::Error> {
    let grammar = optional_str(arguments, "grammar")?;
    let library_path = optional_str(arguments, "library_path")?;

    match (grammar, library_path) {
        (Some(_), Some(_)) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Pass either 'grammar' or 'library_path', not both",
        )),
        (Some(id), None) => {
            let grammar = Grammar::from_id(id)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

            log::info!("Verifying compiled-in grammar: {}", grammar.name());
            Ok(GrammarVerifier::new(grammar.name(), grammar)
                .with_profile(grammar.profile())
                .check())
        }
        (None, Some(path)) => {
            let loader = LibraryLoader::from_path(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a tree-sitter grammar library name: {path}"),
                )
            })?;

            log::info!("Verifying grammar library: {path}");
            let verifier = if loader.name() == scribl::NAME {
                GrammarVerifier::new(scribl::DISPLAY_NAME, loader).with_profile(scribl::profile())
            } else {
                GrammarVerifier::new(loader.name().to_string(), loader)
            };
            Ok(verifier.check())
        }
        (None, None) => {
            log::info!("Verifying Scribl grammar from search paths");
            Ok(scribl::verifier(config).check())
        }
    }
}

/// Execute the verify_grammar tool
pub fn execute(arguments: &Value, config: &Config) -> Result<CallToolResult, io::Error> {
    let report = report(arguments, config)?;
    CallToolResult::json(&report)
}

fn optional_str<'a>(arguments: &'a Value, key: &str) -> Result<Option<&'a str>, io::Error> {
    match arguments.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid '{key}' argument: expected a string"),
        )),
    }
}
