//! Grammar inspection tools
//!
//! Executors behind the MCP tools:
//! - Listing compiled-in grammars and grammar libraries found on disk
//! - Verifying a single grammar and reporting the outcome as JSON

pub mod list_grammars;
pub mod verify_grammar;
