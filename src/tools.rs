//! MCP Tool definitions and implementations
//!
//! This module defines the tools provided by the grammar verifier server
//! using the rust-mcp-sdk macros and conventions.

use rust_mcp_sdk::macros::{mcp_tool, JsonSchema};
use rust_mcp_sdk::schema::{schema_utils::CallToolError, CallToolResult};
use rust_mcp_sdk::tool_box;

use scribl_grammar_verifier::config::Config;
use scribl_grammar_verifier::inspect::{list_grammars, verify_grammar};

/// List every grammar the verifier can load
#[mcp_tool(
    name = "list_grammars",
    description = "List the tree-sitter grammars available for verification: grammars compiled into the server and compiled grammar libraries (libtree-sitter-<name>) found in the grammar search paths. Returns a JSON array with id, name, source and library path."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct ListGrammarsTool {}

/// Check that a compiled grammar loads into a usable language handle
#[mcp_tool(
    name = "verify_grammar",
    description = "Verify that a compiled tree-sitter grammar loads into a usable language: non-null, ABI compatible with the runtime, non-empty and accepted by a parser. Pass 'grammar' for a compiled-in grammar, 'library_path' for a grammar library on disk, or nothing to verify the Scribl grammar from the search paths. Returns a JSON report with 'ok' and, on failure, an 'error' diagnostic."
)]
#[derive(Debug, ::serde::Deserialize, ::serde::Serialize, JsonSchema)]
pub struct VerifyGrammarTool {
    /// Compiled-in grammar id (e.g. "rust", "c_sharp")
    #[serde(default)]
    pub grammar: Option<String>,
    /// Path to a compiled grammar library (e.g. "/usr/lib/libtree-sitter-scribl.so")
    #[serde(default)]
    pub library_path: Option<String>,
}

impl ListGrammarsTool {
    pub fn call_tool(&self, config: &Config) -> Result<CallToolResult, CallToolError> {
        list_grammars::execute(config).map_err(CallToolError::new)
    }
}

impl VerifyGrammarTool {
    pub fn call_tool(&self, config: &Config) -> Result<CallToolResult, CallToolError> {
        let args = serde_json::json!({
            "grammar": self.grammar,
            "library_path": self.library_path
        });

        verify_grammar::execute(&args, config).map_err(CallToolError::new)
    }
}

// Generate an enum with all tools
tool_box!(VerifierTools, [ListGrammarsTool, VerifyGrammarTool]);
