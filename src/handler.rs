//! MCP Server Handler Implementation
//!
//! Implements the ServerHandler trait and routes tool calls to the grammar
//! inspection executors.

use async_trait::async_trait;
use rust_mcp_sdk::schema::{
    schema_utils::CallToolError, CallToolRequest, CallToolResult, ListToolsRequest,
    ListToolsResult, RpcError,
};
use rust_mcp_sdk::{mcp_server::ServerHandler, McpServer};
use std::sync::Arc;

use scribl_grammar_verifier::config::Config;

use crate::tools::VerifierTools;

/// Handler for the grammar verifier MCP server
pub struct VerifierServerHandler {
    config: Config,
}

impl VerifierServerHandler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ServerHandler for VerifierServerHandler {
    async fn handle_list_tools_request(
        &self,
        _request: ListToolsRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: VerifierTools::tools(),
            meta: None,
            next_cursor: None,
        })
    }

    async fn handle_call_tool_request(
        &self,
        request: CallToolRequest,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        log::info!("Calling tool: {}", request.tool_name());

        let tool: VerifierTools = VerifierTools::try_from(request.params)?;

        match tool {
            VerifierTools::ListGrammarsTool(t) => t.call_tool(&self.config),
            VerifierTools::VerifyGrammarTool(t) => t.call_tool(&self.config),
        }
    }
}
