//! MCP types re-export
//!
//! Re-exports the rust-mcp-sdk result type used by the tool executors.

use std::io;

use serde::Serialize;

pub use rust_mcp_sdk::schema::{CallToolResult, TextContent};

/// Builds tool results from plain text or serializable payloads
pub trait CallToolResultExt: Sized {
    fn success(text: String) -> Self;

    fn json<T: Serialize>(value: &T) -> io::Result<Self> {
        let text = serde_json::to_string(value).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Failed to serialize result to JSON: {e}"),
            )
        })?;
        Ok(Self::success(text))
    }
}

impl CallToolResultExt for CallToolResult {
    fn success(text: String) -> Self {
        CallToolResult::text_content(vec![TextContent::from(text)])
    }
}
