mod handler;
mod tools;

use handler::VerifierServerHandler;
use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ServerCapabilities, ServerCapabilitiesTools,
    LATEST_PROTOCOL_VERSION,
};
use rust_mcp_sdk::{
    error::SdkResult,
    mcp_server::{server_runtime, ServerRuntime},
    McpServer, StdioTransport, TransportOptions,
};
use scribl_grammar_verifier::config::{Config, GRAMMAR_PATH_ENV};
use scribl_grammar_verifier::grammar::scribl;
use std::sync::Arc;

fn server_details() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Scribl Grammar Verifier".to_string()),
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(format!(
            "Checks that compiled tree-sitter grammars load into usable language handles. \
             Grammar libraries are searched in {GRAMMAR_PATH_ENV}, then the user data directory."
        )),
        protocol_version: LATEST_PROTOCOL_VERSION.to_string(),
    }
}

/// Log where grammars will be looked up and whether Scribl is there yet
fn log_startup_state(config: &Config) {
    for (i, path) in config.search_paths.iter().enumerate() {
        log::info!("Grammar search path {}: {}", i + 1, path.display());
    }

    let report = scribl::verifier(config).check();
    match report.error {
        None => log::info!("Scribl grammar available ({})", report.source),
        Some(error) => log::warn!("Scribl grammar not yet loadable: {error}"),
    }
}

#[tokio::main]
async fn main() -> SdkResult<()> {
    color_eyre::install().ok();
    env_logger::init();

    let config = Config::from_env();
    log_startup_state(&config);

    let transport = StdioTransport::new(TransportOptions::default())?;
    let server: Arc<ServerRuntime> = server_runtime::create_server(
        server_details(),
        transport,
        VerifierServerHandler::new(config),
    );

    log::info!("Grammar verifier MCP server listening on stdio");

    if let Err(start_error) = server.start().await {
        eprintln!(
            "{}",
            start_error
                .rpc_error_message()
                .unwrap_or(&start_error.to_string())
        );
    }

    Ok(())
}
