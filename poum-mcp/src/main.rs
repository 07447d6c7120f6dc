//! Poum MCP Server
//!
//! Line-delimited JSON-RPC over stdio.
//!
//! Tools:
//! - convert: Convert a value between two units
//! - find_unit: Look up a unit by symbol or alias
//! - find_quantity: Look up a quantity by name or unit symbol
//! - convertible_units: List the units a unit converts to
//! - list_quantities: List all quantities
//! - add_alias: Register an alias for a unit
//! - catalog_info: Catalog summary
//!
//! Environment:
//! - POUM_DATA_PATH: directory holding `uom.json` and `unit_aliases.txt` (default `./data`)
//! - POUM_CONFIG: optional JSON config file
//! - POUM_LOG: log level (default `info`)

mod config;
mod tools;

use std::process::ExitCode;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use poum_core::UnitCatalog;
use poum_feed::{builtin_catalog_with, FeedError, FeedLoader};

use crate::config::ServerConfig;
use crate::tools::McpError;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "poum";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

type SharedCatalog = Arc<RwLock<UnitCatalog>>;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(e),
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("poum-mcp: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .init();

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Poum MCP Server started");
    info!(data_path = %config.data_path.display(), "data path");

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, code = e.code(), "failed to load catalog");
            return ExitCode::FAILURE;
        }
    };
    info!(quantities = catalog.quantity_count(), units = catalog.unit_count(),
        aliases = catalog.aliases().len(), "catalog ready");

    let catalog: SharedCatalog = Arc::new(RwLock::new(catalog));
    if let Err(e) = serve(catalog).await {
        error!(error = %e, "I/O error");
        return ExitCode::FAILURE;
    }

    info!("Server shutting down");
    ExitCode::SUCCESS
}

/// Built-in catalog plus whatever feed and alias files the data path holds
fn load_catalog(config: &ServerConfig) -> Result<UnitCatalog, FeedError> {
    let mut catalog = builtin_catalog_with(config.catalog.clone())?;
    let loader = FeedLoader::new(config.feed_policy);

    let feed = config.feed_file();
    if feed.is_file() {
        loader.load_feed_file(&mut catalog, &feed)?;
    } else {
        debug!(path = %feed.display(), "no definition feed");
    }

    let aliases = config.alias_file();
    if aliases.is_file() {
        loader.load_alias_file(&mut catalog, &aliases)?;
    } else {
        debug!(path = %aliases.display(), "no alias file");
    }

    Ok(catalog)
}

async fn serve(catalog: SharedCatalog) -> std::io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    info!("Server ready, waiting for requests...");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(bytes = line.len(), "received");

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing");
                let response = handle_request(&catalog, &request).await;
                // Notifications (no id) get no response
                if request.id.is_none() {
                    debug!(method = %request.method, "notification processed");
                    continue;
                }
                response
            }
            Err(e) => {
                warn!(error = %e, "error parsing request");
                McpResponse::new(None, Err(McpError {
                    code: -32700,
                    message: format!("Parse error: {}", e),
                    data: None,
                }))
            }
        };

        let json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                continue;
            }
        };
        stdout.write_all(json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("Client disconnected (EOF)");
    Ok(())
}

async fn handle_request(catalog: &SharedCatalog, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => Ok(tools::tools_list()),
        "tools/call" => handle_tool_call(catalog, &request.params).await,

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    McpResponse::new(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit of measure catalog and conversion"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Poum converts values between units of the same quantity. Units are named by symbol (\"mi/h\", \"degC\") or alias (\"mph\", \"celsius\"). Use 'convertible_units' to discover valid targets."
    }))
}

async fn handle_tool_call(catalog: &SharedCatalog, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    if tools::is_read_only(name) {
        let catalog = catalog.read().await;
        tools::call_read_tool(&catalog, name, &args)
    } else {
        let mut catalog = catalog.write().await;
        tools::call_write_tool(&mut catalog, name, &args)
    }
}
