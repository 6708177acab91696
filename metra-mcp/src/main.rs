//! Metra MCP Server
//!
//! Line-delimited JSON-RPC over stdio.
//!
//! Tools:
//! - convert: Convert a value between two registered units
//! - compatible: Check whether two units share a dimension
//! - describe_unit: Show a unit's factor and dimension
//! - list_units: List registered units, optionally for one dimension

mod logging;

use std::io::{self, BufRead, Write};
use metra_core::{MetraError, Settings};
use metra_units::{registry_from_settings, ConversionRegistry, Dimension, Quantity, Unit};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "metra";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

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

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

fn main() {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    logging::init(&settings.log_level);

    let registry = match registry_from_settings(&settings) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to load unit catalogs: {}", e);
            std::process::exit(2);
        }
    };

    tracing::info!("Metra MCP Server v{} started (protocol {})", SERVER_VERSION, PROTOCOL_VERSION);
    tracing::info!("{:?}", registry);

    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());

    if let Err(e) = serve(&registry, reader, io::stdout()) {
        tracing::error!("I/O error: {}", e);
    }

    tracing::info!("Server shutting down");
}

/// Read requests line by line until EOF, writing one response per request
fn serve<R: BufRead, W: Write>(registry: &ConversionRegistry, reader: R, mut writer: W) -> io::Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        tracing::debug!("Received: {} bytes", line.len());

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                tracing::debug!("Processing: {}", request.method);
                let response = handle_request(registry, &request);
                // Notifications (no id) should NOT receive a response
                if request.id.is_none() {
                    continue;
                }
                response
            }
            Err(e) => {
                tracing::warn!("Error parsing request: {}", e);
                McpResponse {
                    jsonrpc: "2.0".to_string(),
                    id: None,
                    result: None,
                    error: Some(McpError {
                        code: -32700,
                        message: format!("Parse error: {}", e),
                        data: None,
                    }),
                }
            }
        };

        let response_json = serde_json::to_string(&response)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(writer, "{}", response_json)?;
        writer.flush()?;
    }

    tracing::debug!("Client disconnected (EOF)");
    Ok(())
}

fn handle_request(registry: &ConversionRegistry, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(registry, &request.params),

        _ => Err(McpError {
            code: -32601,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    tracing::info!("Client connected: {} (protocol: {})", client_info, client_protocol);

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Dimensional quantity conversion"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Units are referenced by exact symbol (\"km/h\") or exact name (\"kilometer/hour\"). Use list_units to discover them."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let unit_arg = |description: &str| json!({ "type": "string", "description": description });

    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value from one unit to another",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number", "description": "Value to convert" },
                        "from": unit_arg("Source unit symbol or name (e.g. \"km\")"),
                        "to": unit_arg("Target unit symbol or name (e.g. \"mi\")")
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "compatible",
                "description": "Check whether two units measure the same dimension",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "a": unit_arg("First unit"),
                        "b": unit_arg("Second unit")
                    },
                    "required": ["a", "b"]
                }
            },
            {
                "name": "describe_unit",
                "description": "Show a unit's name, symbol, factor and dimension",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit": unit_arg("Unit symbol or name")
                    },
                    "required": ["unit"]
                }
            },
            {
                "name": "list_units",
                "description": "List registered units",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "dimension": {
                            "type": "string",
                            "description": "Only units of this dimension (e.g. \"length\", \"pressure\")"
                        }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(registry: &ConversionRegistry, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    let outcome = match name {
        "convert" => tool_convert(registry, &args),
        "compatible" => tool_compatible(registry, &args),
        "describe_unit" => tool_describe_unit(registry, &args),
        "list_units" => tool_list_units(registry, &args),
        _ => {
            let err = MetraError::unknown_tool(name);
            return Err(McpError {
                code: -32602,
                message: err.message.clone(),
                data: serde_json::to_value(&err).ok(),
            });
        }
    };

    // Tool failures are reported in the result so the client can show them
    Ok(outcome.unwrap_or_else(|err| {
        tracing::debug!("{} failed: {}", name, err);
        json!({
            "content": [{ "type": "text", "text": err.to_string() }],
            "error": err,
            "isError": true
        })
    }))
}

fn str_arg<'a>(args: &'a JsonValue, tool: &str, arg: &str) -> Result<&'a str, MetraError> {
    match args.get(arg) {
        None | Some(JsonValue::Null) => Err(MetraError::arg_missing(tool, arg)),
        Some(v) => v.as_str().ok_or_else(|| MetraError::arg_type(tool, arg, "String")),
    }
}

fn unit_arg(registry: &ConversionRegistry, args: &JsonValue, tool: &str, arg: &str) -> Result<Unit, MetraError> {
    let key = str_arg(args, tool, arg)?;
    registry.lookup(key).ok_or_else(|| MetraError::unknown_unit(key))
}

fn describe(unit: &Unit) -> JsonValue {
    json!({
        "name": unit.name(),
        "symbol": unit.symbol(),
        "factor": unit.factor(),
        "dimension": unit.dimension().to_string(),
        "dimension_name": unit.dimension().name(),
    })
}

fn tool_convert(registry: &ConversionRegistry, args: &JsonValue) -> Result<JsonValue, MetraError> {
    let value = match args.get("value") {
        None | Some(JsonValue::Null) => return Err(MetraError::arg_missing("convert", "value")),
        Some(v) => v.as_f64().ok_or_else(|| MetraError::arg_type("convert", "value", "Number"))?,
    };
    let from = unit_arg(registry, args, "convert", "from")?;
    let to = unit_arg(registry, args, "convert", "to")?;

    let source = Quantity::new(value, from);
    let result = source.convert_to(&to, registry)?;

    Ok(json!({
        "content": [{ "type": "text", "text": format!("{} = {}", source, result) }],
        "value": result.value,
        "unit": result.unit.symbol(),
        "isError": false
    }))
}

fn tool_compatible(registry: &ConversionRegistry, args: &JsonValue) -> Result<JsonValue, MetraError> {
    let a = unit_arg(registry, args, "compatible", "a")?;
    let b = unit_arg(registry, args, "compatible", "b")?;
    let linear = a.is_compatible_to(&b);
    let custom = registry.conversion(&a, &b).is_some();

    let text = if linear {
        format!("{} and {} are dimensionally compatible ({})", a, b, a.dimension())
    } else if custom {
        format!("{} converts to {} through a registered conversion", a, b)
    } else {
        format!("{} [{}] and {} [{}] are not compatible", a, a.dimension(), b, b.dimension())
    };

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "compatible": linear,
        "convertible": linear || custom,
        "isError": false
    }))
}

fn tool_describe_unit(registry: &ConversionRegistry, args: &JsonValue) -> Result<JsonValue, MetraError> {
    let unit = unit_arg(registry, args, "describe_unit", "unit")?;
    let info = describe(&unit);

    Ok(json!({
        "content": [{ "type": "text", "text": format!("{} ({}): {} × base [{}]", unit.name(), unit.symbol(), unit.factor(), unit.dimension()) }],
        "unit": info,
        "isError": false
    }))
}

fn tool_list_units(registry: &ConversionRegistry, args: &JsonValue) -> Result<JsonValue, MetraError> {
    let units = match args.get("dimension").and_then(|v| v.as_str()) {
        Some(name) => {
            let dimension = Dimension::from_name(name).ok_or_else(|| {
                MetraError::arg_type("list_units", "dimension", "a known dimension name")
                    .with_suggestion("e.g. length, mass, time, velocity, energy, pressure")
            })?;
            registry.units_of(&dimension)
        }
        None => registry.units(),
    };

    let symbols: Vec<&str> = units.iter().map(|u| u.symbol()).collect();

    Ok(json!({
        "content": [{ "type": "text", "text": symbols.join(", ") }],
        "units": units.iter().map(describe).collect::<Vec<_>>(),
        "isError": false
    }))
}
