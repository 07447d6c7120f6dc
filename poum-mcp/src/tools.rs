//! MCP tools over the unit catalog

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use poum_core::{CatalogError, Quantity, Unit, UnitCatalog};

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        McpError {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

/// Whether a tool only reads the catalog
pub fn is_read_only(tool: &str) -> bool {
    tool != "add_alias"
}

pub fn tools_list() -> JsonValue {
    json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value between two units of the same quantity. Units may be given by symbol (\"mi/h\") or alias (\"mph\").",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number", "description": "Value to convert" },
                        "from": { "type": "string", "description": "Source unit symbol or alias" },
                        "to": { "type": "string", "description": "Target unit symbol or alias" }
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "find_unit",
                "description": "Look up a unit by symbol or alias",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "symbol": { "type": "string", "description": "Unit symbol or alias" }
                    },
                    "required": ["symbol"]
                }
            },
            {
                "name": "find_quantity",
                "description": "Look up a quantity by name, or the quantity owning a unit symbol",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Quantity name (e.g., \"length\")" },
                        "symbol": { "type": "string", "description": "Unit symbol or alias" }
                    }
                }
            },
            {
                "name": "convertible_units",
                "description": "List every unit a unit can be converted to, itself included",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "symbol": { "type": "string", "description": "Unit symbol or alias" }
                    },
                    "required": ["symbol"]
                }
            },
            {
                "name": "list_quantities",
                "description": "List all quantities of the catalog",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "add_alias",
                "description": "Register an alternate spelling for a unit",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "symbol": { "type": "string", "description": "Existing unit symbol or alias" },
                        "alias": { "type": "string", "description": "New alias" }
                    },
                    "required": ["symbol", "alias"]
                }
            },
            {
                "name": "catalog_info",
                "description": "Catalog summary: quantity, unit and alias counts",
                "inputSchema": { "type": "object", "properties": {} }
            }
        ]
    })
}

pub fn call_read_tool(catalog: &UnitCatalog, name: &str, args: &JsonValue) -> Result<JsonValue, McpError> {
    match name {
        "convert" => tool_convert(catalog, args),
        "find_unit" => tool_find_unit(catalog, args),
        "find_quantity" => tool_find_quantity(catalog, args),
        "convertible_units" => tool_convertible_units(catalog, args),
        "list_quantities" => Ok(tool_list_quantities(catalog)),
        "catalog_info" => Ok(tool_catalog_info(catalog)),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

pub fn call_write_tool(catalog: &mut UnitCatalog, name: &str, args: &JsonValue) -> Result<JsonValue, McpError> {
    match name {
        "add_alias" => tool_add_alias(catalog, args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn str_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

fn number_arg(args: &JsonValue, name: &str) -> Result<f64, McpError> {
    let value = args.get(name)
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))?;
    value.as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| McpError::invalid_params(format!("{} must be a number", name)))
}

fn text_result(text: String, data: JsonValue) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": text }],
        "data": data,
        "isError": false
    })
}

/// Catalog errors are reported as tool results, not protocol errors
fn error_result(err: &CatalogError) -> JsonValue {
    let mut text = format!("[{}] {}", err.code(), err);
    if let Some(suggestion) = err.suggestion() {
        text.push_str(&format!(" (suggestion: {})", suggestion));
    }
    json!({
        "content": [{ "type": "text", "text": text }],
        "error": { "code": err.code(), "message": err.to_string() },
        "isError": true
    })
}

fn not_found(what: &str, key: &str) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": format!("[NOT_FOUND] unknown {}: {}", what, key) }],
        "error": { "code": poum_core::codes::NOT_FOUND, "message": format!("unknown {}: {}", what, key) },
        "isError": true
    })
}

fn unit_to_json(unit: &Unit) -> JsonValue {
    json!({
        "name": unit.name(),
        "symbol": unit.symbol(),
        "display_symbol": unit.display_symbol(),
        "quantity": unit.quantity_name(),
    })
}

fn quantity_to_json(quantity: &Quantity) -> JsonValue {
    json!({
        "name": quantity.name(),
        "description": quantity.description(),
        "base_unit": quantity.base_unit().symbol(),
        "units": quantity.units().iter().map(Unit::symbol).collect::<Vec<_>>(),
    })
}

fn tool_convert(catalog: &UnitCatalog, args: &JsonValue) -> Result<JsonValue, McpError> {
    let value = number_arg(args, "value")?;
    let from = str_arg(args, "from")?;
    let to = str_arg(args, "to")?;

    match catalog.convert(from, to, value) {
        Ok(result) => {
            let text = format!("{} {} = {} {}", value, catalog.display_symbol_of(from),
                result, catalog.display_symbol_of(to));
            Ok(text_result(text, json!({ "value": result, "from": from, "to": to })))
        }
        Err(e) => Ok(error_result(&e)),
    }
}

fn tool_find_unit(catalog: &UnitCatalog, args: &JsonValue) -> Result<JsonValue, McpError> {
    let symbol = str_arg(args, "symbol")?;
    Ok(match catalog.find_unit(symbol) {
        Some(unit) => text_result(unit.to_string(), unit_to_json(unit)),
        None => not_found("unit", symbol),
    })
}

fn tool_find_quantity(catalog: &UnitCatalog, args: &JsonValue) -> Result<JsonValue, McpError> {
    let (found, key) = match (args.get("name").and_then(|v| v.as_str()), args.get("symbol").and_then(|v| v.as_str())) {
        (Some(name), _) => (catalog.find_quantity(name), name),
        (None, Some(symbol)) => (catalog.find_quantity_for_symbol(symbol), symbol),
        (None, None) => return Err(McpError::invalid_params("Provide name or symbol")),
    };
    Ok(match found {
        Some(quantity) => text_result(quantity.to_string(), quantity_to_json(quantity)),
        None => not_found("quantity", key),
    })
}

fn tool_convertible_units(catalog: &UnitCatalog, args: &JsonValue) -> Result<JsonValue, McpError> {
    let symbol = str_arg(args, "symbol")?;
    let units = catalog.find_convertible_units(symbol);
    if units.is_empty() {
        return Ok(not_found("unit", symbol));
    }
    let text = units.iter()
        .map(|u| format!("{} ({})", u.name(), u.display_symbol()))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text_result(text, JsonValue::Array(units.iter().map(unit_to_json).collect())))
}

fn tool_list_quantities(catalog: &UnitCatalog) -> JsonValue {
    let quantities = catalog.get_quantities();
    let text = quantities.iter()
        .map(|q| format!("{} ({} units, base {})", q.name(), q.units().len(), q.base_unit().symbol()))
        .collect::<Vec<_>>()
        .join("\n");
    text_result(text, JsonValue::Array(quantities.iter().map(quantity_to_json).collect()))
}

fn tool_catalog_info(catalog: &UnitCatalog) -> JsonValue {
    text_result(catalog.to_string(), json!({
        "quantities": catalog.quantity_count(),
        "units": catalog.unit_count(),
        "aliases": catalog.aliases().len(),
    }))
}

fn tool_add_alias(catalog: &mut UnitCatalog, args: &JsonValue) -> Result<JsonValue, McpError> {
    let symbol = str_arg(args, "symbol")?;
    let alias = str_arg(args, "alias")?.trim();
    Ok(match catalog.add_unit_alias(symbol, alias) {
        Ok(()) => {
            let canonical = catalog.aliases().resolve(alias);
            text_result(format!("{} -> {}", alias, canonical), json!({ "alias": alias, "symbol": canonical }))
        }
        Err(e) => error_result(&e),
    })
}
