/// MCP server implementation that handles JSON-RPC communication
///
/// The server:
/// 1. Reads one JSON-RPC message per line
/// 2. Pulls in changes other instances made to the store
/// 3. Routes tool calls to the tracker
/// 4. Writes one JSON-RPC response per line

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::KeyValueStore;
use crate::tools::{self, parse_args, ToolError};
use crate::tracker::HabitTracker;
use crate::ServerError;

/// MCP server owning one tracker instance
pub struct McpServer<S> {
    tracker: HabitTracker<S>,
    /// Whether the client has sent its initialized notification
    initialized: bool,
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn date_property() -> Value {
    json!({"type": "string", "description": "Date (YYYY-MM-DD), defaults to today"})
}

/// Every tool the server exposes
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool(
            "habit_create",
            "Create a new habit to track",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Name of the habit"},
                    "category": {"type": "string", "description": "fitness, nutrition, wellness or discipline"},
                    "type": {"type": "string", "description": "boolean (default), counter or duration"},
                    "target": {"type": "number", "description": "Daily target for counter/duration habits"},
                    "unit": {"type": "string", "description": "Unit of the target (e.g., glasses, hours)"},
                    "emoji": {"type": "string"},
                    "color": {"type": "string", "description": "Accent color, defaults to the category color"}
                },
                "required": ["name", "category"]
            }),
        ),
        tool(
            "habit_update",
            "Change a habit's name, type, target, unit, category, emoji or color. The id cannot be changed.",
            json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string"},
                    "name": {"type": "string"},
                    "type": {"type": "string"},
                    "target": {"type": ["number", "null"], "description": "null clears the target"},
                    "unit": {"type": ["string", "null"], "description": "null clears the unit"},
                    "category": {"type": "string"},
                    "emoji": {"type": "string"},
                    "color": {"type": "string"}
                },
                "required": ["habit_id"],
                "additionalProperties": false
            }),
        ),
        tool(
            "habit_delete",
            "Remove a habit. Its completion history is kept.",
            json!({
                "type": "object",
                "properties": {"habit_id": {"type": "string"}},
                "required": ["habit_id"]
            }),
        ),
        tool(
            "habit_reorder",
            "Change the display order of habits. Listed habits move to the front in the given order.",
            json!({
                "type": "object",
                "properties": {
                    "habit_ids": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["habit_ids"]
            }),
        ),
        tool(
            "habit_list",
            "List habits in display order with today's completion and current streak",
            json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Filter by category (optional)"}
                },
                "required": []
            }),
        ),
        tool(
            "habit_toggle",
            "Mark a habit done, or undo it, for today or a specific date",
            json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string"},
                    "date": date_property()
                },
                "required": ["habit_id"]
            }),
        ),
        tool(
            "habit_set_value",
            "Record progress on a counter or duration habit, either as an absolute value or as a delta",
            json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string"},
                    "value": {"type": "number", "description": "New value"},
                    "delta": {"type": "number", "description": "Amount to add (negative to subtract)"},
                    "date": date_property()
                },
                "required": ["habit_id"]
            }),
        ),
        tool(
            "day_log",
            "Show every habit's status for one day",
            json!({
                "type": "object",
                "properties": {"date": date_property()},
                "required": []
            }),
        ),
        tool(
            "habit_status",
            "Check streaks and completion rates for one habit or all habits",
            json!({
                "type": "object",
                "properties": {
                    "habit_id": {"type": "string", "description": "ID of a specific habit (optional)"}
                },
                "required": []
            }),
        ),
        tool(
            "dashboard",
            "Today's progress, daily goal, 7-day trend, streak records and category breakdown",
            json!({"type": "object", "properties": {}, "required": []}),
        ),
        tool(
            "month_overview",
            "Completion percentage for every day of a month",
            json!({
                "type": "object",
                "properties": {
                    "year": {"type": "integer"},
                    "month": {"type": "integer", "description": "1-12, defaults to the current month"}
                },
                "required": []
            }),
        ),
        tool(
            "weight_add",
            "Log a body-weight measurement in kg",
            json!({
                "type": "object",
                "properties": {
                    "weight": {"type": "number"},
                    "date": date_property()
                },
                "required": ["weight"]
            }),
        ),
        tool(
            "weight_delete",
            "Delete a weight entry by id",
            json!({
                "type": "object",
                "properties": {"id": {"type": "string"}},
                "required": ["id"]
            }),
        ),
        tool(
            "weight_summary",
            "Starting weight, current weight, overall change and recent entries",
            json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Number of recent entries (default 10)"}
                },
                "required": []
            }),
        ),
        tool(
            "daily_goal",
            "Read the daily goal (number of habits to complete each day), or set it",
            json!({
                "type": "object",
                "properties": {
                    "goal": {"type": "integer", "description": "New goal, at least 1 (omit to read)"}
                },
                "required": []
            }),
        ),
    ]
}

fn to_value<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => {
            error!("Failed to serialize result: {}", e);
            JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None)
        }
    }
}

impl<S: KeyValueStore> McpServer<S> {
    pub fn new(tracker: HabitTracker<S>) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    pub fn tracker(&self) -> &HabitTracker<S> {
        &self.tracker
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), ServerError> {
        let reader = BufReader::new(tokio::io::stdin());
        self.run_with(reader, tokio::io::stdout()).await
    }

    /// Serve newline-delimited JSON-RPC from `reader` until end of input
    pub async fn run_with<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle one line of input; `None` when no response is due
    pub fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.tracker.sync();

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }
        Some(self.handle_request(request))
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client initialized");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            );
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "tools/list" => to_value(id, &json!({"tools": tool_definitions()})),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        match params.client_info {
            Some(client) => info!(
                "MCP client connected: {} {}",
                client.name,
                client.version.unwrap_or_default()
            ),
            None => info!("MCP client connected"),
        }
        if let Some(version) = params.protocol_version.filter(|v| v != MCP_VERSION) {
            warn!("Client requested protocol {}, answering with {}", version, MCP_VERSION);
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "MuscleUp Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        to_value(id, &result)
    }

    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = match self.call_tool(&tool_params.name, tool_params.arguments) {
            Ok(message) => ToolCallResult::success(message),
            Err(e) => {
                debug!("Tool {} failed: {}", tool_params.name, e);
                ToolCallResult::error(e.to_string())
            }
        };

        to_value(id, &result)
    }

    /// Run one tool and return its text reply
    pub fn call_tool(
        &mut self,
        name: &str,
        args: HashMap<String, Value>,
    ) -> Result<String, ToolError> {
        let tracker = &mut self.tracker;
        let message = match name {
            "habit_create" => tools::create_habit(tracker, parse_args(args)?)?.message,
            "habit_update" => tools::update_habit(tracker, parse_args(args)?)?.message,
            "habit_delete" => tools::delete_habit(tracker, parse_args(args)?)?.message,
            "habit_reorder" => tools::reorder_habits(tracker, parse_args(args)?)?.message,
            "habit_list" => tools::list_habits(tracker, parse_args(args)?)?.message,
            "habit_toggle" => tools::toggle_habit(tracker, parse_args(args)?)?.message,
            "habit_set_value" => tools::set_habit_value(tracker, parse_args(args)?)?.message,
            "day_log" => tools::day_log(tracker, parse_args(args)?)?.message,
            "habit_status" => tools::get_habit_status(tracker, parse_args(args)?)?.message,
            "dashboard" => tools::get_dashboard(tracker, parse_args(args)?)?.message,
            "month_overview" => tools::get_month_overview(tracker, parse_args(args)?)?.message,
            "weight_add" => tools::add_weight(tracker, parse_args(args)?)?.message,
            "weight_delete" => tools::delete_weight(tracker, parse_args(args)?)?.message,
            "weight_summary" => tools::weight_summary(tracker, parse_args(args)?)?.message,
            "daily_goal" => tools::daily_goal(tracker, parse_args(args)?)?.message,
            _ => return Err(ToolError::UnknownTool(name.to_string())),
        };
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_date, CivilCalendar, HabitId};
    use crate::storage::MemoryStore;
    use crate::sync::NoSync;

    fn server() -> McpServer<MemoryStore> {
        let calendar = CivilCalendar::pinned_on(parse_date("2024-03-15").unwrap());
        McpServer::new(HabitTracker::load(MemoryStore::new(), calendar, Box::new(NoSync)))
    }

    fn call(server: &mut McpServer<MemoryStore>, line: Value) -> Value {
        let response = server.process_line(&line.to_string()).unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_every_tool_is_listed_and_routed() {
        let mut server = server();
        let definitions = tool_definitions();
        assert_eq!(definitions.len(), 15);

        for definition in definitions {
            let result = server.call_tool(&definition.name, HashMap::new());
            assert!(
                !matches!(result, Err(ToolError::UnknownTool(_))),
                "{} is not routed",
                definition.name
            );
        }
    }

    #[test]
    fn test_tools_call_success_and_error() {
        let mut server = server();
        let ok = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
                   "params": {"name": "habit_toggle", "arguments": {"habit_id": "gym"}}}),
        );
        assert_eq!(ok["result"]["isError"], json!(false));
        assert!(server
            .tracker()
            .logs()
            .is_completed(&HabitId::from("gym"), server.tracker().calendar().today()));

        let failed = call(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "habit_toggle", "arguments": {"habit_id": "unicorn"}}}),
        );
        assert_eq!(failed["result"]["isError"], json!(true));
        assert_eq!(failed["id"], json!(2));
    }

    #[test]
    fn test_protocol_errors() {
        let mut server = server();
        let parse = server.process_line("{not json").unwrap();
        assert_eq!(parse.error.unwrap().code, error_codes::PARSE_ERROR);

        let unknown = call(&mut server, json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}));
        assert_eq!(unknown["error"]["code"], json!(error_codes::METHOD_NOT_FOUND));

        let missing = call(&mut server, json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call"}));
        assert_eq!(missing["error"]["code"], json!(error_codes::INVALID_PARAMS));
    }

    #[test]
    fn test_notifications_get_no_response() {
        let mut server = server();
        let line = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
        assert!(server.process_line(&line).is_none());
        assert!(server.is_initialized());
        assert!(server.process_line("   ").is_none());
    }
}
