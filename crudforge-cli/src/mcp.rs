//! Stdio tool server
//!
//! Speaks line-delimited JSON-RPC 2.0 on stdin/stdout with the MCP
//! `initialize`, `tools/list` and `tools/call` methods. Every tool runs the
//! same engine operation as the matching CLI command.
//!
//! Protocol errors (bad JSON, unknown method, malformed arguments) are
//! JSON-RPC errors. Operation failures are successful responses whose result
//! carries `isError: true` and the error text, so the client can show them.

use crudforge::audit::audit_resource;
use crudforge::config::ForgeConfig;
use crudforge::logs::{read_logs, LogQuery};
use crudforge::migrations::{MigrationDriver, DEFAULT_CONTAINER};
use crudforge::mutate::{add_middleware_route, RouteList, WriteMode};
use crudforge::process::{ProcessRunner, SystemRunner};
use crudforge::scaffold::{FieldDefinition, ResourceContext, ScaffoldGenerator};
use crudforge::Workspace;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// MCP protocol revision implemented here
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Invalid JSON was received
pub const PARSE_ERROR: i32 = -32700;
/// The method does not exist
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters
pub const INVALID_PARAMS: i32 = -32602;

fn parse_error(error: &dyn std::fmt::Display) -> JsonRpcResponse {
    JsonRpcResponse::failure(
        None,
        JsonRpcError {
            code: PARSE_ERROR,
            message: format!("Parse error: {error}"),
        },
    )
}

/// Revision message used by `apply_migrations` when none is given
const TOOL_MIGRATION_MESSAGE: &str = "Applied migrations via MCP";

/// JSON-RPC request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    #[serde(default)]
    jsonrpc: String,
    /// Request id; absent for notifications
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Method parameters
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    /// Id of the request being answered
    pub id: Option<Value>,
    /// Result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Human-readable message
    pub message: String,
}

impl JsonRpcError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
        }
    }
}

/// Tool definition
#[derive(Debug, Serialize)]
struct Tool {
    name: &'static str,
    description: &'static str,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

/// A field given either as `name:type:required` or as an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldInput {
    Definition(String),
    Structured {
        name: String,
        #[serde(rename = "type")]
        field_type: String,
        #[serde(default = "default_required")]
        required: bool,
    },
}

const fn default_required() -> bool {
    true
}

impl FieldInput {
    fn parse_all(inputs: &[Self]) -> crudforge::Result<Vec<FieldDefinition>> {
        inputs
            .iter()
            .map(|input| match input {
                Self::Definition(definition) => FieldDefinition::parse(definition),
                Self::Structured {
                    name,
                    field_type,
                    required,
                } => FieldDefinition::from_parts(name, field_type, *required),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct CreateResourceArgs {
    resource_name: String,
    fields: Vec<FieldInput>,
    #[serde(default)]
    is_admin_resource: bool,
    #[serde(default)]
    dry_run: bool,
}

#[derive(Debug, Deserialize)]
struct CreatePageArgs {
    page_name: String,
}

#[derive(Debug, Deserialize)]
struct CreateComponentArgs {
    component_name: String,
    #[serde(default)]
    path: PathBuf,
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateApiClientArgs {
    file_path: PathBuf,
    resource_name: String,
    fields: Vec<FieldInput>,
}

#[derive(Debug, Deserialize)]
struct MiddlewareRouteArgs {
    route_path: String,
    #[serde(default)]
    route_type: RouteList,
}

#[derive(Debug, Deserialize)]
struct AuditArgs {
    resource_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MigrationArgs {
    message: Option<String>,
    container: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadLogsArgs {
    lines: Option<usize>,
    level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RestartArgs {
    container: Option<String>,
}

/// Serves crudforge operations as tools
#[derive(Debug)]
pub struct ToolServer<R = SystemRunner> {
    config: ForgeConfig,
    generator: ScaffoldGenerator,
    runner: R,
}

impl ToolServer<SystemRunner> {
    /// Create a server that runs child processes for real
    ///
    /// # Errors
    ///
    /// Returns an error if a template override cannot be loaded.
    pub fn new(config: ForgeConfig) -> crudforge::Result<Self> {
        Self::with_runner(config, SystemRunner)
    }
}

impl<R: ProcessRunner> ToolServer<R> {
    /// Create a server with a custom process runner
    ///
    /// # Errors
    ///
    /// Returns an error if a template override cannot be loaded.
    pub fn with_runner(config: ForgeConfig, runner: R) -> crudforge::Result<Self> {
        let generator = ScaffoldGenerator::from_config(&config)?;
        Ok(Self {
            config,
            generator,
            runner,
        })
    }

    /// Process runner used for migrations and restarts
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Serve requests from stdin until it closes
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or stdout cannot be written.
    pub fn serve_stdio(&self) -> anyhow::Result<()> {
        let mut stdin = std::io::stdin().lock();
        let mut stdout = std::io::stdout();
        tracing::info!(root = %self.config.workspace.root.display(), "tool server listening on stdio");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if stdin.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            if let Some(response) = self.handle_bytes(&buf) {
                writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
                stdout.flush()?;
            }
        }

        tracing::info!("stdin closed, tool server stopping");
        Ok(())
    }

    /// Handle one raw line of input, which may not be UTF-8
    pub fn handle_bytes(&self, line: &[u8]) -> Option<JsonRpcResponse> {
        match std::str::from_utf8(line) {
            Ok(line) => self.handle_line(line),
            Err(e) => Some(parse_error(&e)),
        }
    }

    /// Handle one line of input
    ///
    /// Returns `None` for blank lines and notifications, which get no reply.
    pub fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(request),
            Err(e) => Some(parse_error(&e)),
        }
    }

    /// Dispatch a parsed request
    ///
    /// A request without an id is a notification: it still runs, but the
    /// response is dropped.
    pub fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.id.is_none() && request.method.starts_with("notifications/") {
            tracing::debug!(method = %request.method, "notification");
            return None;
        }

        tracing::debug!(method = %request.method, "request");
        let result = match request.method.as_str() {
            "initialize" => Ok(Self::initialize()),
            "tools/list" => Ok(json!({ "tools": tool_definitions() })),
            "tools/call" => self.call_tool(request.params),
            "ping" => Ok(json!({})),
            other => Err(JsonRpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {other}"),
            }),
        };

        let id = request.id?;
        Some(match result {
            Ok(value) => JsonRpcResponse::success(Some(id), value),
            Err(error) => JsonRpcResponse::failure(Some(id), error),
        })
    }

    fn initialize() -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "serverInfo": {
                "name": "crudforge",
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {}
            }
        })
    }

    fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let name = params["name"]
            .as_str()
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let outcome = match name {
            "create_resource" => self.create_resource(&parse_args(args)?),
            "create_frontend_page" => self.create_page(&parse_args(args)?),
            "create_frontend_component" => self.create_component(&parse_args(args)?),
            "create_api_client" => self.create_api_client(&parse_args(args)?),
            "add_middleware_route" => self.add_route(&parse_args(args)?),
            "audit_resource" => self.audit(&parse_args(args)?),
            "apply_migrations" => self.apply_migrations(parse_args(args)?),
            "read_logs" => self.read_logs(parse_args(args)?),
            "restart_backend" => self.restart_backend(parse_args(args)?),
            other => return Err(JsonRpcError::invalid_params(format!("Unknown tool: {other}"))),
        };

        Ok(match outcome {
            Ok(text) => json!({ "content": [{ "type": "text", "text": text }] }),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool failed");
                json!({
                    "content": [{ "type": "text", "text": format!("Error: {err}") }],
                    "isError": true
                })
            }
        })
    }

    fn workspace(&self) -> &Workspace {
        self.generator.workspace()
    }

    fn create_resource(&self, args: &CreateResourceArgs) -> crudforge::Result<String> {
        let fields = FieldInput::parse_all(&args.fields)?;
        let ctx = ResourceContext::new(&args.resource_name, fields)?
            .with_admin(args.is_admin_resource);
        let report = self
            .generator
            .create_resource(&ctx, WriteMode::from_dry_run(args.dry_run))?;

        let mut text = report.to_string();
        for diff in report.changes().filter_map(|c| c.diff.as_deref()) {
            text.push('\n');
            text.push_str(diff);
        }
        Ok(text)
    }

    fn create_page(&self, args: &CreatePageArgs) -> crudforge::Result<String> {
        let change = self.generator.create_page(&args.page_name, WriteMode::Apply)?;
        Ok(format!("Page created at {}", change.path.display()))
    }

    fn create_component(&self, args: &CreateComponentArgs) -> crudforge::Result<String> {
        let change = self.generator.create_component(
            &args.component_name,
            &args.path,
            args.prompt.as_deref(),
            WriteMode::Apply,
        )?;
        Ok(format!(
            "Component {} created at {}",
            args.component_name,
            change.path.display()
        ))
    }

    fn create_api_client(&self, args: &CreateApiClientArgs) -> crudforge::Result<String> {
        let fields = FieldInput::parse_all(&args.fields)?;
        let ctx = ResourceContext::new(&args.resource_name, fields)?;
        let change = self
            .generator
            .create_api_client(&args.file_path, &ctx, WriteMode::Apply)?;
        Ok(format!(
            "Injected API client for {} into {}",
            ctx.plural(),
            change.path.display()
        ))
    }

    fn add_route(&self, args: &MiddlewareRouteArgs) -> crudforge::Result<String> {
        let change = add_middleware_route(
            self.workspace(),
            &args.route_path,
            args.route_type,
            WriteMode::Apply,
        )?;
        Ok(if change.changed() {
            format!(
                "Added route '{}' to {} in {}",
                args.route_path,
                args.route_type,
                change.path.display()
            )
        } else {
            format!("Route '{}' is already in {}", args.route_path, args.route_type)
        })
    }

    fn audit(&self, args: &AuditArgs) -> crudforge::Result<String> {
        let report = audit_resource(self.workspace(), &args.resource_name)?;
        Ok(report.to_string())
    }

    fn migration_driver(&self, container: Option<String>) -> MigrationDriver<&R> {
        // the tool server always targets a container, `backend` unless told otherwise
        let container = container
            .or_else(|| self.config.migrations.container.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER.to_string());
        MigrationDriver::new(
            &self.runner,
            self.config.migrations.clone(),
            self.workspace().backend_dir(),
        )
        .with_container(Some(container))
    }

    fn apply_migrations(&self, args: MigrationArgs) -> crudforge::Result<String> {
        let message = args.message.as_deref().unwrap_or(TOOL_MIGRATION_MESSAGE);
        self.migration_driver(args.container).apply(Some(message))?;
        Ok("Successfully created and applied database migrations.".to_string())
    }

    fn read_logs(&self, args: ReadLogsArgs) -> crudforge::Result<String> {
        let path = self.workspace().resolve(&self.config.logs.file);
        let query = LogQuery::last(args.lines.unwrap_or(self.config.logs.default_lines))
            .with_level(args.level);
        let lines = read_logs(&path, &query)?;
        Ok(if lines.is_empty() {
            "No matching log lines.".to_string()
        } else {
            lines.join("\n")
        })
    }

    fn restart_backend(&self, args: RestartArgs) -> crudforge::Result<String> {
        let container = self.migration_driver(args.container).restart_backend()?;
        Ok(format!(
            "Container '{container}' restarting... Give it 5-10 seconds to come back online."
        ))
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(args)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid arguments: {e}")))
}

fn field_list_schema() -> Value {
    json!({
        "type": "array",
        "description": "Fields as 'name:type:required' strings or {name, type, required} objects",
        "items": {
            "oneOf": [
                { "type": "string" },
                {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "type": {
                            "type": "string",
                            "enum": ["string", "text", "integer", "float", "boolean", "date", "datetime", "uuid"]
                        },
                        "required": { "type": "boolean", "default": true }
                    },
                    "required": ["name", "type"]
                }
            ]
        }
    })
}

fn tool_definitions() -> Vec<Tool> {
    vec![
        Tool {
            name: "create_resource",
            description: "Generate backend model, schema, CRUD object and router plus frontend API handlers for a resource, and register it",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "resource_name": { "type": "string", "description": "Singular snake_case name (e.g. 'logger_entry')" },
                    "fields": field_list_schema(),
                    "is_admin_resource": { "type": "boolean", "default": false },
                    "dry_run": { "type": "boolean", "default": false }
                },
                "required": ["resource_name", "fields"]
            }),
        },
        Tool {
            name: "create_frontend_page",
            description: "Create a page under frontend/src/pages",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_name": { "type": "string", "description": "File name without extension (e.g. 'logger')" }
                },
                "required": ["page_name"]
            }),
        },
        Tool {
            name: "create_frontend_component",
            description: "Create a React component under frontend/src/components",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "component_name": { "type": "string", "description": "PascalCase name (e.g. 'UserProfile')" },
                    "path": { "type": "string", "description": "Directory relative to frontend/src/components" },
                    "prompt": { "type": "string", "description": "What the component should do" }
                },
                "required": ["component_name"]
            }),
        },
        Tool {
            name: "create_api_client",
            description: "Inject list/create/delete fetch code for a resource into an existing component",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "file_path": { "type": "string", "description": "File relative to frontend/src" },
                    "resource_name": { "type": "string" },
                    "fields": field_list_schema()
                },
                "required": ["file_path", "resource_name", "fields"]
            }),
        },
        Tool {
            name: "add_middleware_route",
            description: "Add a route to AUTH_REQUIRED_ROUTES or ADMIN_ROUTES in frontend/src/middleware.js",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "route_path": { "type": "string", "description": "e.g. '/api/my_data' or '/admin/page'" },
                    "route_type": { "type": "string", "enum": ["auth_required", "admin"], "default": "auth_required" }
                },
                "required": ["route_path"]
            }),
        },
        Tool {
            name: "audit_resource",
            description: "Compare a resource's Create schema fields with how the frontend uses them",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "resource_name": { "type": "string" }
                },
                "required": ["resource_name"]
            }),
        },
        Tool {
            name: "apply_migrations",
            description: "Create an autogenerated migration and upgrade to head inside the backend container",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "message": { "type": "string" },
                    "container": { "type": "string" }
                }
            }),
        },
        Tool {
            name: "read_logs",
            description: "Read the last lines of the backend log",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "lines": { "type": "integer", "minimum": 0 },
                    "level": { "type": "string", "description": "e.g. 'ERROR'" }
                }
            }),
        },
        Tool {
            name: "restart_backend",
            description: "Restart the backend container",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "container": { "type": "string" }
                }
            }),
        },
    ]
}
