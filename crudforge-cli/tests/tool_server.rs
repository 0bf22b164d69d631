//! JSON-RPC tool server driven line by line

use crudforge::config::ForgeConfig;
use crudforge::process::{CommandSpec, ProcessOutput, ProcessRunner};
use crudforge::Result;
use crudforge_cli::mcp::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION};
use crudforge_cli::ToolServer;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Records commands; fails every command whose program is `fail_program`
#[derive(Default)]
struct RecordingRunner {
    calls: RefCell<Vec<CommandSpec>>,
    fail_program: Option<&'static str>,
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<ProcessOutput> {
        self.calls.borrow_mut().push(command.clone());
        let failed = self.fail_program == Some(command.program.as_str());
        Ok(ProcessOutput {
            success: !failed,
            stdout: String::new(),
            stderr: if failed { "boom".to_string() } else { String::new() },
        })
    }
}

fn server(root: &Path) -> ToolServer<RecordingRunner> {
    let config = ForgeConfig::default().with_root(root);
    ToolServer::with_runner(config, RecordingRunner::default()).unwrap()
}

fn send(server: &ToolServer<RecordingRunner>, request: &Value) -> Value {
    let response = server.handle_line(&request.to_string()).unwrap();
    serde_json::to_value(&response).unwrap()
}

fn call(server: &ToolServer<RecordingRunner>, tool: &str, arguments: Value) -> Value {
    send(
        server,
        &json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": tool, "arguments": arguments }
        }),
    )
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[test]
fn test_initialize_and_list() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let init = send(&server, &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}));
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(init["result"]["serverInfo"]["name"], "crudforge");

    let list = send(&server, &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
    let names: Vec<&str> = list["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "create_resource",
            "create_frontend_page",
            "create_frontend_component",
            "create_api_client",
            "add_middleware_route",
            "audit_resource",
            "apply_migrations",
            "read_logs",
            "restart_backend",
        ]
    );
}

#[test]
fn test_protocol_errors() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let parse = serde_json::to_value(server.handle_line("{not json").unwrap()).unwrap();
    assert_eq!(parse["error"]["code"], PARSE_ERROR);
    assert_eq!(parse["id"], Value::Null);

    let unknown = send(&server, &json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}));
    assert_eq!(unknown["error"]["code"], METHOD_NOT_FOUND);

    let bad_args = call(&server, "create_resource", json!({"fields": []}));
    assert_eq!(bad_args["error"]["code"], INVALID_PARAMS);

    let unknown_tool = call(&server, "drop_database", json!({}));
    assert_eq!(unknown_tool["error"]["code"], INVALID_PARAMS);
}

#[test]
fn test_notifications_and_blank_lines_get_no_reply() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());
    assert!(server.handle_line("   ").is_none());
    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .is_none());
}

#[test]
fn test_request_without_id_runs_but_gets_no_reply() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let request = json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {
            "name": "create_frontend_page",
            "arguments": { "page_name": "logger" }
        }
    });
    assert!(server.handle_line(&request.to_string()).is_none());
    assert!(dir.path().join("frontend/src/pages/logger.js").is_file());

    assert!(server
        .handle_line(r#"{"jsonrpc":"2.0","method":"tools/list"}"#)
        .is_none());
}

#[test]
fn test_invalid_utf8_line_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let response = server.handle_bytes(b"{\"id\": 1, \"method\": \"\xff\"}\n").unwrap();
    let response = serde_json::to_value(&response).unwrap();
    assert_eq!(response["error"]["code"], PARSE_ERROR);

    let ping = server
        .handle_bytes(b"{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n")
        .unwrap();
    assert_eq!(serde_json::to_value(&ping).unwrap()["id"], 2);
}

#[test]
fn test_create_resource_with_mixed_fields() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let response = call(
        &server,
        "create_resource",
        json!({
            "resource_name": "logger_entry",
            "fields": [
                "category_id:integer:true",
                { "name": "note", "type": "text", "required": false }
            ],
            "is_admin_resource": true
        }),
    );

    assert!(response["result"].get("isError").is_none(), "{response}");
    assert!(text(&response).contains("backend/app/models/logger_entry.py"));
    let schema =
        fs::read_to_string(dir.path().join("backend/app/db/schemas/logger_entry.py")).unwrap();
    assert!(schema.contains("    category_id: int\n"));
    assert!(schema.contains("    note: Optional[str] = None\n"));
    let handler = fs::read_to_string(
        dir.path()
            .join("frontend/src/pages/api/logger_entries/[logger_entry_id].js"),
    )
    .unwrap();
    assert!(handler.contains("isAdmin"));
}

#[test]
fn test_operation_failure_is_tool_error() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let response = call(
        &server,
        "create_resource",
        json!({ "resource_name": "widget", "fields": ["price:money:true"] }),
    );
    assert_eq!(response["result"]["isError"], true);
    assert!(text(&response).contains("price:money:true"));
    assert!(!dir.path().join("backend").exists());

    let response = call(&server, "read_logs", json!({}));
    assert_eq!(response["result"]["isError"], true);
}

#[test]
fn test_middleware_route_tool() {
    let dir = TempDir::new().unwrap();
    let middleware = dir.path().join("frontend/src/middleware.js");
    fs::create_dir_all(middleware.parent().unwrap()).unwrap();
    fs::write(
        &middleware,
        "// --- MCP will insert ADMIN_ROUTES here ---\nconst ADMIN_ROUTES = [];\n",
    )
    .unwrap();
    let server = server(dir.path());

    let response = call(
        &server,
        "add_middleware_route",
        json!({ "route_path": "/admin/logs", "route_type": "admin" }),
    );
    assert!(text(&response).starts_with("Added route '/admin/logs' to ADMIN_ROUTES"));
    assert_eq!(
        fs::read_to_string(&middleware).unwrap(),
        "// --- MCP will insert ADMIN_ROUTES here ---\nconst ADMIN_ROUTES = [\n  \"/admin/logs\",\n];\n"
    );
}

#[test]
fn test_apply_migrations_runs_in_backend_container() {
    let dir = TempDir::new().unwrap();
    let server = server(dir.path());

    let response = call(&server, "apply_migrations", json!({}));
    assert_eq!(
        text(&response),
        "Successfully created and applied database migrations."
    );

    let calls: Vec<String> = server
        .runner()
        .calls
        .borrow()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        calls,
        vec![
            "docker exec -w /code backend alembic revision --autogenerate -m \"Applied migrations via MCP\"",
            "docker exec -w /code backend alembic upgrade head",
        ]
    );

    call(&server, "restart_backend", json!({ "container": "api" }));
    assert_eq!(
        server.runner().calls.borrow().last().unwrap().to_string(),
        "docker restart api"
    );
}

#[test]
fn test_migration_failure_reports_step() {
    let dir = TempDir::new().unwrap();
    let config = ForgeConfig::default().with_root(dir.path());
    let runner = RecordingRunner {
        fail_program: Some("docker"),
        ..RecordingRunner::default()
    };
    let server = ToolServer::with_runner(config, runner).unwrap();

    let response = server
        .handle_line(
            &json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "tools/call",
                "params": { "name": "apply_migrations", "arguments": { "message": "add widgets" } }
            })
            .to_string(),
        )
        .unwrap();
    let response = serde_json::to_value(&response).unwrap();
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(text(&response), "Error: Error creating revision: boom");
}

#[test]
fn test_read_logs_tool() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("backend/logs/backend.log");
    fs::create_dir_all(log.parent().unwrap()).unwrap();
    fs::write(
        &log,
        "t - app - INFO - one\nt - app - ERROR - two\nt - app - INFO - three\n",
    )
    .unwrap();
    let server = server(dir.path());

    let response = call(&server, "read_logs", json!({ "lines": 5, "level": "info" }));
    assert_eq!(text(&response), "t - app - INFO - one\nt - app - INFO - three");
}
