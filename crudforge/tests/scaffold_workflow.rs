//! End-to-end scaffolding against a temporary workspace

use crudforge::mutate::{ChangeKind, WriteMode};
use crudforge::scaffold::{FieldDefinition, ResourceContext, ScaffoldGenerator, TemplateRegistry};
use crudforge::Workspace;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ROUTERS: &str = "\
from app.api.v1.endpoints import messages
from fastapi import APIRouter

api_router = APIRouter()
api_router.include_router(messages.router)
";

fn seed(root: &Path) {
    let app = root.join("backend/app");
    fs::create_dir_all(app.join("api/v1")).unwrap();
    fs::create_dir_all(app.join("models")).unwrap();
    fs::write(app.join("api/v1/routers.py"), ROUTERS).unwrap();
    fs::write(app.join("models/__init__.py"), "from .message import Message\n").unwrap();
}

fn generator(root: &Path) -> ScaffoldGenerator {
    ScaffoldGenerator::new(Workspace::new(root), TemplateRegistry::new().unwrap())
}

fn widget() -> ResourceContext {
    let fields = FieldDefinition::parse_all(&["title:string:true", "count:integer:false"]).unwrap();
    ResourceContext::new("widget", fields).unwrap()
}

#[test]
fn test_widget_end_to_end() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let report = generator(dir.path())
        .create_resource(&widget(), WriteMode::Apply)
        .unwrap();
    assert_eq!(report.files.len(), 6);
    assert!(report.changes().all(|c| c.changed()));

    let app = dir.path().join("backend/app");
    let model = fs::read_to_string(app.join("models/widget.py")).unwrap();
    assert!(model.contains("class Widget(Base):"));
    assert!(model.contains("__tablename__ = \"widgets\""));
    assert!(model.contains("title = Column(String, nullable=False)"));
    assert!(model.contains("count = Column(Integer)\n"));

    let schema = fs::read_to_string(app.join("db/schemas/widget.py")).unwrap();
    assert!(schema.contains("class WidgetCreate(BaseModel):\n    title: str\n"));
    assert!(schema.contains("    count: Optional[int] = None"));

    let crud = fs::read_to_string(app.join("crud/crud_widget.py")).unwrap();
    assert!(crud.contains("crud_widget = CRUDBase[Widget, WidgetCreate, WidgetUpdate](Widget)"));

    let endpoint = fs::read_to_string(app.join("api/v1/endpoints/widgets.py")).unwrap();
    assert!(endpoint.contains("@router.get(\"/widgets/\""));

    let api = dir.path().join("frontend/src/pages/api/widgets");
    assert!(api.join("index.js").is_file());
    assert!(api.join("[widget_id].js").is_file());

    let routers = fs::read_to_string(app.join("api/v1/routers.py")).unwrap();
    let import = "from app.api.v1.endpoints import widgets";
    let include = "api_router.include_router(widgets.router)";
    assert_eq!(routers.lines().filter(|l| *l == import).count(), 1);
    assert_eq!(routers.lines().filter(|l| *l == include).count(), 1);
    assert_eq!(routers.lines().filter(|l| !l.is_empty()).count(), 6);

    let models = fs::read_to_string(app.join("models/__init__.py")).unwrap();
    assert_eq!(models, "from .message import Message\nfrom .widget import Widget\n");
}

#[test]
fn test_rescaffold_is_idempotent() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());
    let generator = generator(dir.path());

    generator.create_resource(&widget(), WriteMode::Apply).unwrap();
    let routers_before = fs::read_to_string(dir.path().join("backend/app/api/v1/routers.py")).unwrap();

    let second = generator.create_resource(&widget(), WriteMode::Apply).unwrap();
    assert!(second.changes().all(|c| c.kind == ChangeKind::Unchanged));

    let routers_after = fs::read_to_string(dir.path().join("backend/app/api/v1/routers.py")).unwrap();
    assert_eq!(routers_before, routers_after);
}

#[test]
fn test_missing_registration_files_are_skipped() {
    let dir = TempDir::new().unwrap();

    let report = generator(dir.path())
        .create_resource(&widget(), WriteMode::Apply)
        .unwrap();

    assert!(report.files.iter().all(|c| c.kind == ChangeKind::Created));
    assert!(report.registrations.iter().all(|c| c.kind == ChangeKind::Skipped));
    assert!(!dir.path().join("backend/app/api/v1/routers.py").exists());
}

#[test]
fn test_dry_run_reports_router_diff() {
    let dir = TempDir::new().unwrap();
    seed(dir.path());

    let report = generator(dir.path())
        .create_resource(&widget(), WriteMode::DryRun)
        .unwrap();

    let router = &report.registrations[0];
    assert_eq!(router.kind, ChangeKind::Updated);
    let diff = router.diff.as_deref().unwrap();
    assert!(diff.contains("+from app.api.v1.endpoints import widgets"));
    assert_eq!(
        fs::read_to_string(dir.path().join("backend/app/api/v1/routers.py")).unwrap(),
        ROUTERS
    );
    assert!(!dir.path().join("backend/app/models/widget.py").exists());
}

#[test]
fn test_admin_resource_handlers_check_admin() {
    let dir = TempDir::new().unwrap();
    let ctx = widget().with_admin(true);
    generator(dir.path()).create_resource(&ctx, WriteMode::Apply).unwrap();

    let index =
        fs::read_to_string(dir.path().join("frontend/src/pages/api/widgets/index.js")).unwrap();
    assert!(index.contains("isAdmin"));
    assert!(index.contains("403"));
}

#[test]
fn test_page_and_component() {
    let dir = TempDir::new().unwrap();
    let generator = generator(dir.path());

    let page = generator.create_page("poster-board", WriteMode::Apply).unwrap();
    assert_eq!(page.path, Path::new("frontend/src/pages/poster-board.js"));
    let content = fs::read_to_string(dir.path().join(&page.path)).unwrap();
    assert!(content.contains("export default function PosterBoardPage()"));

    let component = generator
        .create_component("UserCard", Path::new("users"), Some("Shows a user"), WriteMode::Apply)
        .unwrap();
    assert_eq!(component.path, Path::new("frontend/src/components/users/UserCard.js"));
    let content = fs::read_to_string(dir.path().join(&component.path)).unwrap();
    assert!(content.contains("Shows a user"));
    assert!(content.contains("export default function UserCard()"));
}

#[test]
fn test_api_client_injection_into_generated_page() {
    let dir = TempDir::new().unwrap();
    let generator = generator(dir.path());
    generator.create_page("widgets", WriteMode::Apply).unwrap();

    generator
        .create_api_client(Path::new("pages/widgets.js"), &widget(), WriteMode::Apply)
        .unwrap();

    let content = fs::read_to_string(dir.path().join("frontend/src/pages/widgets.js")).unwrap();
    assert!(content.starts_with("import React, { useState, useEffect } from 'react';"));
    assert!(content.contains("/api/widgets"));
}

#[test]
fn test_api_client_without_component_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("frontend/src/lib/util.js");
    fs::create_dir_all(target.parent().unwrap()).unwrap();
    let original = "export const helper = () => 1;\n";
    fs::write(&target, original).unwrap();

    let result = generator(dir.path()).create_api_client(
        Path::new("lib/util.js"),
        &widget(),
        WriteMode::Apply,
    );

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&target).unwrap(), original);
}
