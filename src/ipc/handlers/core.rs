use crate::db;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Open (or create) the workspace database and replace the in-memory roster
/// with what it holds.
pub fn select_workspace(state: &mut AppState, path: &Path) -> anyhow::Result<()> {
    let conn = db::open_db(path)?;
    let roster = db::load_roster(&conn)?;
    tracing::info!(
        workspace = %path.display(),
        students = roster.len(),
        "workspace selected"
    );
    state.workspace = Some(path.to_path_buf());
    state.db = Some(conn);
    state.roster = roster;
    Ok(())
}

fn handle_health(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
        "studentCount": state.roster.len(),
    }))
}

fn handle_workspace_select(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let path = PathBuf::from(get_required_str(&req.params, "path")?);
    select_workspace(state, &path)
        .map_err(|e| HandlerErr::new("db_open_failed", format!("{e:?}")))?;
    Ok(json!({
        "workspacePath": path.to_string_lossy(),
        "studentCount": state.roster.len(),
    }))
}

fn handle_reset(state: &mut AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    if let Some(conn) = state.db.as_ref() {
        db::clear_roster(conn).map_err(|e| HandlerErr::new("db_write_failed", e.to_string()))?;
    }
    state.roster.reset();
    tracing::info!("roster reset");
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "health" => handle_health(state, req),
        "workspace.select" => handle_workspace_select(state, req),
        "dev.reset" => handle_reset(state, req),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
