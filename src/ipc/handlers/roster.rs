use crate::ipc::error::{err, get_required_str, ok};
use crate::ipc::types::{AppState, Request};
use crate::roster::load_roster;
use serde_json::json;
use std::path::PathBuf;

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "students": state.roster }))
}

fn handle_roster_load(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match get_required_str(&req.params, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };
    match load_roster(&path) {
        Ok(roster) => {
            let count = roster.len();
            state.replace_roster(roster);
            state.config.roster_path = Some(path.clone());
            tracing::info!(path = %path.display(), students = count, "roster loaded");
            ok(
                &req.id,
                json!({ "path": path.to_string_lossy(), "studentCount": count }),
            )
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "roster load failed");
            err(
                &req.id,
                "roster_load_failed",
                format!("{e:#}"),
                Some(json!({ "path": path.to_string_lossy() })),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.list" => Some(handle_roster_list(state, req)),
        "roster.load" => Some(handle_roster_load(state, req)),
        _ => None,
    }
}
