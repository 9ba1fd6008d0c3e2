use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn settings_json(state: &AppState) -> serde_json::Value {
    serde_json::to_value(&state.config).unwrap_or_else(|_| json!({}))
}

fn handle_setup_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "settings": settings_json(state) }))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(patch) = req.params.get("patch") else {
        return err(&req.id, "bad_params", "missing patch", None);
    };
    // rosterPath only takes effect through roster.load.
    if patch.get("rosterPath").is_some() {
        return err(
            &req.id,
            "bad_params",
            "use roster.load to change the roster",
            Some(json!({ "key": "rosterPath" })),
        );
    }
    match state.config.merged(patch) {
        Ok(next) => {
            let schedule_cleared = state.replace_config(next);
            tracing::info!(schedule_cleared, "settings updated");
            ok(
                &req.id,
                json!({
                    "settings": settings_json(state),
                    "scheduleCleared": schedule_cleared,
                }),
            )
        }
        Err(e) => err(&req.id, "bad_params", format!("{e:#}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "setup.get" => Some(handle_setup_get(state, req)),
        "setup.update" => Some(handle_setup_update(state, req)),
        _ => None,
    }
}
