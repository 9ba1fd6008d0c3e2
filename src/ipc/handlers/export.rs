use crate::export::{format_document, ExportLabels, TabularDocument};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::roster;
use crate::summary::summarize;
use crate::workbook::write_workbook;
use serde_json::json;
use std::path::PathBuf;

fn export_labels(state: &AppState) -> ExportLabels {
    ExportLabels {
        classes: state
            .config
            .class_labels
            .clone()
            .unwrap_or_else(|| roster::class_labels(&state.roster)),
        instructors: state
            .config
            .instructor_labels
            .clone()
            .unwrap_or_else(|| roster::instructor_labels(&state.roster)),
        priority: state.config.priority,
    }
}

fn build_document(state: &AppState) -> TabularDocument {
    let assignments = state.scheduler.assignments();
    format_document(assignments, &summarize(assignments), &export_labels(state))
}

fn handle_export_document(state: &mut AppState, req: &Request) -> serde_json::Value {
    let doc = build_document(state);
    let Some(sheet) = req.params.get("sheet").and_then(|v| v.as_str()) else {
        return ok(&req.id, json!(doc));
    };
    match doc.table(sheet) {
        Some(table) => ok(&req.id, json!({ "tables": [table] })),
        None => err(
            &req.id,
            "bad_params",
            format!("no sheet named {}", sheet),
            Some(json!({ "sheet": sheet })),
        ),
    }
}

fn handle_export_workbook(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = req
        .params
        .get("outPath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(state.config.export_file_name()));

    let doc = build_document(state);
    match write_workbook(&doc, &out_path) {
        Ok(summary) => {
            tracing::info!(
                path = %out_path.display(),
                sheets = summary.sheet_names.len(),
                rows = summary.rows_written,
                "workbook exported"
            );
            ok(
                &req.id,
                json!({
                    "path": out_path.to_string_lossy(),
                    "sheets": summary.sheet_names,
                    "rowsExported": summary.rows_written,
                    "bytes": summary.bytes,
                }),
            )
        }
        Err(e) => {
            tracing::warn!(path = %out_path.display(), error = %e, "workbook export failed");
            err(
                &req.id,
                "export_failed",
                format!("{e:#}"),
                Some(json!({ "path": out_path.to_string_lossy() })),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.document" => Some(handle_export_document(state, req)),
        "export.workbook" => Some(handle_export_workbook(state, req)),
        _ => None,
    }
}
