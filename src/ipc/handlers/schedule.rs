use crate::calendar::parse_date_key;
use crate::ipc::error::{err, get_required_str, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::state::{Event, Outcome, View};
use crate::summary::summarize;
use serde_json::json;

fn handle_schedule_generate(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.dispatch(Event::GenerateSchedule);
    let assignments = state.scheduler.assignments();
    ok(
        &req.id,
        json!({
            "assignments": assignments,
            "meetingCount": assignments.meeting_count(),
            "summary": summarize(assignments),
            "view": state.scheduler.view(),
        }),
    )
}

fn handle_schedule_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(state.scheduler))
}

fn schedule_day(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let date = get_required_str(params, "date")?;
    if parse_date_key(&date).is_none() {
        return Err(HandlerErr {
            code: "bad_params",
            message: "date must be YYYY-MM-DD".to_string(),
            details: Some(json!({ "date": date })),
        });
    }
    let assignments = state.scheduler.assignments();
    let summary = summarize(assignments);
    let (Some(day), Some(counts)) = (assignments.day(&date), summary.day(&date)) else {
        return Err(HandlerErr {
            code: "not_scheduled",
            message: format!("no schedule for {}", date),
            details: Some(json!({ "date": date })),
        });
    };
    Ok(json!({
        "date": day.date,
        "meetings": day.meetings,
        "summary": counts,
    }))
}

fn handle_schedule_day(state: &mut AppState, req: &Request) -> serde_json::Value {
    match schedule_day(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_view_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = match get_required_str(&req.params, "view") {
        Ok(v) => v,
        Err(e) => return e.response(&req.id),
    };
    let Some(view) = View::parse(&raw) else {
        return err(
            &req.id,
            "bad_params",
            "view must be calendar or overview",
            Some(json!({ "view": raw })),
        );
    };
    let outcome = state.dispatch(Event::SetView(view));
    ok(
        &req.id,
        json!({
            "applied": outcome == Outcome::Applied,
            "view": state.scheduler.view(),
        }),
    )
}

fn handle_summary_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!(summarize(state.scheduler.assignments())))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "schedule.generate" => Some(handle_schedule_generate(state, req)),
        "schedule.get" => Some(handle_schedule_get(state, req)),
        "schedule.day" => Some(handle_schedule_day(state, req)),
        "view.set" => Some(handle_view_set(state, req)),
        "summary.get" => Some(handle_summary_get(state, req)),
        _ => None,
    }
}
