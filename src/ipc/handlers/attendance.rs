use crate::ipc::error::{get_required_str, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::schedule::Attendance;
use crate::state::{Event, Outcome};
use serde_json::json;

fn attendance_update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_required_str(params, "date")?;
    let meeting_id = get_required_str(params, "meetingId")?;
    let raw_status = get_required_str(params, "status")?;
    let Some(status) = Attendance::parse(&raw_status) else {
        return Err(HandlerErr {
            code: "bad_params",
            message: "status must be Present, Absent or Late".to_string(),
            details: Some(json!({ "status": raw_status })),
        });
    };

    let outcome = state.dispatch(Event::UpdateAttendance {
        date: date.clone(),
        meeting_id: meeting_id.clone(),
        status,
    });
    Ok(json!({
        "updated": outcome == Outcome::Applied,
        "date": date,
        "meetingId": meeting_id,
        "status": status,
    }))
}

fn handle_attendance_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    match attendance_update(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.update" => Some(handle_attendance_update(state, req)),
        _ => None,
    }
}
