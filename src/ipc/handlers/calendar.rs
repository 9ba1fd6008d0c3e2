use crate::calendar::{calendar_days, date_key, parse_date_key, MAX_CALENDAR_DAYS};
use crate::ipc::error::{get_required_str, ok, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::state::Event;
use chrono::{Local, NaiveDate};
use serde_json::json;

fn parse_today(params: &serde_json::Value) -> Result<NaiveDate, HandlerErr> {
    match params.get("today").and_then(|v| v.as_str()) {
        Some(s) => parse_date_key(s)
            .ok_or_else(|| HandlerErr::bad_params("today must be YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

fn parse_count(params: &serde_json::Value, default: usize) -> Result<usize, HandlerErr> {
    let Some(v) = params.get("count") else {
        return Ok(default.min(MAX_CALENDAR_DAYS));
    };
    v.as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|n| *n <= MAX_CALENDAR_DAYS)
        .ok_or_else(|| {
            HandlerErr::bad_params(format!(
                "count must be an integer between 0 and {MAX_CALENDAR_DAYS}"
            ))
        })
}

fn calendar_open(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let today = parse_today(params)?;
    let count = parse_count(params, state.config.calendar_days)?;
    let selected = state.scheduler.selected_dates();
    let days: Vec<serde_json::Value> = calendar_days(today, count)
        .into_iter()
        .map(|d| {
            let is_selected = selected.contains(&d.key);
            let mut v = json!(d);
            v["isSelected"] = json!(is_selected);
            v
        })
        .collect();
    Ok(json!({ "days": days, "selectedCount": selected.len() }))
}

fn toggle_date(state: &mut AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let raw = get_required_str(params, "date")?;
    let Some(date) = parse_date_key(&raw) else {
        return Err(HandlerErr {
            code: "bad_params",
            message: "date must be YYYY-MM-DD".to_string(),
            details: Some(json!({ "date": raw })),
        });
    };
    let key = date_key(date);
    state.dispatch(Event::ToggleDate(key.clone()));
    let selected = state.scheduler.selected_dates();
    Ok(json!({
        "date": key,
        "selected": selected.contains(&key),
        "selectedDates": selected,
    }))
}

fn handle_calendar_days(state: &mut AppState, req: &Request) -> serde_json::Value {
    match calendar_open(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_dates_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    match toggle_date(state, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

fn handle_dates_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "selectedDates": state.scheduler.selected_dates() }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "calendar.days" => Some(handle_calendar_days(state, req)),
        "dates.toggle" => Some(handle_dates_toggle(state, req)),
        "dates.list" => Some(handle_dates_list(state, req)),
        _ => None,
    }
}
