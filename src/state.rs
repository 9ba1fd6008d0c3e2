use crate::roster::Student;
use crate::schedule::{assign, AssignmentTable, Attendance, AttendancePolicy, ScheduleOptions};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    #[default]
    Calendar,
    Overview,
}

impl View {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "calendar" => Some(Self::Calendar),
            "overview" => Some(Self::Overview),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ToggleDate(String),
    GenerateSchedule,
    SetView(View),
    UpdateAttendance {
        date: String,
        meeting_id: String,
        status: Attendance,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

/// Everything a transition may read besides the state itself.
pub struct Context<'a> {
    pub roster: &'a [Rc<Student>],
    pub options: &'a ScheduleOptions,
    pub attendance: &'a mut dyn AttendancePolicy,
    /// When set, `SetView(Overview)` is ignored while no schedule exists.
    pub strict_view_gate: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerState {
    selected_dates: Vec<String>,
    assignments: AssignmentTable,
    view: View,
}

impl SchedulerState {
    pub fn selected_dates(&self) -> &[String] {
        &self.selected_dates
    }

    pub fn assignments(&self) -> &AssignmentTable {
        &self.assignments
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Drops the current schedule, keeping the date selection.
    pub fn clear_schedule(self) -> Self {
        Self {
            assignments: AssignmentTable::default(),
            view: View::Calendar,
            ..self
        }
    }

    pub fn apply(mut self, event: Event, ctx: &mut Context<'_>) -> (Self, Outcome) {
        let outcome = match event {
            Event::ToggleDate(date) => {
                if let Some(pos) = self.selected_dates.iter().position(|d| *d == date) {
                    self.selected_dates.remove(pos);
                } else {
                    self.selected_dates.push(date);
                    self.selected_dates.sort();
                }
                Outcome::Applied
            }
            Event::GenerateSchedule => {
                self.assignments = assign(
                    &self.selected_dates,
                    ctx.roster,
                    ctx.options,
                    &mut *ctx.attendance,
                );
                self.view = if ctx.strict_view_gate && self.assignments.is_empty() {
                    View::Calendar
                } else {
                    View::Overview
                };
                tracing::info!(
                    dates = self.selected_dates.len(),
                    meetings = self.assignments.meeting_count(),
                    "schedule generated"
                );
                Outcome::Applied
            }
            Event::SetView(View::Overview)
                if ctx.strict_view_gate && self.assignments.is_empty() =>
            {
                tracing::debug!("overview requested without a schedule; ignored");
                Outcome::Ignored
            }
            Event::SetView(view) => {
                self.view = view;
                Outcome::Applied
            }
            Event::UpdateAttendance {
                date,
                meeting_id,
                status,
            } => {
                if self.assignments.set_attendance(&date, &meeting_id, status) {
                    Outcome::Applied
                } else {
                    tracing::debug!(%date, %meeting_id, "attendance update for unknown meeting");
                    Outcome::Ignored
                }
            }
        };
        (self, outcome)
    }
}
