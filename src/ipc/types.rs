use crate::config::SchedulerConfig;
use crate::roster::{self, Roster};
use crate::schedule::AttendancePolicy;
use crate::state::{Context, Event, Outcome, SchedulerState};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: SchedulerConfig,
    pub roster: Roster,
    pub attendance: Box<dyn AttendancePolicy>,
    pub scheduler: SchedulerState,
}

impl AppState {
    pub fn new(config: SchedulerConfig) -> anyhow::Result<Self> {
        let roster = match &config.roster_path {
            Some(p) => roster::load_roster(p)?,
            None => roster::builtin_roster(),
        };
        Ok(Self {
            attendance: config.attendance_policy(),
            config,
            roster,
            scheduler: SchedulerState::default(),
        })
    }

    /// Runs one state transition. Transitions are applied strictly one at a time.
    pub fn dispatch(&mut self, event: Event) -> Outcome {
        let options = self.config.schedule_options();
        let mut ctx = Context {
            roster: &self.roster,
            options: &options,
            attendance: self.attendance.as_mut(),
            strict_view_gate: self.config.strict_view_gate,
        };
        let current = std::mem::take(&mut self.scheduler);
        let (next, outcome) = current.apply(event, &mut ctx);
        self.scheduler = next;
        outcome
    }

    pub fn replace_roster(&mut self, roster: Roster) {
        self.roster = roster;
        self.scheduler = std::mem::take(&mut self.scheduler).clear_schedule();
    }

    /// Installs new settings. A generated schedule built under a different
    /// ranking, capacity or link base is dropped; returns whether that happened.
    pub fn replace_config(&mut self, config: SchedulerConfig) -> bool {
        if config.initial_attendance != self.config.initial_attendance
            || config.attendance_seed != self.config.attendance_seed
        {
            self.attendance = config.attendance_policy();
        }
        let stale = config.schedule_options() != self.config.schedule_options()
            && !self.scheduler.assignments().is_empty();
        if stale {
            self.scheduler = std::mem::take(&mut self.scheduler).clear_schedule();
        }
        self.config = config;
        stale
    }
}
