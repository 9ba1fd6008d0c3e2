use crate::calendar::{DEFAULT_CALENDAR_DAYS, MAX_CALENDAR_DAYS};
use crate::roster::PriorityKey;
use crate::schedule::{
    Attendance, AttendancePolicy, CapacityPolicy, FixedAttendance, RandomAttendance,
    ScheduleOptions, DEFAULT_LINK_BASE,
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "MEETINGD_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InitialAttendance {
    #[default]
    Random,
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub calendar_days: usize,
    pub priority: PriorityKey,
    pub capacity: CapacityPolicy,
    pub initial_attendance: InitialAttendance,
    pub attendance_seed: Option<u64>,
    pub link_base: String,
    /// Fixed class columns for the export; `None` means the roster's own labels.
    pub class_labels: Option<Vec<String>>,
    pub instructor_labels: Option<Vec<String>>,
    pub roster_path: Option<PathBuf>,
    pub strict_view_gate: bool,
    pub export_file_stem: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            calendar_days: DEFAULT_CALENDAR_DAYS,
            priority: PriorityKey::RequiredMeetings,
            capacity: CapacityPolicy::Balanced,
            initial_attendance: InitialAttendance::Random,
            attendance_seed: None,
            link_base: DEFAULT_LINK_BASE.to_string(),
            class_labels: None,
            instructor_labels: None,
            roster_path: None,
            strict_view_gate: true,
            export_file_stem: "meeting-schedule".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn schedule_options(&self) -> ScheduleOptions {
        ScheduleOptions {
            priority: self.priority,
            capacity: self.capacity,
            link_base: self.link_base.clone(),
        }
    }

    pub fn attendance_policy(&self) -> Box<dyn AttendancePolicy> {
        match self.initial_attendance {
            InitialAttendance::Random => Box::new(RandomAttendance::new(self.attendance_seed)),
            InitialAttendance::Present => Box::new(FixedAttendance(Attendance::Present)),
            InitialAttendance::Absent => Box::new(FixedAttendance(Attendance::Absent)),
            InitialAttendance::Late => Box::new(FixedAttendance(Attendance::Late)),
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("{}.{}", self.export_file_stem, crate::workbook::WORKBOOK_EXT)
    }

    /// Returns a copy with the keys of `patch` laid over the current values.
    pub fn merged(&self, patch: &Value) -> anyhow::Result<Self> {
        let Some(patch_obj) = patch.as_object() else {
            bail!("settings patch must be an object");
        };
        let mut current = serde_json::to_value(self).context("failed to serialize settings")?;
        if let Some(obj) = current.as_object_mut() {
            for (k, v) in patch_obj {
                obj.insert(k.clone(), v.clone());
            }
        }
        let next: Self = serde_json::from_value(current).context("invalid settings")?;
        next.validate()?;
        Ok(next)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.calendar_days > MAX_CALENDAR_DAYS {
            bail!("calendarDays must be at most {MAX_CALENDAR_DAYS}");
        }
        if self.export_file_stem.trim().is_empty() {
            bail!("exportFileStem must not be empty");
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<SchedulerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.to_string_lossy()))?;
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("config {} is not valid JSON", path.to_string_lossy()))?;
    SchedulerConfig::default()
        .merged(&raw)
        .with_context(|| format!("invalid config {}", path.to_string_lossy()))
}

/// Settings from the file named by `MEETINGD_CONFIG`, or defaults when unset.
pub fn load_from_env() -> anyhow::Result<SchedulerConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) if !p.is_empty() => load_config(Path::new(&p)),
        _ => Ok(SchedulerConfig::default()),
    }
}
