use crate::schedule::{AssignmentTable, Attendance, Meeting};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
}

impl StatusCounts {
    fn add(&mut self, status: Attendance) {
        self.total += 1;
        match status {
            Attendance::Present => self.present += 1,
            Attendance::Absent => self.absent += 1,
            Attendance::Late => self.late += 1,
        }
    }

    pub fn get(&self, status: Attendance) -> usize {
        match status {
            Attendance::Present => self.present,
            Attendance::Absent => self.absent,
            Attendance::Late => self.late,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub classes: BTreeMap<String, usize>,
    pub instructors: BTreeMap<String, usize>,
}

/// Counts derived from an assignment table. Never stored; rebuild with
/// [`summarize`] whenever the table may have changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// In assignment-table date order.
    pub days: Vec<DaySummary>,
    pub totals: StatusCounts,
    pub classes: BTreeMap<String, usize>,
    pub instructors: BTreeMap<String, usize>,
}

impl Summary {
    pub fn day(&self, date: &str) -> Option<&DaySummary> {
        self.days.iter().find(|d| d.date == date)
    }
}

fn summarize_day(date: &str, meetings: &[Meeting]) -> DaySummary {
    let mut day = DaySummary {
        date: date.to_string(),
        ..DaySummary::default()
    };
    for m in meetings {
        day.counts.add(m.attendance);
        *day.classes.entry(m.student.class_name.clone()).or_default() += 1;
        *day
            .instructors
            .entry(m.student.instructor_name.clone())
            .or_default() += 1;
    }
    day
}

pub fn summarize(assignments: &AssignmentTable) -> Summary {
    let mut out = Summary::default();
    for d in assignments.days() {
        let day = summarize_day(&d.date, &d.meetings);
        out.totals.total += day.counts.total;
        out.totals.present += day.counts.present;
        out.totals.absent += day.counts.absent;
        out.totals.late += day.counts.late;
        for (k, v) in &day.classes {
            *out.classes.entry(k.clone()).or_default() += v;
        }
        for (k, v) in &day.instructors {
            *out.instructors.entry(k.clone()).or_default() += v;
        }
        out.days.push(day);
    }
    out
}
