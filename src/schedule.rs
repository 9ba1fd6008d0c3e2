use crate::roster::{PriorityKey, Student};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attendance {
    Present,
    Absent,
    Late,
}

impl Attendance {
    pub const ALL: [Attendance; 3] = [Attendance::Present, Attendance::Absent, Attendance::Late];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Present" => Some(Self::Present),
            "Absent" => Some(Self::Absent),
            "Late" => Some(Self::Late),
            _ => None,
        }
    }
}

/// Picks the attendance status a freshly created meeting starts with.
pub trait AttendancePolicy {
    fn initial(&mut self, meeting_id: &str) -> Attendance;
}

/// Always hands out the same status.
#[derive(Debug, Clone, Copy)]
pub struct FixedAttendance(pub Attendance);

impl AttendancePolicy for FixedAttendance {
    fn initial(&mut self, _meeting_id: &str) -> Attendance {
        self.0
    }
}

/// Uniform draw over Present/Absent/Late.
#[derive(Debug, Clone)]
pub struct RandomAttendance {
    rng: StdRng,
}

impl RandomAttendance {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl AttendancePolicy for RandomAttendance {
    fn initial(&mut self, _meeting_id: &str) -> Attendance {
        Attendance::ALL[self.rng.random_range(0..Attendance::ALL.len())]
    }
}

/// How many meetings each selected date may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum CapacityPolicy {
    /// `ceil(students / dates)`: every student lands on exactly one date.
    #[default]
    Balanced,
    Fixed {
        #[serde(rename = "perDay")]
        per_day: usize,
    },
}

impl CapacityPolicy {
    pub fn per_day(self, students: usize, dates: usize) -> usize {
        match self {
            Self::Balanced if dates == 0 => 0,
            Self::Balanced => students.div_ceil(dates),
            Self::Fixed { per_day } => per_day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub priority: PriorityKey,
    pub capacity: CapacityPolicy,
    pub link_base: String,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            priority: PriorityKey::RequiredMeetings,
            capacity: CapacityPolicy::Balanced,
            link_base: DEFAULT_LINK_BASE.to_string(),
        }
    }
}

pub const DEFAULT_LINK_BASE: &str = "https://meet.example.com/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub date: String,
    pub student: Rc<Student>,
    pub meeting_link: String,
    pub attendance: Attendance,
}

pub fn meeting_id(date: &str, student_id: u32) -> String {
    format!("{}-{}", date, student_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: String,
    pub meetings: Vec<Meeting>,
}

/// Date -> meetings, kept in the order the dates were scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AssignmentTable {
    days: Vec<DaySchedule>,
}

impl AssignmentTable {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> &[DaySchedule] {
        &self.days
    }

    pub fn day(&self, date: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn meeting_count(&self) -> usize {
        self.days.iter().map(|d| d.meetings.len()).sum()
    }

    /// Sets one meeting's attendance. Returns false when (date, id) is unknown.
    pub fn set_attendance(&mut self, date: &str, meeting_id: &str, status: Attendance) -> bool {
        let Some(day) = self.days.iter_mut().find(|d| d.date == date) else {
            return false;
        };
        let Some(m) = day.meetings.iter_mut().find(|m| m.id == meeting_id) else {
            return false;
        };
        m.attendance = status;
        true
    }
}

/// Distributes the ranked roster across `selected_dates`.
///
/// Students are ordered by descending priority weight; the sort is stable, so
/// equal weights keep roster order. A single cursor walks the ranked list,
/// taking up to `capacity` students per date, so no student is placed twice.
pub fn assign(
    selected_dates: &[String],
    roster: &[Rc<Student>],
    options: &ScheduleOptions,
    attendance: &mut dyn AttendancePolicy,
) -> AssignmentTable {
    if selected_dates.is_empty() {
        return AssignmentTable::default();
    }

    let mut ranked: Vec<&Rc<Student>> = roster.iter().collect();
    ranked.sort_by(|a, b| {
        options
            .priority
            .weight(b)
            .cmp(&options.priority.weight(a))
    });

    let per_day = options.capacity.per_day(ranked.len(), selected_dates.len());
    let mut cursor = ranked.into_iter();
    let days = selected_dates
        .iter()
        .map(|date| {
            let meetings = cursor
                .by_ref()
                .take(per_day)
                .map(|student| {
                    let id = meeting_id(date, student.id);
                    Meeting {
                        meeting_link: format!("{}{}", options.link_base, id),
                        attendance: attendance.initial(&id),
                        date: date.clone(),
                        student: Rc::clone(student),
                        id,
                    }
                })
                .collect();
            DaySchedule {
                date: date.clone(),
                meetings,
            }
        })
        .collect();

    tracing::debug!(
        dates = selected_dates.len(),
        students = roster.len(),
        per_day,
        "schedule assigned"
    );
    AssignmentTable { days }
}
