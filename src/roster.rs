use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

/// One schedulable student. Immutable for the session; meetings hold an `Rc`
/// to the roster entry rather than a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: u32,
    #[serde(alias = "student_name")]
    pub name: String,
    pub age: u32,
    #[serde(alias = "class_name")]
    pub class_name: String,
    #[serde(alias = "instructor_name")]
    pub instructor_name: String,
    #[serde(alias = "meetings", alias = "required_meetings", default)]
    pub required_meetings: u32,
}

/// Which student field ranks the roster for earlier scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityKey {
    #[default]
    RequiredMeetings,
    Age,
}

impl PriorityKey {
    pub fn weight(self, student: &Student) -> u32 {
        match self {
            Self::RequiredMeetings => student.required_meetings,
            Self::Age => student.age,
        }
    }

    /// Column header used for the weight in per-date export tables.
    pub fn header(self) -> &'static str {
        match self {
            Self::RequiredMeetings => "Required Meetings",
            Self::Age => "Priority (Age)",
        }
    }
}

pub type Roster = Vec<Rc<Student>>;

const BUILTIN: &[(u32, &str, u32, &str, &str, u32)] = &[
    (1, "Aarav Sharma", 20, "Math", "Dr. Mehta", 3),
    (2, "Isha Verma", 19, "Science", "Prof. Raghavan", 2),
    (3, "Rohan Gupta", 21, "English", "Ms. Kapoor", 4),
    (4, "Priya Nair", 18, "Math", "Dr. Mehta", 1),
    (5, "Karan Patel", 22, "Science", "Prof. Raghavan", 3),
    (6, "Neha Singh", 19, "English", "Ms. Kapoor", 2),
    (7, "Vikram Menon", 20, "Math", "Dr. Mehta", 5),
    (8, "Ananya Reddy", 18, "Science", "Prof. Raghavan", 2),
    (9, "Siddharth Joshi", 23, "English", "Ms. Kapoor", 3),
    (10, "Meera Iyer", 19, "Math", "Dr. Mehta", 1),
    (11, "Arjun Desai", 21, "Science", "Prof. Raghavan", 4),
    (12, "Pooja Bansal", 20, "English", "Ms. Kapoor", 2),
    (13, "Dev Chawla", 22, "Math", "Dr. Mehta", 3),
    (14, "Riya Malhotra", 18, "Science", "Prof. Raghavan", 1),
    (15, "Aditya Kulkarni", 24, "English", "Ms. Kapoor", 2),
    (16, "Manish Sinha", 19, "Math", "Dr. Mehta", 4),
    (17, "Shruti Agarwal", 21, "Science", "Prof. Raghavan", 3),
    (18, "Lakshmi Krishnan", 20, "English", "Ms. Kapoor", 1),
    (19, "Rahul Bhatia", 23, "Math", "Dr. Mehta", 2),
    (20, "Tanvi Choudhary", 25, "Science", "Prof. Raghavan", 5),
];

pub fn builtin_roster() -> Roster {
    BUILTIN
        .iter()
        .map(|&(id, name, age, class_name, instructor_name, required_meetings)| {
            Rc::new(Student {
                id,
                name: name.to_string(),
                age,
                class_name: class_name.to_string(),
                instructor_name: instructor_name.to_string(),
                required_meetings,
            })
        })
        .collect()
}

pub fn parse_roster(text: &str) -> anyhow::Result<Roster> {
    let students: Vec<Student> =
        serde_json::from_str(text).context("roster must be a JSON array of students")?;
    let mut seen = HashSet::new();
    for s in &students {
        if !seen.insert(s.id) {
            bail!("duplicate student id {}", s.id);
        }
    }
    Ok(students.into_iter().map(Rc::new).collect())
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.to_string_lossy()))?;
    parse_roster(&text).with_context(|| format!("invalid roster {}", path.to_string_lossy()))
}

/// Distinct class labels in first-seen roster order.
pub fn class_labels(roster: &[Rc<Student>]) -> Vec<String> {
    distinct(roster.iter().map(|s| s.class_name.as_str()))
}

/// Distinct instructor names in first-seen roster order.
pub fn instructor_labels(roster: &[Rc<Student>]) -> Vec<String> {
    distinct(roster.iter().map(|s| s.instructor_name.as_str()))
}

fn distinct<'a>(it: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    it.filter(|s| seen.insert(*s)).map(str::to_string).collect()
}
