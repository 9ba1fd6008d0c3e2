use crate::roster::PriorityKey;
use crate::schedule::{AssignmentTable, Attendance};
use crate::summary::Summary;
use serde::Serialize;

pub const OVERVIEW_SHEET: &str = "Overview";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Int(n as i64)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Int(i64::from(n))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Ordered named tables; the workbook writer turns each into one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularDocument {
    pub tables: Vec<Table>,
}

impl TabularDocument {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Fixed column sets for the export. Categories absent from a day render as 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLabels {
    pub classes: Vec<String>,
    pub instructors: Vec<String>,
    pub priority: PriorityKey,
}

fn overview_table(summary: &Summary, labels: &ExportLabels) -> Table {
    let mut header: Vec<String> = ["Date", "Total Meetings"]
        .into_iter()
        .map(str::to_string)
        .collect();
    header.extend(Attendance::ALL.iter().map(|a| a.as_str().to_string()));
    header.extend(labels.classes.iter().cloned());
    header.extend(labels.instructors.iter().cloned());

    let rows: Vec<Vec<Cell>> = summary
        .days
        .iter()
        .map(|day| {
            let mut row: Vec<Cell> = vec![day.date.as_str().into(), day.counts.total.into()];
            row.extend(Attendance::ALL.iter().map(|a| day.counts.get(*a).into()));
            row.extend(
                labels
                    .classes
                    .iter()
                    .map(|c| day.classes.get(c).copied().unwrap_or(0).into()),
            );
            row.extend(
                labels
                    .instructors
                    .iter()
                    .map(|i| day.instructors.get(i).copied().unwrap_or(0).into()),
            );
            row
        })
        .collect();

    Table {
        name: OVERVIEW_SHEET.to_string(),
        header,
        rows,
    }
}

pub fn format_document(
    assignments: &AssignmentTable,
    summary: &Summary,
    labels: &ExportLabels,
) -> TabularDocument {
    let mut tables = vec![overview_table(summary, labels)];
    let header: Vec<String> = [
        "Student Name",
        "Age",
        "Class Name",
        "Instructor Name",
        labels.priority.header(),
        "Meeting Link",
        "Attendance",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    for day in assignments.days() {
        let rows: Vec<Vec<Cell>> = day
            .meetings
            .iter()
            .map(|m| {
                vec![
                    m.student.name.as_str().into(),
                    m.student.age.into(),
                    m.student.class_name.as_str().into(),
                    m.student.instructor_name.as_str().into(),
                    labels.priority.weight(&m.student).into(),
                    m.meeting_link.as_str().into(),
                    m.attendance.as_str().into(),
                ]
            })
            .collect();
        tables.push(Table {
            name: day.date.clone(),
            header: header.clone(),
            rows,
        });
    }
    TabularDocument { tables }
}
