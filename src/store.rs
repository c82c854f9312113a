use serde::Serialize;
use std::cmp::Ordering;

/// Prefix for directory-issued student ids (`S001`, `S002`, ...).
pub const STUDENT_ID_PREFIX: &str = "S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Calendar day as `YYYY-MM-DD`. Compared as a string.
    pub date: String,
    pub period: u32,
    pub present: bool,
}

impl AttendanceRecord {
    fn session_cmp(&self, date: &str, period: u32) -> Ordering {
        (self.date.as_str(), self.period).cmp(&(date, period))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Sorted by (date, period), at most one record per session.
    pub attendance: Vec<AttendanceRecord>,
}

impl Student {
    pub fn record_for(&self, date: &str, period: u32) -> Option<&AttendanceRecord> {
        self.attendance
            .binary_search_by(|r| r.session_cmp(date, period))
            .ok()
            .map(|i| &self.attendance[i])
    }
}

pub fn format_student_id(seq: u64) -> String {
    format!("{}{:03}", STUDENT_ID_PREFIX, seq)
}

/// In-memory student directory and attendance ledger.
///
/// Inputs are expected to be validated by the caller (see `ipc::helpers`).
/// Every read returns owned copies, so callers can never reach into the
/// roster's own records.
#[derive(Debug, Clone)]
pub struct Roster {
    students: Vec<Student>,
    next_seq: u64,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            next_seq: 1,
        }
    }

    /// Rebuild a roster from previously issued state (workspace load).
    /// `students` keep their given order; each attendance list is re-sorted.
    pub fn from_parts(mut students: Vec<Student>, next_seq: u64) -> Self {
        for s in students.iter_mut() {
            s.attendance.sort_by(|a, b| a.session_cmp(&b.date, b.period));
            s.attendance
                .dedup_by(|b, a| a.date == b.date && a.period == b.period);
        }
        Self {
            students,
            next_seq: next_seq.max(1),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn add_student(&mut self, name: &str) -> Student {
        let student = Student {
            id: format_student_id(self.next_seq),
            name: name.to_string(),
            attendance: Vec::new(),
        };
        self.next_seq += 1;
        self.students.push(student.clone());
        student
    }

    pub fn students(&self) -> Vec<Student> {
        self.students.clone()
    }

    pub fn student_by_id(&self, id: &str) -> Option<Student> {
        self.students.iter().find(|s| s.id == id).cloned()
    }

    /// Upsert one (date, period) record. Returns `None` for an unknown id.
    pub fn update_attendance(
        &mut self,
        student_id: &str,
        date: &str,
        period: u32,
        present: bool,
    ) -> Option<Student> {
        let student = self.students.iter_mut().find(|s| s.id == student_id)?;
        match student
            .attendance
            .binary_search_by(|r| r.session_cmp(date, period))
        {
            Ok(i) => student.attendance[i].present = present,
            Err(i) => student.attendance.insert(
                i,
                AttendanceRecord {
                    date: date.to_string(),
                    period,
                    present,
                },
            ),
        }
        Some(student.clone())
    }

    /// Point query. Outer `None`: unknown student. Inner `None`: unmarked.
    pub fn attendance_record(
        &self,
        student_id: &str,
        date: &str,
        period: u32,
    ) -> Option<Option<AttendanceRecord>> {
        let student = self.students.iter().find(|s| s.id == student_id)?;
        Some(student.record_for(date, period).cloned())
    }

    pub fn reset(&mut self) {
        self.students.clear();
        self.next_seq = 1;
    }
}
