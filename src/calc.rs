use crate::store::Student;
use serde::Serialize;
use std::collections::HashSet;

/// Minimum attendance percentage required to sit the exam.
pub const ELIGIBILITY_THRESHOLD: u32 = 75;

/// Inclusive (date, period) upper bound for counting sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff<'a> {
    pub date: &'a str,
    pub period: u32,
}

impl Cutoff<'_> {
    /// `date < cutoff.date`, or same date and `period <= cutoff.period`.
    pub fn includes(&self, date: &str, period: u32) -> bool {
        date < self.date || (date == self.date && period <= self.period)
    }
}

/// Distinct sessions recorded for any student, optionally bounded by a cutoff.
/// A session counts once no matter how many students have a record for it.
pub fn sessions_held(students: &[Student], cutoff: Option<Cutoff<'_>>) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    for s in students {
        for r in &s.attendance {
            if cutoff.map(|c| c.includes(&r.date, r.period)).unwrap_or(true) {
                seen.insert(format!("{}-{}", r.date, r.period));
            }
        }
    }
    seen.len()
}

pub fn total_periods_held(students: &[Student], upto_date: &str, upto_period: u32) -> usize {
    sessions_held(
        students,
        Some(Cutoff {
            date: upto_date,
            period: upto_period,
        }),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub percentage: u32,
    pub eligible: bool,
    pub attended: usize,
}

/// Integer round-half-up of `100 * attended / total`, capped at 100.
fn attendance_percent(attended: usize, total: usize) -> u32 {
    let pct = (attended as u64 * 100 + total as u64 / 2) / total as u64;
    pct.min(100) as u32
}

pub fn calculate_eligibility(student: &Student, total_periods_held: usize) -> Eligibility {
    if total_periods_held == 0 {
        return Eligibility {
            percentage: 0,
            eligible: false,
            attended: 0,
        };
    }
    let attended = student.attendance.iter().filter(|r| r.present).count();
    let percentage = attendance_percent(attended, total_periods_held);
    Eligibility {
        percentage,
        eligible: percentage >= ELIGIBILITY_THRESHOLD,
        attended,
    }
}

/// Copy of `student` holding only the records inside `cutoff`, so attended
/// counts line up with the census total for the same cutoff.
pub fn student_upto(student: &Student, cutoff: Option<Cutoff<'_>>) -> Student {
    let Some(c) = cutoff else {
        return student.clone();
    };
    Student {
        id: student.id.clone(),
        name: student.name.clone(),
        attendance: student
            .attendance
            .iter()
            .filter(|r| c.includes(&r.date, r.period))
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRow {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub eligibility: Eligibility,
    pub total_periods_held: usize,
}

/// One row per student, in directory order.
pub fn eligibility_rows(students: &[Student], cutoff: Option<Cutoff<'_>>) -> Vec<EligibilityRow> {
    let total = sessions_held(students, cutoff);
    students
        .iter()
        .map(|s| EligibilityRow {
            id: s.id.clone(),
            name: s.name.clone(),
            eligibility: calculate_eligibility(&student_upto(s, cutoff), total),
            total_periods_held: total,
        })
        .collect()
}
