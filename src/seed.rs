use crate::ipc::helpers::{validate_date, validate_name, validate_period};
use crate::store::Roster;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub students: Vec<SeedStudent>,
}

#[derive(Debug, Deserialize)]
pub struct SeedStudent {
    pub name: String,
    #[serde(default)]
    pub attendance: Vec<SeedRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SeedRecord {
    pub date: String,
    pub period: i64,
    pub present: bool,
}

pub fn load_seed_file(path: &Path) -> anyhow::Result<SeedFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read seed file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse seed file {}", path.display()))
}

/// Adds every seeded student through the same validation the IPC layer uses.
/// Returns the number of students added.
pub fn apply_seed(roster: &mut Roster, seed: &SeedFile) -> anyhow::Result<usize> {
    for (i, s) in seed.students.iter().enumerate() {
        let name = validate_name(&s.name).map_err(|e| anyhow!("students[{}]: {}", i, e))?;
        let student = roster.add_student(&name);
        for (j, r) in s.attendance.iter().enumerate() {
            let date = validate_date(&r.date)
                .map_err(|e| anyhow!("students[{}].attendance[{}]: {}", i, j, e))?;
            let period = validate_period(r.period)
                .map_err(|e| anyhow!("students[{}].attendance[{}]: {}", i, j, e))?;
            roster.update_attendance(&student.id, &date, period, r.present);
        }
    }
    Ok(seed.students.len())
}
