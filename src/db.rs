use crate::store::{AttendanceRecord, Roster, Student};
use anyhow::Context;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

pub const DB_FILE_NAME: &str = "attendance.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("create workspace {}", workspace.display()))?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("open {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS attendance_records(
            student_id TEXT NOT NULL,
            date TEXT NOT NULL,
            period INTEGER NOT NULL,
            present INTEGER NOT NULL,
            updated_at TEXT,
            PRIMARY KEY(student_id, date, period),
            FOREIGN KEY(student_id) REFERENCES students(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_attendance_session ON attendance_records(date, period)",
        [],
    )?;

    // Single row holding the id counter so ids are never reissued.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS roster_meta(
            id INTEGER PRIMARY KEY CHECK (id = 1),
            next_seq INTEGER NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO roster_meta(id, next_seq) VALUES(1, 1)",
        [],
    )?;

    Ok(conn)
}

pub fn load_roster(conn: &Connection) -> anyhow::Result<Roster> {
    let mut stud_stmt = conn.prepare("SELECT id, name FROM students ORDER BY sort_order")?;
    let mut students = stud_stmt
        .query_map([], |r| {
            Ok(Student {
                id: r.get(0)?,
                name: r.get(1)?,
                attendance: Vec::new(),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let index: HashMap<String, usize> = students
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), i))
        .collect();

    let mut rec_stmt = conn.prepare(
        "SELECT student_id, date, period, present
         FROM attendance_records
         ORDER BY date, period",
    )?;
    let rows = rec_stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            AttendanceRecord {
                date: r.get(1)?,
                period: r.get(2)?,
                present: r.get::<_, i64>(3)? != 0,
            },
        ))
    })?;
    for row in rows {
        let (student_id, rec) = row?;
        match index.get(&student_id) {
            Some(&i) => students[i].attendance.push(rec),
            None => tracing::warn!(%student_id, "skipping attendance for unknown student"),
        }
    }

    let next_seq: i64 = conn.query_row("SELECT next_seq FROM roster_meta WHERE id = 1", [], |r| {
        r.get(0)
    })?;

    Ok(Roster::from_parts(students, next_seq.max(1) as u64))
}

pub fn insert_student(conn: &Connection, student: &Student, next_seq: u64) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    let sort_order: i64 = tx.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM students",
        [],
        |r| r.get(0),
    )?;
    tx.execute(
        "INSERT INTO students(id, name, sort_order) VALUES(?, ?, ?)",
        (&student.id, &student.name, sort_order),
    )?;
    tx.execute(
        "UPDATE roster_meta SET next_seq = ? WHERE id = 1",
        [next_seq as i64],
    )?;
    tx.commit()?;
    Ok(())
}

pub fn upsert_record(
    conn: &Connection,
    student_id: &str,
    record: &AttendanceRecord,
) -> anyhow::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO attendance_records(student_id, date, period, present, updated_at)
         VALUES(?, ?, ?, ?, ?)
         ON CONFLICT(student_id, date, period) DO UPDATE SET
            present = excluded.present,
            updated_at = excluded.updated_at",
        (
            student_id,
            &record.date,
            record.period,
            record.present as i64,
            now,
        ),
    )?;
    Ok(())
}

pub fn clear_roster(conn: &Connection) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attendance_records", [])?;
    tx.execute("DELETE FROM students", [])?;
    tx.execute("UPDATE roster_meta SET next_seq = 1 WHERE id = 1", [])?;
    tx.commit()?;
    Ok(())
}
