use crate::db;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_date, get_period, get_required_bool, get_student_id};
use crate::ipc::types::{AppState, Request};
use crate::store::AttendanceRecord;
use serde::Serialize;
use serde_json::json;

/// What an attendance-taking view shows for one student in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum SessionStatus {
    Present,
    Absent,
    Unmarked,
}

impl From<Option<&AttendanceRecord>> for SessionStatus {
    fn from(rec: Option<&AttendanceRecord>) -> Self {
        match rec {
            Some(r) if r.present => SessionStatus::Present,
            Some(_) => SessionStatus::Absent,
            None => SessionStatus::Unmarked,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRow {
    id: String,
    name: String,
    status: SessionStatus,
}

fn attendance_get(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_student_id(params)?;
    let date = get_date(params, "date")?;
    let period = get_period(params, "period")?;

    let record = state
        .roster
        .attendance_record(&student_id, &date, period)
        .ok_or_else(|| HandlerErr::student_not_found(&student_id))?;
    let status = SessionStatus::from(record.as_ref());
    Ok(json!({
        "record": record,
        "status": status,
    }))
}

fn attendance_update(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_student_id(params)?;
    let date = get_date(params, "date")?;
    let period = get_period(params, "period")?;
    let present = get_required_bool(params, "present")?;

    if state.roster.student_by_id(&student_id).is_none() {
        return Err(HandlerErr::student_not_found(&student_id));
    }

    // Persist first so a failed write leaves the roster untouched.
    if let Some(conn) = state.db.as_ref() {
        let record = AttendanceRecord {
            date: date.clone(),
            period,
            present,
        };
        db::upsert_record(conn, &student_id, &record).map_err(|e| {
            HandlerErr::new("db_write_failed", e.to_string())
                .with_details(json!({ "studentId": student_id }))
        })?;
    }

    let student = state
        .roster
        .update_attendance(&student_id, &date, period, present)
        .ok_or_else(|| HandlerErr::student_not_found(&student_id))?;
    tracing::info!(
        student_id = %student.id,
        %date,
        period,
        present,
        "attendance recorded"
    );

    let message = format!(
        "Attendance for {} on {}, Period {} marked as {}.",
        student.name,
        date,
        period,
        if present { "Present" } else { "Absent" }
    );
    Ok(json!({
        "student": student,
        "message": message,
    }))
}

fn attendance_session(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let date = get_date(params, "date")?;
    let period = get_period(params, "period")?;

    let rows: Vec<SessionRow> = state
        .roster
        .students()
        .into_iter()
        .map(|s| SessionRow {
            status: SessionStatus::from(s.record_for(&date, period)),
            id: s.id,
            name: s.name,
        })
        .collect();
    Ok(json!({
        "date": date,
        "period": period,
        "rows": rows,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "attendance.get" => attendance_get(state, &req.params),
        "attendance.update" => attendance_update(state, &req.params),
        "attendance.session" => attendance_session(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
