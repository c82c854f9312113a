use crate::db;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_required_str, get_student_id, validate_name};
use crate::ipc::types::{AppState, Request};
use crate::store::{format_student_id, Student};
use serde_json::json;

fn students_list(state: &AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({ "students": state.roster.students() }))
}

fn students_get(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let student_id = get_student_id(params)?;
    let student = state
        .roster
        .student_by_id(&student_id)
        .ok_or_else(|| HandlerErr::student_not_found(&student_id))?;
    Ok(json!({ "student": student }))
}

fn students_create(
    state: &mut AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let name = validate_name(&get_required_str(params, "name")?)?;

    // Persist first so a failed write leaves the roster untouched.
    if let Some(conn) = state.db.as_ref() {
        let seq = state.roster.next_seq();
        let pending = Student {
            id: format_student_id(seq),
            name: name.clone(),
            attendance: Vec::new(),
        };
        db::insert_student(conn, &pending, seq + 1).map_err(|e| {
            HandlerErr::new("db_write_failed", e.to_string())
                .with_details(json!({ "studentId": pending.id }))
        })?;
    }

    let student = state.roster.add_student(&name);
    tracing::info!(student_id = %student.id, "student added");

    Ok(json!({
        "student": student,
        "message": "Student added successfully!",
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.list" => students_list(state),
        "students.get" => students_get(state, &req.params),
        "students.create" => students_create(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
