use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_attendanced");
    let mut child = Command::new(exe)
        .env_remove("ATTENDANCED_WORKSPACE")
        .env_remove("ATTENDANCED_SEED")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn attendanced");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> &str {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn students_create_issues_ids_and_validates_names() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let alice = request_ok(&mut stdin, &mut reader, "1", "students.create", json!({ "name": "  Alice " }));
    assert_eq!(alice["student"]["id"], "S001");
    assert_eq!(alice["student"]["name"], "Alice");
    assert_eq!(alice["student"]["attendance"], json!([]));
    assert_eq!(alice["message"], "Student added successfully!");

    let short = request(&mut stdin, &mut reader, "2", "students.create", json!({ "name": "A" }));
    assert_eq!(error_code(&short), "bad_params");
    assert_eq!(short["error"]["message"], "Name must be at least 2 characters.");

    let bob = request_ok(&mut stdin, &mut reader, "3", "students.create", json!({ "name": "Bob" }));
    // A rejected create does not consume an id.
    assert_eq!(bob["student"]["id"], "S002");

    let list = request_ok(&mut stdin, &mut reader, "4", "students.list", json!({}));
    let ids: Vec<&str> = list["students"]
        .as_array()
        .expect("students array")
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["S001", "S002"]);

    let missing = request(&mut stdin, &mut reader, "5", "students.get", json!({ "studentId": "S404" }));
    assert_eq!(error_code(&missing), "not_found");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn attendance_update_upserts_and_keeps_order() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(&mut stdin, &mut reader, "1", "students.create", json!({ "name": "Alice" }));

    let marks = [
        ("2024-07-30", 1, true),
        ("2024-07-29", 2, false),
        ("2024-07-29", 1, true),
        ("2024-07-29", 2, true),
    ];
    for (i, (date, period, present)) in marks.iter().enumerate() {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("m{}", i),
            "attendance.update",
            json!({ "studentId": "S001", "date": date, "period": period, "present": present }),
        );
    }

    let got = request_ok(&mut stdin, &mut reader, "g", "students.get", json!({ "studentId": "S001" }));
    assert_eq!(
        got["student"]["attendance"],
        json!([
            { "date": "2024-07-29", "period": 1, "present": true },
            { "date": "2024-07-29", "period": 2, "present": true },
            { "date": "2024-07-30", "period": 1, "present": true }
        ])
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn attendance_update_rejects_bad_input_and_unknown_students() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    request_ok(&mut stdin, &mut reader, "1", "students.create", json!({ "name": "Alice" }));

    let bad_date = request(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.update",
        json!({ "studentId": "S001", "date": "07/29/2024", "period": 1, "present": true }),
    );
    assert_eq!(error_code(&bad_date), "bad_params");
    assert_eq!(bad_date["error"]["message"], "Invalid date format. Use YYYY-MM-DD.");

    let bad_period = request(
        &mut stdin,
        &mut reader,
        "3",
        "attendance.update",
        json!({ "studentId": "S001", "date": "2024-07-29", "period": 0, "present": true }),
    );
    assert_eq!(error_code(&bad_period), "bad_params");
    assert_eq!(bad_period["error"]["message"], "Period must be a positive integer.");

    let unknown = request(
        &mut stdin,
        &mut reader,
        "4",
        "attendance.update",
        json!({ "studentId": "S999", "date": "2024-07-29", "period": 1, "present": true }),
    );
    assert_eq!(error_code(&unknown), "not_found");
    assert_eq!(unknown["error"]["message"], "Student not found.");

    let untouched = request_ok(&mut stdin, &mut reader, "5", "students.get", json!({ "studentId": "S001" }));
    assert_eq!(untouched["student"]["attendance"], json!([]));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn session_view_distinguishes_present_absent_unmarked() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    for (i, name) in ["Alice", "Bob", "Carol"].iter().enumerate() {
        request_ok(&mut stdin, &mut reader, &format!("c{}", i), "students.create", json!({ "name": name }));
    }
    request_ok(
        &mut stdin,
        &mut reader,
        "u1",
        "attendance.update",
        json!({ "studentId": "S001", "date": "2024-07-29", "period": 3, "present": true }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "u2",
        "attendance.update",
        json!({ "studentId": "S002", "date": "2024-07-29", "period": 3, "present": false }),
    );

    let session = request_ok(
        &mut stdin,
        &mut reader,
        "s",
        "attendance.session",
        json!({ "date": "2024-07-29", "period": "3" }),
    );
    let statuses: Vec<&str> = session["rows"]
        .as_array()
        .expect("rows")
        .iter()
        .filter_map(|r| r["status"].as_str())
        .collect();
    assert_eq!(statuses, vec!["present", "absent", "unmarked"]);

    let point = request_ok(
        &mut stdin,
        &mut reader,
        "p",
        "attendance.get",
        json!({ "studentId": "S003", "date": "2024-07-29", "period": 3 }),
    );
    assert!(point["record"].is_null());
    assert_eq!(point["status"], "unmarked");

    drop(stdin);
    let _ = child.wait();
}
