//! Boundary validation. The roster trusts its inputs, so every request
//! parameter that reaches it goes through one of these first.

use crate::ipc::error::HandlerErr;
use chrono::NaiveDate;

pub const MIN_NAME_CHARS: usize = 2;

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_student_id(params: &serde_json::Value) -> Result<String, HandlerErr> {
    let id = get_required_str(params, "studentId")?;
    let id = id.trim();
    if id.is_empty() {
        return Err(HandlerErr::bad_params("studentId must not be empty"));
    }
    Ok(id.to_string())
}

pub fn get_required_bool(params: &serde_json::Value, key: &str) -> Result<bool, HandlerErr> {
    match params.get(key) {
        Some(serde_json::Value::Bool(b)) => Ok(*b),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be a boolean", key))),
        None => Err(HandlerErr::bad_params(format!("missing {}", key))),
    }
}

/// Integer param; numeric strings such as `"2"` are accepted too.
pub fn get_required_int(params: &serde_json::Value, key: &str) -> Result<i64, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Err(HandlerErr::bad_params(format!("missing {}", key)));
    };
    if let Some(n) = v.as_i64() {
        return Ok(n);
    }
    if let Some(f) = v.as_f64() {
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            return Ok(f as i64);
        }
    }
    if let Some(s) = v.as_str() {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Ok(n);
        }
    }
    Err(HandlerErr::bad_params(format!("{} must be an integer", key)))
}

pub fn validate_name(raw: &str) -> Result<String, HandlerErr> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(HandlerErr::bad_params(
            "Name must be at least 2 characters.",
        ));
    }
    Ok(name.to_string())
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar day.
pub fn validate_date(t: &str) -> Result<String, HandlerErr> {
    let shape_ok = t.len() == 10
        && t.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(HandlerErr::bad_params(
            "Invalid date format. Use YYYY-MM-DD.",
        ));
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d").map_err(|_| {
        HandlerErr::bad_params(format!("{} is not a calendar date", t))
    })?;
    Ok(t.to_string())
}

pub fn validate_period(raw: i64) -> Result<u32, HandlerErr> {
    if raw < 1 {
        return Err(HandlerErr::bad_params("Period must be a positive integer."));
    }
    u32::try_from(raw).map_err(|_| HandlerErr::bad_params("period is too large"))
}

pub fn get_date(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    validate_date(&get_required_str(params, key)?)
}

pub fn get_period(params: &serde_json::Value, key: &str) -> Result<u32, HandlerErr> {
    validate_period(get_required_int(params, key)?)
}

/// Cutoff period: 0 means "only sessions before the cutoff date".
/// Negative values are treated as 0.
pub fn get_cutoff_period(params: &serde_json::Value, key: &str) -> Result<u32, HandlerErr> {
    let raw = get_required_int(params, key)?.max(0);
    u32::try_from(raw).map_err(|_| HandlerErr::bad_params(format!("{} is too large", key)))
}

/// `uptoDate`/`uptoPeriod` must be given together or not at all.
pub fn get_optional_cutoff(
    params: &serde_json::Value,
) -> Result<Option<(String, u32)>, HandlerErr> {
    let has = |k: &str| params.get(k).map(|v| !v.is_null()).unwrap_or(false);
    match (has("uptoDate"), has("uptoPeriod")) {
        (false, false) => Ok(None),
        (true, true) => Ok(Some((
            get_date(params, "uptoDate")?,
            get_cutoff_period(params, "uptoPeriod")?,
        ))),
        _ => Err(HandlerErr::bad_params(
            "uptoDate and uptoPeriod must be given together",
        )),
    }
}
