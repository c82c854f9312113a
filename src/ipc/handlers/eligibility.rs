use crate::calc::{self, Cutoff, ELIGIBILITY_THRESHOLD};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::helpers::{get_cutoff_period, get_date, get_optional_cutoff};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn periods_held(state: &AppState, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let upto_date = get_date(params, "uptoDate")?;
    let upto_period = get_cutoff_period(params, "uptoPeriod")?;
    let students = state.roster.students();
    let total = calc::total_periods_held(&students, &upto_date, upto_period);
    Ok(json!({ "totalPeriodsHeld": total }))
}

fn eligibility_list(
    state: &AppState,
    params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    let cutoff = get_optional_cutoff(params)?;
    let cutoff_ref = cutoff.as_ref().map(|(date, period)| Cutoff {
        date: date.as_str(),
        period: *period,
    });

    let students = state.roster.students();
    let rows = calc::eligibility_rows(&students, cutoff_ref);
    let total = calc::sessions_held(&students, cutoff_ref);
    let eligible_count = rows.iter().filter(|r| r.eligibility.eligible).count();
    tracing::debug!(total, eligible_count, students = rows.len(), "eligibility computed");

    Ok(json!({
        "threshold": ELIGIBILITY_THRESHOLD,
        "totalPeriodsHeld": total,
        "eligibleCount": eligible_count,
        "rows": rows,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "eligibility.periodsHeld" => periods_held(state, &req.params),
        "eligibility.list" => eligibility_list(state, &req.params),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
