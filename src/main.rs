mod calc;
mod config;
mod db;
mod ipc;
mod seed;
mod store;

use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout carries responses; logs go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn startup_state(cfg: &config::Config) -> anyhow::Result<ipc::AppState> {
    let mut state = ipc::AppState::new(store::Roster::new());
    if let Some(ws) = cfg.workspace.as_ref() {
        ipc::select_workspace(&mut state, ws)?;
        if cfg.seed.is_some() {
            tracing::warn!("seed file ignored because a workspace is configured");
        }
    } else if let Some(path) = cfg.seed.as_ref() {
        let seed = seed::load_seed_file(path)?;
        let added = seed::apply_seed(&mut state.roster, &seed)?;
        tracing::info!(seed = %path.display(), added, "roster seeded");
    }
    Ok(state)
}

fn main() {
    init_logging();

    let cfg = config::Config::from_env();
    let mut state = match startup_state(&cfg) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("startup failed: {e:#}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!("bad request line: {e}");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    tracing::debug!("stdin closed, exiting");
}
