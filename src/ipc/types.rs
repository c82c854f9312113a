use std::path::PathBuf;

use rusqlite::Connection;
use serde::Deserialize;

use crate::store::Roster;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    /// Write-through backing store; `None` means memory only.
    pub db: Option<Connection>,
    pub roster: Roster,
}

impl AppState {
    pub fn new(roster: Roster) -> Self {
        Self {
            workspace: None,
            db: None,
            roster,
        }
    }
}
