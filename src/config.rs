use std::path::PathBuf;

pub const WORKSPACE_ENV: &str = "ATTENDANCED_WORKSPACE";
pub const SEED_ENV: &str = "ATTENDANCED_SEED";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Workspace to open at startup, same as a `workspace.select` request.
    pub workspace: Option<PathBuf>,
    /// Seed file applied to the in-memory roster when no workspace is set.
    pub seed: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            workspace: path(WORKSPACE_ENV),
            seed: path(SEED_ENV),
        }
    }
}
