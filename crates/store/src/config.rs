use std::path::PathBuf;

pub const DB_ENV_VAR: &str = "STORY_MAKER_DB";
const DB_FILE_NAME: &str = "story_maker.db";

pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
    base.join("story_maker")
}

/// Where the project database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Explicit path first, then `STORY_MAKER_DB`, then the per-user data dir.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        let env = std::env::var_os(DB_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(explicit, env)
    }

    fn resolve_with(explicit: Option<PathBuf>, env: Option<PathBuf>) -> Self {
        let db_path = explicit
            .or(env)
            .unwrap_or_else(|| app_data_dir().join(DB_FILE_NAME));
        Self { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let cfg = StoreConfig::resolve_with(
            Some(PathBuf::from("/tmp/a.db")),
            Some(PathBuf::from("/tmp/b.db")),
        );
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/a.db"));
    }

    #[test]
    fn env_beats_default() {
        let cfg = StoreConfig::resolve_with(None, Some(PathBuf::from("/tmp/b.db")));
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/b.db"));
    }

    #[test]
    fn default_lives_in_app_dir() {
        let cfg = StoreConfig::resolve_with(None, None);
        assert!(cfg.db_path.starts_with(app_data_dir()));
        assert!(cfg.db_path.ends_with(DB_FILE_NAME));
    }
}
