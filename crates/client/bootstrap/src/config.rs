//! Tracker configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use tracker_core::{CombatRules, History, TrackerState};

/// Configuration required to bootstrap a tracker session and its storage.
#[derive(Clone, Debug)]
pub struct TrackerConfig {
    /// Directory holding `<slot>.tick.json` save files.
    pub save_dir: PathBuf,
    /// Slot resumed at startup and written by quick-save.
    pub session_slot: String,
    pub undo_limit: usize,
    pub rules: CombatRules,
    /// Autosave period; `None` disables autosave.
    pub autosave: Option<Duration>,
    pub log_dir: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let (save_dir, log_dir) = default_dirs();
        Self {
            save_dir,
            session_slot: "session".to_string(),
            undo_limit: History::<TrackerState>::DEFAULT_LIMIT,
            rules: CombatRules::default(),
            autosave: None,
            log_dir,
        }
    }
}

impl TrackerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TICK_SAVE_DIR` - Directory for save files (default: platform data dir)
    /// - `TICK_SESSION_SLOT` - Slot resumed at startup (default: session)
    /// - `TICK_UNDO_LIMIT` - Undo steps kept (default: 100)
    /// - `TICK_MAX_JOIN_OFFSET` - Largest join battle tick offset (default: 6)
    /// - `TICK_AUTOSAVE_SECS` - Autosave period in seconds, 0 disables (default: 0)
    /// - `TICK_LOG_DIR` - Directory for log files (default: platform cache dir)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(dir) = read("TICK_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }

        if let Some(slot) = read("TICK_SESSION_SLOT") {
            config.session_slot = slot.trim().to_string();
        }

        if let Some(limit) = parse::<usize>(read("TICK_UNDO_LIMIT")) {
            config.undo_limit = limit.max(1);
        }

        if let Some(offset) = parse::<u64>(read("TICK_MAX_JOIN_OFFSET")) {
            config.rules = CombatRules::with_max_join_offset(offset);
        }

        config.autosave = parse::<u64>(read("TICK_AUTOSAVE_SECS"))
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        if let Some(dir) = read("TICK_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Platform-specific save and log directories.
fn default_dirs() -> (PathBuf, PathBuf) {
    match ProjectDirs::from("", "", "ticktracker") {
        Some(dirs) => (
            dirs.data_dir().join("saves"),
            dirs.cache_dir().join("logs"),
        ),
        None => {
            let fallback = env::temp_dir().join("ticktracker");
            (fallback.join("saves"), fallback.join("logs"))
        }
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> TrackerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert_eq!(config.session_slot, "session");
        assert_eq!(config.undo_limit, 100);
        assert_eq!(config.rules.max_join_offset, 6);
        assert!(config.autosave.is_none());
        assert!(config.save_dir.ends_with("saves"));
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("TICK_SAVE_DIR", "/tmp/ticks"),
            ("TICK_SESSION_SLOT", " raid "),
            ("TICK_UNDO_LIMIT", "0"),
            ("TICK_MAX_JOIN_OFFSET", "10"),
            ("TICK_AUTOSAVE_SECS", "30"),
        ]);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/ticks"));
        assert_eq!(config.session_slot, "raid");
        assert_eq!(config.undo_limit, 1);
        assert_eq!(config.rules.max_join_offset, 10);
        assert_eq!(config.autosave, Some(Duration::from_secs(30)));
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = config(&[
            ("TICK_UNDO_LIMIT", "lots"),
            ("TICK_AUTOSAVE_SECS", "0"),
            ("TICK_SESSION_SLOT", "   "),
        ]);
        assert_eq!(config.undo_limit, 100);
        assert!(config.autosave.is_none());
        assert_eq!(config.session_slot, "session");
    }
}
