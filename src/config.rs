use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PlanResult;
use crate::models::ViewMode;
use crate::planner::Planner;

/// User preferences. The only state calgrid writes to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub default_view: ViewMode,
}

/// Returns the path to the settings file.
///
/// The path is determined in the following order:
/// 1. `CALGRID_CONFIG` environment variable.
/// 2. `~/.config/calgrid/settings.json` (on Linux).
/// 3. `./settings.json` (fallback).
pub fn settings_path() -> PathBuf {
    std::env::var("CALGRID_CONFIG").map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("calgrid");
        p.push("settings.json");
        p
    })
}

/// Loads settings, falling back to defaults if the file is missing or
/// unreadable.
pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let mut f = match OpenOptions::new().read(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = %path.display(), "cannot open settings: {}", e);
            return Settings::default();
        }
    };
    let mut s = String::new();
    if f.read_to_string(&mut s).is_err() {
        return Settings::default();
    }
    serde_json::from_str(&s).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), "ignoring malformed settings: {}", e);
        Settings::default()
    })
}

/// Writes settings, creating the parent directory if needed.
pub fn save_settings(settings: &Settings) -> PlanResult<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let s = serde_json::to_string_pretty(settings)?;
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)?;
    f.write_all(s.as_bytes())?;
    tracing::debug!(path = %path.display(), "settings saved");
    Ok(())
}

/// Reads a plan snapshot. Plans are only ever read, never written back.
pub fn load_plan(path: &Path) -> PlanResult<Planner> {
    let s = fs::read_to_string(path)?;
    let plan = serde_json::from_str(&s)?;
    Ok(plan)
}

/// The plan at `path`, or the sample plan anchored on `today`.
pub fn plan_or_sample(path: Option<&Path>, today: NaiveDate) -> PlanResult<Planner> {
    match path {
        Some(p) => load_plan(p),
        None => Ok(Planner::sample(today)),
    }
}
