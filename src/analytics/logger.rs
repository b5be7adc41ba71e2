use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::expand_path;
use crate::config::schema::LoggingConfig;
use crate::pipeline::{FilterResult, FilterSpec};

// ---------------------------------------------------------------------------
// Refresh log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the refresh log (`~/.campus-energy/refresh-log.jsonl`).
///
/// One line per dashboard refresh, from either the CLI or the web server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshLogEntry {
    pub timestamp: String,
    /// Where the refresh came from: `"cli"` or `"web"`.
    pub surface: String,
    pub selected_areas: usize,
    pub min_occupancy_pct: f64,
    pub rows: usize,
    /// Display state: `"normal"` or `"empty"`.
    pub outcome: String,
    /// Whether the solar share was defined (only set for normal outcomes).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub solar_share_defined: Option<bool>,
}

impl RefreshLogEntry {
    pub fn new(surface: &str, spec: &FilterSpec, result: &FilterResult) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            surface: surface.to_string(),
            selected_areas: spec.selected_areas.len(),
            min_occupancy_pct: spec.min_occupancy_pct,
            rows: result.rows().len(),
            outcome: result.state().to_string(),
            solar_share_defined: result.stats().map(|s| s.solar_share_pct.is_defined()),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging functions
// ---------------------------------------------------------------------------

/// Record one refresh. Best-effort: failures never reach the caller.
pub fn log_refresh(config: &LoggingConfig, surface: &str, spec: &FilterSpec, result: &FilterResult) {
    if !config.enabled {
        return;
    }
    let Some(path) = refresh_log_path(config) else {
        return;
    };
    let _ = append_log_entry(&path, &RefreshLogEntry::new(surface, spec, result));
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all refresh log entries.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries(config: &LoggingConfig) -> Vec<RefreshLogEntry> {
    let Some(path) = refresh_log_path(config) else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    BufReader::new(file)
        .lines()
        .map_while(|line| line.ok())
        .filter_map(|line| serde_json::from_str::<RefreshLogEntry>(&line).ok())
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(path: &Path, entry: &RefreshLogEntry) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the refresh log file.
pub fn refresh_log_path(config: &LoggingConfig) -> Option<PathBuf> {
    expand_path(&config.path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
