//! Configuration schema and defaults for the campus energy dashboard.
//!
//! Defines the TOML-serializable configuration structure with all sections:
//! `[dataset]`, `[filters]`, `[metrics]`, `[web]`, and `[logging]`.
//!
//! Every field has a sensible built-in default. Users only need to set the
//! values they want to override.

use serde::{Deserialize, Serialize};

use crate::metrics::ValidationPolicy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level dashboard configuration.
///
/// Maps directly to the `~/.campus-energy/config.toml` and
/// `.campus-energy.toml` file schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset: DatasetConfig,
    pub filters: FiltersConfig,
    pub metrics: MetricsConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [dataset]
// ---------------------------------------------------------------------------

/// Half-open integer range `[min, max)` used by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: u32,
    pub max: u32,
}

/// Synthetic dataset generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Generator seed. The same seed always yields the same table.
    pub seed: u64,
    /// Daily energy per area (kWh).
    pub energy_kwh: IntRange,
    /// Solar contribution per area (%).
    pub solar_pct: IntRange,
    /// Occupancy per area (%).
    pub occupancy_pct: IntRange,
    /// Area names in display order.
    pub areas: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            energy_kwh: IntRange { min: 250, max: 900 },
            solar_pct: IntRange { min: 20, max: 55 },
            occupancy_pct: IntRange { min: 35, max: 95 },
            areas: default_areas(),
        }
    }
}

fn default_areas() -> Vec<String> {
    [
        "M Block - Classrooms",
        "M Block - Labs",
        "M Block - Auditorium",
        "Old Building - A Block",
        "Old Building - B Block",
        "Old Building - C Block",
        "Old Building - D Block",
        "Old Building - E Block",
        "Old Building - F Block",
        "Old Building - G Block",
        "Old Building - Lower Floor Labs",
        "Canteens",
        "Common Areas",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

// ---------------------------------------------------------------------------
// [filters]
// ---------------------------------------------------------------------------

/// Initial filter state. All areas start selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Initial minimum occupancy (%).
    pub default_min_occupancy_pct: f64,
}

const DEFAULT_MIN_OCCUPANCY_PCT: f64 = 20.0;

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            default_min_occupancy_pct: DEFAULT_MIN_OCCUPANCY_PCT,
        }
    }
}

impl FiltersConfig {
    /// Whether `pct` is a usable occupancy threshold. NaN is not.
    pub fn is_valid_min_occupancy(pct: f64) -> bool {
        (0.0..=100.0).contains(&pct)
    }

    /// The initial minimum occupancy, falling back to the built-in default
    /// when the configured value is out of range.
    pub fn min_occupancy_pct(&self) -> f64 {
        if Self::is_valid_min_occupancy(self.default_min_occupancy_pct) {
            self.default_min_occupancy_pct
        } else {
            DEFAULT_MIN_OCCUPANCY_PCT
        }
    }
}

// ---------------------------------------------------------------------------
// [metrics]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Out-of-range input policy: `reject` or `clamp`.
    pub validation: ValidationPolicy,
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `campus-energy serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8501".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Refresh log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether refreshes are logged.
    pub enabled: bool,
    /// Path to the refresh log file. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.campus-energy/refresh-log.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `campus-energy config init` so users start from a documented
    /// file rather than a bare serialization.
    pub fn default_toml() -> String {
        r#"# Campus Energy Dashboard configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CAMPUS_ENERGY_*)
#   2. Project config (.campus-energy.toml in current directory)
#   3. User global config (~/.campus-energy/config.toml)
#   4. Built-in defaults

[dataset]
seed = 7
energy_kwh = { min = 250, max = 900 }   # half-open: max is never drawn
solar_pct = { min = 20, max = 55 }
occupancy_pct = { min = 35, max = 95 }
areas = [
    "M Block - Classrooms",
    "M Block - Labs",
    "M Block - Auditorium",
    "Old Building - A Block",
    "Old Building - B Block",
    "Old Building - C Block",
    "Old Building - D Block",
    "Old Building - E Block",
    "Old Building - F Block",
    "Old Building - G Block",
    "Old Building - Lower Floor Labs",
    "Canteens",
    "Common Areas",
]

[filters]
default_min_occupancy_pct = 20.0

[metrics]
validation = "reject"                 # reject | clamp

[web]
addr = "127.0.0.1:8501"
open_browser = true

[logging]
enabled = true
path = "~/.campus-energy/refresh-log.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
