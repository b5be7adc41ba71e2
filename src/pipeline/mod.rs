//! Filter & aggregation pipeline.
//!
//! Every dashboard refresh is a pure evaluation of
//! `(&[AreaRecord], &FilterSpec) -> FilterResult`. Nothing is cached between
//! calls; the same inputs always produce the same result.
//!
//! A filter that matches no rows yields [`FilterResult::Empty`] rather than
//! statistics over zero rows. Callers branch on it before touching stats.

pub mod charts;
pub mod kpis;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::{AreaRecord, Dataset};

pub use charts::{ChartSet, build_charts};
pub use kpis::{Kpi, build_kpis};

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// User-selected filter for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Area names to include. Names not present in the dataset simply match
    /// nothing.
    pub selected_areas: BTreeSet<String>,
    /// Rows with occupancy below this are dropped.
    pub min_occupancy_pct: f64,
}

impl FilterSpec {
    pub fn new<I, S>(areas: I, min_occupancy_pct: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_areas: areas.into_iter().map(Into::into).collect(),
            min_occupancy_pct,
        }
    }

    /// Every area in `dataset` selected.
    pub fn all_areas(dataset: &Dataset, min_occupancy_pct: f64) -> Self {
        Self::new(dataset.area_names(), min_occupancy_pct)
    }

    /// Whether `record` passes both predicates.
    pub fn matches(&self, record: &AreaRecord) -> bool {
        self.selected_areas.contains(record.name())
            && record.occupancy_pct() >= self.min_occupancy_pct
    }
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Solar share of total energy across the selection.
///
/// `Undefined` when the selection consumes no energy at all. It serializes
/// as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolarShare {
    Defined(f64),
    Undefined,
}

impl SolarShare {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Defined(v) => Some(v),
            Self::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

impl std::fmt::Display for SolarShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defined(v) => write!(f, "{}%", v.trunc() as i64),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

impl Serialize for SolarShare {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Aggregates over the filtered rows. Only exists when at least one row
/// passed the filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub area_count: usize,
    pub total_energy_kwh: f64,
    pub total_solar_energy_kwh: f64,
    pub total_grid_energy_kwh: f64,
    pub solar_share_pct: SolarShare,
    pub total_co2_kg: f64,
    pub avg_occupancy_pct: f64,
}

/// Compute summary statistics, or `None` when `rows` is empty.
pub fn summarize(rows: &[AreaRecord]) -> Option<SummaryStatistics> {
    if rows.is_empty() {
        return None;
    }

    let area_count = rows.len();
    let total_energy_kwh: f64 = rows.iter().map(AreaRecord::daily_energy_kwh).sum();
    let total_solar_energy_kwh: f64 = rows.iter().map(AreaRecord::solar_energy_kwh).sum();
    let total_grid_energy_kwh: f64 = rows.iter().map(AreaRecord::grid_energy_kwh).sum();
    let total_co2_kg: f64 = rows.iter().map(AreaRecord::co2_emissions_kg).sum();
    let avg_occupancy_pct =
        rows.iter().map(AreaRecord::occupancy_pct).sum::<f64>() / area_count as f64;

    let solar_share_pct = if total_energy_kwh > 0.0 {
        SolarShare::Defined(total_solar_energy_kwh / total_energy_kwh * 100.0)
    } else {
        SolarShare::Undefined
    };

    Some(SummaryStatistics {
        area_count,
        total_energy_kwh,
        total_solar_energy_kwh,
        total_grid_energy_kwh,
        solar_share_pct,
        total_co2_kg,
        avg_occupancy_pct,
    })
}

// ---------------------------------------------------------------------------
// Filter result
// ---------------------------------------------------------------------------

/// Outcome of one refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterResult {
    /// At least one row passed; charts and KPIs can be shown.
    Populated {
        rows: Vec<AreaRecord>,
        stats: SummaryStatistics,
    },
    /// No row passed. Show a warning and skip charts and KPIs.
    Empty,
}

impl FilterResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Filtered rows in display order; empty for [`FilterResult::Empty`].
    pub fn rows(&self) -> &[AreaRecord] {
        match self {
            Self::Populated { rows, .. } => rows,
            Self::Empty => &[],
        }
    }

    pub fn stats(&self) -> Option<&SummaryStatistics> {
        match self {
            Self::Populated { stats, .. } => Some(stats),
            Self::Empty => None,
        }
    }

    /// Display state name: `"normal"` or `"empty"`.
    pub fn state(&self) -> &'static str {
        match self {
            Self::Populated { .. } => "normal",
            Self::Empty => "empty",
        }
    }
}

/// Filter `records` by `spec` and aggregate the survivors.
pub fn apply_filter(records: &[AreaRecord], spec: &FilterSpec) -> FilterResult {
    let rows: Vec<AreaRecord> = records
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect();

    match summarize(&rows) {
        Some(stats) => FilterResult::Populated { rows, stats },
        None => FilterResult::Empty,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
