//! Chart series for the four dashboard visuals.
//!
//! Series are derived from the filtered rows only, so they are built for the
//! normal display state and never for an empty result.

use serde::Serialize;

use crate::data::AreaRecord;

/// One bar in a per-area bar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub area: String,
    pub value: f64,
}

/// One slice of the solar/grid donut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub source: &'static str,
    pub energy_kwh: f64,
}

/// One bubble in the occupancy-vs-demand scatter. Bubble size tracks energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub area: String,
    pub occupancy_pct: f64,
    pub energy_kwh: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub energy_by_area: Vec<BarPoint>,
    pub energy_split: Vec<Slice>,
    pub occupancy_vs_energy: Vec<ScatterPoint>,
    pub co2_by_area: Vec<BarPoint>,
}

pub fn build_charts(rows: &[AreaRecord]) -> ChartSet {
    let energy_by_area = bars(rows, AreaRecord::daily_energy_kwh);
    let co2_by_area = bars(rows, AreaRecord::co2_emissions_kg);

    let energy_split = vec![
        Slice {
            source: "Solar",
            energy_kwh: rows.iter().map(AreaRecord::solar_energy_kwh).sum(),
        },
        Slice {
            source: "Grid",
            energy_kwh: rows.iter().map(AreaRecord::grid_energy_kwh).sum(),
        },
    ];

    let occupancy_vs_energy = rows
        .iter()
        .map(|r| ScatterPoint {
            area: r.name().to_string(),
            occupancy_pct: r.occupancy_pct(),
            energy_kwh: r.daily_energy_kwh(),
            size: r.daily_energy_kwh(),
        })
        .collect();

    ChartSet {
        energy_by_area,
        energy_split,
        occupancy_vs_energy,
        co2_by_area,
    }
}

fn bars(rows: &[AreaRecord], value: fn(&AreaRecord) -> f64) -> Vec<BarPoint> {
    rows.iter()
        .map(|r| BarPoint {
            area: r.name().to_string(),
            value: value(r),
        })
        .collect()
}
