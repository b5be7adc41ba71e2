//! KPI strip shown above the charts.
//!
//! Values are truncated to whole numbers the way the dashboard displays
//! them; an undefined solar share is shown as `undefined`, never `0%`.

use serde::Serialize;

use super::SummaryStatistics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: String,
}

pub fn build_kpis(stats: &SummaryStatistics) -> Vec<Kpi> {
    vec![
        Kpi {
            label: "Total Energy (kWh/day)",
            value: truncate(stats.total_energy_kwh).to_string(),
        },
        Kpi {
            label: "Solar Share (%)",
            value: stats.solar_share_pct.to_string(),
        },
        Kpi {
            label: "CO₂ Emissions (kg/day)",
            value: truncate(stats.total_co2_kg).to_string(),
        },
        Kpi {
            label: "Avg Occupancy",
            value: format!("{}%", truncate(stats.avg_occupancy_pct)),
        },
    ]
}

fn truncate(v: f64) -> i64 {
    v.trunc() as i64
}
