//! Campus area records and the immutable dataset the pipeline runs over.
//!
//! An [`AreaInput`] carries the base measurements supplied by a
//! [`DataSource`]. The metrics engine turns inputs into [`AreaRecord`]s whose
//! derived columns cannot be set independently of the base fields.

pub mod source;

use serde::{Deserialize, Serialize};

use crate::config::schema::DatasetConfig;
use crate::metrics::{self, DataValidationError, ValidationPolicy};

pub use source::{DataSource, FixtureSource, RandomSource};

// ---------------------------------------------------------------------------
// Base measurements
// ---------------------------------------------------------------------------

/// Base measurements for one campus area, as supplied by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaInput {
    pub name: String,
    pub daily_energy_kwh: f64,
    pub solar_contribution_pct: f64,
    pub occupancy_pct: f64,
}

impl AreaInput {
    pub fn new(
        name: impl Into<String>,
        daily_energy_kwh: f64,
        solar_contribution_pct: f64,
        occupancy_pct: f64,
    ) -> Self {
        Self {
            name: name.into(),
            daily_energy_kwh,
            solar_contribution_pct,
            occupancy_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived record
// ---------------------------------------------------------------------------

/// One campus area with every derived column populated.
///
/// Only the metrics engine constructs these, so the derived fields always
/// agree with the base fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRecord {
    name: String,
    daily_energy_kwh: f64,
    solar_contribution_pct: f64,
    occupancy_pct: f64,
    grid_energy_kwh: f64,
    solar_energy_kwh: f64,
    co2_emissions_kg: f64,
}

impl AreaRecord {
    /// Derive a record from base fields that are already in range.
    pub(crate) fn derive(
        name: String,
        daily_energy_kwh: f64,
        solar_contribution_pct: f64,
        occupancy_pct: f64,
    ) -> Self {
        let solar_fraction = solar_contribution_pct / 100.0;
        let grid_energy_kwh = daily_energy_kwh * (1.0 - solar_fraction);
        let solar_energy_kwh = daily_energy_kwh * solar_fraction;
        Self {
            name,
            daily_energy_kwh,
            solar_contribution_pct,
            occupancy_pct,
            grid_energy_kwh,
            solar_energy_kwh,
            co2_emissions_kg: grid_energy_kwh * metrics::EMISSION_FACTOR,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn daily_energy_kwh(&self) -> f64 {
        self.daily_energy_kwh
    }

    pub fn solar_contribution_pct(&self) -> f64 {
        self.solar_contribution_pct
    }

    pub fn occupancy_pct(&self) -> f64 {
        self.occupancy_pct
    }

    pub fn grid_energy_kwh(&self) -> f64 {
        self.grid_energy_kwh
    }

    pub fn solar_energy_kwh(&self) -> f64 {
        self.solar_energy_kwh
    }

    pub fn co2_emissions_kg(&self) -> f64 {
        self.co2_emissions_kg
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The process-lifetime area table. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: String,
    records: Vec<AreaRecord>,
}

impl Dataset {
    /// Pull inputs from `source` and run them through the metrics engine.
    pub fn load(
        source: &dyn DataSource,
        policy: ValidationPolicy,
    ) -> Result<Self, DataValidationError> {
        let records = metrics::compute_derived_metrics(&source.inputs(), policy)?;
        Ok(Self {
            source: source.name().to_string(),
            records,
        })
    }

    /// Build the seeded random dataset described by the `[dataset]` config.
    pub fn from_config(
        config: &DatasetConfig,
        policy: ValidationPolicy,
    ) -> Result<Self, DataValidationError> {
        Self::load(&RandomSource::from_config(config), policy)
    }

    /// Label of the source the table was built from.
    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Records in display order.
    pub fn records(&self) -> &[AreaRecord] {
        &self.records
    }

    /// Area names in display order.
    pub fn area_names(&self) -> Vec<&str> {
        self.records.iter().map(AreaRecord::name).collect()
    }

    pub fn contains_area(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> FixtureSource {
        FixtureSource::new(vec![
            AreaInput::new("Canteens", 400.0, 25.0, 70.0),
            AreaInput::new("Common Areas", 300.0, 50.0, 40.0),
        ])
    }

    #[test]
    fn derive_splits_energy_by_solar_fraction() {
        let record = AreaRecord::derive("X".to_string(), 500.0, 40.0, 60.0);
        assert!((record.grid_energy_kwh() - 300.0).abs() < 1e-9);
        assert!((record.solar_energy_kwh() - 200.0).abs() < 1e-9);
        assert!((record.co2_emissions_kg() - 246.0).abs() < 1e-9);
    }

    #[test]
    fn dataset_preserves_source_order() {
        let dataset = Dataset::load(&fixture(), ValidationPolicy::Reject).unwrap();
        assert_eq!(dataset.area_names(), vec!["Canteens", "Common Areas"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.source_name(), "fixture");
        assert!(dataset.contains_area("Canteens"));
        assert!(!dataset.contains_area("Library"));
    }

    #[test]
    fn dataset_from_default_config_has_all_areas() {
        let config = DatasetConfig::default();
        let dataset = Dataset::from_config(&config, ValidationPolicy::Reject).unwrap();
        assert_eq!(dataset.len(), config.areas.len());
        assert_eq!(dataset.records()[0].name(), "M Block - Classrooms");
        assert_eq!(dataset.source_name(), "random");
    }

    #[test]
    fn record_serializes_derived_columns() {
        let record = AreaRecord::derive("X".to_string(), 100.0, 50.0, 80.0);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"name\":\"X\""));
        assert!(json.contains("\"grid_energy_kwh\":50.0"));
        assert!(json.contains("\"co2_emissions_kg\":41.0"));
    }
}
