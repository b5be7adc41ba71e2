//! Metrics engine: validates base measurements and derives grid energy,
//! solar energy, and CO₂ emissions for every area.
//!
//! Out-of-range input is handled according to a [`ValidationPolicy`]:
//! `reject` fails with a [`DataValidationError`], `clamp` pulls values back
//! into range. Duplicate or empty area names are rejected under both.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{AreaInput, AreaRecord};

/// kg of CO₂ emitted per kWh drawn from the grid.
pub const EMISSION_FACTOR: f64 = 0.82;

/// How the engine treats base fields outside their valid range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Fail on the first invalid record.
    #[default]
    Reject,
    /// Clamp energy to `>= 0` and percentages to `0..=100`. NaN and
    /// infinite energy become 0.
    Clamp,
}

impl std::fmt::Display for ValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Clamp => write!(f, "clamp"),
        }
    }
}

/// A base record that violates its field constraints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataValidationError {
    #[error("area '{area}': daily energy must be a finite non-negative number, got {value}")]
    InvalidEnergy { area: String, value: f64 },

    #[error("area '{area}': {field} must be between 0 and 100, got {value}")]
    PercentOutOfRange {
        area: String,
        field: &'static str,
        value: f64,
    },

    #[error("duplicate area name '{0}'")]
    DuplicateArea(String),

    #[error("area name must not be empty")]
    EmptyName,
}

/// Derive every computed column for `inputs`, preserving order.
pub fn compute_derived_metrics(
    inputs: &[AreaInput],
    policy: ValidationPolicy,
) -> Result<Vec<AreaRecord>, DataValidationError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(inputs.len());
    let mut records = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.name.trim().is_empty() {
            return Err(DataValidationError::EmptyName);
        }
        if !seen.insert(input.name.as_str()) {
            return Err(DataValidationError::DuplicateArea(input.name.clone()));
        }

        let record = match policy {
            ValidationPolicy::Reject => {
                check(input)?;
                AreaRecord::derive(
                    input.name.clone(),
                    input.daily_energy_kwh,
                    input.solar_contribution_pct,
                    input.occupancy_pct,
                )
            }
            ValidationPolicy::Clamp => AreaRecord::derive(
                input.name.clone(),
                clamp_energy(input.daily_energy_kwh),
                clamp_pct(input.solar_contribution_pct),
                clamp_pct(input.occupancy_pct),
            ),
        };
        records.push(record);
    }

    Ok(records)
}

fn check(input: &AreaInput) -> Result<(), DataValidationError> {
    if !input.daily_energy_kwh.is_finite() || input.daily_energy_kwh < 0.0 {
        return Err(DataValidationError::InvalidEnergy {
            area: input.name.clone(),
            value: input.daily_energy_kwh,
        });
    }
    check_pct(&input.name, "solar contribution", input.solar_contribution_pct)?;
    check_pct(&input.name, "occupancy", input.occupancy_pct)
}

fn check_pct(area: &str, field: &'static str, value: f64) -> Result<(), DataValidationError> {
    // NaN fails the range check.
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(DataValidationError::PercentOutOfRange {
            area: area.to_string(),
            field,
            value,
        })
    }
}

fn clamp_energy(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, energy: f64, solar: f64, occupancy: f64) -> AreaInput {
        AreaInput::new(name, energy, solar, occupancy)
    }

    #[test]
    fn derives_grid_solar_and_co2() {
        let records =
            compute_derived_metrics(&[input("X", 500.0, 40.0, 60.0)], ValidationPolicy::Reject)
                .unwrap();
        let r = &records[0];
        assert!((r.grid_energy_kwh() - 300.0).abs() < 1e-9);
        assert!((r.solar_energy_kwh() - 200.0).abs() < 1e-9);
        assert!((r.co2_emissions_kg() - 246.0).abs() < 1e-9);
        assert_eq!(r.co2_emissions_kg(), r.grid_energy_kwh() * EMISSION_FACTOR);
    }

    #[test]
    fn preserves_input_order() {
        let inputs = vec![
            input("B", 1.0, 0.0, 0.0),
            input("A", 2.0, 0.0, 0.0),
            input("C", 3.0, 0.0, 0.0),
        ];
        let records = compute_derived_metrics(&inputs, ValidationPolicy::Reject).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn full_solar_means_zero_grid_and_emissions() {
        let records =
            compute_derived_metrics(&[input("Roof", 400.0, 100.0, 50.0)], ValidationPolicy::Reject)
                .unwrap();
        assert_eq!(records[0].grid_energy_kwh(), 0.0);
        assert_eq!(records[0].co2_emissions_kg(), 0.0);
        assert_eq!(records[0].solar_energy_kwh(), 400.0);
    }

    #[test]
    fn reject_negative_energy() {
        let err = compute_derived_metrics(&[input("X", -1.0, 40.0, 60.0)], ValidationPolicy::Reject)
            .unwrap_err();
        assert!(matches!(err, DataValidationError::InvalidEnergy { ref area, .. } if area == "X"));
    }

    #[test]
    fn reject_nan_energy() {
        let err =
            compute_derived_metrics(&[input("X", f64::NAN, 40.0, 60.0)], ValidationPolicy::Reject)
                .unwrap_err();
        assert!(matches!(err, DataValidationError::InvalidEnergy { .. }));
    }

    #[test]
    fn reject_solar_above_100() {
        let err = compute_derived_metrics(&[input("X", 10.0, 120.0, 60.0)], ValidationPolicy::Reject)
            .unwrap_err();
        assert_eq!(
            err,
            DataValidationError::PercentOutOfRange {
                area: "X".to_string(),
                field: "solar contribution",
                value: 120.0,
            }
        );
    }

    #[test]
    fn reject_occupancy_below_zero() {
        let err = compute_derived_metrics(&[input("X", 10.0, 10.0, -5.0)], ValidationPolicy::Reject)
            .unwrap_err();
        assert!(matches!(
            err,
            DataValidationError::PercentOutOfRange { field: "occupancy", .. }
        ));
    }

    #[test]
    fn clamp_pulls_values_into_range() {
        let inputs = vec![input("X", -50.0, 150.0, -10.0), input("Y", 100.0, -20.0, 130.0)];
        let records = compute_derived_metrics(&inputs, ValidationPolicy::Clamp).unwrap();

        assert_eq!(records[0].daily_energy_kwh(), 0.0);
        assert_eq!(records[0].solar_contribution_pct(), 100.0);
        assert_eq!(records[0].occupancy_pct(), 0.0);

        assert_eq!(records[1].solar_contribution_pct(), 0.0);
        assert_eq!(records[1].grid_energy_kwh(), 100.0);
        assert_eq!(records[1].occupancy_pct(), 100.0);
    }

    #[test]
    fn clamp_replaces_non_finite_with_zero() {
        let inputs = vec![input("X", f64::INFINITY, f64::NAN, 50.0)];
        let records = compute_derived_metrics(&inputs, ValidationPolicy::Clamp).unwrap();
        assert_eq!(records[0].daily_energy_kwh(), 0.0);
        assert_eq!(records[0].solar_contribution_pct(), 0.0);
    }

    #[test]
    fn duplicate_names_rejected_under_both_policies() {
        let inputs = vec![input("X", 1.0, 0.0, 0.0), input("X", 2.0, 0.0, 0.0)];
        for policy in [ValidationPolicy::Reject, ValidationPolicy::Clamp] {
            let err = compute_derived_metrics(&inputs, policy).unwrap_err();
            assert_eq!(err, DataValidationError::DuplicateArea("X".to_string()));
        }
    }

    #[test]
    fn empty_name_rejected() {
        let err = compute_derived_metrics(&[input("  ", 1.0, 0.0, 0.0)], ValidationPolicy::Clamp)
            .unwrap_err();
        assert_eq!(err, DataValidationError::EmptyName);
    }

    #[test]
    fn empty_input_yields_empty_table() {
        let records = compute_derived_metrics(&[], ValidationPolicy::Reject).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn error_messages_name_the_area() {
        let err = DataValidationError::InvalidEnergy {
            area: "Canteens".to_string(),
            value: -3.0,
        };
        assert!(err.to_string().contains("Canteens"));
    }

    #[test]
    fn policy_display() {
        assert_eq!(ValidationPolicy::Reject.to_string(), "reject");
        assert_eq!(ValidationPolicy::Clamp.to_string(), "clamp");
    }
}
