//! Data sources that supply base area measurements.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::schema::{DatasetConfig, IntRange};

use super::AreaInput;

/// Supplies the base measurements for every campus area, in display order.
pub trait DataSource {
    /// Short label shown by `health` (`"random"`, `"fixture"`).
    fn name(&self) -> &str;

    fn inputs(&self) -> Vec<AreaInput>;
}

// ---------------------------------------------------------------------------
// Seeded random source
// ---------------------------------------------------------------------------

/// Synthetic measurements drawn from a seeded generator.
///
/// Values are whole numbers drawn from half-open ranges. Each column is drawn
/// for all areas before the next column, so a given seed and area list always
/// yields the same table.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    areas: Vec<String>,
    energy_kwh: Range<u32>,
    solar_pct: Range<u32>,
    occupancy_pct: Range<u32>,
}

impl RandomSource {
    pub fn new(seed: u64, areas: Vec<String>) -> Self {
        Self::from_config(&DatasetConfig {
            seed,
            areas,
            ..DatasetConfig::default()
        })
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self {
            seed: config.seed,
            areas: config.areas.clone(),
            energy_kwh: to_range(config.energy_kwh),
            solar_pct: to_range(config.solar_pct),
            occupancy_pct: to_range(config.occupancy_pct),
        }
    }
}

impl DataSource for RandomSource {
    fn name(&self) -> &str {
        "random"
    }

    fn inputs(&self) -> Vec<AreaInput> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = self.areas.len();

        let energy = draw_column(&mut rng, &self.energy_kwh, n);
        let solar = draw_column(&mut rng, &self.solar_pct, n);
        let occupancy = draw_column(&mut rng, &self.occupancy_pct, n);

        self.areas
            .iter()
            .enumerate()
            .map(|(i, name)| {
                AreaInput::new(
                    name.clone(),
                    f64::from(energy[i]),
                    f64::from(solar[i]),
                    f64::from(occupancy[i]),
                )
            })
            .collect()
    }
}

fn to_range(range: IntRange) -> Range<u32> {
    range.min..range.max
}

/// Draw `n` values from `range`; an empty range yields its lower bound.
fn draw_column(rng: &mut StdRng, range: &Range<u32>, n: usize) -> Vec<u32> {
    (0..n)
        .map(|_| {
            if range.is_empty() {
                range.start
            } else {
                rng.gen_range(range.clone())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fixed inputs
// ---------------------------------------------------------------------------

/// A fixed table of inputs. Used by tests and anywhere deterministic data is
/// substituted for the generator.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    inputs: Vec<AreaInput>,
}

impl FixtureSource {
    pub fn new(inputs: Vec<AreaInput>) -> Self {
        Self { inputs }
    }
}

impl DataSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn inputs(&self) -> Vec<AreaInput> {
        self.inputs.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn areas() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    #[test]
    fn same_seed_same_table() {
        let a = RandomSource::new(7, areas()).inputs();
        let b = RandomSource::new(7, areas()).inputs();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_changes_table() {
        let a = RandomSource::new(7, areas()).inputs();
        let b = RandomSource::new(8, areas()).inputs();
        assert_ne!(a, b);
    }

    #[test]
    fn values_fall_in_default_ranges() {
        let config = DatasetConfig::default();
        for input in RandomSource::from_config(&config).inputs() {
            assert!((250.0..900.0).contains(&input.daily_energy_kwh));
            assert!((20.0..55.0).contains(&input.solar_contribution_pct));
            assert!((35.0..95.0).contains(&input.occupancy_pct));
            assert_eq!(input.daily_energy_kwh.fract(), 0.0);
        }
    }

    #[test]
    fn empty_range_yields_lower_bound() {
        let config = DatasetConfig {
            solar_pct: IntRange { min: 30, max: 30 },
            areas: areas(),
            ..DatasetConfig::default()
        };
        for input in RandomSource::from_config(&config).inputs() {
            assert_eq!(input.solar_contribution_pct, 30.0);
        }
    }

    #[test]
    fn names_follow_area_order() {
        let names: Vec<String> = RandomSource::new(1, areas())
            .inputs()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, areas());
    }

    #[test]
    fn fixture_returns_inputs_verbatim() {
        let inputs = vec![AreaInput::new("X", 1.0, 2.0, 3.0)];
        let source = FixtureSource::new(inputs.clone());
        assert_eq!(source.inputs(), inputs);
        assert_eq!(source.name(), "fixture");
    }
}
