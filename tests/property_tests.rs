//! Property tests for the metrics engine and the filter pipeline.

use campus_energy::data::{AreaInput, Dataset, FixtureSource};
use campus_energy::metrics::{EMISSION_FACTOR, ValidationPolicy};
use campus_energy::pipeline::{FilterSpec, apply_filter};
use proptest::prelude::*;

fn arb_inputs() -> impl Strategy<Value = Vec<AreaInput>> {
    proptest::collection::vec((0.0f64..5000.0, 0.0f64..=100.0, 0.0f64..=100.0), 1..=12)
        .prop_map(|cols| {
            cols.into_iter()
                .enumerate()
                .map(|(i, (e, s, o))| AreaInput::new(format!("Area {i}"), e, s, o))
                .collect()
        })
}

fn load(inputs: Vec<AreaInput>) -> Dataset {
    Dataset::load(&FixtureSource::new(inputs), ValidationPolicy::Reject).unwrap()
}

// ── Derived metrics ──────────────────────────────────────────

proptest! {
    /// Grid and solar energy always add back up to the daily total.
    #[test]
    fn grid_plus_solar_equals_total(inputs in arb_inputs()) {
        for r in load(inputs).records() {
            let sum = r.grid_energy_kwh() + r.solar_energy_kwh();
            prop_assert!(
                (sum - r.daily_energy_kwh()).abs() <= 1e-9,
                "{} + {} != {}", r.grid_energy_kwh(), r.solar_energy_kwh(), r.daily_energy_kwh()
            );
        }
    }

    #[test]
    fn co2_is_grid_times_factor(inputs in arb_inputs()) {
        for r in load(inputs).records() {
            prop_assert_eq!(r.co2_emissions_kg(), r.grid_energy_kwh() * EMISSION_FACTOR);
            prop_assert!(r.co2_emissions_kg() >= 0.0);
        }
    }

    /// Clamping never fails and always lands inside the valid ranges.
    #[test]
    fn clamp_always_yields_valid_records(
        e in proptest::num::f64::ANY,
        s in proptest::num::f64::ANY,
        o in proptest::num::f64::ANY,
    ) {
        let ds = Dataset::load(
            &FixtureSource::new(vec![AreaInput::new("X", e, s, o)]),
            ValidationPolicy::Clamp,
        ).unwrap();
        let r = &ds.records()[0];
        prop_assert!(r.daily_energy_kwh().is_finite() && r.daily_energy_kwh() >= 0.0);
        prop_assert!((0.0..=100.0).contains(&r.solar_contribution_pct()));
        prop_assert!((0.0..=100.0).contains(&r.occupancy_pct()));
    }
}

// ── Filter pipeline ──────────────────────────────────────────

proptest! {
    /// The same dataset and filter always give the same result.
    #[test]
    fn filtering_is_idempotent(inputs in arb_inputs(), min in 0.0f64..=100.0) {
        let ds = load(inputs);
        let spec = FilterSpec::all_areas(&ds, min);
        prop_assert_eq!(apply_filter(ds.records(), &spec), apply_filter(ds.records(), &spec));
    }

    /// Every row that passes was selected and meets the threshold.
    #[test]
    fn rows_are_a_matching_subset(
        inputs in arb_inputs(),
        keep in proptest::collection::vec(any::<bool>(), 12),
        min in 0.0f64..=100.0,
    ) {
        let ds = load(inputs);
        let selected: Vec<&str> = ds
            .area_names()
            .into_iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(name, _)| name)
            .collect();
        let spec = FilterSpec::new(selected, min);
        let result = apply_filter(ds.records(), &spec);

        for r in result.rows() {
            prop_assert!(spec.selected_areas.contains(r.name()));
            prop_assert!(r.occupancy_pct() >= min);
        }
        let expected = ds.records().iter().filter(|r| spec.matches(r)).count();
        prop_assert_eq!(result.rows().len(), expected);
    }

    /// No selection is always the empty state.
    #[test]
    fn empty_selection_is_always_empty(inputs in arb_inputs(), min in 0.0f64..=100.0) {
        let ds = load(inputs);
        let result = apply_filter(ds.records(), &FilterSpec::new(Vec::<String>::new(), min));
        prop_assert!(result.is_empty());
        prop_assert!(result.stats().is_none());
    }

    /// Raising the minimum occupancy never adds rows.
    #[test]
    fn raising_threshold_never_adds_rows(
        inputs in arb_inputs(),
        lo in 0.0f64..=100.0,
        delta in 0.0f64..=100.0,
    ) {
        let ds = load(inputs);
        let low = apply_filter(ds.records(), &FilterSpec::all_areas(&ds, lo));
        let high = apply_filter(ds.records(), &FilterSpec::all_areas(&ds, lo + delta));
        prop_assert!(high.rows().len() <= low.rows().len());
    }

    /// Solar share is defined exactly when the selection consumes energy,
    /// and then lies within 0..=100.
    #[test]
    fn solar_share_defined_iff_energy(inputs in arb_inputs()) {
        let ds = load(inputs);
        let result = apply_filter(ds.records(), &FilterSpec::all_areas(&ds, 0.0));
        let stats = result.stats().unwrap();

        prop_assert_eq!(stats.solar_share_pct.is_defined(), stats.total_energy_kwh > 0.0);
        if let Some(share) = stats.solar_share_pct.value() {
            prop_assert!((-1e-9..=100.0 + 1e-9).contains(&share));
        }
    }
}
