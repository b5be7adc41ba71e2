//! CLI command implementations for the campus energy dashboard.
//!
//! Provides subcommand handlers for:
//! - `campus-energy summary`: one filtered refresh with KPIs and a per-area table
//! - `campus-energy areas`: the full derived table, unfiltered
//! - `campus-energy insights`: the static insights panel
//! - `campus-energy health`: dataset, config, and refresh log status
//! - `campus-energy config show|init|set|reset`: configuration management

use anyhow::{Result, bail};
use colored::Colorize;

use crate::analytics::logger;
use crate::config::schema::FiltersConfig;
use crate::config::{self, DashboardConfig};
use crate::data::{AreaRecord, Dataset};
use crate::insights;
use crate::pipeline::{self, FilterResult, FilterSpec, SummaryStatistics, build_kpis};

/// Output format for report commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

const EMPTY_WARNING: &str = "No data available for selected filters. Please adjust filters.";

const CSV_HEADER: &str = "area,daily_energy_kwh,solar_contribution_pct,occupancy_pct,\
grid_energy_kwh,solar_energy_kwh,co2_emissions_kg";

// ---------------------------------------------------------------------------
// campus-energy summary
// ---------------------------------------------------------------------------

/// Build the filter for a CLI refresh.
///
/// No areas means every area. Returns the filter plus any requested names the
/// dataset does not contain.
pub fn build_filter(
    dataset: &Dataset,
    cfg: &DashboardConfig,
    areas: Vec<String>,
    min_occupancy: Option<f64>,
) -> Result<(FilterSpec, Vec<String>)> {
    let min = match min_occupancy {
        Some(pct) if !FiltersConfig::is_valid_min_occupancy(pct) => {
            bail!("--min-occupancy must be between 0 and 100, got {pct}")
        }
        Some(pct) => pct,
        None => cfg.filters.min_occupancy_pct(),
    };

    if areas.is_empty() {
        return Ok((FilterSpec::all_areas(dataset, min), Vec::new()));
    }

    let unknown: Vec<String> = areas
        .iter()
        .filter(|a| !dataset.contains_area(a))
        .cloned()
        .collect();
    Ok((FilterSpec::new(areas, min), unknown))
}

/// Run one filtered refresh and print it.
pub fn run_summary(
    dataset: &Dataset,
    cfg: &DashboardConfig,
    areas: Vec<String>,
    min_occupancy: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let (spec, unknown) = build_filter(dataset, cfg, areas, min_occupancy)?;
    let result = pipeline::apply_filter(dataset.records(), &spec);
    logger::log_refresh(&cfg.logging, "cli", &spec, &result);

    if !unknown.is_empty() && format == OutputFormat::Table {
        println!(
            "  {} unknown area(s) ignored: {}",
            "Note:".dimmed(),
            unknown.join(", ")
        );
    }

    match format {
        OutputFormat::Json => {
            let value = summary_json(&spec, &result, &unknown);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => print_records_csv(result.rows()),
        OutputFormat::Table => match &result {
            FilterResult::Populated { rows, stats } => print_summary_table(&spec, rows, stats),
            FilterResult::Empty => println!("{}", format!("⚠ {EMPTY_WARNING}").yellow()),
        },
    }

    Ok(())
}

fn print_summary_table(spec: &FilterSpec, rows: &[AreaRecord], stats: &SummaryStatistics) {
    println!("{}", "Campus Energy Summary".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  {} {} area(s), occupancy ≥ {}%",
        "Filter:".bold(),
        spec.selected_areas.len(),
        spec.min_occupancy_pct
    );
    println!();

    for kpi in build_kpis(stats) {
        let value = if kpi.value == "undefined" {
            kpi.value.yellow()
        } else {
            kpi.value.normal()
        };
        println!("  {:<24} {}", format!("{}:", kpi.label).bold(), value);
    }
    println!();

    println!(
        "  {} {} kWh  {} {} kWh",
        "Solar:".bold(),
        format_number(whole(stats.total_solar_energy_kwh)),
        "Grid:".bold(),
        format_number(whole(stats.total_grid_energy_kwh)),
    );
    println!();

    print_records_table(rows);
}

/// JSON shape of one CLI refresh. `unknown_areas` lists requested names the
/// dataset does not contain.
fn summary_json(spec: &FilterSpec, result: &FilterResult, unknown: &[String]) -> serde_json::Value {
    match result {
        FilterResult::Populated { rows, stats } => serde_json::json!({
            "state": result.state(),
            "filter": spec,
            "unknown_areas": unknown,
            "rows": rows,
            "stats": stats,
            "solar_share_defined": stats.solar_share_pct.is_defined(),
            "kpis": build_kpis(stats),
        }),
        FilterResult::Empty => serde_json::json!({
            "state": result.state(),
            "filter": spec,
            "unknown_areas": unknown,
            "rows": [],
            "warning": EMPTY_WARNING,
        }),
    }
}

// ---------------------------------------------------------------------------
// campus-energy areas
// ---------------------------------------------------------------------------

/// Print the full derived table.
pub fn run_areas(dataset: &Dataset, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(dataset.records())?);
        }
        OutputFormat::Csv => print_records_csv(dataset.records()),
        OutputFormat::Table => {
            println!("{}", "Campus Areas".bold().cyan());
            println!("{}", "=".repeat(60));
            print_records_table(dataset.records());
        }
    }
    Ok(())
}

fn print_records_table(rows: &[AreaRecord]) {
    println!(
        "  {:<22} {:>9} {:>7} {:>6} {:>9} {:>9} {:>9}",
        "Area", "Energy", "Solar%", "Occ%", "Grid", "Solar", "CO₂ kg"
    );
    println!("  {}", "-".repeat(78));

    for (i, r) in rows.iter().enumerate() {
        let line = format!(
            "  {:<22} {:>9} {:>7} {:>6} {:>9} {:>9} {:>9}",
            truncate(r.name(), 22),
            format_number(whole(r.daily_energy_kwh())),
            whole(r.solar_contribution_pct()),
            whole(r.occupancy_pct()),
            format_number(whole(r.grid_energy_kwh())),
            format_number(whole(r.solar_energy_kwh())),
            format_number(whole(r.co2_emissions_kg())),
        );

        if i % 2 == 0 {
            println!("{}", line);
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_records_csv(rows: &[AreaRecord]) {
    println!("{CSV_HEADER}");
    for r in rows {
        println!(
            "{},{},{},{},{:.3},{:.3},{:.3}",
            csv_field(r.name()),
            r.daily_energy_kwh(),
            r.solar_contribution_pct(),
            r.occupancy_pct(),
            r.grid_energy_kwh(),
            r.solar_energy_kwh(),
            r.co2_emissions_kg(),
        );
    }
}

// ---------------------------------------------------------------------------
// campus-energy insights
// ---------------------------------------------------------------------------

/// Print the static insights panel.
pub fn run_insights() -> Result<()> {
    let panel = insights::insights();

    println!("{}", "Key Insights & Sustainability Actions".bold().cyan());
    println!("{}", "=".repeat(50));
    for line in panel.key_insights {
        println!("  • {line}");
    }
    println!();
    println!("{}", "Long-Term Sustainability Plan".bold().cyan());
    for line in panel.sustainability_plan {
        println!("  • {line}");
    }
    println!();
    println!("  {} {}", "Target:".bold(), panel.target.green());
    Ok(())
}

// ---------------------------------------------------------------------------
// campus-energy health
// ---------------------------------------------------------------------------

/// Check dataset, config files, and refresh log.
pub fn run_health(dataset: &Dataset, cfg: &DashboardConfig) -> Result<()> {
    println!("{}", "Campus Energy Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.campus-energy/config.toml found"
        } else {
            "not found (run `campus-energy config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".campus-energy.toml found"
        } else {
            "none (optional)"
        },
    );

    print_health_item(
        "Dataset",
        !dataset.is_empty(),
        &format!(
            "{} areas from {} source, seed {}, {} validation",
            dataset.len(),
            dataset.source_name(),
            cfg.dataset.seed,
            cfg.metrics.validation
        ),
    );

    let zero_energy = dataset
        .records()
        .iter()
        .filter(|r| r.daily_energy_kwh() == 0.0)
        .count();
    if zero_energy > 0 {
        print_health_item(
            "Zero-energy areas",
            false,
            &format!("{zero_energy} (solar share may be undefined)"),
        );
    }

    let log_exists = logger::refresh_log_path(&cfg.logging)
        .map(|p| p.exists())
        .unwrap_or(false);
    let detail = match (cfg.logging.enabled, log_exists) {
        (false, _) => "disabled".to_string(),
        (true, true) => format!("{} entries", logger::read_all_entries(&cfg.logging).len()),
        (true, false) => "no log file yet".to_string(),
    };
    print_health_item("Refresh log", cfg.logging.enabled, &detail);

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<25} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// campus-energy config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Campus Energy Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.campus-energy/config.toml", global_exists);
    print_source(".campus-energy.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "CAMPUS_ENERGY_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(label: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), label.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.campus-energy/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to change the dataset, filters, or server.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate toward zero; negatives and NaN become 0.
fn whole(v: f64) -> usize {
    v.trunc() as usize
}

/// Format a number with comma separators for readability.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Quote a CSV field when it contains a delimiter or quote.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AreaInput, FixtureSource};
    use crate::metrics::ValidationPolicy;

    fn dataset() -> Dataset {
        let source = FixtureSource::new(vec![
            AreaInput::new("Labs", 800.0, 25.0, 90.0),
            AreaInput::new("Canteens", 400.0, 50.0, 30.0),
        ]);
        Dataset::load(&source, ValidationPolicy::Reject).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(12345), "12,345");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
        assert_eq!(truncate("CO₂ heavy block", 4), "CO₂…");
    }

    #[test]
    fn test_whole() {
        assert_eq!(whole(1234.99), 1234);
        assert_eq!(whole(0.4), 0);
        assert_eq!(whole(-3.0), 0);
    }

    #[test]
    fn test_csv_field() {
        assert_eq!(csv_field("Labs"), "Labs");
        assert_eq!(csv_field("Labs, Floor 1"), "\"Labs, Floor 1\"");
        assert_eq!(csv_field("The \"Hub\""), "\"The \"\"Hub\"\"\"");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn filter_defaults_to_all_areas_and_configured_minimum() {
        let cfg = DashboardConfig::default();
        let (spec, unknown) = build_filter(&dataset(), &cfg, Vec::new(), None).unwrap();
        assert_eq!(spec.selected_areas.len(), 2);
        assert_eq!(spec.min_occupancy_pct, cfg.filters.default_min_occupancy_pct);
        assert!(unknown.is_empty());
    }

    #[test]
    fn out_of_range_configured_minimum_is_not_a_flag_error() {
        let mut cfg = DashboardConfig::default();
        cfg.filters.default_min_occupancy_pct = 150.0;
        let (spec, _) = build_filter(&dataset(), &cfg, Vec::new(), None).unwrap();
        assert_eq!(spec.min_occupancy_pct, 20.0);
    }

    #[test]
    fn filter_reports_unknown_areas() {
        let cfg = DashboardConfig::default();
        let areas = vec!["Labs".to_string(), "Gym".to_string()];
        let (spec, unknown) = build_filter(&dataset(), &cfg, areas, Some(0.0)).unwrap();
        assert!(spec.selected_areas.contains("Gym"));
        assert_eq!(unknown, vec!["Gym".to_string()]);
    }

    #[test]
    fn json_summary_lists_unknown_areas() {
        let ds = dataset();
        let cfg = DashboardConfig::default();
        let areas = vec!["Labs".to_string(), "Gym".to_string()];
        let (spec, unknown) = build_filter(&ds, &cfg, areas, Some(0.0)).unwrap();
        let result = pipeline::apply_filter(ds.records(), &spec);

        let json = summary_json(&spec, &result, &unknown);
        assert_eq!(json["state"], "normal");
        assert_eq!(json["unknown_areas"][0], "Gym");
        assert_eq!(json["solar_share_defined"], true);

        let (spec, unknown) = build_filter(&ds, &cfg, vec!["Gym".to_string()], None).unwrap();
        let json = summary_json(&spec, &pipeline::apply_filter(ds.records(), &spec), &unknown);
        assert_eq!(json["state"], "empty");
        assert_eq!(json["unknown_areas"][0], "Gym");
        assert_eq!(json["warning"], EMPTY_WARNING);
    }

    #[test]
    fn filter_rejects_out_of_range_minimum() {
        let cfg = DashboardConfig::default();
        assert!(build_filter(&dataset(), &cfg, Vec::new(), Some(101.0)).is_err());
        assert!(build_filter(&dataset(), &cfg, Vec::new(), Some(-1.0)).is_err());
        assert!(build_filter(&dataset(), &cfg, Vec::new(), Some(f64::NAN)).is_err());
    }
}
