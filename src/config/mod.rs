//! Configuration system for the campus energy dashboard.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: hardcoded in [`schema::DashboardConfig::default()`]
//! 2. **User global config**: `~/.campus-energy/config.toml`
//! 3. **Project local config**: `.campus-energy.toml` in the current working directory
//! 4. **Environment variables**: `CAMPUS_ENERGY_*` overrides (highest precedence)
//!
//! File layers are merged at the key level: a project file that only sets
//! `[web] addr` keeps every other value from the global file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use campus_energy::config;
//!
//! let cfg = config::load();
//! let dataset = Dataset::from_config(&cfg.dataset, cfg.metrics.validation)?;
//! ```

pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::metrics::ValidationPolicy;

pub use schema::DashboardConfig;

use schema::FiltersConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved dashboard configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Missing or malformed files are skipped so the dashboard always
/// starts.
pub fn load() -> DashboardConfig {
    let layers = [global_config_path(), project_config_path()]
        .into_iter()
        .filter_map(load_toml_file)
        .collect::<Vec<_>>();

    let mut config = resolve_layers(&layers);
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Deep-merge raw TOML layers over the defaults and deserialize the result.
///
/// Falls back to defaults if the merged tree no longer matches the schema.
/// An out-of-range initial minimum occupancy is replaced by its default.
fn resolve_layers(layers: &[toml::Value]) -> DashboardConfig {
    let Ok(mut merged) = toml::Value::try_from(DashboardConfig::default()) else {
        return DashboardConfig::default();
    };
    for layer in layers {
        merge_values(&mut merged, layer);
    }
    let mut config: DashboardConfig = merged.try_into().unwrap_or_default();
    config.filters.default_min_occupancy_pct = config.filters.min_occupancy_pct();
    config
}

/// Read a TOML file as a raw value tree.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    toml::from_str(&content).ok()
}

/// Overlay `overlay` onto `base`. Tables merge key by key; any other value
/// replaces the base value outright.
fn merge_values(base: &mut toml::Value, overlay: &toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.campus-energy/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".campus-energy").join("config.toml"))
}

/// Path to the project local config: `.campus-energy.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".campus-energy.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply `CAMPUS_ENERGY_*` overrides (highest precedence layer).
///
/// Supported variables:
/// - `CAMPUS_ENERGY_SEED`: generator seed
/// - `CAMPUS_ENERGY_MIN_OCCUPANCY`: initial minimum occupancy (%)
/// - `CAMPUS_ENERGY_VALIDATION`: `reject` or `clamp`
/// - `CAMPUS_ENERGY_ADDR`: web listen address
/// - `CAMPUS_ENERGY_LOG`: refresh logging (`1`/`true`/`yes`/`on`)
///
/// Unparseable values are ignored.
fn apply_overrides(config: &mut DashboardConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("CAMPUS_ENERGY_SEED")
        && let Ok(seed) = val.trim().parse::<u64>()
    {
        config.dataset.seed = seed;
    }
    if let Some(val) = var("CAMPUS_ENERGY_MIN_OCCUPANCY")
        && let Ok(pct) = val.trim().parse::<f64>()
        && FiltersConfig::is_valid_min_occupancy(pct)
    {
        config.filters.default_min_occupancy_pct = pct;
    }
    if let Some(val) = var("CAMPUS_ENERGY_VALIDATION")
        && let Some(policy) = parse_policy(&val)
    {
        config.metrics.validation = policy;
    }
    if let Some(val) = var("CAMPUS_ENERGY_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = var("CAMPUS_ENERGY_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Parse a validation policy string.
fn parse_policy(val: &str) -> Option<ValidationPolicy> {
    match val.trim().to_ascii_lowercase().as_str() {
        "reject" => Some(ValidationPolicy::Reject),
        "clamp" => Some(ValidationPolicy::Clamp),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.campus-energy/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.campus-energy/ directory")?;
    }

    fs::write(&path, DashboardConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Starts from the existing file (or serialized defaults), updates the dotted
/// key, checks the result still matches the schema, and writes it back.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&DashboardConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let parsed: DashboardConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': '{value}'"))?;
    check_config(&parsed)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Range checks the schema types cannot express.
fn check_config(config: &DashboardConfig) -> Result<()> {
    let pct = config.filters.default_min_occupancy_pct;
    if !FiltersConfig::is_valid_min_occupancy(pct) {
        anyhow::bail!("filters.default_min_occupancy_pct must be between 0 and 100, got {pct}");
    }
    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The existing value's type decides how `raw_value` is parsed. Keys that
/// are not already present are rejected.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::Array(_)) => {
            // Comma-separated list
            let items: Vec<toml::Value> = raw_value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect();
            toml::Value::Array(items)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("config key not found: '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
