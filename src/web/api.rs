//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::analytics::logger;
use crate::config;
use crate::data::AreaRecord;
use crate::insights;
use crate::pipeline::{
    self, ChartSet, FilterResult, FilterSpec, Kpi, SummaryStatistics, build_charts, build_kpis,
};

use super::{ServerContext, content_type_json, error_response};

/// Warning shown in place of KPIs and charts when nothing matches.
const EMPTY_WARNING: &str = "No data available for selected filters. Please adjust filters.";

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

/// Areas API response: the selectable areas and the initial filter.
#[derive(Serialize)]
struct AreasResponse<'a> {
    areas: Vec<&'a str>,
    default_filter: FilterSpec,
}

/// One dashboard refresh.
///
/// `state` is `"normal"` or `"empty"`. For `"empty"`, `stats`, `charts`, and
/// `kpis` are absent and `warning` is set.
#[derive(Debug, Serialize)]
struct DashboardResponse {
    state: &'static str,
    filter: FilterSpec,
    rows: Vec<AreaRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SummaryStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    solar_share_defined: Option<bool>,
    kpis: Vec<Kpi>,
    #[serde(skip_serializing_if = "Option::is_none")]
    charts: Option<ChartSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<&'static str>,
}

/// Config API response: the full config as a JSON value + the raw TOML.
#[derive(Serialize)]
struct ConfigResponse {
    config: config::DashboardConfig,
    toml_text: String,
}

/// Config update request: a list of key-value pairs.
#[derive(Deserialize)]
struct ConfigUpdateRequest {
    updates: Vec<ConfigKeyValue>,
}

#[derive(Deserialize)]
struct ConfigKeyValue {
    key: String,
    value: String,
}

/// Health API response.
#[derive(Serialize)]
struct HealthResponse {
    platform: &'static str,
    source: String,
    areas: usize,
    seed: u64,
    validation: String,
    config_exists: bool,
    logging_enabled: bool,
    log_entries: usize,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// The filter a fresh page load starts with: every area, configured minimum.
fn default_filter(ctx: &ServerContext) -> FilterSpec {
    FilterSpec::all_areas(&ctx.dataset, ctx.config.filters.min_occupancy_pct())
}

/// Run one refresh and shape it for the frontend.
fn refresh(ctx: &ServerContext, spec: FilterSpec) -> DashboardResponse {
    let result = pipeline::apply_filter(ctx.dataset.records(), &spec);
    logger::log_refresh(&ctx.config.logging, "web", &spec, &result);

    match result {
        FilterResult::Populated { rows, stats } => DashboardResponse {
            state: "normal",
            filter: spec,
            kpis: build_kpis(&stats),
            charts: Some(build_charts(&rows)),
            solar_share_defined: Some(stats.solar_share_pct.is_defined()),
            stats: Some(stats),
            rows,
            warning: None,
        },
        FilterResult::Empty => DashboardResponse {
            state: "empty",
            filter: spec,
            rows: Vec::new(),
            stats: None,
            solar_share_defined: None,
            kpis: Vec::new(),
            charts: None,
            warning: Some(EMPTY_WARNING),
        },
    }
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/areas`: selectable areas in display order and the initial filter.
pub fn get_areas(ctx: &ServerContext) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&AreasResponse {
        areas: ctx.dataset.area_names(),
        default_filter: default_filter(ctx),
    })
}

/// `GET /api/dashboard`: refresh with the initial filter.
pub fn get_dashboard(ctx: &ServerContext) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&refresh(ctx, default_filter(ctx)))
}

/// `POST /api/dashboard`: refresh with the posted filter.
///
/// Expects JSON body: `{ "selected_areas": ["Canteens"], "min_occupancy_pct": 20 }`
pub fn post_dashboard(ctx: &ServerContext, body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let spec: FilterSpec = match serde_json::from_str(body) {
        Ok(spec) => spec,
        Err(e) => return Ok(error_response(400, &format!("invalid filter: {e}"))),
    };
    if !(0.0..=100.0).contains(&spec.min_occupancy_pct) {
        return Ok(error_response(
            400,
            "invalid filter: min_occupancy_pct must be between 0 and 100",
        ));
    }
    json_response(&refresh(ctx, spec))
}

/// `GET /api/insights`: static insights panel.
pub fn get_insights() -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&insights::insights())
}

/// `GET /api/config`: current effective configuration.
pub fn get_config() -> Result<Response<Cursor<Vec<u8>>>> {
    let cfg = config::load();
    let toml_text = toml::to_string_pretty(&cfg).unwrap_or_default();

    json_response(&ConfigResponse {
        config: cfg,
        toml_text,
    })
}

/// `PUT /api/config`: update configuration keys.
///
/// Expects JSON body: `{ "updates": [{ "key": "dataset.seed", "value": "11" }] }`.
/// The dataset is fixed for the process lifetime, so changes apply on the
/// next start.
pub fn put_config(body: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    let req: ConfigUpdateRequest =
        serde_json::from_str(body).context("invalid JSON in config update request")?;

    let mut errors: Vec<String> = Vec::new();
    let mut applied: Vec<String> = Vec::new();

    for kv in &req.updates {
        match config::set_config_value(&kv.key, &kv.value) {
            Ok(()) => applied.push(format!("{} = {}", kv.key, kv.value)),
            Err(e) => errors.push(format!("{}: {:#}", kv.key, e)),
        }
    }

    json_response(&serde_json::json!({
        "applied": applied,
        "errors": errors,
        "success": errors.is_empty(),
        "restart_required": !applied.is_empty(),
    }))
}

/// `POST /api/config/reset`: reset config to defaults.
pub fn post_config_reset() -> Result<Response<Cursor<Vec<u8>>>> {
    config::reset_config().context("failed to reset config")?;

    json_response(&serde_json::json!({
        "success": true,
        "message": "Configuration reset to defaults",
        "restart_required": true,
    }))
}

/// `GET /api/health`: dataset and environment summary.
pub fn get_health(ctx: &ServerContext) -> Result<Response<Cursor<Vec<u8>>>> {
    json_response(&health(ctx))
}

fn health(ctx: &ServerContext) -> HealthResponse {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    HealthResponse {
        platform: std::env::consts::OS,
        source: ctx.dataset.source_name().to_string(),
        areas: ctx.dataset.len(),
        seed: ctx.config.dataset.seed,
        validation: ctx.config.metrics.validation.to_string(),
        config_exists,
        logging_enabled: ctx.config.logging.enabled,
        log_entries: logger::read_all_entries(&ctx.config.logging).len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::{AreaInput, Dataset, FixtureSource};
    use crate::metrics::ValidationPolicy;

    fn ctx(inputs: Vec<AreaInput>) -> ServerContext {
        let mut config = DashboardConfig::default();
        config.logging.enabled = false;
        ServerContext {
            dataset: Dataset::load(&FixtureSource::new(inputs), ValidationPolicy::Reject).unwrap(),
            config,
        }
    }

    fn campus() -> ServerContext {
        ctx(vec![
            AreaInput::new("Labs", 800.0, 25.0, 90.0),
            AreaInput::new("Canteens", 400.0, 50.0, 30.0),
            AreaInput::new("Common Areas", 300.0, 40.0, 10.0),
        ])
    }

    #[test]
    fn default_filter_selects_everything_at_configured_minimum() {
        let ctx = campus();
        let spec = default_filter(&ctx);
        assert_eq!(spec.selected_areas.len(), 3);
        assert_eq!(spec.min_occupancy_pct, 20.0);
    }

    #[test]
    fn initial_refresh_drops_areas_below_default_minimum() {
        let ctx = campus();
        let resp = refresh(&ctx, default_filter(&ctx));
        assert_eq!(resp.state, "normal");
        let names: Vec<&str> = resp.rows.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["Labs", "Canteens"]);
        assert_eq!(resp.kpis.len(), 4);
        assert!(resp.charts.is_some());
        assert!(resp.warning.is_none());
    }

    #[test]
    fn out_of_range_configured_minimum_uses_default() {
        let mut ctx = campus();
        ctx.config.filters.default_min_occupancy_pct = 150.0;
        let spec = default_filter(&ctx);
        assert_eq!(spec.min_occupancy_pct, 20.0);
        assert_eq!(refresh(&ctx, spec).state, "normal");

        ctx.config.filters.default_min_occupancy_pct = f64::NAN;
        let json = serde_json::to_value(default_filter(&ctx)).unwrap();
        assert_eq!(json["min_occupancy_pct"], 20.0);
    }

    #[test]
    fn empty_refresh_carries_warning_only() {
        let ctx = campus();
        let resp = refresh(&ctx, FilterSpec::new(Vec::<String>::new(), 0.0));
        assert_eq!(resp.state, "empty");
        assert!(resp.rows.is_empty());
        assert!(resp.stats.is_none());
        assert!(resp.charts.is_none());
        assert!(resp.kpis.is_empty());
        assert_eq!(resp.warning, Some(EMPTY_WARNING));

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("stats").is_none());
        assert!(json.get("charts").is_none());
    }

    #[test]
    fn zero_energy_refresh_reports_undefined_share() {
        let ctx = ctx(vec![AreaInput::new("Idle", 0.0, 30.0, 50.0)]);
        let resp = refresh(&ctx, FilterSpec::new(["Idle"], 0.0));
        assert_eq!(resp.solar_share_defined, Some(false));

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["stats"]["solar_share_pct"].is_null());
        assert_eq!(json["kpis"][1]["value"], "undefined");
    }

    #[test]
    fn areas_response_serializes_in_display_order() {
        let ctx = campus();
        let json = serde_json::to_value(AreasResponse {
            areas: ctx.dataset.area_names(),
            default_filter: default_filter(&ctx),
        })
        .unwrap();
        assert_eq!(json["areas"][0], "Labs");
        assert_eq!(json["areas"][2], "Common Areas");
        assert_eq!(json["default_filter"]["min_occupancy_pct"], 20.0);
    }

    #[test]
    fn post_dashboard_rejects_malformed_body() {
        let resp = post_dashboard(&campus(), "{\"selected_areas\": 3}").unwrap();
        assert_eq!(resp.status_code().0, 400);
    }

    #[test]
    fn post_dashboard_rejects_out_of_range_minimum() {
        let body = r#"{"selected_areas": ["Labs"], "min_occupancy_pct": 120}"#;
        let resp = post_dashboard(&campus(), body).unwrap();
        assert_eq!(resp.status_code().0, 400);
    }

    #[test]
    fn health_reports_dataset_source() {
        let resp = health(&campus());
        assert_eq!(resp.source, "fixture");
        assert_eq!(resp.areas, 3);
    }

    #[test]
    fn config_update_request_deserializes() {
        let json = r#"{"updates": [{"key": "dataset.seed", "value": "11"}]}"#;
        let req: ConfigUpdateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.updates.len(), 1);
        assert_eq!(req.updates[0].key, "dataset.seed");
        assert_eq!(req.updates[0].value, "11");
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            platform: "linux",
            source: "random".to_string(),
            areas: 13,
            seed: 7,
            validation: "reject".to_string(),
            config_exists: false,
            logging_enabled: true,
            log_entries: 0,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"areas\":13"));
        assert!(json.contains("\"validation\":\"reject\""));
        assert!(json.contains("\"source\":\"random\""));
    }
}
