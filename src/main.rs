use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use campus_energy::cli::{self, OutputFormat};
use campus_energy::config::{self, DashboardConfig};
use campus_energy::data::Dataset;
use campus_energy::web::{self, ServerContext};

#[derive(Debug, Parser)]
#[command(name = "campus-energy")]
#[command(about = "Campus energy utility and sustainability dashboard")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Address to bind (default: web.addr from config)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Filter the campus table and print KPIs and matching areas
    Summary {
        /// Area to include; repeat for more. Omit to include every area
        #[arg(long = "area")]
        areas: Vec<String>,
        /// Minimum occupancy percentage, 0-100 (default: filters.default_min_occupancy_pct)
        #[arg(long)]
        min_occupancy: Option<f64>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print the full derived table for every area
    Areas {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show key insights and the sustainability plan
    Insights,
    /// Check dataset, config files, and refresh log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write a default config file to ~/.campus-energy/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single value, e.g. `dataset.seed 11`
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr } => {
            let mut cfg = config::load();
            if let Some(addr) = addr {
                cfg.web.addr = addr;
            }
            let dataset = load_dataset(&cfg)?;
            web::serve(&ServerContext {
                dataset,
                config: cfg,
            })
        }
        Commands::Summary {
            areas,
            min_occupancy,
            format,
        } => {
            let cfg = config::load();
            let dataset = load_dataset(&cfg)?;
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(&dataset, &cfg, areas, min_occupancy, fmt)
        }
        Commands::Areas { format } => {
            let cfg = config::load();
            let dataset = load_dataset(&cfg)?;
            cli::run_areas(&dataset, OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Insights => cli::run_insights(),
        Commands::Health => {
            let cfg = config::load();
            let dataset = load_dataset(&cfg)?;
            cli::run_health(&dataset, &cfg)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

fn load_dataset(cfg: &DashboardConfig) -> Result<Dataset> {
    Dataset::from_config(&cfg.dataset, cfg.metrics.validation)
        .context("failed to build campus dataset")
}
