//! Campus energy dashboard.
//!
//! Generates a per-area energy table, derives grid/solar/CO₂ columns, and
//! filters it by area and occupancy for a CLI report or an embedded web
//! dashboard.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod insights;
pub mod metrics;
pub mod pipeline;
pub mod web;
