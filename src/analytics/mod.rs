//! Refresh logging for the dashboard.
//!
//! Each refresh appends one JSON line describing the filter and its outcome.
//! Logging is best-effort and never affects the refresh itself.

pub mod logger;
