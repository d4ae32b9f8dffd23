//! # api-adapters
//!
//! The JSON HTTP surface of the YCBN site. Workflow metrics are always
//! available; the axum router needs the `web-axum` feature.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod web;

pub use metrics::Metrics;

#[cfg(feature = "web-axum")]
pub use web::{router, ApiError, AppState};
