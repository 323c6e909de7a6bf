//! Device Charts Library
//!
//! Chart components for device observation dashboards: a scrolling hourly
//! heatmap, a monthly heatmap, a radial bar chart comparing one day with an
//! averaged baseline, and a per-box bar chart. Charts render to SVG; the
//! `pipeline` module ties loading, interaction replay and rendering together.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod pipeline;
pub mod scales;
