//! Chart components
//!
//! Every chart owns its layout, scales and interaction state and renders its
//! current state to an SVG string. Heatmap interactions return the
//! `DateChangeEvent` they dispatch so the caller can route it.

pub mod axis;
pub mod bar;
pub mod events;
pub mod heatmap;
pub mod heatmap_parts;
pub mod monthly_heatmap;
pub mod radial_bar;
pub mod svg;
pub mod tooltip;

pub use bar::{BarChart, BarChartOptions};
pub use events::{DateChangeEvent, EventBus, DATE_CHANGE_EVENT};
pub use heatmap::{CellRef, HeatmapChart, HeatmapOptions};
pub use heatmap_parts::HeatmapColorOptions;
pub use monthly_heatmap::{MonthlyHeatmapChart, MonthlyHeatmapOptions};
pub use radial_bar::{RadialBarChart, RadialBarOptions, Series};
pub use tooltip::{Tooltip, TooltipLine};
