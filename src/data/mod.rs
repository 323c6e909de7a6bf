//! Chart input: observation records, sources, configuration and palettes

pub mod chart_properties;
pub mod error;
pub mod kpi;
pub mod palettes;
pub mod properties;
pub mod records;
pub mod source;

pub use chart_properties::{catalog, ChartPropertyReader};
pub use error::{ChartError, Result};
pub use kpi::{compute_kpis, Kpis};
pub use properties::ChartDimension;
pub use records::{
    parse_date, BoxAverage, DayFilter, Observation, ObservationSet, RawObservation, YearMonth,
};
pub use source::{load_box_averages, source_for, DataSource, FileSource, HttpSource};
