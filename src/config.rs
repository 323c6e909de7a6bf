//! Chart configuration from chart properties
//!
//! Every default comes from charts.json through `ChartPropertyReader`; this
//! module only turns property strings into typed chart options.

use crate::charts::{
    BarChartOptions, HeatmapColorOptions, HeatmapOptions, MonthlyHeatmapOptions, RadialBarOptions,
};
use crate::data::chart_properties::ChartPropertyReader;
use crate::data::properties::ChartDimension;
use crate::data::records::{DayFilter, ObservationSet};
use chrono::Duration;
use std::path::PathBuf;

/// Container sizes used when a dimension is `auto`
const HEATMAP_AUTO_SIZE: (u32, u32) = (1000, 500);
const MONTHLY_AUTO_SIZE: (u32, u32) = (1000, 560);
const RADIAL_AUTO_SIZE: (u32, u32) = (500, 560);
const BAR_AUTO_SIZE: (u32, u32) = (900, 400);

#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Container width (pixels or Auto)
    pub width: ChartDimension,

    /// Container height (pixels or Auto)
    pub height: ChartDimension,

    /// Timezone named in the heatmap axis titles; times themselves are UTC
    pub timezone_label: String,

    pub heatmap_colors: HeatmapColorOptions,

    /// Initial month of the monthly heatmap (`YYYY-MM`)
    pub heatmap_month: Option<String>,

    /// Initial averaging range of the radial chart, in days before the last observation
    pub radial_range_days: u32,

    pub radial_day_filter: DayFilter,

    pub bar_x_label: String,

    pub output_dir: PathBuf,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::from_properties(&ChartPropertyReader::default())
    }
}

impl ChartConfig {
    pub fn from_properties(props: &ChartPropertyReader) -> Self {
        let width = ChartDimension::parse(&props.get_string("chart.width"), ChartDimension::Auto);
        let height = ChartDimension::parse(&props.get_string("chart.height"), ChartDimension::Auto);

        let heatmap_colors = HeatmapColorOptions {
            palette: props.get_enum("heatmap.palette"),
            max_factor: props.get_f64("heatmap.color.max.factor"),
            max_floor: props.get_f64("heatmap.color.max.floor"),
        };

        // Choice values come back in their declared spelling
        let radial_day_filter =
            DayFilter::parse(&props.get_enum("radial.day.filter")).unwrap_or_default();

        Self {
            width,
            height,
            timezone_label: props.get_string("timezone.label"),
            heatmap_colors,
            heatmap_month: props.get_optional_string("heatmap.month"),
            radial_range_days: props.get_u32("radial.range.days"),
            radial_day_filter,
            bar_x_label: props.get_string("bar.x.label"),
            output_dir: PathBuf::from(props.get_string("output.dir")),
        }
    }

    /// Container size in pixels for a chart with the given auto size
    fn resolve(&self, auto: (u32, u32)) -> (f64, f64) {
        (self.width.resolve(auto.0), self.height.resolve(auto.1))
    }

    pub fn heatmap_options(&self) -> HeatmapOptions {
        let (width, height) = self.resolve(HEATMAP_AUTO_SIZE);
        HeatmapOptions {
            width,
            height,
            timezone_label: self.timezone_label.clone(),
            colors: self.heatmap_colors.clone(),
            ..HeatmapOptions::default()
        }
    }

    pub fn monthly_heatmap_options(&self) -> MonthlyHeatmapOptions {
        let (width, height) = self.resolve(MONTHLY_AUTO_SIZE);
        MonthlyHeatmapOptions {
            container_id: "monthlyHeatmapContainer".to_string(),
            width,
            height,
            timezone_label: self.timezone_label.clone(),
            colors: self.heatmap_colors.clone(),
            init_month: self.heatmap_month.clone(),
        }
    }

    /// Radial options averaging over the last `radial_range_days` days of `data`
    pub fn radial_options(&self, data: &ObservationSet) -> RadialBarOptions {
        let (width, height) = self.resolve(RADIAL_AUTO_SIZE);
        let end = data.max_date();
        let start = end - Duration::days(i64::from(self.radial_range_days));
        RadialBarOptions {
            width,
            height,
            init_date_range_start: Some(start.format("%Y-%m-%d").to_string()),
            init_date_range_end: Some(end.format("%Y-%m-%d").to_string()),
            ..RadialBarOptions::default()
        }
    }

    pub fn bar_options(&self) -> BarChartOptions {
        let (width, height) = self.resolve(BAR_AUTO_SIZE);
        BarChartOptions {
            width,
            height,
            x_label: self.bar_x_label.clone(),
            ..BarChartOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::tests::hourly;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.width, ChartDimension::Auto);
        assert_eq!(config.timezone_label, "Europe/Amsterdam");
        assert_eq!(config.heatmap_colors, HeatmapColorOptions::default());
        assert_eq!(config.heatmap_month, None);
        assert_eq!(config.radial_range_days, 30);
        assert_eq!(config.radial_day_filter, DayFilter::AllDays);
        assert_eq!(config.bar_x_label, "Aileen Boxes");
        assert_eq!(config.output_dir, PathBuf::from("charts"));

        let heatmap = config.heatmap_options();
        assert_eq!((heatmap.width, heatmap.height), (1000.0, 500.0));
        let bar = config.bar_options();
        assert_eq!((bar.width, bar.height), (900.0, 400.0));
    }

    #[test]
    fn test_overrides() {
        let props = ChartPropertyReader::from_json_str(
            r#"{
                "chart.width": 1200,
                "chart.height": "50",
                "heatmap.palette": "gnbu",
                "heatmap.color.max.factor": "0",
                "radial.day.filter": "Weekend",
                "heatmap.month": "2019-02"
            }"#,
        )
        .unwrap();
        let config = ChartConfig::from_properties(&props);
        assert_eq!(config.width, ChartDimension::Pixels(1200));
        // Out of range falls back to Auto
        assert_eq!(config.height, ChartDimension::Auto);
        assert_eq!(config.heatmap_colors.palette, "GnBu");
        assert_eq!(config.heatmap_colors.max_factor, 0.8);
        assert_eq!(config.radial_day_filter, DayFilter::Weekend);

        let monthly = config.monthly_heatmap_options();
        assert_eq!(monthly.width, 1200.0);
        assert_eq!(monthly.height, 560.0);
        assert_eq!(monthly.init_month.as_deref(), Some("2019-02"));
    }

    #[test]
    fn test_radial_range_ends_at_last_observation() {
        let data = hourly(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), 60, |_, _| 1);
        let options = ChartConfig::default().radial_options(&data);
        assert_eq!(options.init_date_range_start.as_deref(), Some("2019-01-30"));
        assert_eq!(options.init_date_range_end.as_deref(), Some("2019-03-01"));
    }
}
