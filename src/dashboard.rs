//! Dashboard page: heatmaps wired to the radial bar chart
//!
//! Both heatmaps dispatch `heatmap-date-change` on a shared `EventBus`. The
//! dashboard keeps one subscription for the radial chart and drains it after
//! every interaction, handing each event to `update_day_bars`.

use crate::charts::events::{drain, DateChangeEvent, EventBus, DATE_CHANGE_EVENT};
use crate::charts::svg::escape;
use crate::charts::{CellRef, HeatmapChart, MonthlyHeatmapChart, RadialBarChart, Tooltip};
use crate::config::ChartConfig;
use crate::data::error::Result;
use crate::data::records::{DayFilter, ObservationSet, YearMonth};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Which heatmap a cell interaction targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapTarget {
    #[default]
    Scrolling,
    Monthly,
}

pub struct Dashboard {
    heatmap: HeatmapChart,
    monthly: MonthlyHeatmapChart,
    radial: RadialBarChart,
    bus: EventBus,
    receiver: broadcast::Receiver<DateChangeEvent>,
    timezone_label: String,
    delivered: usize,
}

impl Dashboard {
    pub fn new(observations: ObservationSet, config: &ChartConfig) -> Self {
        let mut radial = RadialBarChart::new(config.radial_options(&observations), observations.clone());
        if config.radial_day_filter != DayFilter::default() {
            radial.set_day_filter(config.radial_day_filter);
        }
        let monthly = MonthlyHeatmapChart::new(config.monthly_heatmap_options(), observations.clone());
        let heatmap = HeatmapChart::new(config.heatmap_options(), observations);

        let bus = EventBus::new();
        let receiver = bus.subscribe();
        info!(
            "Dashboard ready: radial range {}, month {}",
            radial.date_range_label(),
            monthly.picker_label()
        );
        Dashboard {
            heatmap,
            monthly,
            radial,
            bus,
            receiver,
            timezone_label: config.timezone_label.clone(),
            delivered: 0,
        }
    }

    pub fn heatmap(&self) -> &HeatmapChart {
        &self.heatmap
    }

    pub fn monthly(&self) -> &MonthlyHeatmapChart {
        &self.monthly
    }

    pub fn radial(&self) -> &RadialBarChart {
        &self.radial
    }

    /// Extra listener on the date change bus
    pub fn subscribe(&self) -> broadcast::Receiver<DateChangeEvent> {
        self.bus.subscribe()
    }

    /// Events handed to the radial chart so far
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    fn dispatch(&mut self, event: Option<DateChangeEvent>) -> Option<DateChangeEvent> {
        if let Some(event) = event {
            self.bus.dispatch(event);
            self.pump();
        }
        event
    }

    /// Deliver queued date changes to the radial chart; returns how many
    pub fn pump(&mut self) -> usize {
        let events = drain(&mut self.receiver);
        for event in &events {
            self.radial
                .update_day_bars(event.heatmap_date, event.max_devices);
        }
        self.delivered += events.len();
        events.len()
    }

    pub fn hover_cell(
        &mut self,
        target: HeatmapTarget,
        cell: CellRef,
        buttons: u16,
    ) -> Option<DateChangeEvent> {
        let event = match target {
            HeatmapTarget::Scrolling => self.heatmap.hover(cell, buttons),
            HeatmapTarget::Monthly => self.monthly.hover(cell),
        };
        self.dispatch(event)
    }

    pub fn leave_cell(&mut self, target: HeatmapTarget, cell: CellRef) -> Option<DateChangeEvent> {
        let event = match target {
            HeatmapTarget::Scrolling => self.heatmap.leave(cell),
            HeatmapTarget::Monthly => self.monthly.leave(cell),
        };
        self.dispatch(event)
    }

    pub fn click_cell(&mut self, target: HeatmapTarget, cell: CellRef) -> Option<DateChangeEvent> {
        let event = match target {
            HeatmapTarget::Scrolling => self.heatmap.click(cell),
            HeatmapTarget::Monthly => self.monthly.click(cell),
        };
        self.dispatch(event)
    }

    pub fn pan_by(&mut self, dx: f64) -> bool {
        self.heatmap.pan_by(dx)
    }

    pub fn select_month(&mut self, month: YearMonth) -> Result<bool> {
        self.monthly.select_month(month)
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        self.radial.set_date_range(start, end)
    }

    pub fn set_day_filter(&mut self, filter: DayFilter) {
        self.radial.set_day_filter(filter);
    }

    pub fn hover_hour(&mut self, hour: u32) {
        self.radial.hover_hour(hour);
    }

    pub fn leave_hour(&mut self) {
        self.radial.leave_hour();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        debug!("Dashboard resize to {}x{}", width, height);
        self.heatmap.resize(width, height);
        self.monthly.resize(width, height);
        self.radial.resize(width, height);
    }

    /// Static page with every chart's current SVG and tooltip
    ///
    /// `extra` sections (e.g. the bar chart) are appended as `(id, svg)`.
    pub fn to_html(&self, extra: &[(&str, String)]) -> String {
        let mut body = String::new();

        body.push_str(&section(
            "heatmapContainer",
            &format!("Devices per hour ({})", self.timezone_label),
            &self.heatmap.render(),
            self.heatmap.tooltip(),
        ));

        let mut picker = String::from("<div class=\"picker\">");
        picker.push_str(&format!(
            "<span class=\"month-picker\">{}</span>",
            escape(&self.monthly.picker_label())
        ));
        picker.push_str("</div>");
        body.push_str(&picker);
        body.push_str(&section(
            "monthlyHeatmapContainer",
            "Devices per hour, by month",
            &self.monthly.render(),
            self.monthly.tooltip(),
        ));

        let mut controls = String::from("<div class=\"picker\">");
        controls.push_str(&format!(
            "<span class=\"date-range-picker\">{}</span><select class=\"day-filter\">",
            escape(&self.radial.date_range_label())
        ));
        for filter in DayFilter::ALL {
            let selected = if filter == self.radial.day_filter() {
                " selected"
            } else {
                ""
            };
            controls.push_str(&format!(
                "<option{}>{}</option>",
                selected,
                escape(filter.label())
            ));
        }
        controls.push_str("</select></div>");
        body.push_str(&controls);
        body.push_str(&section(
            "radialBarContainer",
            "Hourly profile",
            &self.radial.render(),
            self.radial.tooltip(),
        ));

        for (id, svg) in extra {
            body.push_str(&format!(
                "<div class=\"chart\" data-chart=\"{}\">{}</div>\n",
                escape(id),
                svg
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Device counts</title>\n\
             <style>.chart{{position:relative;margin:1em 0}}.chart-tooltip{{pointer-events:none;\
             background:#fff;border:1px solid #ccc;padding:4px;font:12px sans-serif}}</style>\n\
             </head>\n<body data-event=\"{}\">\n{}</body>\n</html>\n",
            DATE_CHANGE_EVENT, body
        )
    }
}

fn section(id: &str, title: &str, svg: &str, tooltip: &Tooltip) -> String {
    format!(
        "<div class=\"chart\" data-chart=\"{id}\">\n<h2>{}</h2>\n{}\n{}\n</div>\n",
        escape(title),
        svg,
        tooltip.to_html(&format!("{}Tooltip", id)),
        id = escape(id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::heatmap::PRIMARY_BUTTON;
    use crate::charts::Series;
    use crate::data::records::tests::hourly;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, m, d).unwrap()
    }

    fn dashboard() -> Dashboard {
        // Jan 1 .. Mar 1; day d peaks at hour 12 with 10 + d devices
        let data = hourly(date(1, 1), 60, |d, h| if h == 12 { 10 + u64::from(d) } else { 1 });
        Dashboard::new(data, &ChartConfig::default())
    }

    #[test]
    fn test_hover_updates_radial_day_series() {
        let mut dash = dashboard();
        let cell = CellRef::new(date(2, 20), 12);
        let event = dash
            .hover_cell(HeatmapTarget::Scrolling, cell, 0)
            .unwrap();
        assert_eq!(event.heatmap_date, Some(date(2, 20)));
        assert_eq!(dash.delivered(), 1);
        assert_eq!(dash.radial().selected_day(), Some(date(2, 20)));
        let day = dash.radial().series(Series::Day);
        assert_eq!(day.len(), 24);
        assert_eq!(day[12].value, 10.0 + 50.0);

        dash.leave_cell(HeatmapTarget::Scrolling, cell);
        assert_eq!(dash.radial().selected_day(), None);
        assert_eq!(dash.delivered(), 2);
    }

    #[test]
    fn test_freeze_keeps_radial_day() {
        let mut dash = dashboard();
        let frozen = CellRef::new(date(2, 10), 3);
        dash.click_cell(HeatmapTarget::Scrolling, frozen);
        assert_eq!(dash.radial().selected_day(), Some(date(2, 10)));

        // Hover while frozen dispatches nothing
        assert!(dash
            .hover_cell(HeatmapTarget::Scrolling, CellRef::new(date(2, 11), 3), 0)
            .is_none());
        assert!(dash
            .hover_cell(HeatmapTarget::Scrolling, CellRef::new(date(2, 11), 3), PRIMARY_BUTTON)
            .is_none());
        assert_eq!(dash.radial().selected_day(), Some(date(2, 10)));

        // Unfreezing sends nothing; the next leave clears the day
        assert!(dash.click_cell(HeatmapTarget::Scrolling, frozen).is_none());
        assert_eq!(dash.radial().selected_day(), Some(date(2, 10)));
        dash.leave_cell(HeatmapTarget::Scrolling, frozen);
        assert_eq!(dash.radial().selected_day(), None);
    }

    #[test]
    fn test_monthly_heatmap_feeds_same_radial() {
        let mut dash = dashboard();
        // Default month is the last one (March)
        dash.select_month(YearMonth::new(2019, 1).unwrap()).unwrap();
        let event = dash
            .hover_cell(HeatmapTarget::Monthly, CellRef::new(date(1, 5), 12), 0)
            .unwrap();
        assert_eq!(event.heatmap_date, Some(date(1, 5)));
        assert_eq!(dash.radial().selected_day(), Some(date(1, 5)));
    }

    #[test]
    fn test_extra_listener_sees_events() {
        let mut dash = dashboard();
        let mut listener = dash.subscribe();
        dash.click_cell(HeatmapTarget::Scrolling, CellRef::new(date(2, 1), 0));
        let seen = drain(&mut listener);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].heatmap_date, Some(date(2, 1)));
        // Nothing left for the radial chart after an interaction
        assert_eq!(dash.pump(), 0);
    }

    #[test]
    fn test_radial_controls() {
        let mut dash = dashboard();
        assert_eq!(dash.radial().date_range(), (date(1, 30), date(3, 1)));
        dash.set_date_range(date(1, 1), date(1, 31)).unwrap();
        assert_eq!(dash.radial().date_range(), (date(1, 1), date(1, 31)));
        assert!(dash.set_date_range(date(1, 1), date(4, 1)).is_err());

        dash.set_day_filter(DayFilter::Weekend);
        assert_eq!(dash.radial().day_filter(), DayFilter::Weekend);

        dash.hover_hour(12);
        assert_eq!(dash.radial().hovered_hour(), Some(12));
        dash.leave_hour();
        assert_eq!(dash.radial().hovered_hour(), None);
    }

    #[test]
    fn test_config_day_filter_applied() {
        let props = crate::data::ChartPropertyReader::from_json_str(
            r#"{"radial.day.filter": "Weekday"}"#,
        )
        .unwrap();
        let config = ChartConfig::from_properties(&props);
        let data = hourly(date(1, 1), 10, |_, _| 2);
        let dash = Dashboard::new(data, &config);
        assert_eq!(dash.radial().day_filter(), DayFilter::Weekday);
    }

    #[test]
    fn test_html_page() {
        let mut dash = dashboard();
        dash.hover_cell(HeatmapTarget::Scrolling, CellRef::new(date(2, 20), 12), 0);
        let html = dash.to_html(&[("barChartContainer", "<svg></svg>".to_string())]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-event=\"heatmap-date-change\""));
        assert!(html.contains("id=\"heatmapContainerTooltip\""));
        assert!(html.contains("Devices per hour (Europe/Amsterdam)"));
        assert!(html.contains("2019-Mar"));
        assert!(html.contains("<option selected>All days</option>"));
        assert!(html.contains("<div class=\"chart\" data-chart=\"barChartContainer\"><svg></svg></div>"));
        assert_eq!(html.matches("<svg").count(), 4);
    }
}
