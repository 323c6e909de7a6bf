//! Radial bar chart comparing one day against an averaged baseline
//!
//! Each of the 24 hour bands holds two wedges: the selected day's count and
//! the average count per hour over a date range, optionally restricted to
//! some days of the week. Wedge radius follows a radial scale so wedge area
//! grows linearly with the value.
//!
//! The day series is driven from outside through `update_day_bars`, which
//! the dashboard calls for every heatmap date change.

use super::svg::{self, Element};
use super::tooltip::{Tooltip, TooltipLine};
use crate::data::error::{ChartError, Result};
use crate::data::palettes::series_color;
use crate::data::records::{parse_date, start_of_day, DayFilter, ObservationSet};
use crate::scales::color::to_hex;
use crate::scales::{format_fixed, format_number, BandScale, RadialScale};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::{debug, warn};

pub const CONTROL_HEIGHT: f64 = 60.0;
const LEGEND_HEIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 15.0;
const MARGIN_RIGHT: f64 = 5.0;
const MARGIN_BOTTOM: f64 = LEGEND_HEIGHT + 5.0;
const MARGIN_LEFT: f64 = 5.0;

const ANGLE_PADDING: f64 = 0.36;
const AXIS_CIRCLE_STROKE: &str = "#ddd";
const WEDGE_FILL_OPACITY: f64 = 0.6;
const WEDGE_FILL_OPACITY_HOVERED: f64 = 1.0;
const MAX_WEDGE_STROKE: &str = "#FF0000";
const LEGEND_ITEM_WIDTH: f64 = 155.0;
const RADIUS_TICKS: usize = 5;

/// The two series, in wedge order within an hour band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Day,
    Average,
}

impl Series {
    pub const ALL: [Series; 2] = [Series::Day, Series::Average];

    pub fn name(&self) -> &'static str {
        match self {
            Series::Day => "day",
            Series::Average => "average",
        }
    }

    fn index(&self) -> usize {
        match self {
            Series::Day => 0,
            Series::Average => 1,
        }
    }

    pub fn color(&self) -> String {
        to_hex(series_color(self.index()))
    }
}

/// One wedge value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourValue {
    pub hour: u32,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct RadialBarOptions {
    pub container_id: String,
    pub width: f64,
    pub height: f64,
    /// `YYYY-MM-DD`
    pub init_date_range_start: Option<String>,
    /// `YYYY-MM-DD`
    pub init_date_range_end: Option<String>,
}

impl Default for RadialBarOptions {
    fn default() -> Self {
        RadialBarOptions {
            container_id: "radialBarContainer".to_string(),
            width: 500.0,
            height: 560.0,
            init_date_range_start: None,
            init_date_range_end: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLayout {
    pub container_width: f64,
    pub container_height: f64,
    pub width: f64,
    pub height: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub center: (f64, f64),
}

impl RadialLayout {
    pub fn compute(container_width: f64, container_height: f64) -> Self {
        let width = container_width - MARGIN_LEFT - MARGIN_RIGHT;
        let height = container_height - CONTROL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let outer_radius = (width.min(height) / 2.0).max(0.0);
        RadialLayout {
            container_width,
            container_height,
            width,
            height,
            outer_radius,
            inner_radius: outer_radius * 0.4,
            center: (MARGIN_LEFT + width / 2.0, MARGIN_TOP + height / 2.0),
        }
    }

    pub fn svg_height(&self) -> f64 {
        self.container_height - CONTROL_HEIGHT
    }
}

/// Clamp the requested range to the data and fall back to all of it when
/// the result is empty
fn initial_range(
    data: &ObservationSet,
    start: Option<&str>,
    end: Option<&str>,
) -> (NaiveDate, NaiveDate) {
    let first = data.first().time;
    let last = data.last().time;
    let parse = |value: Option<&str>, fallback| match value.map(parse_date) {
        Some(Ok(date)) => start_of_day(date),
        Some(Err(e)) => {
            warn!("Invalid initial date range bound: {}", e);
            fallback
        }
        None => fallback,
    };
    let start = parse(start, first).max(first);
    let end = parse(end, last).min(last);
    if start < end {
        (start.date_naive(), end.date_naive())
    } else {
        (first.date_naive(), last.date_naive())
    }
}

pub struct RadialBarChart {
    options: RadialBarOptions,
    data: ObservationSet,
    layout: RadialLayout,
    angle_scale: BandScale<u32>,
    radius_scale: RadialScale,

    date_range: (NaiveDate, NaiveDate),
    day_filter: DayFilter,
    selected_day: Option<NaiveDate>,
    day_max: Option<u64>,
    day_series: Vec<HourValue>,
    average_series: Vec<HourValue>,
    hovered_hour: Option<u32>,
    tooltip: Tooltip,
}

impl RadialBarChart {
    pub fn new(options: RadialBarOptions, data: ObservationSet) -> Self {
        let layout = RadialLayout::compute(options.width, options.height);
        let date_range = initial_range(
            &data,
            options.init_date_range_start.as_deref(),
            options.init_date_range_end.as_deref(),
        );
        let mut chart = RadialBarChart {
            angle_scale: BandScale::new((0..24).collect(), (0.0, 2.0 * PI))
                .padding_inner(ANGLE_PADDING)
                .padding_outer(ANGLE_PADDING / 2.0),
            radius_scale: RadialScale::new((0.0, 1.0), (layout.inner_radius, layout.outer_radius)),
            options,
            data,
            layout,
            date_range,
            day_filter: DayFilter::AllDays,
            selected_day: None,
            day_max: None,
            day_series: Vec::new(),
            average_series: Vec::new(),
            hovered_hour: None,
            tooltip: Tooltip::new(),
        };
        chart.update_series(Series::Average);
        chart
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        self.date_range
    }

    /// Date picker bounds
    pub fn date_bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.data.min_date(), self.data.max_date())
    }

    /// Text in the date range picker input
    pub fn date_range_label(&self) -> String {
        format!(
            "{} — {}",
            self.date_range.0.format("%Y-%m-%d"),
            self.date_range.1.format("%Y-%m-%d")
        )
    }

    pub fn day_filter(&self) -> DayFilter {
        self.day_filter
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        self.selected_day
    }

    pub fn series(&self, series: Series) -> &[HourValue] {
        match series {
            Series::Day => &self.day_series,
            Series::Average => &self.average_series,
        }
    }

    pub fn radius_domain(&self) -> (f64, f64) {
        self.radius_scale.domain()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn hovered_hour(&self) -> Option<u32> {
        self.hovered_hour
    }

    fn compute_day_series(&self) -> Vec<HourValue> {
        match self.selected_day {
            Some(day) => self
                .data
                .day_slice(day)
                .iter()
                .map(|r| HourValue {
                    hour: r.hour,
                    value: r.devices as f64,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Per-hour mean over the records with a non-zero count
    fn compute_average_series(&self) -> Vec<HourValue> {
        let (start, end) = self.date_range;
        let mut by_hour: BTreeMap<u32, (u64, usize)> = BTreeMap::new();
        for r in self
            .data
            .date_range(start, end)
            .into_iter()
            .filter(|r| self.day_filter.matches(r.day_of_week))
        {
            let entry = by_hour.entry(r.hour).or_insert((0, 0));
            entry.0 += r.devices;
            if r.devices != 0 {
                entry.1 += 1;
            }
        }
        by_hour
            .into_iter()
            .map(|(hour, (sum, count))| HourValue {
                hour,
                value: if count == 0 {
                    0.0
                } else {
                    sum as f64 / count as f64
                },
            })
            .collect()
    }

    fn update_series(&mut self, series: Series) {
        let values = match series {
            Series::Day => self.compute_day_series(),
            Series::Average => self.compute_average_series(),
        };

        let upper = if values.is_empty() {
            // Shrink back to the baseline currently drawn
            self.average_series.iter().map(|v| v.value).fold(0.0, f64::max)
        } else {
            values
                .iter()
                .map(|v| v.value)
                .fold(self.radius_scale.domain().1, f64::max)
        };
        self.radius_scale.set_domain((0.0, upper));

        debug!(
            "Radial '{}': {} series has {} hours, radius domain [0, {}]",
            self.options.container_id,
            series.name(),
            values.len(),
            upper
        );
        match series {
            Series::Day => self.day_series = values,
            Series::Average => self.average_series = values,
        }
    }

    /// Average over `[start, end]`, both days inclusive
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<()> {
        let (min, max) = self.date_bounds();
        if start > end || start < min || end > max {
            return Err(ChartError::OutOfRange(format!(
                "date range {} .. {} outside {} .. {}",
                start, end, min, max
            )));
        }
        self.date_range = (start, end);
        self.update_series(Series::Average);
        Ok(())
    }

    pub fn set_day_filter(&mut self, filter: DayFilter) {
        self.day_filter = filter;
        self.update_series(Series::Average);
    }

    /// Show `date` as the day series; `day_max` outlines the wedges equal to it
    pub fn update_day_bars(&mut self, date: Option<NaiveDate>, day_max: Option<u64>) {
        self.selected_day = date;
        self.day_max = day_max;
        self.update_series(Series::Day);
    }

    pub fn hover_hour(&mut self, hour: u32) {
        if hour >= 24 {
            return;
        }
        self.hovered_hour = Some(hour);
        self.tooltip.show(self.hour_tooltip(hour));
    }

    pub fn leave_hour(&mut self) {
        self.hovered_hour = None;
        self.tooltip.hide();
    }

    pub fn move_tooltip(&mut self, client_x: f64, client_y: f64, viewport_width: f64) {
        self.tooltip.move_to(client_x, client_y, 5.0, viewport_width);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.options.width = width;
        self.options.height = height;
        self.layout = RadialLayout::compute(width, height);
        self.radius_scale
            .set_range((self.layout.inner_radius, self.layout.outer_radius));
    }

    fn hour_tooltip(&self, hour: u32) -> Vec<TooltipLine> {
        let mut lines = vec![
            TooltipLine::plain(format!("{}:00 - {}:59", hour, hour)),
            TooltipLine::plain("Total seen"),
        ];
        for series in Series::ALL {
            let Some(v) = self.series(series).iter().find(|v| v.hour == hour) else {
                continue;
            };
            let text = match series {
                Series::Day => format!("{}", v.value.round() as u64),
                Series::Average if v.value == 0.0 => "0".to_string(),
                Series::Average => format_fixed(v.value, 1),
            };
            lines.push(TooltipLine::with_dot(text, series.color()));
        }
        lines
    }

    /// Angle of the gap preceding an hour band, measured from 3 o'clock
    fn label_angle(&self, index: usize) -> f64 {
        self.angle_scale.position_at(index)
            - FRAC_PI_2
            - self.angle_scale.step() * ANGLE_PADDING / 2.0
    }

    /// `(start, end)` angles of a series wedge for an hour
    pub fn wedge_angles(&self, series: Series, hour: u32) -> Option<(f64, f64)> {
        let offset = self.angle_scale.bandwidth() / Series::ALL.len() as f64;
        let start = self.angle_scale.position(&hour)? + series.index() as f64 * offset;
        Some((start, start + offset))
    }

    fn is_max_wedge(&self, series: Series, value: f64) -> bool {
        series == Series::Day && self.day_max.map(|m| m as f64) == Some(value)
    }

    fn wedges(&self, series: Series) -> Element {
        let inner = self.layout.inner_radius;
        let mut g = svg::group().class(&format!("{}-wedges", series.name()));
        for v in self.series(series) {
            let Some((a0, a1)) = self.wedge_angles(series, v.hour) else {
                continue;
            };
            let opacity = if self.hovered_hour == Some(v.hour) {
                WEDGE_FILL_OPACITY_HOVERED
            } else {
                WEDGE_FILL_OPACITY
            };
            let stroke = if self.is_max_wedge(series, v.value) {
                MAX_WEDGE_STROKE
            } else {
                "none"
            };
            g.push(
                Element::new("path")
                    .class("wedge")
                    .attr("data-hour", v.hour)
                    .attr("fill", series.color())
                    .num("fill-opacity", opacity)
                    .attr("stroke", stroke)
                    .attr("d", svg::arc_path(inner, self.radius_scale.scale(v.value), a0, a1)),
            );
        }
        g
    }

    fn axis(&self) -> Element {
        let inner = self.layout.inner_radius;
        let mut g = svg::group().class("axis");
        for t in self.radius_scale.ticks(RADIUS_TICKS) {
            g.push(
                Element::new("circle")
                    .class("radius-axis-circle")
                    .attr("fill", "none")
                    .attr("stroke", AXIS_CIRCLE_STROKE)
                    .num("r", self.radius_scale.scale(t)),
            );
        }
        for i in 0..24 {
            let degrees = self.label_angle(i).to_degrees() + 90.0;
            g.push(
                svg::line(0.0, inner, 0.0, inner - 3.0)
                    .class("angle-axis-line")
                    .attr("stroke", "#000")
                    .attr("transform", format!("rotate({})", svg::num(degrees))),
            );
        }
        g
    }

    fn axis_labels(&self) -> Element {
        let label_radius = self.layout.inner_radius - 9.0;
        let mut g = svg::group().class("axis-labels");
        for hour in 0..24u32 {
            let angle = self.label_angle(hour as usize);
            let text = match hour {
                0 => "0:00h".to_string(),
                h if h % 2 == 0 => h.to_string(),
                _ => String::new(),
            };
            let mut label = svg::text(label_radius * angle.cos(), label_radius * angle.sin(), text)
                .class("angle-axis-label")
                .attr("dy", "0.35em")
                .attr("text-anchor", "middle");
            if self.hovered_hour == Some(hour) {
                label = label.attr("font-weight", "bold");
            }
            g.push(label);
        }

        g.push(
            svg::text(0.0, -self.layout.outer_radius - 3.0, "Total observations")
                .class("radius-axis-title")
                .attr("text-anchor", "middle"),
        );

        for t in self.radius_scale.ticks(RADIUS_TICKS) {
            let text = if t == 0.0 { String::new() } else { format_number(t) };
            g.push(
                svg::group()
                    .class("radius-axis-label")
                    .attr("transform", svg::translate(0.0, -self.radius_scale.scale(t)))
                    .attr("text-anchor", "middle")
                    .child(
                        Element::new("text")
                            .attr("dy", "0.35em")
                            .attr("stroke", "#fff")
                            .attr("stroke-width", 3)
                            .text(text.clone()),
                    )
                    .child(Element::new("text").attr("dy", "0.35em").text(text)),
            );
        }
        g
    }

    /// Transparent full-height wedges that catch the pointer per hour
    fn hover_targets(&self) -> Element {
        let (inner, outer) = (self.layout.inner_radius, self.layout.outer_radius);
        let mut g = svg::group().class("invisible-wedges");
        for hour in 0..24u32 {
            let Some(start) = self.angle_scale.position(&hour) else {
                continue;
            };
            g.push(
                Element::new("path")
                    .class("invisible-wedge")
                    .attr("data-hour", hour)
                    .attr("fill", "none")
                    .attr("pointer-events", "all")
                    .attr(
                        "d",
                        svg::arc_path(inner, outer, start, start + self.angle_scale.bandwidth()),
                    ),
            );
        }
        g
    }

    /// Legend text lines for a series
    pub fn legend_lines(&self, series: Series) -> Vec<String> {
        match (series, self.selected_day) {
            (Series::Day, None) => vec!["Please Select a Day".to_string()],
            (Series::Day, Some(day)) => vec![
                "Total observations".to_string(),
                format!("on {}", day.format("%A %Y-%m-%d")),
            ],
            (Series::Average, _) => vec![
                "Average observations".to_string(),
                format!("on {}", self.day_filter),
            ],
        }
    }

    fn legend(&self) -> Element {
        let row_height = LEGEND_HEIGHT / 2.0;
        let radius = row_height * 0.5;
        let text_x = radius * 2.0 + 3.0;
        let mut g = svg::group()
            .class("legend")
            .attr("transform", svg::translate(0.0, MARGIN_TOP + self.layout.height));

        // Average centered, day to its left
        for (i, series) in [Series::Average, Series::Day].into_iter().enumerate() {
            let x = MARGIN_LEFT + self.layout.width / 2.0 - i as f64 * LEGEND_ITEM_WIDTH;
            let lines = self.legend_lines(series);
            let text = if lines.len() == 1 {
                svg::text(text_x, 0.0, lines[0].clone()).attr("dy", "0.35em")
            } else {
                let mut text = Element::new("text");
                for (j, line) in lines.into_iter().enumerate() {
                    let mut tspan = Element::new("tspan").num("x", text_x).text(line);
                    if j > 0 {
                        tspan = tspan.attr("dy", "1em");
                    }
                    text.push(tspan);
                }
                text
            };
            g.push(
                svg::group()
                    .class("legend-row")
                    .attr("transform", svg::translate(x, row_height))
                    .child(
                        Element::new("circle")
                            .num("cx", radius)
                            .num("cy", 0.0)
                            .num("r", radius)
                            .attr("fill", series.color())
                            .attr("opacity", 0.8),
                    )
                    .child(text),
            );
        }
        g
    }

    pub fn render(&self) -> String {
        let layout = &self.layout;
        let content = svg::group()
            .attr("transform", svg::translate(layout.center.0, layout.center.1))
            .child(self.axis())
            .child(self.wedges(Series::Average))
            .child(self.wedges(Series::Day))
            .child(self.hover_targets())
            .child(self.axis_labels());

        let mut root = svg::svg_root(layout.container_width, layout.svg_height())
            .attr("id", &self.options.container_id)
            .class("radial-bar-chart")
            .attr("data-range", self.date_range_label())
            .attr("data-filter", self.day_filter)
            .child(content)
            .child(self.legend());
        if let Some(tooltip) = self.tooltip.to_svg() {
            root.push(tooltip);
        }
        root.render()
    }
}
