//! Scrolling heatmap of devices per hour and day
//!
//! The grid shows 31 days × 24 hours. Data covering more than 31 days is
//! right-aligned so the latest month is visible, and the grid pans in whole
//! day steps to reveal older days. The visible extent is labeled below the
//! grid and the busiest visible hour gets a red outline.
//!
//! Hovering or clicking a cell announces its day to the other charts; a
//! clicked ("frozen") day keeps being announced until it is clicked again.

use super::events::DateChangeEvent;
use super::heatmap_parts::{self as parts, HeatmapColorOptions, HeatmapColors};
use super::svg::{self, Element};
use super::tooltip::Tooltip;
use crate::data::records::{Observation, ObservationSet};
use crate::scales::PointScale;
use chrono::{Duration, NaiveDate};
use tracing::debug;

pub const HEATMAP_WIDTH_DAYS: usize = 31;

const MARGIN: f64 = 5.0;
const PADDING_TOP: f64 = 25.0;
const PADDING_RIGHT: f64 = 40.0;
const PADDING_BOTTOM: f64 = 50.0;
const PADDING_LEFT: f64 = 40.0;

/// Primary mouse button bit in a pointer event's `buttons`
pub const PRIMARY_BUTTON: u16 = 1;

#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    pub container_id: String,
    pub width: f64,
    pub height: f64,
    pub timezone_label: String,
    pub colors: HeatmapColorOptions,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            container_id: "heatmapContainer".to_string(),
            width: 1000.0,
            height: 500.0,
            timezone_label: "Europe/Amsterdam".to_string(),
            colors: HeatmapColorOptions::default(),
        }
    }
}

/// Sizes derived from the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapLayout {
    pub container_width: f64,
    pub container_height: f64,
    pub cell_size: f64,
    pub heatmap_width: f64,
    pub heatmap_height: f64,
    /// Top-left corner of the grid in SVG coordinates
    pub origin: (f64, f64),
    /// Right edge of the legend strip, at the grid's top
    pub legend_origin: (f64, f64),
}

impl HeatmapLayout {
    pub fn compute(container_width: f64, container_height: f64) -> Self {
        let width = container_width - 2.0 * MARGIN;
        let height = container_height - 2.0 * MARGIN;
        let cell_size = ((width - PADDING_LEFT - PADDING_RIGHT) / HEATMAP_WIDTH_DAYS as f64)
            .min((height - PADDING_TOP - PADDING_BOTTOM) / 24.0)
            .max(0.0);
        let heatmap_width = cell_size * HEATMAP_WIDTH_DAYS as f64;
        let heatmap_height = cell_size * 24.0;
        let visible_width = PADDING_LEFT + heatmap_width + PADDING_RIGHT;
        let visible_height = PADDING_TOP + heatmap_height + PADDING_BOTTOM;
        let top = MARGIN + height / 2.0 - visible_height / 2.0 + PADDING_TOP;

        HeatmapLayout {
            container_width,
            container_height,
            cell_size,
            heatmap_width,
            heatmap_height,
            origin: (
                MARGIN + width / 2.0 - visible_width / 2.0 + PADDING_LEFT,
                top,
            ),
            legend_origin: (
                MARGIN + width / 2.0 + visible_width / 2.0 - PADDING_RIGHT
                    + 20.0
                    + parts::LEGEND_STRIP_SIZE,
                top,
            ),
        }
    }
}

/// A heatmap cell: one hour of one day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub date: NaiveDate,
    pub hour: u32,
}

impl CellRef {
    pub fn new(date: NaiveDate, hour: u32) -> Self {
        CellRef { date, hour }
    }
}

pub struct HeatmapChart {
    options: HeatmapOptions,
    data: ObservationSet,
    all_dates: Vec<NaiveDate>,
    left_align: bool,
    layout: HeatmapLayout,
    x_scale: PointScale<NaiveDate>,
    y_scale: PointScale<u32>,
    colors: HeatmapColors,

    frozen_day: Option<NaiveDate>,
    focus: Option<CellRef>,
    /// Pan offset in whole days (0 = latest days visible)
    pan_days: usize,
    extent: (NaiveDate, NaiveDate),
    max_devices: Option<u64>,
    tooltip: Tooltip,
}

impl HeatmapChart {
    pub fn new(options: HeatmapOptions, data: ObservationSet) -> Self {
        let all_dates = data.all_dates();
        let left_align = all_dates.len() <= HEATMAP_WIDTH_DAYS;
        let layout = HeatmapLayout::compute(options.width, options.height);
        let colors = HeatmapColors::new(&options.colors, data.max_devices());
        let last_date = data.max_date();

        let mut chart = HeatmapChart {
            x_scale: PointScale::new(all_dates.clone(), (0.0, 0.0)).padding(0.5),
            y_scale: PointScale::new((0..24).collect(), (0.0, 0.0)).padding(0.5),
            options,
            data,
            all_dates,
            left_align,
            layout,
            colors,
            frozen_day: None,
            focus: None,
            pan_days: 0,
            extent: (last_date, last_date),
            max_devices: None,
            tooltip: Tooltip::new(),
        };
        chart.apply_layout();
        chart.update_extent(last_date);
        chart.update_max_cell();
        debug!(
            "Heatmap '{}': {} days, cell {:.1}px, left aligned: {}",
            chart.options.container_id,
            chart.all_dates.len(),
            chart.layout.cell_size,
            chart.left_align
        );
        chart
    }

    fn apply_layout(&mut self) {
        let cell = self.layout.cell_size;
        let n = self.all_dates.len() as f64;
        let hw = self.layout.heatmap_width;
        let range = if self.left_align {
            (0.0, cell * n)
        } else {
            (hw - cell * n, hw)
        };
        self.x_scale.set_range(range);
        self.y_scale.set_range((0.0, self.layout.heatmap_height));
    }

    fn update_extent(&mut self, max_date: NaiveDate) {
        let width = HEATMAP_WIDTH_DAYS as i64;
        let extent = if self.left_align {
            let min = max_date - Duration::days(self.all_dates.len() as i64 - 1);
            (min, min + Duration::days(width - 1))
        } else {
            (max_date - Duration::days(width - 1), max_date)
        };
        self.extent = extent;
    }

    /// Maximum count among the cells inside the extent
    fn update_max_cell(&mut self) {
        let (min, max) = self.extent;
        self.max_devices = self
            .data
            .records()
            .iter()
            .filter(|r| r.date >= min && r.date <= max)
            .map(|r| r.devices)
            .max();
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    pub fn layout(&self) -> &HeatmapLayout {
        &self.layout
    }

    pub fn left_align(&self) -> bool {
        self.left_align
    }

    pub fn all_dates(&self) -> &[NaiveDate] {
        &self.all_dates
    }

    pub fn color_max(&self) -> f64 {
        self.colors.color_max
    }

    /// First and last day labeled under the grid
    pub fn extent(&self) -> (NaiveDate, NaiveDate) {
        self.extent
    }

    /// Busiest visible hour, as last announced
    pub fn max_devices(&self) -> Option<u64> {
        self.max_devices
    }

    pub fn frozen_day(&self) -> Option<NaiveDate> {
        self.frozen_day
    }

    pub fn focus(&self) -> Option<CellRef> {
        self.focus
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn pan_days(&self) -> usize {
        self.pan_days
    }

    /// Current horizontal pan translation in pixels
    pub fn translate_x(&self) -> f64 {
        self.pan_days as f64 * self.layout.cell_size
    }

    /// Cell center before panning
    pub fn cell_center(&self, cell: CellRef) -> Option<(f64, f64)> {
        Some((self.x_scale.position(&cell.date)?, self.y_scale.position(&cell.hour)?))
    }

    fn observation(&self, cell: CellRef) -> Option<&Observation> {
        self.data
            .day_slice(cell.date)
            .iter()
            .find(|r| r.hour == cell.hour)
    }

    /// Pointer entered a cell; `buttons` is the pointer's pressed-button mask
    pub fn hover(&mut self, cell: CellRef, buttons: u16) -> Option<DateChangeEvent> {
        if buttons & PRIMARY_BUTTON != 0 {
            return None; // panning
        }
        let lines = parts::cell_tooltip(self.observation(cell)?, true);
        self.focus = Some(cell);
        self.tooltip.show(lines);
        if self.frozen_day.is_some() {
            return None;
        }
        Some(DateChangeEvent::selected(cell.date, self.max_devices))
    }

    pub fn leave(&mut self, _cell: CellRef) -> Option<DateChangeEvent> {
        self.focus = None;
        self.tooltip.hide();
        if self.frozen_day.is_some() {
            return None;
        }
        Some(DateChangeEvent::cleared())
    }

    /// Freeze the clicked day, or unfreeze it when it already is frozen
    pub fn click(&mut self, cell: CellRef) -> Option<DateChangeEvent> {
        self.observation(cell)?;
        let event = if self.frozen_day == Some(cell.date) {
            self.frozen_day = None;
            None
        } else {
            self.frozen_day = Some(cell.date);
            Some(DateChangeEvent::selected(cell.date, self.max_devices))
        };
        self.focus = None;
        self.tooltip.hide();
        event
    }

    pub fn move_tooltip(&mut self, client_x: f64, client_y: f64, viewport_width: f64) {
        self.tooltip.move_to(client_x, client_y, 5.0, viewport_width);
    }

    /// Largest allowed translation: all days scrolled into view
    fn max_translate(&self) -> f64 {
        let cell = self.layout.cell_size;
        (cell * self.all_dates.len() as f64 - self.layout.heatmap_width).max(0.0)
    }

    /// Pan to an absolute translation, snapped to whole days
    ///
    /// Returns whether the visible days changed. Left-aligned heatmaps show
    /// every day already and do not pan.
    pub fn pan_to(&mut self, translate_x: f64) -> bool {
        if self.left_align || self.layout.cell_size <= 0.0 {
            return false;
        }
        let x = translate_x.clamp(0.0, self.max_translate());
        let n = ((x / self.layout.cell_size).round() as usize).min(self.all_dates.len() - 1);
        if n == self.pan_days {
            return false;
        }
        self.pan_days = n;
        self.tooltip.hide();
        let max_date = self.all_dates[self.all_dates.len() - 1 - n];
        self.update_extent(max_date);
        self.update_max_cell();
        debug!("Heatmap panned {} days: {} .. {}", n, self.extent.0, self.extent.1);
        true
    }

    /// Drag by `dx` pixels (positive reveals older days)
    pub fn pan_by(&mut self, dx: f64) -> bool {
        self.pan_to(self.translate_x() + dx)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.options.width = width;
        self.options.height = height;
        self.layout = HeatmapLayout::compute(width, height);
        self.apply_layout();
        if !self.left_align {
            let n = self.pan_days;
            self.pan_days = 0;
            let translate = n as f64 * self.layout.cell_size;
            if !self.pan_to(translate) {
                self.update_extent(self.data.max_date());
                self.update_max_cell();
            }
        }
    }

    fn gradient_id(&self) -> String {
        format!("{}-legend-gradient", self.options.container_id)
    }

    fn cells(&self) -> Element {
        let size = self.layout.cell_size;
        let (min, max) = self.extent;
        let mut plain = Vec::new();
        let mut raised = Vec::new();
        for obs in self.data.records() {
            let Some((cx, cy)) = self.cell_center(CellRef::new(obs.date, obs.hour)) else {
                continue;
            };
            let is_max = Some(obs.devices) == self.max_devices && obs.date >= min && obs.date <= max;
            let cell = parts::cell(cx, cy, size, &self.colors.fill(obs.devices), obs.devices, is_max);
            if is_max {
                raised.push(cell);
            } else {
                plain.push(cell);
            }
        }

        let mut zoom = svg::group()
            .attr("transform", svg::translate(self.translate_x(), 0.0))
            .children(plain)
            .children(raised);

        let mut focus = svg::group().class("heatmap-day-focus");
        if let Some(day) = self.frozen_day {
            if let Some(x) = self.x_scale.position(&day) {
                focus.push(parts::day_column("focus-frozen", x - size / 2.0, size, self.layout.heatmap_height));
            }
        }
        if let Some(cell) = self.focus {
            if let Some(x) = self.x_scale.position(&cell.date) {
                focus.push(parts::day_column("focus", x - size / 2.0, size, self.layout.heatmap_height));
            }
        }
        zoom.push(focus);

        svg::group()
            .class("heatmap-cells")
            .attr("clip-path", format!("url(#{}-cells-clip)", self.options.container_id))
            .child(zoom)
    }

    fn axes(&self) -> Element {
        let bold_date = self.focus.map(|c| c.date);
        let (x_major, x_minor) = parts::alternating_axis(
            super::axis::Orient::Top,
            "x-axis",
            self.all_dates
                .iter()
                .enumerate()
                .map(|(i, d)| (*d, self.x_scale.position_at(i))),
            |d| Some(d.format("%-d").to_string()),
            |d| Some(*d) == bold_date,
        );
        let (y_major, y_minor) = parts::hour_axis(&self.y_scale, self.focus.map(|c| c.hour));

        let x_axis = svg::group()
            .attr("clip-path", format!("url(#{}-x-axis-clip)", self.options.container_id))
            .child(
                svg::group()
                    .attr("transform", svg::translate(self.translate_x(), 0.0))
                    .child(x_major)
                    .child(x_minor),
            );

        svg::group()
            .class("axis")
            .child(x_axis)
            .child(y_major)
            .child(y_minor)
            .children(parts::axis_titles(-21.0, &self.options.timezone_label))
    }

    fn extent_labels(&self) -> Element {
        let size = self.layout.cell_size;
        let hh = self.layout.heatmap_height;
        let label = |x: f64, date: NaiveDate| {
            svg::group()
                .attr("transform", svg::translate(x, hh))
                .attr("text-anchor", "middle")
                .child(svg::line(0.0, 0.0, 0.0, 6.0).attr("stroke", "#000"))
                .child(
                    Element::new("text")
                        .num("y", 9.0)
                        .child(
                            Element::new("tspan")
                                .attr("x", 0)
                                .attr("dy", "0.71em")
                                .text(date.format("%a").to_string()),
                        )
                        .child(
                            Element::new("tspan")
                                .attr("x", 0)
                                .attr("dy", "1.21em")
                                .text(date.format("%Y-%m-%d").to_string()),
                        ),
                )
        };
        svg::group()
            .class("x-axis-extent")
            .child(label(size / 2.0, self.extent.0))
            .child(label(self.layout.heatmap_width - size / 2.0, self.extent.1))
    }

    /// Current state as an SVG document
    pub fn render(&self) -> String {
        let layout = &self.layout;
        let id = &self.options.container_id;
        let gradient_id = self.gradient_id();

        let defs = Element::new("defs")
            .child(
                Element::new("clipPath").attr("id", format!("{}-cells-clip", id)).child(svg::rect(
                    0.0,
                    0.0,
                    layout.heatmap_width,
                    layout.heatmap_height,
                )),
            )
            .child(
                Element::new("clipPath").attr("id", format!("{}-x-axis-clip", id)).child(svg::rect(
                    0.0,
                    -PADDING_TOP,
                    layout.heatmap_width,
                    PADDING_TOP,
                )),
            )
            .child(parts::legend_gradient(&gradient_id, &self.colors));

        let content = svg::group()
            .attr("transform", svg::translate(layout.origin.0, layout.origin.1))
            .child(self.axes())
            .child(self.extent_labels())
            .child(self.cells())
            .child(
                parts::legend_additions(&self.colors)
                    .attr("transform", svg::translate(0.0, layout.heatmap_height + 35.0)),
            );

        let legend = parts::legend(&gradient_id, &self.colors, layout.heatmap_height)
            .attr("transform", svg::translate(layout.legend_origin.0, layout.legend_origin.1));

        let mut root = svg::svg_root(layout.container_width, layout.container_height)
            .attr("id", id)
            .class("heatmap-chart")
            .child(defs)
            .child(content)
            .child(legend);
        if let Some(tooltip) = self.tooltip.to_svg() {
            root.push(tooltip);
        }
        root.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::tests::hourly;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn options() -> HeatmapOptions {
        // cell = min((1010 - 10 - 80) / 31, (565 - 10 - 75) / 24) = min(29.68, 20) = 20
        HeatmapOptions {
            width: 1010.0,
            height: 565.0,
            ..HeatmapOptions::default()
        }
    }

    /// 40 days from 2019-02-01; the count peaks at 12:00 on day index `peak_day`
    fn long_chart(peak_day: u32) -> HeatmapChart {
        let data = hourly(date(2019, 2, 1), 40, |d, h| {
            if d == peak_day && h == 12 {
                500
            } else if h == 3 {
                0
            } else {
                u64::from(h + 1)
            }
        });
        HeatmapChart::new(options(), data)
    }

    #[test]
    fn test_layout() {
        let layout = HeatmapLayout::compute(1010.0, 565.0);
        assert_eq!(layout.cell_size, 20.0);
        assert_eq!(layout.heatmap_width, 620.0);
        assert_eq!(layout.heatmap_height, 480.0);
        // 5 + 500 - 350 + 40, 5 + 277.5 - 277.5 + 25
        assert_eq!(layout.origin, (195.0, 30.0));
        // 5 + 500 + 350 - 40 + 20 + 10
        assert_eq!(layout.legend_origin, (845.0, 30.0));
    }

    #[test]
    fn test_right_aligned_long_data() {
        let chart = long_chart(39);
        assert!(!chart.left_align());
        assert_eq!(chart.all_dates().len(), 40);
        // Last day centered in the last column
        let (x, y) = chart.cell_center(CellRef::new(date(2019, 3, 12), 0)).unwrap();
        assert_eq!(x, 610.0);
        assert_eq!(y, 10.0);
        // First day is off-screen to the left
        let (x, _) = chart.cell_center(CellRef::new(date(2019, 2, 1), 0)).unwrap();
        assert_eq!(x, -170.0);
        assert_eq!(chart.extent(), (date(2019, 2, 10), date(2019, 3, 12)));
        assert_eq!(chart.max_devices(), Some(500));
    }

    #[test]
    fn test_left_aligned_short_data() {
        let data = hourly(date(2019, 3, 1), 10, |_, h| u64::from(h));
        let chart = HeatmapChart::new(options(), data);
        assert!(chart.left_align());
        let (x, _) = chart.cell_center(CellRef::new(date(2019, 3, 1), 5)).unwrap();
        assert_eq!(x, 10.0);
        assert_eq!(chart.extent(), (date(2019, 3, 1), date(2019, 3, 31)));
        assert_eq!(chart.max_devices(), Some(23));
    }

    #[test]
    fn test_color_max() {
        assert_eq!(long_chart(39).color_max(), 400.0);
    }

    #[test]
    fn test_hover_dispatches_date_and_max() {
        let mut chart = long_chart(39);
        let cell = CellRef::new(date(2019, 3, 5), 9);
        let event = chart.hover(cell, 0).unwrap();
        assert_eq!(event, DateChangeEvent::selected(date(2019, 3, 5), Some(500)));
        assert!(chart.tooltip().is_visible());
        assert_eq!(chart.tooltip().lines()[0].text, "Tue 2019-03-05");
        assert_eq!(chart.tooltip().lines()[3].text, "10");
        assert_eq!(chart.focus(), Some(cell));

        assert_eq!(chart.leave(cell), Some(DateChangeEvent::cleared()));
        assert!(!chart.tooltip().is_visible());
        assert_eq!(chart.focus(), None);
    }

    #[test]
    fn test_hover_ignored_while_dragging() {
        let mut chart = long_chart(39);
        assert_eq!(chart.hover(CellRef::new(date(2019, 3, 5), 9), PRIMARY_BUTTON), None);
        assert!(!chart.tooltip().is_visible());
    }

    #[test]
    fn test_hover_outside_data() {
        let mut chart = long_chart(39);
        assert_eq!(chart.hover(CellRef::new(date(2020, 1, 1), 9), 0), None);
    }

    #[test]
    fn test_freeze_suppresses_hover_events() {
        let mut chart = long_chart(39);
        let frozen = CellRef::new(date(2019, 3, 5), 9);
        let other = CellRef::new(date(2019, 3, 6), 10);

        assert_eq!(
            chart.click(frozen),
            Some(DateChangeEvent::selected(date(2019, 3, 5), Some(500)))
        );
        assert_eq!(chart.frozen_day(), Some(date(2019, 3, 5)));
        assert_eq!(chart.hover(other, 0), None);
        assert!(chart.tooltip().is_visible());
        assert_eq!(chart.leave(other), None);

        // Another day moves the freeze
        assert!(chart.click(other).is_some());
        assert_eq!(chart.frozen_day(), Some(date(2019, 3, 6)));

        // Same day again unfreezes without an event
        assert_eq!(chart.click(other), None);
        assert_eq!(chart.frozen_day(), None);
        assert!(chart.hover(frozen, 0).is_some());
    }

    #[test]
    fn test_pan_snaps_and_clamps() {
        let mut chart = long_chart(0);
        // Peak on the first day is not visible initially
        assert_eq!(chart.max_devices(), Some(24));

        assert!(!chart.pan_to(9.0)); // rounds to 0 days
        assert!(chart.pan_to(31.0)); // 1.55 cells -> 2 days
        assert_eq!(chart.pan_days(), 2);
        assert_eq!(chart.translate_x(), 40.0);
        assert_eq!(chart.extent(), (date(2019, 2, 8), date(2019, 3, 10)));

        // 40 - 31 = 9 days at most
        assert!(chart.pan_by(10_000.0));
        assert_eq!(chart.pan_days(), 9);
        assert_eq!(chart.extent(), (date(2019, 2, 1), date(2019, 3, 3)));
        assert_eq!(chart.max_devices(), Some(500));

        assert!(chart.pan_to(-50.0));
        assert_eq!(chart.pan_days(), 0);
    }

    #[test]
    fn test_pan_hides_tooltip() {
        let mut chart = long_chart(0);
        chart.hover(CellRef::new(date(2019, 3, 5), 9), 0);
        chart.pan_by(60.0);
        assert!(!chart.tooltip().is_visible());
    }

    #[test]
    fn test_left_aligned_does_not_pan() {
        let data = hourly(date(2019, 3, 1), 10, |_, h| u64::from(h));
        let mut chart = HeatmapChart::new(options(), data);
        assert!(!chart.pan_by(100.0));
        assert_eq!(chart.translate_x(), 0.0);
    }

    #[test]
    fn test_resize_keeps_pan_days() {
        let mut chart = long_chart(0);
        chart.pan_to(60.0);
        assert_eq!(chart.pan_days(), 3);
        // cell = min((2010 - 90) / 31, (1085 - 85) / 24) = min(61.9, 41.67)
        chart.resize(2010.0, 1085.0);
        assert_eq!(chart.pan_days(), 3);
        assert!((chart.layout().cell_size - 1000.0 / 24.0).abs() < 1e-9);
        assert_eq!(chart.extent(), (date(2019, 2, 7), date(2019, 3, 9)));
    }

    #[test]
    fn test_move_tooltip() {
        let mut chart = long_chart(39);
        chart.hover(CellRef::new(date(2019, 3, 5), 9), 0);
        chart.move_tooltip(5.0, 300.0, 1200.0);
        assert_eq!(chart.tooltip().position().0, 0.0);
    }

    #[test]
    fn test_render() {
        let mut chart = long_chart(39);
        chart.click(CellRef::new(date(2019, 3, 5), 9));
        let svg = chart.render();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1010\" height=\"565\""));
        assert_eq!(svg.matches("class=\"heatmap-cell\"").count(), 40 * 24);
        // One zero hour per day gets the cross
        assert_eq!(svg.matches("zero-cell-line-1").count(), 40);
        assert_eq!(svg.matches("stroke=\"#FF0000\" stroke-width=\"2\"").count(), 2); // cell + legend swatch
        assert!(svg.contains("Time in Europe/Amsterdam"));
        assert!(svg.contains("focus-frozen"));
        assert!(svg.contains(">2019-02-10</tspan>"));
        assert!(svg.contains(">2019-03-12</tspan>"));
        assert!(svg.contains("Total Number of Devices"));
        assert!(svg.contains("No Observations"));
        assert!(!svg.contains("class=\"tooltip\""));
    }
}
