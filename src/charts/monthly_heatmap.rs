//! Month-at-a-time heatmap used on the box pages
//!
//! A fixed 31 × 24 grid keyed by day of month. A month picker above the grid
//! chooses which month is drawn; the busiest hour of the month is outlined.

use super::axis::Orient;
use super::events::DateChangeEvent;
use super::heatmap::CellRef;
use super::heatmap_parts::{self as parts, HeatmapColorOptions, HeatmapColors};
use super::svg::{self, Element};
use super::tooltip::Tooltip;
use crate::data::error::{ChartError, Result};
use crate::data::records::{Observation, ObservationSet, YearMonth};
use crate::scales::PointScale;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

pub const CONTROL_HEIGHT: f64 = 60.0;

const MARGIN_TOP: f64 = 5.0;
const MARGIN_RIGHT: f64 = 25.0;
const MARGIN_BOTTOM: f64 = 5.0;
const MARGIN_LEFT: f64 = 10.0;
const X_AXIS_HEIGHT: f64 = 28.0;
const Y_AXIS_WIDTH: f64 = 40.0;
const LEGEND_WIDTH: f64 = 40.0;
const LEGEND_ADDITION_HEIGHT: f64 = 16.0;

#[derive(Debug, Clone)]
pub struct MonthlyHeatmapOptions {
    pub container_id: String,
    pub width: f64,
    pub height: f64,
    pub timezone_label: String,
    pub colors: HeatmapColorOptions,
    /// Initial month as `YYYY-MM`
    pub init_month: Option<String>,
}

impl Default for MonthlyHeatmapOptions {
    fn default() -> Self {
        MonthlyHeatmapOptions {
            container_id: "heatmapContainer".to_string(),
            width: 1000.0,
            height: 560.0,
            timezone_label: "Europe/Amsterdam".to_string(),
            colors: HeatmapColorOptions::default(),
            init_month: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyLayout {
    pub container_width: f64,
    pub container_height: f64,
    pub cell_size: f64,
    pub heatmap_width: f64,
    pub heatmap_height: f64,
    pub origin: (f64, f64),
    pub legend_origin: (f64, f64),
    pub legend_addition_origin: (f64, f64),
}

impl MonthlyLayout {
    pub fn compute(container_width: f64, container_height: f64) -> Self {
        let width = container_width - MARGIN_LEFT - MARGIN_RIGHT;
        let height = container_height - CONTROL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let cell_size = ((width - Y_AXIS_WIDTH - LEGEND_WIDTH) / 31.0)
            .min((height - X_AXIS_HEIGHT - LEGEND_ADDITION_HEIGHT) / 24.0)
            .max(0.0);
        let heatmap_width = cell_size * 31.0;
        let heatmap_height = cell_size * 24.0;
        let visible_width = Y_AXIS_WIDTH + heatmap_width + LEGEND_WIDTH;
        let visible_height = X_AXIS_HEIGHT + heatmap_height + LEGEND_ADDITION_HEIGHT;
        let left = MARGIN_LEFT + width / 2.0 - visible_width / 2.0 + Y_AXIS_WIDTH;
        let top = MARGIN_TOP + height / 2.0 - visible_height / 2.0 + X_AXIS_HEIGHT;

        MonthlyLayout {
            container_width,
            container_height,
            cell_size,
            heatmap_width,
            heatmap_height,
            origin: (left, top),
            legend_origin: (
                MARGIN_LEFT + width / 2.0 + visible_width / 2.0 - LEGEND_WIDTH
                    + 20.0
                    + parts::LEGEND_STRIP_SIZE,
                top,
            ),
            legend_addition_origin: (
                left,
                MARGIN_TOP + height / 2.0 + visible_height / 2.0 - LEGEND_ADDITION_HEIGHT + 6.0,
            ),
        }
    }

    /// Height of the SVG under the month picker
    pub fn svg_height(&self) -> f64 {
        self.container_height - CONTROL_HEIGHT
    }
}

pub struct MonthlyHeatmapChart {
    options: MonthlyHeatmapOptions,
    data: ObservationSet,
    layout: MonthlyLayout,
    x_scale: PointScale<u32>,
    y_scale: PointScale<u32>,
    colors: HeatmapColors,
    min_month: YearMonth,
    max_month: YearMonth,

    selected_month: YearMonth,
    month_max: Option<u64>,
    frozen_day: Option<NaiveDate>,
    focus: Option<CellRef>,
    tooltip: Tooltip,
}

impl MonthlyHeatmapChart {
    pub fn new(options: MonthlyHeatmapOptions, data: ObservationSet) -> Self {
        let layout = MonthlyLayout::compute(options.width, options.height);
        let colors = HeatmapColors::new(&options.colors, data.max_devices());
        let min_month = YearMonth::of(data.min_date());
        let max_month = YearMonth::of(data.max_date());
        let initial = match options.init_month.as_deref() {
            None => max_month,
            Some(value) => YearMonth::parse(value).unwrap_or_else(|e| {
                warn!("Invalid initial month '{}' ({}), using first month", value, e);
                min_month
            }),
        };
        let initial = if initial < min_month || initial > max_month {
            warn!("Initial month {} outside the data, using first month", initial.label());
            min_month
        } else {
            initial
        };

        let mut chart = MonthlyHeatmapChart {
            options,
            data,
            layout,
            x_scale: PointScale::new((1..=31).collect(), (0.0, 0.0)).padding(0.5),
            y_scale: PointScale::new((0..24).collect(), (0.0, 0.0)).padding(0.5),
            colors,
            min_month,
            max_month,
            selected_month: initial,
            month_max: None,
            frozen_day: None,
            focus: None,
            tooltip: Tooltip::new(),
        };
        chart.apply_layout();
        chart.update_month();
        chart
    }

    fn apply_layout(&mut self) {
        self.x_scale.set_range((0.0, self.layout.heatmap_width));
        self.y_scale.set_range((0.0, self.layout.heatmap_height));
    }

    fn month_data(&self) -> &[Observation] {
        self.data.month_slice(self.selected_month)
    }

    fn update_month(&mut self) {
        self.month_max = self.month_data().iter().map(|r| r.devices).max();
        debug!(
            "Monthly heatmap '{}': {} with {} records, max {:?}",
            self.options.container_id,
            self.selected_month,
            self.month_data().len(),
            self.month_max
        );
    }

    pub fn layout(&self) -> &MonthlyLayout {
        &self.layout
    }

    pub fn selected_month(&self) -> YearMonth {
        self.selected_month
    }

    /// Month picker bounds
    pub fn month_bounds(&self) -> (YearMonth, YearMonth) {
        (self.min_month, self.max_month)
    }

    /// Text shown in the month picker input (`2019-Mar`)
    pub fn picker_label(&self) -> String {
        self.selected_month.label()
    }

    pub fn month_max(&self) -> Option<u64> {
        self.month_max
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

    pub fn color_max(&self) -> f64 {
        self.colors.color_max
    }

    /// Switch months; returns false when the month is already shown
    pub fn select_month(&mut self, month: YearMonth) -> Result<bool> {
        if month < self.min_month || month > self.max_month {
            return Err(ChartError::OutOfRange(format!(
                "month {} outside {} .. {}",
                month, self.min_month, self.max_month
            )));
        }
        if month == self.selected_month {
            return Ok(false);
        }
        self.selected_month = month;
        self.focus = None;
        self.update_month();
        Ok(true)
    }

    /// Cell center for a day of the month and hour
    pub fn cell_center(&self, day: u32, hour: u32) -> Option<(f64, f64)> {
        Some((self.x_scale.position(&day)?, self.y_scale.position(&hour)?))
    }

    fn observation(&self, cell: CellRef) -> Option<&Observation> {
        self.month_data()
            .iter()
            .find(|r| r.date == cell.date && r.hour == cell.hour)
    }

    /// Frozen column, only while its day is in the shown month
    pub fn frozen_column_visible(&self) -> bool {
        self.frozen_day
            .map(|d| self.selected_month.contains(d))
            .unwrap_or(false)
    }

    pub fn hover(&mut self, cell: CellRef) -> Option<DateChangeEvent> {
        let lines = parts::cell_tooltip(self.observation(cell)?, false);
        self.focus = Some(cell);
        self.tooltip.show(lines);
        if self.frozen_day.is_some() {
            return None;
        }
        Some(DateChangeEvent::selected(cell.date, None))
    }

    pub fn leave(&mut self, _cell: CellRef) -> Option<DateChangeEvent> {
        self.focus = None;
        self.tooltip.hide();
        if self.frozen_day.is_some() {
            return None;
        }
        Some(DateChangeEvent::cleared())
    }

    pub fn click(&mut self, cell: CellRef) -> Option<DateChangeEvent> {
        self.observation(cell)?;
        let event = if self.frozen_day == Some(cell.date) {
            self.frozen_day = None;
            None
        } else {
            self.frozen_day = Some(cell.date);
            Some(DateChangeEvent::selected(cell.date, None))
        };
        self.focus = None;
        self.tooltip.hide();
        event
    }

    pub fn move_tooltip(&mut self, client_x: f64, client_y: f64, viewport_width: f64) {
        self.tooltip.move_to(client_x, client_y, 5.0, viewport_width);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.options.width = width;
        self.options.height = height;
        self.layout = MonthlyLayout::compute(width, height);
        self.apply_layout();
    }

    fn axes(&self) -> Element {
        let days_in_month = self.selected_month.days_in_month();
        let bold_day = self.focus.map(|c| c.date.day());
        let (x_major, x_minor) = parts::alternating_axis(
            Orient::Top,
            "x-axis",
            (1..=31u32).map(|d| (d, self.x_scale.position_at(d as usize - 1))),
            |d| (*d <= days_in_month).then(|| d.to_string()),
            |d| Some(*d) == bold_day,
        );
        let (y_major, y_minor) = parts::hour_axis(&self.y_scale, self.focus.map(|c| c.hour));

        svg::group()
            .class("axis")
            .child(x_major)
            .child(x_minor)
            .child(y_major)
            .child(y_minor)
            .children(parts::axis_titles(-20.0, &self.options.timezone_label))
    }

    fn cells(&self) -> Element {
        let size = self.layout.cell_size;
        let mut plain = Vec::new();
        let mut raised = Vec::new();
        for obs in self.month_data() {
            let Some((cx, cy)) = self.cell_center(obs.day, obs.hour) else {
                continue;
            };
            let is_max = Some(obs.devices) == self.month_max;
            let cell = parts::cell(cx, cy, size, &self.colors.fill(obs.devices), obs.devices, is_max);
            if is_max {
                raised.push(cell);
            } else {
                plain.push(cell);
            }
        }
        svg::group().class("heatmap-cells").children(plain).children(raised)
    }

    fn focus_columns(&self) -> Element {
        let size = self.layout.cell_size;
        let hh = self.layout.heatmap_height;
        let mut focus = svg::group()
            .class("heatmap-day-focus")
            .attr("pointer-events", "none");
        if self.frozen_column_visible() {
            if let Some(x) = self.frozen_day.and_then(|d| self.x_scale.position(&d.day())) {
                focus.push(parts::day_column("focus-frozen", x - size / 2.0, size, hh));
            }
        }
        if let Some(x) = self.focus.and_then(|c| self.x_scale.position(&c.date.day())) {
            focus.push(parts::day_column("focus", x - size / 2.0, size, hh));
        }
        focus
    }

    pub fn render(&self) -> String {
        let layout = &self.layout;
        let gradient_id = format!("{}-legend-gradient", self.options.container_id);

        let content = svg::group()
            .attr("transform", svg::translate(layout.origin.0, layout.origin.1))
            .child(self.axes())
            .child(self.cells())
            .child(self.focus_columns());

        let mut root = svg::svg_root(layout.container_width, layout.svg_height())
            .attr("id", &self.options.container_id)
            .class("heatmap-chart")
            .attr("data-month", self.selected_month)
            .child(Element::new("defs").child(parts::legend_gradient(&gradient_id, &self.colors)))
            .child(content)
            .child(
                parts::legend(&gradient_id, &self.colors, layout.heatmap_height)
                    .attr("transform", svg::translate(layout.legend_origin.0, layout.legend_origin.1)),
            )
            .child(parts::legend_additions(&self.colors).attr(
                "transform",
                svg::translate(layout.legend_addition_origin.0, layout.legend_addition_origin.1),
            ));
        if let Some(tooltip) = self.tooltip.to_svg() {
            root.push(tooltip);
        }
        root.render()
    }
}
