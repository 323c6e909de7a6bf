//! Home page bar chart: average daily devices per box

use super::axis::{Axis, Orient, Tick};
use super::svg::{self, Element};
use super::tooltip::{Tooltip, TooltipLine};
use crate::data::error::{ChartError, Result};
use crate::data::records::BoxAverage;
use crate::scales::{format_number, BandScale, LinearScale};
use tracing::debug;

const MARGIN_TOP: f64 = 10.0;
const MARGIN_RIGHT: f64 = 10.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MARGIN_LEFT: f64 = 52.0;
const BAR_PADDING: f64 = 0.08;
const Y_TICKS: usize = 10;
const LABEL_ROTATION: f64 = -35.0;

pub const Y_TITLE: &str = "Average Daily Number of Devices Seen";

#[derive(Debug, Clone)]
pub struct BarChartOptions {
    pub container_id: String,
    pub width: f64,
    pub height: f64,
    pub x_label: String,
}

impl Default for BarChartOptions {
    fn default() -> Self {
        BarChartOptions {
            container_id: "barChartContainer".to_string(),
            width: 900.0,
            height: 400.0,
            x_label: "Aileen Boxes".to_string(),
        }
    }
}

pub struct BarChart {
    options: BarChartOptions,
    data: Vec<BoxAverage>,
    width: f64,
    height: f64,
    x_scale: BandScale<String>,
    y_scale: LinearScale,
    hovered: Option<usize>,
    tooltip: Tooltip,
}

impl BarChart {
    pub fn new(options: BarChartOptions, data: Vec<BoxAverage>) -> Result<Self> {
        if data.is_empty() {
            return Err(ChartError::EmptyData);
        }
        let names = data.iter().map(|d| d.box_name.clone()).collect();
        let max = data.iter().map(BoxAverage::value).fold(0.0, f64::max);

        let mut chart = BarChart {
            x_scale: BandScale::new(names, (0.0, 0.0)).padding(BAR_PADDING),
            y_scale: LinearScale::new((0.0, max), (0.0, 0.0)),
            width: 0.0,
            height: 0.0,
            options,
            data,
            hovered: None,
            tooltip: Tooltip::new(),
        };
        chart.y_scale.nice(Y_TICKS);
        chart.resize(chart.options.width, chart.options.height);
        debug!(
            "Bar chart: {} boxes, y domain {:?}",
            chart.data.len(),
            chart.y_scale.domain()
        );
        Ok(chart)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.options.width = width;
        self.options.height = height;
        self.width = width - MARGIN_LEFT - MARGIN_RIGHT;
        self.height = height - MARGIN_TOP - MARGIN_BOTTOM;
        self.x_scale.set_range((0.0, self.width));
        self.y_scale.set_range((self.height, 0.0));
    }

    pub fn y_domain(&self) -> (f64, f64) {
        self.y_scale.domain()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// `(x, y, width, height)` of a bar inside the plot area
    pub fn bar_rect(&self, index: usize) -> Option<(f64, f64, f64, f64)> {
        let d = self.data.get(index)?;
        let y = self.y_scale.scale(d.value());
        Some((
            self.x_scale.position_at(index),
            y,
            self.x_scale.bandwidth(),
            self.height - y,
        ))
    }

    pub fn hover_bar(&mut self, index: usize) {
        let Some(d) = self.data.get(index) else {
            return;
        };
        let value = d
            .mean_devices_each_day
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        self.hovered = Some(index);
        self.tooltip.show(vec![
            TooltipLine::plain(d.box_name.clone()),
            TooltipLine::plain(format!("{}: {}", Y_TITLE, value)),
        ]);
    }

    pub fn leave_bar(&mut self) {
        self.hovered = None;
        self.tooltip.hide();
    }

    /// Tooltip bottom sits on the pointer, clamped to the chart width
    pub fn move_tooltip(&mut self, client_x: f64, client_y: f64) {
        self.tooltip
            .move_to(client_x, client_y, 0.0, self.options.width);
    }

    fn axes(&self) -> Element {
        let x_ticks = self
            .data
            .iter()
            .enumerate()
            .map(|(i, d)| {
                Tick::labeled(
                    self.x_scale.position_at(i) + self.x_scale.bandwidth() / 2.0,
                    d.box_name.clone(),
                )
            })
            .collect();
        let y_ticks = self
            .y_scale
            .ticks(Y_TICKS)
            .into_iter()
            .map(|t| Tick::labeled(self.y_scale.scale(t), format_number(t)))
            .collect();

        svg::group()
            .class("axis")
            .child(
                svg::text(0.0, 0.0, self.options.x_label.clone())
                    .attr("transform", svg::translate(self.width / 2.0, self.height + 68.0))
                    .attr("text-anchor", "middle")
                    .class("bar-chart-label"),
            )
            .child(
                svg::text(0.0, 0.0, Y_TITLE)
                    .attr(
                        "transform",
                        format!("{}rotate(-90)", svg::translate(-40.0, self.height / 2.0)),
                    )
                    .attr("text-anchor", "middle")
                    .class("bar-chart-label"),
            )
            .child(
                Axis::new(Orient::Bottom, x_ticks)
                    .rotate_labels(LABEL_ROTATION)
                    .class("x axis")
                    .render()
                    .attr("transform", svg::translate(0.0, self.height)),
            )
            .child(Axis::new(Orient::Left, y_ticks).class("y axis").render())
    }

    pub fn render(&self) -> String {
        let mut bars = svg::group().class("bars");
        for (i, d) in self.data.iter().enumerate() {
            let Some((x, y, w, h)) = self.bar_rect(i) else {
                continue;
            };
            let mut rect = svg::rect(x, y, w, h)
                .class("bar")
                .attr("data-box", &d.box_name);
            if self.hovered == Some(i) {
                rect = rect.attr("fill-opacity", 0.8);
            }
            bars.push(rect);
        }

        let mut root = svg::svg_root(self.options.width, self.options.height)
            .attr("id", &self.options.container_id)
            .class("barChart")
            .child(
                svg::group()
                    .attr("transform", svg::translate(MARGIN_LEFT, MARGIN_TOP))
                    .child(self.axes())
                    .child(bars),
            );
        if let Some(tooltip) = self.tooltip.to_svg() {
            root.push(tooltip);
        }
        root.render()
    }
}
