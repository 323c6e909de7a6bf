//! Pieces shared by the scrolling and the monthly heatmap
//!
//! Both heatmaps draw the same cells, hour axis, color legend, legend
//! additions and tooltip; they differ in what the x axis stands for.

use super::axis::{Axis, Orient, Tick};
use super::svg::{self, Element};
use super::tooltip::TooltipLine;
use crate::data::palettes::sequential_palette;
use crate::data::records::Observation;
use crate::scales::linear::ticks;
use crate::scales::{color::to_hex, format_number, ColorScale, PointScale};

pub(crate) const CELL_STROKE: &str = "#fff";
pub(crate) const MAX_CELL_STROKE: &str = "#FF0000";
pub(crate) const MAX_CELL_STROKE_WIDTH: f64 = 2.0;
pub(crate) const FOCUS_STROKE: &str = "#000";
pub(crate) const LEGEND_STRIP_SIZE: f64 = 10.0;
const LEGEND_FONT_SIZE: f64 = 12.0;

/// Palette name plus the rule for the saturating value of the color scale
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapColorOptions {
    pub palette: String,
    /// Fraction of the data maximum at which colors saturate
    pub max_factor: f64,
    /// Lowest saturating value
    pub max_floor: f64,
}

impl Default for HeatmapColorOptions {
    fn default() -> Self {
        HeatmapColorOptions {
            palette: "Aileen".to_string(),
            max_factor: 0.8,
            max_floor: 100.0,
        }
    }
}

/// Color scale over `[0, color_max]`
#[derive(Debug, Clone)]
pub struct HeatmapColors {
    pub scale: ColorScale,
    pub color_max: f64,
}

impl HeatmapColors {
    /// `color_max = max(max_devices * factor, floor)`
    pub fn new(options: &HeatmapColorOptions, max_devices: u64) -> Self {
        let color_max = (max_devices as f64 * options.max_factor).max(options.max_floor);
        HeatmapColors {
            scale: ColorScale::new(sequential_palette(&options.palette, color_max)),
            color_max,
        }
    }

    pub fn fill(&self, devices: u64) -> String {
        self.scale.hex(devices as f64)
    }
}

/// One heatmap square centered on (`cx`, `cy`); empty hours get a white cross
pub(crate) fn cell(cx: f64, cy: f64, size: f64, fill: &str, devices: u64, is_max: bool) -> Element {
    let half = size / 2.0;
    let (stroke, stroke_width) = if is_max {
        (MAX_CELL_STROKE, MAX_CELL_STROKE_WIDTH)
    } else {
        (CELL_STROKE, 1.0)
    };
    let mut g = svg::group().class("heatmap-cell").child(
        svg::rect(cx - half, cy - half, size, size)
            .class("heatmap-cell-rect")
            .attr("stroke", stroke)
            .num("stroke-width", stroke_width)
            .attr("fill", fill),
    );
    if devices == 0 {
        g.push(
            svg::line(cx - half, cy - half, cx + half, cy + half)
                .class("zero-cell-line-1")
                .attr("stroke", CELL_STROKE)
                .attr("pointer-events", "none"),
        );
        g.push(
            svg::line(cx - half, cy + half, cx + half, cy - half)
                .class("zero-cell-line-2")
                .attr("stroke", CELL_STROKE)
                .attr("pointer-events", "none"),
        );
    }
    g
}

/// Full-height outline of one day column
pub(crate) fn day_column(class: &str, x: f64, cell_size: f64, heatmap_height: f64) -> Element {
    svg::rect(x, 0.0, cell_size, heatmap_height)
        .class(class)
        .attr("fill", "none")
        .attr("stroke", FOCUS_STROKE)
        .attr("pointer-events", "none")
}

/// Labeled ticks at even indices, minor ticks at odd ones
pub(crate) fn alternating_axis<T, F, B>(
    orient: Orient,
    class: &'static str,
    positions: impl Iterator<Item = (T, f64)>,
    label: F,
    bold: B,
) -> (Element, Element)
where
    F: Fn(&T) -> Option<String>,
    B: Fn(&T) -> bool,
{
    let mut major = Vec::new();
    let mut minor = Vec::new();
    for (i, (value, position)) in positions.enumerate() {
        if i % 2 == 0 {
            if let Some(text) = label(&value) {
                major.push(Tick::labeled(position, text).bold(bold(&value)));
            }
        } else {
            minor.push(Tick::minor(position));
        }
    }
    (
        Axis::new(orient, major).class(class).render(),
        Axis::new(orient, minor).tick_size(3.0).class(class).render(),
    )
}

/// Hour axis on the left: `H:00` every other hour
pub(crate) fn hour_axis(y_scale: &PointScale<u32>, bold_hour: Option<u32>) -> (Element, Element) {
    alternating_axis(
        Orient::Left,
        "y-axis",
        y_scale
            .domain()
            .iter()
            .enumerate()
            .map(|(i, h)| (*h, y_scale.position_at(i))),
        |h| Some(format!("{}:00", h)),
        |h| Some(*h) == bold_hour,
    )
}

/// Axis titles ("Day" above, rotated timezone title on the left)
pub(crate) fn axis_titles(day_title_y: f64, timezone_label: &str) -> Vec<Element> {
    vec![
        svg::text(0.0, day_title_y, "Day").attr("text-anchor", "start"),
        svg::text(-35.0, 0.0, format!("Time in {}", timezone_label))
            .attr("transform", "rotate(-90,-35,0)")
            .attr("text-anchor", "end"),
    ]
}

/// Vertical gradient definition for the legend strip
pub(crate) fn legend_gradient(id: &str, colors: &HeatmapColors) -> Element {
    let stops = colors.scale.ticks();
    let n = stops.len().max(1) as f64;
    let mut gradient = Element::new("linearGradient")
        .attr("id", id)
        .attr("x1", "0%")
        .attr("y1", "0%")
        .attr("x2", "0%")
        .attr("y2", "100%");
    for (i, t) in stops.iter().enumerate() {
        gradient.push(
            Element::new("stop")
                .attr("offset", format!("{}%", svg::num(100.0 * i as f64 / n)))
                .attr("stop-color", to_hex(colors.scale.color(*t))),
        );
    }
    gradient
}

/// Legend strip, its right-hand axis and title; the origin is the strip's
/// right edge at the heatmap top
pub(crate) fn legend(gradient_id: &str, colors: &HeatmapColors, heatmap_height: f64) -> Element {
    let tick_count = heatmap_height / 60.0;
    let axis_ticks = ticks(0.0, colors.color_max, tick_count)
        .into_iter()
        .map(|t| {
            let position = if colors.color_max > 0.0 {
                t / colors.color_max * heatmap_height
            } else {
                0.0
            };
            let label = if t == colors.color_max {
                format!("≥{}", format_number(t))
            } else {
                format_number(t)
            };
            Tick::labeled(position, label)
        })
        .collect();

    svg::group()
        .class("legend")
        .child(
            svg::rect(-LEGEND_STRIP_SIZE, 0.0, LEGEND_STRIP_SIZE, heatmap_height)
                .attr("fill", format!("url(#{})", gradient_id)),
        )
        .child(Axis::new(Orient::Right, axis_ticks).tick_size(0.0).render())
        .child(
            svg::text(0.0, -LEGEND_STRIP_SIZE - 3.0, "Total Number of Devices")
                .attr("text-anchor", "end")
                .attr("transform", "rotate(-90)"),
        )
}

/// "Max Number of Devices" and "No Observations" swatches
pub(crate) fn legend_additions(colors: &HeatmapColors) -> Element {
    let s = LEGEND_STRIP_SIZE;
    let max_label = "Max Number of Devices";
    let mut end = s;

    let mut g = svg::group()
        .class("legend-addition")
        .child(
            svg::rect(0.0, 0.0, s, s)
                .attr("fill", colors.scale.hex(colors.color_max))
                .attr("stroke", MAX_CELL_STROKE)
                .num("stroke-width", MAX_CELL_STROKE_WIDTH),
        )
        .child(
            svg::text(end + 4.0, s / 2.0, max_label)
                .attr("dy", "0.35em")
                .num("font-size", LEGEND_FONT_SIZE),
        );
    end += svg::text_width(max_label, LEGEND_FONT_SIZE) + 4.0;

    g.push(
        svg::group()
            .attr("transform", svg::translate(end + 8.0, 0.0))
            .child(svg::rect(0.0, 0.0, s, s).attr("fill", colors.scale.hex(0.0)))
            .child(svg::line(0.0, 0.0, s, s).attr("stroke", CELL_STROKE))
            .child(svg::line(0.0, s, s, 0.0).attr("stroke", CELL_STROKE)),
    );
    end += s + 8.0;

    g.push(
        svg::text(end + 4.0, s / 2.0, "No Observations")
            .attr("dy", "0.35em")
            .num("font-size", LEGEND_FONT_SIZE),
    );
    g
}

/// `ddd YYYY-MM-DD`, `H:mm - H:mm`, "Total Devices", count
pub(crate) fn cell_tooltip(obs: &Observation, bold_count: bool) -> Vec<TooltipLine> {
    let count = obs.devices.to_string();
    vec![
        TooltipLine::plain(obs.time.format("%a %Y-%m-%d").to_string()),
        TooltipLine::plain(format!(
            "{} - {}",
            obs.time.format("%-H:%M"),
            obs.hour_end().format("%-H:%M")
        )),
        TooltipLine::plain("Total Devices"),
        if bold_count {
            TooltipLine::bold(count)
        } else {
            TooltipLine::plain(count)
        },
    ]
}
