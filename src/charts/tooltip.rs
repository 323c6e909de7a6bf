//! Floating tooltip shared by all charts
//!
//! The tooltip is a small box of text lines that follows the pointer. Its
//! size is estimated from the text, and horizontal placement is clamped so
//! the box stays inside the viewport.

use super::svg::{self, escape, num, Element};

const FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 16.0;
const PADDING: f64 = 8.0;
const DOT_WIDTH: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipLine {
    pub text: String,
    pub bold: bool,
    /// Series color dot in front of the text
    pub dot: Option<String>,
}

impl TooltipLine {
    pub fn plain(text: impl Into<String>) -> Self {
        TooltipLine {
            text: text.into(),
            bold: false,
            dot: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        TooltipLine {
            text: text.into(),
            bold: true,
            dot: None,
        }
    }

    pub fn with_dot(text: impl Into<String>, color: impl Into<String>) -> Self {
        TooltipLine {
            text: text.into(),
            bold: false,
            dot: Some(color.into()),
        }
    }

    fn width(&self) -> f64 {
        let dot = if self.dot.is_some() { DOT_WIDTH } else { 0.0 };
        svg::text_width(&self.text, FONT_SIZE) + dot
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tooltip {
    lines: Vec<TooltipLine>,
    visible: bool,
    left: f64,
    top: f64,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content and fade in
    pub fn show(&mut self, lines: Vec<TooltipLine>) {
        self.lines = lines;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn opacity(&self) -> f64 {
        if self.visible {
            1.0
        } else {
            0.0
        }
    }

    pub fn lines(&self) -> &[TooltipLine] {
        &self.lines
    }

    pub fn position(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    /// Estimated (width, height) of the rendered box
    pub fn box_size(&self) -> (f64, f64) {
        let width = self
            .lines
            .iter()
            .map(TooltipLine::width)
            .fold(0.0, f64::max);
        (
            width + 2.0 * PADDING,
            self.lines.len() as f64 * LINE_HEIGHT + 2.0 * PADDING,
        )
    }

    /// Center above the pointer, `gap` pixels above it, kept within
    /// `[0, bound_width]` horizontally
    pub fn move_to(&mut self, x: f64, y: f64, gap: f64, bound_width: f64) {
        let (width, height) = self.box_size();
        self.top = y - height - gap;
        let mut left = x - width / 2.0;
        if left < 0.0 {
            left = 0.0;
        } else if left + width > bound_width {
            left = (bound_width - width).max(0.0);
        }
        self.left = left;
    }

    /// Absolutely positioned `<div>` for the dashboard page
    pub fn to_html(&self, id: &str) -> String {
        let mut html = format!(
            "<div id=\"{}\" class=\"chart-tooltip\" style=\"position:absolute;left:{}px;top:{}px;opacity:{}\">",
            escape(id),
            num(self.left),
            num(self.top),
            self.opacity()
        );
        for line in &self.lines {
            html.push_str("<div>");
            if let Some(color) = &line.dot {
                html.push_str(&format!(
                    "<div style=\"display:inline-block;width:0.8em;height:0.8em;border-radius:0.4em;background-color:{}\"></div> ",
                    escape(color)
                ));
            }
            if line.bold {
                html.push_str(&format!("<b>{}</b>", escape(&line.text)));
            } else {
                html.push_str(&escape(&line.text));
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
        html
    }

    /// Same box drawn into the chart SVG; nothing when hidden
    pub fn to_svg(&self) -> Option<Element> {
        if !self.visible {
            return None;
        }
        let (width, height) = self.box_size();
        let mut g = svg::group()
            .class("tooltip")
            .attr("transform", svg::translate(self.left, self.top))
            .attr("pointer-events", "none")
            .child(
                svg::rect(0.0, 0.0, width, height)
                    .attr("rx", 3)
                    .attr("fill", "white")
                    .attr("stroke", "#999")
                    .attr("opacity", 0.95),
            );
        for (i, line) in self.lines.iter().enumerate() {
            let baseline = PADDING + (i as f64 + 0.75) * LINE_HEIGHT;
            let mut x = PADDING;
            if let Some(color) = &line.dot {
                g.push(
                    Element::new("circle")
                        .num("cx", x + 5.0)
                        .num("cy", baseline - 4.0)
                        .num("r", 5.0)
                        .attr("fill", color),
                );
                x += DOT_WIDTH;
            }
            let mut label = svg::text(x, baseline, line.text.clone())
                .num("font-size", FONT_SIZE);
            if line.bold {
                label = label.attr("font-weight", "bold");
            }
            g.push(label);
        }
        Some(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooltip() -> Tooltip {
        let mut t = Tooltip::new();
        // width = 10 chars * 12 * 0.6 + 16 = 88, height = 2 * 16 + 16 = 48
        t.show(vec![
            TooltipLine::plain("0123456789"),
            TooltipLine::bold("12"),
        ]);
        t
    }

    #[test]
    fn test_box_size() {
        assert_eq!(tooltip().box_size(), (88.0, 48.0));
    }

    #[test]
    fn test_move_centers_above_pointer() {
        let mut t = tooltip();
        t.move_to(200.0, 300.0, 5.0, 1000.0);
        assert_eq!(t.position(), (156.0, 247.0));
    }

    #[test]
    fn test_move_clamps_to_viewport() {
        let mut t = tooltip();
        t.move_to(10.0, 100.0, 0.0, 1000.0);
        assert_eq!(t.position(), (0.0, 52.0));
        t.move_to(990.0, 100.0, 0.0, 1000.0);
        assert_eq!(t.position(), (912.0, 52.0));
    }

    #[test]
    fn test_visibility_and_html() {
        let mut t = tooltip();
        assert!(t.to_svg().is_some());
        let html = t.to_html("heatmap-tooltip");
        assert!(html.contains("opacity:1"));
        assert!(html.contains("<b>12</b>"));
        t.hide();
        assert_eq!(t.opacity(), 0.0);
        assert!(t.to_svg().is_none());
    }
}
