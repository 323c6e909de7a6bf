//! Axis rendering
//!
//! Ticks are drawn as a short line plus an optional label, offset from the
//! axis line by the tick size and padding. The axis domain line itself is
//! never drawn by these charts.

use super::svg::{self, Element};

const FONT_SIZE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: Option<String>,
    pub bold: bool,
}

impl Tick {
    pub fn labeled(position: f64, label: impl Into<String>) -> Self {
        Tick {
            position,
            label: Some(label.into()),
            bold: false,
        }
    }

    pub fn minor(position: f64) -> Self {
        Tick {
            position,
            label: None,
            bold: false,
        }
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Axis {
    orient: Orient,
    ticks: Vec<Tick>,
    tick_size: f64,
    tick_padding: f64,
    label_rotation: Option<f64>,
    class: &'static str,
}

impl Axis {
    pub fn new(orient: Orient, ticks: Vec<Tick>) -> Self {
        Axis {
            orient,
            ticks,
            tick_size: 6.0,
            tick_padding: 3.0,
            label_rotation: None,
            class: "axis",
        }
    }

    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size = size;
        self
    }

    /// Rotate labels (degrees) around their anchor; rotated labels end at the tick
    pub fn rotate_labels(mut self, degrees: f64) -> Self {
        self.label_rotation = Some(degrees);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = class;
        self
    }

    pub fn render(&self) -> Element {
        let k = match self.orient {
            Orient::Top | Orient::Left => -1.0,
            Orient::Right | Orient::Bottom => 1.0,
        };
        let horizontal = matches!(self.orient, Orient::Top | Orient::Bottom);
        let spacing = self.tick_size.max(0.0) + self.tick_padding;
        let anchor = match self.orient {
            Orient::Right => "start",
            Orient::Left => "end",
            _ => "middle",
        };
        let anchor = if self.label_rotation.is_some() {
            "end"
        } else {
            anchor
        };

        let mut g = svg::group()
            .class(self.class)
            .attr("fill", "none")
            .num("font-size", FONT_SIZE)
            .attr("font-family", "sans-serif")
            .attr("text-anchor", anchor);

        for tick in &self.ticks {
            let transform = if horizontal {
                svg::translate(tick.position, 0.0)
            } else {
                svg::translate(0.0, tick.position)
            };
            let mut tick_g = svg::group().class("tick").attr("transform", transform);

            let line = if horizontal {
                svg::line(0.0, 0.0, 0.0, k * self.tick_size)
            } else {
                svg::line(0.0, 0.0, k * self.tick_size, 0.0)
            };
            tick_g.push(line.attr("stroke", "currentColor"));

            if let Some(label) = &tick.label {
                let (x, y) = if horizontal {
                    (0.0, k * spacing)
                } else {
                    (k * spacing, 0.0)
                };
                let dy = match self.orient {
                    Orient::Top => "0em",
                    Orient::Bottom => "0.71em",
                    _ => "0.32em",
                };
                let mut text = svg::text(x, y, label.clone())
                    .attr("fill", "currentColor")
                    .attr("dy", dy);
                if let Some(degrees) = self.label_rotation {
                    text = text.attr(
                        "transform",
                        format!("rotate({},{},{})", svg::num(degrees), svg::num(x), svg::num(y)),
                    );
                }
                if tick.bold {
                    text = text.attr("font-weight", "bold");
                }
                tick_g.push(text);
            }
            g.push(tick_g);
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_axis() {
        let axis = Axis::new(
            Orient::Left,
            vec![Tick::labeled(5.0, "0:00").bold(true), Tick::minor(15.0)],
        )
        .render()
        .render();
        assert!(axis.contains("text-anchor=\"end\""));
        assert!(axis.contains("<g class=\"tick\" transform=\"translate(0,5)\"><line x1=\"0\" y1=\"0\" x2=\"-6\" y2=\"0\" stroke=\"currentColor\"/>"));
        assert!(axis.contains("x=\"-9\""));
        assert!(axis.contains("font-weight=\"bold\">0:00</text>"));
        assert_eq!(axis.matches("<text").count(), 1);
    }

    #[test]
    fn test_top_minor_ticks() {
        let axis = Axis::new(Orient::Top, vec![Tick::minor(10.0)])
            .tick_size(3.0)
            .render()
            .render();
        assert!(axis.contains("x2=\"0\" y2=\"-3\""));
        assert!(!axis.contains("<text"));
    }

    #[test]
    fn test_rotated_labels() {
        let axis = Axis::new(Orient::Bottom, vec![Tick::labeled(20.0, "box-1")])
            .rotate_labels(-35.0)
            .render()
            .render();
        assert!(axis.contains("text-anchor=\"end\""));
        assert!(axis.contains("rotate(-35,0,9)"));
    }
}
