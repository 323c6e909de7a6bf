//! Minimal SVG writer
//!
//! Charts build a tree of `Element`s and render it to text once. Attribute
//! values and text content are escaped; numbers are written with at most
//! three decimals.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Write;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Escape text for use in XML content and attribute values
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Compact number: `12`, `12.5`, `0.333`
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn translate(x: f64, y: f64) -> String {
    format!("translate({},{})", num(x), num(y))
}

/// Rough rendered width of a text label
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 3.0 / 5.0
}

#[derive(Debug, Clone)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Element {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl ToString) -> Self {
        self.attrs.push((name, value.to_string()));
        self
    }

    /// Numeric attribute, compactly formatted
    pub fn num(self, name: &'static str, value: f64) -> Self {
        self.attr(name, num(value))
    }

    pub fn attr_opt(self, name: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_into(out),
                Node::Text(t) => out.push_str(&escape(t)),
            }
        }
        let _ = write!(out, "</{}>", self.name);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }
}

/// Root `<svg>` element of the given size
pub fn svg_root(width: f64, height: f64) -> Element {
    Element::new("svg")
        .attr("xmlns", SVG_NS)
        .num("width", width)
        .num("height", height)
        .attr(
            "viewBox",
            format!("0 0 {} {}", num(width), num(height)),
        )
}

pub fn group() -> Element {
    Element::new("g")
}

pub fn text(x: f64, y: f64, content: impl Into<String>) -> Element {
    Element::new("text").num("x", x).num("y", y).text(content)
}

pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Element {
    Element::new("line")
        .num("x1", x1)
        .num("y1", y1)
        .num("x2", x2)
        .num("y2", y2)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Element {
    Element::new("rect")
        .num("x", x)
        .num("y", y)
        .num("width", width.max(0.0))
        .num("height", height.max(0.0))
}

/// Point on a circle, angle clockwise from 12 o'clock
pub fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Path of an annular sector between `start` and `end` angles (radians,
/// clockwise from 12 o'clock)
pub fn arc_path(inner: f64, outer: f64, start: f64, end: f64) -> String {
    let (inner, outer) = if inner > outer {
        (outer, inner)
    } else {
        (inner, outer)
    };
    let (a0, a1) = if end < start { (end, start) } else { (start, end) };
    let sweep_angle = a1 - a0;

    if outer <= 0.0 {
        return "M0,0Z".to_string();
    }

    // Whole ring: two half arcs
    if sweep_angle >= 2.0 * PI - 1e-6 {
        let mut d = format!(
            "M0,{}A{r},{r},0,1,1,0,{}A{r},{r},0,1,1,0,{}",
            num(-outer),
            num(outer),
            num(-outer),
            r = num(outer)
        );
        if inner > 0.0 {
            let _ = write!(
                d,
                "M0,{}A{r},{r},0,1,0,0,{}A{r},{r},0,1,0,0,{}",
                num(-inner),
                num(inner),
                num(-inner),
                r = num(inner)
            );
        }
        d.push('Z');
        return d;
    }

    let large_arc = if sweep_angle > PI { 1 } else { 0 };
    let (ox0, oy0) = polar(outer, a0);
    let (ox1, oy1) = polar(outer, a1);
    let mut d = format!(
        "M{},{}A{r},{r},0,{},1,{},{}",
        num(ox0),
        num(oy0),
        large_arc,
        num(ox1),
        num(oy1),
        r = num(outer)
    );
    if inner > 0.0 {
        let (ix1, iy1) = polar(inner, a1);
        let (ix0, iy0) = polar(inner, a0);
        let _ = write!(
            d,
            "L{},{}A{r},{r},0,{},0,{},{}",
            num(ix1),
            num(iy1),
            large_arc,
            num(ix0),
            num(iy0),
            r = num(inner)
        );
    } else {
        d.push_str("L0,0");
    }
    d.push('Z');
    d
}

/// Rotation (degrees) that makes text at `angle` read outward from the center
pub fn radial_label_rotation(angle: f64) -> f64 {
    (angle - FRAC_PI_2).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape("≥ 100"), "≥ 100");
    }

    #[test]
    fn test_num() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.333");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn test_render_nested() {
        let svg = group()
            .attr("transform", translate(10.0, 5.5))
            .child(rect(0.0, 0.0, 4.0, 4.0).attr("fill", "#d8d860"))
            .child(text(1.0, 2.0, "Mon <1>"))
            .render();
        assert_eq!(
            svg,
            "<g transform=\"translate(10,5.5)\"><rect x=\"0\" y=\"0\" width=\"4\" height=\"4\" fill=\"#d8d860\"/><text x=\"1\" y=\"2\">Mon &lt;1&gt;</text></g>"
        );
    }

    #[test]
    fn test_arc_path_quarter() {
        // Quarter ring from 12 to 3 o'clock
        let d = arc_path(50.0, 100.0, 0.0, FRAC_PI_2);
        assert_eq!(d, "M0,-100A100,100,0,0,1,100,0L50,0A50,50,0,0,0,0,-50Z");
    }

    #[test]
    fn test_arc_path_pie_slice() {
        let d = arc_path(0.0, 10.0, 0.0, PI);
        assert_eq!(d, "M0,-10A10,10,0,0,1,0,10L0,0Z");
    }

    #[test]
    fn test_polar() {
        let (x, y) = polar(10.0, PI);
        assert!(x.abs() < 1e-9);
        assert!((y - 10.0).abs() < 1e-9);
    }
}
