//! Minimal SVG object model: polylines, circles and text.

use std::fmt::{self, Write};

// ============================================================================
// Primitives
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
#[derive(bitcode::Encode, bitcode::Decode)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Paint value. In JSON a color is a name, `[r, g, b]` or `[r, g, b, opacity]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(bitcode::Encode, bitcode::Decode)]
pub enum Color {
    #[default]
    None,
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Named(name) => write!(f, "{}", name),
            Self::Rgb(r, g, b) => write!(f, "rgb({},{},{})", r, g, b),
            Self::Rgba(r, g, b, a) => write!(f, "rgba({},{},{},{})", r, g, b, a),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeLineCap {
    Butt,
    Round,
    Square,
}

impl fmt::Display for StrokeLineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeLineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl fmt::Display for StrokeLineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Arcs => "arcs",
            Self::Bevel => "bevel",
            Self::Miter => "miter",
            Self::MiterClip => "miter-clip",
            Self::Round => "round",
        })
    }
}

// ============================================================================
// Path Properties
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathProps {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: Option<f64>,
    line_cap: Option<StrokeLineCap>,
    line_join: Option<StrokeLineJoin>,
}

impl PathProps {
    fn render(&self, out: &mut String) -> fmt::Result {
        if let Some(fill) = &self.fill {
            write!(out, " fill=\"{}\"", fill)?;
        }
        if let Some(stroke) = &self.stroke {
            write!(out, " stroke=\"{}\"", stroke)?;
        }
        if let Some(width) = self.stroke_width {
            write!(out, " stroke-width=\"{}\"", width)?;
        }
        if let Some(cap) = self.line_cap {
            write!(out, " stroke-linecap=\"{}\"", cap)?;
        }
        if let Some(join) = self.line_join {
            write!(out, " stroke-linejoin=\"{}\"", join)?;
        }
        Ok(())
    }
}

/// Builder methods shared by every shape.
pub trait PathStyle: Sized {
    fn props_mut(&mut self) -> &mut PathProps;

    fn fill(mut self, color: Color) -> Self {
        self.props_mut().fill = Some(color);
        self
    }

    fn stroke(mut self, color: Color) -> Self {
        self.props_mut().stroke = Some(color);
        self
    }

    fn stroke_width(mut self, width: f64) -> Self {
        self.props_mut().stroke_width = Some(width);
        self
    }

    fn line_cap(mut self, cap: StrokeLineCap) -> Self {
        self.props_mut().line_cap = Some(cap);
        self
    }

    fn line_join(mut self, join: StrokeLineJoin) -> Self {
        self.props_mut().line_join = Some(join);
        self
    }
}

// ============================================================================
// Shapes
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    pub fn points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }
}

impl PathStyle for Polyline {
    fn props_mut(&mut self) -> &mut PathProps {
        &mut self.props
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
    props: PathProps,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            props: PathProps::default(),
        }
    }
}

impl PathStyle for Circle {
    fn props_mut(&mut self) -> &mut PathProps {
        &mut self.props
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Text {
    position: Point,
    offset: Point,
    font_size: u32,
    font_family: Option<String>,
    font_weight: Option<String>,
    data: String,
    props: PathProps,
}

impl Text {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            font_size: 1,
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = Some(weight.into());
        self
    }
}

impl PathStyle for Text {
    fn props_mut(&mut self) -> &mut PathProps {
        &mut self.props
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Polyline(Polyline),
    Circle(Circle),
    Text(Text),
}

impl Object {
    fn render(&self, out: &mut String) -> fmt::Result {
        match self {
            Self::Polyline(line) => {
                out.push_str("<polyline points=\"");
                for (i, p) in line.points.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    write!(out, "{},{}", p.x, p.y)?;
                }
                out.push('"');
                line.props.render(out)?;
                out.push_str("/>");
            }
            Self::Circle(circle) => {
                write!(
                    out,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    circle.center.x, circle.center.y, circle.radius
                )?;
                circle.props.render(out)?;
                out.push_str("/>");
            }
            Self::Text(text) => {
                out.push_str("<text");
                text.props.render(out)?;
                write!(
                    out,
                    " x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
                    text.position.x, text.position.y, text.offset.x, text.offset.y, text.font_size
                )?;
                if let Some(family) = &text.font_family {
                    write!(out, " font-family=\"{}\"", family)?;
                }
                if let Some(weight) = &text.font_weight {
                    write!(out, " font-weight=\"{}\"", weight)?;
                }
                out.push('>');
                escape_into(&text.data, out);
                out.push_str("</text>");
            }
        }
        Ok(())
    }
}

impl From<Polyline> for Object {
    fn from(value: Polyline) -> Self {
        Self::Polyline(value)
    }
}

impl From<Circle> for Object {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<Text> for Object {
    fn from(value: Text) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// Document
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    objects: Vec<Object>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Object>) {
        self.objects.push(object.into());
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for object in &self.objects {
            out.push_str("  ");
            // Writing into a String cannot fail
            let _ = object.render(&mut out);
            out.push('\n');
        }
        out.push_str("</svg>");
        out
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_display() {
        assert_eq!(Color::None.to_string(), "none");
        assert_eq!(Color::named("green").to_string(), "green");
        assert_eq!(Color::Rgb(255, 160, 0).to_string(), "rgb(255,160,0)");
        assert_eq!(Color::Rgba(255, 200, 23, 0.85).to_string(), "rgba(255,200,23,0.85)");
    }

    #[test]
    fn test_polyline_render() {
        let mut doc = Document::new();
        doc.add(
            Polyline::new()
                .point(Point::new(1.0, 2.5))
                .point(Point::new(3.0, 4.0))
                .fill(Color::None)
                .stroke(Color::named("green"))
                .stroke_width(14.0)
                .line_cap(StrokeLineCap::Round)
                .line_join(StrokeLineJoin::Round),
        );

        let svg = doc.render();
        assert!(svg.contains(
            "<polyline points=\"1,2.5 3,4\" fill=\"none\" stroke=\"green\" stroke-width=\"14\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>"
        ));
    }

    #[test]
    fn test_document_frame() {
        let mut doc = Document::new();
        doc.add(Circle::new(Point::new(20.0, 20.0), 5.0).fill(Color::named("white")));

        let svg = doc.render();
        let lines: Vec<_> = svg.lines().collect();
        assert_eq!(lines[0], "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>");
        assert_eq!(lines[1], "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">");
        assert_eq!(lines[2], "  <circle cx=\"20\" cy=\"20\" r=\"5\" fill=\"white\"/>");
        assert_eq!(lines[3], "</svg>");
    }

    #[test]
    fn test_text_render_escapes_data() {
        let mut doc = Document::new();
        doc.add(
            Text::new("Tom & \"Jerry\" <3")
                .position(Point::new(10.0, 20.0))
                .offset(Point::new(7.0, -3.0))
                .font_size(20)
                .font_family("Verdana")
                .font_weight("bold")
                .fill(Color::named("black")),
        );

        let svg = doc.render();
        assert!(svg.contains(
            "<text fill=\"black\" x=\"10\" y=\"20\" dx=\"7\" dy=\"-3\" font-size=\"20\" font-family=\"Verdana\" font-weight=\"bold\">Tom &amp; &quot;Jerry&quot; &lt;3</text>"
        ));
    }
}
