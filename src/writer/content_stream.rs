//! Page content streams.
//!
//! Operators are recorded as [`ContentStreamOp`] values so layout code can be
//! inspected in tests, and written out by [`ContentStreamBuilder::build`].
//! Coordinates are PDF user space: points, origin at the bottom-left.

use super::font_manager::encode_win_ansi;
use crate::color::Color;
use crate::error::Result;
use std::io::Write;

/// One content stream operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `/F1 12 Tf`: resource name and size
    SetFont(String, f32),
    /// `1 0 0 1 x y Tm`: move the text origin
    TextPosition(f32, f32),
    /// `(...) Tj`, WinAnsi encoded on output
    ShowText(String),
    /// `r g b rg`
    FillColor(Color),
    /// `r g b RG`
    StrokeColor(Color),
    /// `w`
    LineWidth(f32),
    /// `[...] 0 d`; empty for solid lines
    Dash(Vec<f32>),
    /// `m`
    MoveTo(f32, f32),
    /// `l`
    LineTo(f32, f32),
    /// `c`
    CurveTo([f32; 6]),
    /// `re`: x, y, width, height
    Rectangle([f32; 4]),
    /// `h`
    ClosePath,
    /// `S`
    Stroke,
    /// `f`
    Fill,
    /// `B`
    FillStroke,
}

/// Records operators for one page.
///
/// Text calls open a text object on demand; path calls are expected to come
/// after [`end_text`](Self::end_text).
#[derive(Debug, Clone, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
    /// Font selected inside the current text object
    font: Option<(String, f32)>,
    in_text: bool,
}

impl ContentStreamBuilder {
    /// Empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw operator.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Recorded operators.
    pub fn operations(&self) -> &[ContentStreamOp] {
        &self.operations
    }

    /// Open a text object unless one is open.
    pub fn begin_text(&mut self) -> &mut Self {
        if !self.in_text {
            self.in_text = true;
            self.op(ContentStreamOp::BeginText);
        }
        self
    }

    /// Close the open text object, if any.
    ///
    /// The font does not survive the text object, so the next `set_font`
    /// is always emitted.
    pub fn end_text(&mut self) -> &mut Self {
        if self.in_text {
            self.in_text = false;
            self.font = None;
            self.op(ContentStreamOp::EndText);
        }
        self
    }

    /// Select a font resource; repeated selections of the same font are dropped.
    pub fn set_font(&mut self, resource: &str, size: f32) -> &mut Self {
        let same = self
            .font
            .as_ref()
            .is_some_and(|(name, current)| name == resource && *current == size);
        if !same {
            self.font = Some((resource.to_string(), size));
            self.op(ContentStreamOp::SetFont(resource.to_string(), size));
        }
        self
    }

    /// Show `text` with its baseline origin at (x, y).
    pub fn text(&mut self, text: &str, x: f32, y: f32) -> &mut Self {
        self.begin_text()
            .op(ContentStreamOp::TextPosition(x, y))
            .op(ContentStreamOp::ShowText(text.to_string()))
    }

    /// Nonstroking color, used for fills and text.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::FillColor(color))
    }

    /// Stroking color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        self.op(ContentStreamOp::StrokeColor(color))
    }

    /// Stroke width in points.
    pub fn line_width(&mut self, width: f32) -> &mut Self {
        self.op(ContentStreamOp::LineWidth(width))
    }

    /// Dash lengths in points.
    pub fn dash(&mut self, pattern: Vec<f32>) -> &mut Self {
        self.op(ContentStreamOp::Dash(pattern))
    }

    /// Start a subpath.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Straight segment.
    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Rectangle with its lower-left corner at (x, y).
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        self.op(ContentStreamOp::Rectangle([x, y, width, height]))
    }

    /// Rectangle with quarter-circle corners, lower-left corner at (x, y).
    pub fn rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
    ) -> &mut Self {
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        // Bezier control distance for a quarter circle
        let k = r * 0.552_284_8;
        let (right, top) = (x + width, y + height);

        self.move_to(x + r, y)
            .line_to(right - r, y)
            .op(ContentStreamOp::CurveTo([right - r + k, y, right, y + r - k, right, y + r]))
            .line_to(right, top - r)
            .op(ContentStreamOp::CurveTo([right, top - r + k, right - r + k, top, right - r, top]))
            .line_to(x + r, top)
            .op(ContentStreamOp::CurveTo([x + r - k, top, x, top - r + k, x, top - r]))
            .line_to(x, y + r)
            .op(ContentStreamOp::CurveTo([x, y + r - k, x + r - k, y, x + r, y]))
            .op(ContentStreamOp::ClosePath)
    }

    /// Stroke the current path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill the current path.
    pub fn fill(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Fill)
    }

    /// Fill, then stroke the current path.
    pub fn fill_stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::FillStroke)
    }

    /// Content stream bytes, one operator per line. An open text object is
    /// closed at the end.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        for op in &self.operations {
            write_op(&mut buf, op)?;
            buf.push(b'\n');
        }
        if self.in_text {
            buf.extend_from_slice(b"ET\n");
        }
        Ok(buf)
    }
}

fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    use ContentStreamOp::*;

    let none: &[f32] = &[];
    let (operands, operator): (&[f32], &str) = match op {
        BeginText => (none, "BT"),
        EndText => (none, "ET"),
        SetFont(resource, size) => return write!(w, "/{} {} Tf", resource, num(*size)),
        TextPosition(x, y) => return write!(w, "1 0 0 1 {} {} Tm", num(*x), num(*y)),
        ShowText(text) => {
            w.write_all(b"(")?;
            write_text(w, text)?;
            return w.write_all(b") Tj");
        },
        FillColor(c) => return write!(w, "{} {} {} rg", num(c.r), num(c.g), num(c.b)),
        StrokeColor(c) => return write!(w, "{} {} {} RG", num(c.r), num(c.g), num(c.b)),
        LineWidth(width) => (std::slice::from_ref(width), "w"),
        Dash(pattern) => {
            let lengths: Vec<String> = pattern.iter().map(|v| num(*v)).collect();
            return write!(w, "[{}] 0 d", lengths.join(" "));
        },
        MoveTo(x, y) => return write!(w, "{} {} m", num(*x), num(*y)),
        LineTo(x, y) => return write!(w, "{} {} l", num(*x), num(*y)),
        CurveTo(points) => (&points[..], "c"),
        Rectangle(rect) => (&rect[..], "re"),
        ClosePath => (none, "h"),
        Stroke => (none, "S"),
        Fill => (none, "f"),
        FillStroke => (none, "B"),
    };
    for value in operands {
        write!(w, "{} ", num(*value))?;
    }
    w.write_all(operator.as_bytes())
}

/// String body: WinAnsi bytes, delimiters escaped, high bytes as octal.
fn write_text<W: Write>(w: &mut W, text: &str) -> std::io::Result<()> {
    for byte in encode_win_ansi(text) {
        match byte {
            b'(' | b')' | b'\\' => w.write_all(&[b'\\', byte])?,
            0x20..=0x7E => w.write_all(&[byte])?,
            _ => write!(w, "\\{:03o}", byte)?,
        }
    }
    Ok(())
}

/// At most three decimals, trailing zeros removed.
fn num(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{:.3}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(builder: &ContentStreamBuilder) -> String {
        String::from_utf8(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_text_object() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_font("F1", 12.0).text("Hello", 72.0, 720.5).end_text();
        assert_eq!(render(&builder), "/F1 12 Tf\nBT\n1 0 0 1 72 720.5 Tm\n(Hello) Tj\nET\n");
    }

    #[test]
    fn test_font_selection_is_deduplicated() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("F1", 10.0)
            .set_font("F1", 10.0)
            .set_font("F1", 11.0)
            .end_text()
            .begin_text()
            .set_font("F1", 11.0);
        let fonts = builder
            .operations()
            .iter()
            .filter(|op| matches!(op, ContentStreamOp::SetFont(..)))
            .count();
        // a new text object forgets the font
        assert_eq!(fonts, 3);
    }

    #[test]
    fn test_text_is_win_ansi_escaped() {
        let mut builder = ContentStreamBuilder::new();
        builder.text("(a) \\ é \u{2022} \u{4e2d}", 0.0, 0.0);
        let content = render(&builder);
        // é -> 0xE9, bullet -> 0x95, CJK has no WinAnsi code
        assert!(content.contains("(\\(a\\) \\\\ \\351 \\225 ?) Tj"));
        assert!(content.ends_with("ET\n"));
    }

    #[test]
    fn test_path_operators() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .fill_color(Color::new(1.0, 0.5, 0.0))
            .stroke_color(Color::black())
            .line_width(0.85)
            .dash(vec![3.0, 1.5])
            .rect(10.0, 20.0, 30.0, 40.0)
            .fill_stroke()
            .dash(Vec::new())
            .move_to(0.0, 0.0)
            .line_to(5.0, 5.0)
            .stroke();
        assert_eq!(
            render(&builder),
            "1 0.5 0 rg\n0 0 0 RG\n0.85 w\n[3 1.5] 0 d\n10 20 30 40 re\nB\n[] 0 d\n0 0 m\n5 5 l\nS\n"
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(num(0.1 + 0.2), "0.3");
        assert_eq!(num(12.34567), "12.346");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(-3.5), "-3.5");
    }

    #[test]
    fn test_rounded_rect_is_closed() {
        let mut builder = ContentStreamBuilder::new();
        builder.rounded_rect(0.0, 0.0, 40.0, 10.0, 3.0).fill();
        let ops = builder.operations();
        assert_eq!(ops[0], ContentStreamOp::MoveTo(3.0, 0.0));
        assert_eq!(ops.iter().filter(|op| matches!(op, ContentStreamOp::CurveTo(_))).count(), 4);
        assert_eq!(&ops[ops.len() - 2..], &[ContentStreamOp::ClosePath, ContentStreamOp::Fill]);
    }
}
