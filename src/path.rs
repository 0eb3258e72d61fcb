use crate::turtle::CursorState;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter, Write as _};

/// An sRGB color, written as `#RRGGBB` in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("`{value}` is not a #RRGGBB color"))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

/// Stroke color of a single segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StrokeColor {
    /// The lesson's base color, used for short programs.
    Fixed(Rgb),
    /// A hue-rotated color used for the progression gradient.
    /// `saturation` and `lightness` are percentages.
    Hsl {
        hue: f32,
        saturation: f32,
        lightness: f32,
    },
}

impl Display for StrokeColor {
    /// Formats as a CSS color value.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(rgb) => Display::fmt(rgb, f),
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue}, {saturation}%, {lightness}%)"),
        }
    }
}

/// A straight stroke produced by one `Forward` command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
    pub color: StrokeColor,
    pub width: f32,

    /// Position of the originating command in the sequence.
    pub command_index: usize,
}

impl Segment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// The finished output of a render pass.
///
/// Owned by the pass that built it and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtlePath {
    pub segments: Vec<Segment>,

    /// Cursor after the last command.
    pub cursor: CursorState,

    /// Number of entries consumed, including turns and skipped entries.
    pub command_count: usize,
}

impl TurtlePath {
    pub fn new(start: CursorState) -> Self {
        Self {
            segments: Vec::new(),
            cursor: start,
            command_count: 0,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Axis-aligned bounds `(min, max)` of all segment endpoints.
    ///
    /// Paths are never clipped, so the bounds may lie outside the surface.
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut points = self.segments.iter().flat_map(|s| [s.start, s.end]);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Replaces everything on `surface` with this path.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for segment in &self.segments {
            surface.move_to(segment.start);
            surface.line_to(segment.end);
            surface.stroke(&segment.color, segment.width);
        }
    }
}

/// A 2-D drawing target, e.g. a browser canvas behind a binding.
pub trait DrawSurface {
    fn clear(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    fn stroke(&mut self, color: &StrokeColor, width: f32);
}

/// A [`DrawSurface`] that records strokes as SVG `<path>` elements.
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    width: f32,
    height: f32,
    elements: Vec<String>,
    pending: Vec<Vec2>,
}

impl SvgSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Number of stroked elements currently on the surface.
    pub fn stroke_count(&self) -> usize {
        self.elements.len()
    }

    /// Serializes the surface as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        for element in &self.elements {
            let _ = writeln!(out, "  {element}");
        }
        out.push_str("</svg>\n");
        out
    }
}

impl DrawSurface for SvgSurface {
    fn clear(&mut self) {
        self.elements.clear();
        self.pending.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.pending.clear();
        self.pending.push(point);
    }

    fn line_to(&mut self, point: Vec2) {
        self.pending.push(point);
    }

    fn stroke(&mut self, color: &StrokeColor, width: f32) {
        let mut points = self.pending.drain(..);
        let Some(first) = points.next() else {
            return;
        };
        let mut d = format!("M {} {}", first.x, first.y);
        for p in points {
            let _ = write!(d, " L {} {}", p.x, p.y);
        }
        self.elements.push(format!(
            r#"<path d="{d}" stroke="{color}" stroke-width="{width}" stroke-linecap="round" fill="none"/>"#
        ));
    }
}
