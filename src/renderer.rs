//! Renderer that projects a turtle [`Command`] sequence into a [`TurtlePath`].
//!
//! The entry point is [`TurtleRenderer`]. Configure it with a [`RenderConfig`]
//! and call [`TurtleRenderer::render`] with the command sequence reported by the
//! interpreter and the size of the target surface.

use crate::error::RenderError;
use crate::path::{Rgb, Segment, StrokeColor, TurtlePath};
use crate::turtle::{Command, CommandRecord, CommandTrace, CursorState, trace_from_records};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for path rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Command count at which segments switch from `base_color` to the hue gradient.
    pub gradient_threshold: usize,
    /// Stroke width for every segment, in surface units.
    pub stroke_width: f32,
    /// Color of every segment below the gradient threshold.
    pub base_color: Rgb,
    /// Gradient saturation, percent.
    pub saturation: f32,
    /// Gradient lightness, percent.
    pub lightness: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gradient_threshold: 50,
            stroke_width: 2.0,
            base_color: Rgb(0x3B, 0x82, 0xF6),
            saturation: 70.0,
            lightness: 50.0,
        }
    }
}

impl RenderConfig {
    /// Stroke color for the command at `index` in a sequence of `total` commands.
    pub fn color_for(&self, index: usize, total: usize) -> StrokeColor {
        if total == 0 || total < self.gradient_threshold {
            return StrokeColor::Fixed(self.base_color);
        }
        StrokeColor::Hsl {
            hue: (360.0 * index as f32 / total as f32) % 360.0,
            saturation: self.saturation,
            lightness: self.lightness,
        }
    }
}

/// Renders command sequences into paths.
#[derive(Clone, Debug, Default)]
pub struct TurtleRenderer {
    config: RenderConfig,
}

impl TurtleRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Runs one full render pass over `commands` for a `width` x `height` surface.
    ///
    /// The cursor starts at the surface center facing `+x`. `Forward(d)` appends a
    /// segment from the cursor to `cursor + d * (cos h, sin h)`; a zero distance
    /// still appends a zero-length segment. Turns only change the heading. Nothing
    /// is clipped to the surface.
    ///
    /// Fails only if the surface dimensions are not finite and non-negative.
    pub fn render(
        &self,
        commands: &[Command],
        width: f32,
        height: f32,
    ) -> Result<TurtlePath, RenderError> {
        self.render_entries(commands.iter().map(Some), commands.len(), width, height)
    }

    /// Renders a decoded trace. Skipped entries draw nothing but keep their
    /// index, so they still count toward the gradient threshold and hue.
    pub fn render_trace(
        &self,
        trace: &CommandTrace,
        width: f32,
        height: f32,
    ) -> Result<TurtlePath, RenderError> {
        self.render_entries(
            trace.entries().iter().map(Option::as_ref),
            trace.len(),
            width,
            height,
        )
    }

    /// Renders wire records; see [`render_trace`](Self::render_trace).
    pub fn render_records(
        &self,
        records: &[CommandRecord],
        width: f32,
        height: f32,
    ) -> Result<TurtlePath, RenderError> {
        self.render_trace(&trace_from_records(records), width, height)
    }

    fn render_entries<'a>(
        &self,
        entries: impl Iterator<Item = Option<&'a Command>>,
        total: usize,
        width: f32,
        height: f32,
    ) -> Result<TurtlePath, RenderError> {
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(RenderError::InvalidSurface { width, height });
        }

        let mut cursor = CursorState::centered(width, height);
        let mut path = TurtlePath::new(cursor);

        for (index, cmd) in entries.enumerate() {
            match cmd.copied() {
                Some(Command::Forward(distance)) => {
                    let start = cursor.position;
                    let end = cursor.advance(distance);
                    path.push(Segment {
                        start,
                        end,
                        color: self.config.color_for(index, total),
                        width: self.config.stroke_width,
                        command_index: index,
                    });
                }
                Some(Command::TurnRight(degrees)) => cursor.turn(degrees),
                Some(Command::TurnLeft(degrees)) => cursor.turn(-degrees),
                None => {}
            }
        }

        path.cursor = cursor;
        path.command_count = total;

        debug!(
            commands = total,
            segments = path.segment_count(),
            gradient = total >= self.config.gradient_threshold,
            "render pass complete"
        );

        Ok(path)
    }
}

/// Renders `commands` with the default [`RenderConfig`].
pub fn render(commands: &[Command], width: f32, height: f32) -> Result<TurtlePath, RenderError> {
    TurtleRenderer::default().render(commands, width, height)
}
