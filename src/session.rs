//! A lesson page's drawing session.
//!
//! One [`LessonSession`] owns one drawing surface. Every command trace starts a
//! new render generation; a generation clears the surface and draws its own path
//! in full, and any completion signal scheduled by an older generation is
//! discarded. Failed executions never touch the surface or the generation.

use crate::error::{CommandError, RenderError};
use crate::lesson::LessonConfig;
use crate::objective::{ObjectiveDetector, Verdict};
use crate::path::{DrawSurface, TurtlePath};
use crate::renderer::TurtleRenderer;
use crate::turtle::{CommandTrace, trace_from_value};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// The remote interpreter's reply: `{ success, commands?, error? }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InterpreterResponse {
    pub success: bool,

    #[serde(default)]
    pub commands: Option<serde_json::Value>,

    #[serde(default)]
    pub error: Option<String>,
}

/// What the interpreter produced, with the command list already decoded.
#[derive(Clone, Debug, PartialEq)]
pub enum InterpreterOutcome {
    Commands(CommandTrace),
    /// Opaque message for the learner; nothing gets rendered.
    Failed(String),
}

impl InterpreterResponse {
    pub fn from_json(json: &str) -> Result<Self, CommandError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_outcome(self) -> InterpreterOutcome {
        if !self.success {
            return InterpreterOutcome::Failed(
                self.error
                    .unwrap_or_else(|| "interpreter reported an error".into()),
            );
        }
        match self.commands {
            None => InterpreterOutcome::Commands(CommandTrace::default()),
            Some(value) => match trace_from_value(value) {
                Ok(trace) => InterpreterOutcome::Commands(trace),
                Err(e) => InterpreterOutcome::Failed(e.to_string()),
            },
        }
    }
}

/// A completion signal waiting for its delay to elapse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReveal {
    pub generation: u64,
    pub reveal_after: Duration,
    pub next_lesson: Option<String>,
}

/// Result of one submission.
#[derive(Clone, Debug, PartialEq)]
pub enum RunReport {
    /// The interpreter failed; the surface was left as it was.
    Failed(String),
    Drawn {
        segments: usize,
        verdict: Verdict,
        pending: Option<PendingReveal>,
    },
}

pub struct LessonSession<S: DrawSurface> {
    lesson: LessonConfig,
    renderer: TurtleRenderer,
    detector: ObjectiveDetector,
    surface: S,
    width: f32,
    height: f32,
    generation: u64,
    last_path: Option<TurtlePath>,
}

impl<S: DrawSurface> LessonSession<S> {
    pub fn new(lesson: LessonConfig, surface: S, width: f32, height: f32) -> Self {
        Self {
            renderer: TurtleRenderer::new(lesson.render.clone()),
            detector: lesson.detector(),
            lesson,
            surface,
            width,
            height,
            generation: 0,
            last_path: None,
        }
    }

    pub fn lesson(&self) -> &LessonConfig {
        &self.lesson
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_path(&self) -> Option<&TurtlePath> {
        self.last_path.as_ref()
    }

    /// Handles one submission of `source` whose execution produced `outcome`.
    ///
    /// A failed execution leaves the surface and any pending reveal alone. A new
    /// command trace supersedes pending reveals from earlier submissions. The
    /// path is rendered completely before the surface is touched, so an invalid
    /// surface size leaves the previous frame intact.
    pub fn run(
        &mut self,
        outcome: InterpreterOutcome,
        source: &str,
    ) -> Result<RunReport, RenderError> {
        let trace = match outcome {
            InterpreterOutcome::Commands(trace) => trace,
            InterpreterOutcome::Failed(message) => {
                debug!(generation = self.generation, %message, "interpreter failed");
                return Ok(RunReport::Failed(message));
            }
        };
        self.generation += 1;

        let path = self
            .renderer
            .render_trace(&trace, self.width, self.height)?;
        path.draw(&mut self.surface);
        let segments = path.segment_count();
        self.last_path = Some(path);

        let verdict = self.detector.check(source);
        let pending = verdict.reveal_after.map(|reveal_after| PendingReveal {
            generation: self.generation,
            reveal_after,
            next_lesson: self.lesson.next_lesson.clone(),
        });

        Ok(RunReport::Drawn {
            segments,
            verdict,
            pending,
        })
    }

    /// Returns whether `pending` may still fire. Signals from superseded
    /// generations return `false`.
    pub fn fire(&self, pending: &PendingReveal) -> bool {
        let current = pending.generation == self.generation;
        if current {
            info!(lesson = self.lesson.number, "lesson objective completed");
        } else {
            debug!(
                scheduled = pending.generation,
                current = self.generation,
                "discarding superseded reveal"
            );
        }
        current
    }

    /// Clears the surface and supersedes any pending reveal.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.surface.clear();
        self.last_path = None;
    }
}
