//! Per-lesson configuration.

use crate::error::ConfigError;
use crate::objective::{ObjectiveDetector, ObjectiveProfile};
use crate::renderer::RenderConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything the front-end needs to know about one turtle lesson.
///
/// Usually loaded from TOML:
///
/// ```toml
/// number = 2
/// title = "Spirála"
/// reveal_after_ms = 1500
/// next_lesson = "/python-course/lesson-3"
///
/// [objective]
/// kind = "loop_magnitude"
/// min_bound = 50
///
/// [render]
/// gradient_threshold = 50
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonConfig {
    pub number: u32,
    pub title: String,
    pub objective: ObjectiveProfile,

    #[serde(default = "default_reveal_after_ms")]
    pub reveal_after_ms: u64,

    /// Resource to navigate to once the lesson is completed.
    #[serde(default)]
    pub next_lesson: Option<String>,

    #[serde(default)]
    pub render: RenderConfig,
}

fn default_reveal_after_ms() -> u64 {
    1000
}

impl LessonConfig {
    /// Lesson 1: draw a square with four `forward(100)` / `right(90)` pairs.
    pub fn square() -> Self {
        Self {
            number: 1,
            title: "Square".into(),
            objective: ObjectiveProfile::square(),
            reveal_after_ms: 1000,
            next_lesson: Some("/python-course/lesson-2".into()),
            render: RenderConfig::default(),
        }
    }

    /// Lesson 2: draw a spiral with a long loop.
    pub fn spiral() -> Self {
        Self {
            number: 2,
            title: "Spiral".into(),
            objective: ObjectiveProfile::spiral(),
            reveal_after_ms: 1500,
            next_lesson: Some("/python-course/lesson-3".into()),
            render: RenderConfig::default(),
        }
    }

    /// Parses and validates a lesson from TOML.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.objective.validate()?;
        Ok(config)
    }

    pub fn reveal_after(&self) -> Duration {
        Duration::from_millis(self.reveal_after_ms)
    }

    pub fn detector(&self) -> ObjectiveDetector {
        ObjectiveDetector::new(self.objective.clone(), self.reveal_after())
    }
}
