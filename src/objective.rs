//! Lesson objective detection over learner source text.
//!
//! Detection is a textual heuristic: it inspects the submitted source, never the
//! executed command trace, so it can run before or without the remote
//! interpreter. It is approximate by nature. Matching tokens inside comments or
//! unreachable code still count.

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(forward|right|left)\s*\(\s*([-+]?\d+(?:\.\d+)?)\s*\)").expect("valid regex")
});

static FOR_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bfor\s+([A-Za-z_]\w*)\s+in\s+range\s*\(([^)]*)\)").expect("valid regex")
});

static FORWARD_ARGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bforward\s*\(([^)]*)\)").expect("valid regex"));

/// Which turn call a repetition profile counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnCall {
    #[default]
    Right,
    Left,
}

impl TurnCall {
    pub fn name(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

/// What a lesson requires the learner's source to contain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectiveProfile {
    /// "Square-like": `forward(<distance>)` and `<turn>(<angle>)` each appear
    /// at least `min_count` times, counted independently.
    Repetition {
        forward_distance: f64,
        #[serde(default)]
        turn_call: TurnCall,
        turn_angle: f64,
        #[serde(default = "default_min_count")]
        min_count: usize,
    },
    /// "Spiral-like": a `for <var> in range(...)` loop whose literal bound is at
    /// least `min_bound`, plus a `forward(...)` call whose argument uses `<var>`.
    LoopMagnitude {
        #[serde(default = "default_min_bound")]
        min_bound: u64,
    },
}

fn default_min_count() -> usize {
    4
}

fn default_min_bound() -> u64 {
    50
}

impl ObjectiveProfile {
    /// The lesson-1 square: four `forward(100)` and four `right(90)`.
    pub fn square() -> Self {
        Self::Repetition {
            forward_distance: 100.0,
            turn_call: TurnCall::Right,
            turn_angle: 90.0,
            min_count: default_min_count(),
        }
    }

    /// The lesson-2 spiral: a loop of at least 50 iterations driving `forward`.
    pub fn spiral() -> Self {
        Self::LoopMagnitude {
            min_bound: default_min_bound(),
        }
    }

    /// Rejects parameters no source text could ever satisfy meaningfully.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Repetition {
                forward_distance,
                turn_angle,
                min_count,
                ..
            } => {
                if !forward_distance.is_finite() || !turn_angle.is_finite() {
                    return Err(ConfigError::InvalidProfile(
                        "repetition arguments must be finite".into(),
                    ));
                }
                if *min_count == 0 {
                    return Err(ConfigError::InvalidProfile(
                        "repetition min_count must be at least 1".into(),
                    ));
                }
                Ok(())
            }
            Self::LoopMagnitude { .. } => Ok(()),
        }
    }
}

/// Outcome of checking a source against a lesson objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub satisfied: bool,
    /// How long the UI should wait before revealing completion. `None` unless satisfied.
    pub reveal_after: Option<Duration>,
}

impl Verdict {
    pub fn unsatisfied() -> Self {
        Self {
            satisfied: false,
            reveal_after: None,
        }
    }
}

/// Returns whether `source` satisfies `profile`. Empty sources never do.
pub fn evaluate(source: &str, profile: &ObjectiveProfile) -> bool {
    if source.trim().is_empty() {
        return false;
    }
    match profile {
        ObjectiveProfile::Repetition {
            forward_distance,
            turn_call,
            turn_angle,
            min_count,
        } => {
            let (forwards, turns) =
                count_calls(source, *forward_distance, *turn_call, *turn_angle);
            forwards >= *min_count && turns >= *min_count
        }
        ObjectiveProfile::LoopMagnitude { min_bound } => has_large_loop(source, *min_bound),
    }
}

/// Counts `forward(distance)` and `turn(angle)` calls with literal arguments.
fn count_calls(source: &str, distance: f64, turn: TurnCall, angle: f64) -> (usize, usize) {
    let mut forwards = 0;
    let mut turns = 0;
    for caps in CALL_RE.captures_iter(source) {
        let Ok(value) = caps[2].parse::<f64>() else {
            continue;
        };
        match &caps[1] {
            "forward" if value == distance => forwards += 1,
            name if name == turn.name() && value == angle => turns += 1,
            _ => {}
        }
    }
    (forwards, turns)
}

fn has_large_loop(source: &str, min_bound: u64) -> bool {
    FOR_RANGE_RE.captures_iter(source).any(|caps| {
        let var = &caps[1];
        let large = range_bound(&caps[2]).is_some_and(|bound| bound >= min_bound);
        large && forward_uses(source, var)
    })
}

/// The stop literal of `range(stop)` or `range(start, stop[, step])`.
fn range_bound(args: &str) -> Option<u64> {
    let args: Vec<&str> = args.split(',').map(str::trim).collect();
    let stop = match args.as_slice() {
        [stop] => stop,
        [_, stop] | [_, stop, _] => stop,
        _ => return None,
    };
    stop.parse().ok()
}

fn forward_uses(source: &str, var: &str) -> bool {
    FORWARD_ARGS_RE.captures_iter(source).any(|caps| {
        caps[1]
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .any(|token| token == var)
    })
}

/// A profile bound to the lesson's reveal delay.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectiveDetector {
    profile: ObjectiveProfile,
    reveal_after: Duration,
}

impl ObjectiveDetector {
    pub fn new(profile: ObjectiveProfile, reveal_after: Duration) -> Self {
        Self {
            profile,
            reveal_after,
        }
    }

    pub fn profile(&self) -> &ObjectiveProfile {
        &self.profile
    }

    /// Checks `source`. Never blocks; the delay is a recommendation for the caller.
    pub fn check(&self, source: &str) -> Verdict {
        let satisfied = evaluate(source, &self.profile);
        debug!(satisfied, profile = ?self.profile, "objective evaluated");
        if satisfied {
            Verdict {
                satisfied,
                reveal_after: Some(self.reveal_after),
            }
        } else {
            Verdict::unsatisfied()
        }
    }
}
