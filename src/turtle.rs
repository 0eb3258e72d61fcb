//! Turtle commands and cursor state.

use crate::error::CommandError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// One turtle instruction, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Move along the current heading. Negative distances move backward.
    Forward(f32),
    /// Rotate clockwise on screen (`heading += degrees`).
    TurnRight(f32),
    /// Rotate counter-clockwise on screen (`heading -= degrees`).
    TurnLeft(f32),
}

/// The wire form of a command as reported by the remote interpreter:
/// `{ "type": "forward" | "right" | "left", "distance"?: n, "degrees"?: n }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degrees: Option<f32>,
}

/// Why a command entry was dropped from the sequence.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkipReason {
    #[error("unknown command type `{0}`")]
    UnknownType(String),
    #[error("`{kind}` is missing its `{field}` operand")]
    MissingOperand {
        kind: &'static str,
        field: &'static str,
    },
    #[error("`{kind}` operand is not finite")]
    NonFinite { kind: &'static str },
    #[error("entry does not decode as a command record: {0}")]
    Undecodable(String),
}

impl CommandRecord {
    pub fn forward(distance: f32) -> Self {
        Self {
            kind: "forward".into(),
            distance: Some(distance),
            degrees: None,
        }
    }

    pub fn right(degrees: f32) -> Self {
        Self {
            kind: "right".into(),
            distance: None,
            degrees: Some(degrees),
        }
    }

    pub fn left(degrees: f32) -> Self {
        Self {
            kind: "left".into(),
            distance: None,
            degrees: Some(degrees),
        }
    }

    /// Converts the record into a [`Command`], or explains why it must be skipped.
    pub fn to_command(&self) -> Result<Command, SkipReason> {
        let operand = |kind: &'static str,
                       field: &'static str,
                       value: Option<f32>|
         -> Result<f32, SkipReason> {
            let v = value.ok_or(SkipReason::MissingOperand { kind, field })?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(SkipReason::NonFinite { kind })
            }
        };

        match self.kind.as_str() {
            "forward" => operand("forward", "distance", self.distance).map(Command::Forward),
            "right" => operand("right", "degrees", self.degrees).map(Command::TurnRight),
            "left" => operand("left", "degrees", self.degrees).map(Command::TurnLeft),
            other => Err(SkipReason::UnknownType(other.to_owned())),
        }
    }
}

impl From<Command> for CommandRecord {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Forward(d) => Self::forward(d),
            Command::TurnRight(deg) => Self::right(deg),
            Command::TurnLeft(deg) => Self::left(deg),
        }
    }
}

/// A decoded command sequence that remembers where malformed entries were.
///
/// A skipped entry is a no-op, but it still occupies its slot: it counts toward
/// the sequence length and shifts the index of every later command.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandTrace {
    entries: Vec<Option<Command>>,
}

impl CommandTrace {
    pub fn new(entries: Vec<Option<Command>>) -> Self {
        Self { entries }
    }

    /// Number of entries, skipped ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Option<Command>] {
        &self.entries
    }

    /// The valid commands only, in order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().flatten()
    }

    pub fn skipped(&self) -> usize {
        self.entries.iter().filter(|e| e.is_none()).count()
    }
}

impl From<Vec<Command>> for CommandTrace {
    fn from(commands: Vec<Command>) -> Self {
        Self::new(commands.into_iter().map(Some).collect())
    }
}

fn keep_or_skip(index: usize, decoded: Result<Command, SkipReason>) -> Option<Command> {
    match decoded {
        Ok(cmd) => Some(cmd),
        Err(reason) => {
            warn!(index, %reason, "skipping command entry");
            None
        }
    }
}

/// Converts wire records into a trace. Malformed entries are logged and kept
/// as no-op slots.
pub fn trace_from_records(records: &[CommandRecord]) -> CommandTrace {
    CommandTrace::new(
        records
            .iter()
            .enumerate()
            .map(|(index, record)| keep_or_skip(index, record.to_command()))
            .collect(),
    )
}

/// Decodes the interpreter's `commands` JSON array.
///
/// Each entry is decoded on its own, so a single bad entry (wrong shape, unknown
/// `type`, missing operand) only turns that entry into a no-op. The payload as a
/// whole must still be a JSON array.
pub fn parse_commands(json: &str) -> Result<CommandTrace, CommandError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    trace_from_value(value)
}

pub(crate) fn trace_from_value(value: serde_json::Value) -> Result<CommandTrace, CommandError> {
    let entries = match value {
        serde_json::Value::Array(entries) => entries,
        serde_json::Value::Null => return Err(CommandError::NotAnArray("null")),
        serde_json::Value::Bool(_) => return Err(CommandError::NotAnArray("a boolean")),
        serde_json::Value::Number(_) => return Err(CommandError::NotAnArray("a number")),
        serde_json::Value::String(_) => return Err(CommandError::NotAnArray("a string")),
        serde_json::Value::Object(_) => return Err(CommandError::NotAnArray("an object")),
    };

    let entries = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let decoded = serde_json::from_value::<CommandRecord>(entry)
                .map_err(|e| SkipReason::Undecodable(e.to_string()))
                .and_then(|record| record.to_command());
            keep_or_skip(index, decoded)
        })
        .collect();

    Ok(CommandTrace::new(entries))
}

/// The turtle's cursor during a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CursorState {
    /// Current position in surface coordinates (y grows downward).
    pub position: Vec2,

    /// Heading in degrees, kept within `[0, 360)`. `0` points along `+x`.
    pub heading: f32,
}

impl CursorState {
    /// A cursor at `position` facing `+x`.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            heading: 0.0,
        }
    }

    /// A cursor at the center of a `width` x `height` surface.
    pub fn centered(width: f32, height: f32) -> Self {
        Self::at(Vec2::new(width / 2.0, height / 2.0))
    }

    /// Unit vector along the current heading.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.heading.to_radians())
    }

    /// Moves `distance` along the heading and returns the new position.
    pub fn advance(&mut self, distance: f32) -> Vec2 {
        self.position += self.direction() * distance;
        self.position
    }

    /// Adds `degrees` to the heading, wrapping into `[0, 360)`.
    pub fn turn(&mut self, degrees: f32) {
        let heading = (self.heading + degrees).rem_euclid(360.0);
        // rem_euclid can round tiny negatives up to exactly 360.
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }
}
