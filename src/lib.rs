//! # turtle-lesson
//!
//! The drawing core of a turtle-graphics lesson page. A learner's program is run
//! by a remote interpreter, which reports an ordered list of movement commands.
//! This crate turns that list into a vector path on a 2-D drawing surface, and
//! separately inspects the learner's source text to decide whether the lesson's
//! objective (a square, a spiral) has been met.
//!
//! It decouples the *trace* (commands) from the *surface* (canvas, SVG), producing
//! a `TurtlePath` that any [`DrawSurface`] can replay.

pub mod error;
pub mod lesson;
pub mod objective;
pub mod path;
pub mod renderer;
pub mod reveal;
pub mod session;
pub mod turtle;

pub use error::*;
pub use lesson::*;
pub use objective::*;
pub use path::*;
pub use renderer::*;
pub use reveal::*;
pub use session::*;
pub use turtle::*;
