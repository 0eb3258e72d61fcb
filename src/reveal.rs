//! Typewriter reveal of lesson narrative text.
//!
//! [`Typewriter`] is driven by elapsed time rather than by timers: the caller
//! feeds it frame deltas through [`Typewriter::advance`] and renders
//! [`Typewriter::visible_text`]. Skipping is delivered through a
//! [`CancellationToken`] so any UI handler holding a clone can end the reveal.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealState {
    Typing,
    Paused,
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paragraph {
    /// Typed out one character at a time inside a bubble.
    Text(String),
    /// A horizontal rule, shown whole.
    Rule,
}

impl Paragraph {
    fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Rule => "",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterOptions {
    pub char_delay: Duration,
    pub paragraph_delay: Duration,
    /// Pause after an empty bubble appears, before its first character.
    pub lead_in: Duration,
}

impl Default for TypewriterOptions {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(30),
            paragraph_delay: Duration::from_millis(300),
            lead_in: Duration::from_millis(300),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    LeadIn,
    Chars,
    Gap,
}

#[derive(Debug)]
pub struct Typewriter {
    paragraphs: Vec<Paragraph>,
    options: TypewriterOptions,
    state: RevealState,
    skip: CancellationToken,
    current: usize,
    chars_shown: usize,
    phase: Phase,
    remaining: Duration,
}

impl Typewriter {
    pub fn new(paragraphs: Vec<Paragraph>, options: TypewriterOptions) -> Self {
        let mut typewriter = Self {
            paragraphs,
            options,
            state: RevealState::Typing,
            skip: CancellationToken::new(),
            current: 0,
            chars_shown: 0,
            phase: Phase::LeadIn,
            remaining: Duration::ZERO,
        };
        if typewriter.paragraphs.is_empty() {
            typewriter.state = RevealState::Complete;
        } else {
            typewriter.enter(0);
        }
        typewriter
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// A handle that skips the reveal when cancelled.
    pub fn skip_token(&self) -> CancellationToken {
        self.skip.clone()
    }

    pub fn pause(&mut self) {
        if self.state == RevealState::Typing {
            self.state = RevealState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == RevealState::Paused {
            self.state = RevealState::Typing;
        }
    }

    /// Ends the reveal immediately with all text shown.
    pub fn skip(&mut self) {
        self.skip.cancel();
        self.complete();
    }

    /// Moves the reveal forward by `dt`. Paused reveals do not consume time.
    pub fn advance(&mut self, dt: Duration) -> RevealState {
        let mut budget = dt;
        loop {
            if self.skip.is_cancelled() {
                self.complete();
            }
            if self.state != RevealState::Typing {
                break;
            }
            if budget < self.remaining {
                self.remaining -= budget;
                break;
            }
            budget -= self.remaining;
            self.step();
        }
        self.state
    }

    /// Text of every paragraph that has appeared so far; the last one may be partial.
    /// Rules contribute an empty string.
    pub fn visible_text(&self) -> Vec<&str> {
        if self.state == RevealState::Complete {
            return self.paragraphs.iter().map(Paragraph::text).collect();
        }
        let mut shown: Vec<&str> = self.paragraphs[..self.current]
            .iter()
            .map(Paragraph::text)
            .collect();
        let text = self.paragraphs[self.current].text();
        let end = text
            .char_indices()
            .nth(self.chars_shown)
            .map_or(text.len(), |(i, _)| i);
        shown.push(&text[..end]);
        shown
    }

    fn enter(&mut self, index: usize) {
        self.current = index;
        match &self.paragraphs[index] {
            Paragraph::Rule => {
                self.chars_shown = 0;
                self.phase = Phase::Chars;
                self.remaining = self.options.paragraph_delay;
            }
            Paragraph::Text(_) => {
                self.chars_shown = 0;
                self.phase = Phase::LeadIn;
                self.remaining = self.options.lead_in;
            }
        }
    }

    fn step(&mut self) {
        match self.phase {
            Phase::LeadIn | Phase::Chars => {
                let len = self.paragraphs[self.current].text().chars().count();
                if self.chars_shown < len {
                    self.chars_shown += 1;
                    self.phase = Phase::Chars;
                    self.remaining = self.options.char_delay;
                } else if self.current + 1 < self.paragraphs.len() {
                    self.phase = Phase::Gap;
                    self.remaining = self.options.paragraph_delay;
                } else {
                    self.complete();
                }
            }
            Phase::Gap => self.enter(self.current + 1),
        }
    }

    fn complete(&mut self) {
        self.state = RevealState::Complete;
        self.remaining = Duration::ZERO;
    }
}
