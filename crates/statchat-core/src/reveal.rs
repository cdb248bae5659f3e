//! Timed, line-by-line then character-by-character reveal of bot text.
//!
//! A [`Reveal`] is a plain state machine: it never sleeps and never spawns.
//! Callers hand it the current instant and it yields every step that has
//! become due since the last call, in order. The TUI polls it from its tick;
//! the CLI sleeps until [`Reveal::next_due`] between polls.
//!
//! Timing for a line of `n` characters starting at `t`:
//!
//! ```text
//! t            LineStart
//! t + 15k      Char (k = 1..=n)
//! t + 15(n+1)  LineEnd
//! t + 15(n+1) + 100   next line begins
//! ```
//!
//! A whitespace-only line yields a single `Spacer` and the next line begins
//! 50ms later. After the last line, `Complete` is yielded immediately.

use std::time::Duration;
use tokio::time::Instant;

pub const CHAR_INTERVAL: Duration = Duration::from_millis(15);
pub const LINE_PAUSE: Duration = Duration::from_millis(100);
pub const BLANK_LINE_PAUSE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStep {
    /// A whitespace-only line, shown as an empty spacer
    Spacer { line: usize },
    /// A new, still empty, text line
    LineStart { line: usize },
    Char { line: usize, ch: char },
    /// The line is fully shown and no longer typing
    LineEnd { line: usize },
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// About to look at `line`
    NextLine,
    /// Typing `line`; `pos` characters shown so far
    Typing { pos: usize },
    Done,
}

#[derive(Debug, Clone)]
pub struct Reveal {
    lines: Vec<Vec<char>>,
    line: usize,
    phase: Phase,
    due: Instant,
}

impl Reveal {
    /// Start revealing `text`; the first step is due at `start`
    pub fn new(text: &str, start: Instant) -> Self {
        Self {
            lines: text.split('\n').map(|line| line.chars().collect()).collect(),
            line: 0,
            phase: Phase::NextLine,
            due: start,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Index of the line being revealed (equal to `line_count()` once all lines are shown)
    pub fn current_line(&self) -> usize {
        self.line
    }

    /// When the next step becomes due, or `None` once complete
    pub fn next_due(&self) -> Option<Instant> {
        (!self.is_complete()).then_some(self.due)
    }

    /// Take the next step if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> Option<RevealStep> {
        if self.is_complete() || now < self.due {
            return None;
        }

        let step = match self.phase {
            Phase::NextLine => match self.lines.get(self.line) {
                None => {
                    self.phase = Phase::Done;
                    RevealStep::Complete
                }
                Some(chars) if chars.iter().all(|c| c.is_whitespace()) => {
                    let line = self.line;
                    self.line += 1;
                    self.due += BLANK_LINE_PAUSE;
                    RevealStep::Spacer { line }
                }
                Some(_) => {
                    self.phase = Phase::Typing { pos: 0 };
                    self.due += CHAR_INTERVAL;
                    RevealStep::LineStart { line: self.line }
                }
            },
            Phase::Typing { pos } => {
                let line = self.line;
                match self.lines[line].get(pos) {
                    Some(&ch) => {
                        self.phase = Phase::Typing { pos: pos + 1 };
                        self.due += CHAR_INTERVAL;
                        RevealStep::Char { line, ch }
                    }
                    None => {
                        self.line += 1;
                        self.phase = Phase::NextLine;
                        self.due += LINE_PAUSE;
                        RevealStep::LineEnd { line }
                    }
                }
            }
            Phase::Done => return None,
        };

        Some(step)
    }

    /// Every step due at `now`, in order
    pub fn poll_all(&mut self, now: Instant) -> Vec<RevealStep> {
        std::iter::from_fn(|| self.poll(now)).collect()
    }
}

/// Total time from the first step to `Complete`
pub fn total_duration(text: &str) -> Duration {
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                BLANK_LINE_PAUSE
            } else {
                CHAR_INTERVAL * (line.chars().count() as u32 + 1) + LINE_PAUSE
            }
        })
        .sum()
}
