//! The message log and its view projection.
//!
//! The log is an append-only list of [`ChatMessage`] records (cleared back to
//! the welcome entry on reset). Each record is paired with a [`MessageView`]
//! that owns everything visual: the lines shown so far, the time label, and
//! the reveal still running for it.

use tokio::time::Instant;

use crate::reveal::{Reveal, RevealStep};
use crate::state::{current_time_label, time_label, ChatMessage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineView {
    Text { text: String, typing: bool },
    Spacer,
}

#[derive(Debug, Clone)]
pub struct MessageView {
    pub lines: Vec<LineView>,
    pub time_label: Option<String>,
    reveal: Option<Reveal>,
}

impl MessageView {
    fn instant(text: &str, time_label: Option<String>) -> Self {
        Self {
            lines: text
                .split('\n')
                .map(|line| {
                    if line.trim().is_empty() {
                        LineView::Spacer
                    } else {
                        LineView::Text { text: line.to_string(), typing: false }
                    }
                })
                .collect(),
            time_label,
            reveal: None,
        }
    }

    fn revealing(text: &str, start: Instant) -> Self {
        Self {
            lines: Vec::new(),
            time_label: None,
            reveal: Some(Reveal::new(text, start)),
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    fn apply(&mut self, step: RevealStep) {
        match step {
            RevealStep::Spacer { .. } => self.lines.push(LineView::Spacer),
            RevealStep::LineStart { .. } => self.lines.push(LineView::Text {
                text: String::new(),
                typing: true,
            }),
            RevealStep::Char { ch, .. } => {
                if let Some(LineView::Text { text, .. }) = self.lines.last_mut() {
                    text.push(ch);
                }
            }
            RevealStep::LineEnd { .. } => {
                if let Some(LineView::Text { typing, .. }) = self.lines.last_mut() {
                    *typing = false;
                }
            }
            RevealStep::Complete => {
                self.time_label = Some(current_time_label());
                self.reveal = None;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    views: Vec<MessageView>,
}

impl Transcript {
    /// A transcript holding only the welcome entry, shown at once with no time label
    pub fn with_welcome(text: &str) -> Self {
        Self {
            messages: vec![ChatMessage::bot(text)],
            views: vec![MessageView::instant(text, None)],
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn entries(&self) -> impl Iterator<Item = (&ChatMessage, &MessageView)> {
        self.messages.iter().zip(self.views.iter())
    }

    /// Append a user message, fully shown with its time label
    pub fn push_user(&mut self, text: &str) {
        let message = ChatMessage::user(text);
        let view = MessageView::instant(text, Some(time_label(&message.rendered_at)));
        self.messages.push(message);
        self.views.push(view);
    }

    /// Append a bot message whose reveal starts at `start`
    pub fn push_bot(&mut self, text: &str, start: Instant) {
        tracing::debug!(lines = text.split('\n').count(), "starting reveal");
        self.messages.push(ChatMessage::bot(text));
        self.views.push(MessageView::revealing(text, start));
    }

    /// Drop everything but the first entry, including reveals still running
    pub fn reset(&mut self) {
        self.messages.truncate(1);
        self.views.truncate(1);
    }

    pub fn has_active_reveals(&self) -> bool {
        self.views.iter().any(MessageView::is_revealing)
    }

    /// Earliest instant at which some reveal has a step due
    pub fn next_due(&self) -> Option<Instant> {
        self.views
            .iter()
            .filter_map(|view| view.reveal.as_ref().and_then(Reveal::next_due))
            .min()
    }

    /// Apply every reveal step due at `now`. Returns the number of steps applied.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        for view in &mut self.views {
            let Some(reveal) = view.reveal.as_mut() else {
                continue;
            };
            let steps = reveal.poll_all(now);
            applied += steps.len();
            for step in steps {
                if step == RevealStep::Complete {
                    tracing::debug!("reveal complete");
                }
                view.apply(step);
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;
    use std::time::Duration;

    const WELCOME: &str = "Hi! Ask me about Messi and Ronaldo.";

    fn text_lines(view: &MessageView) -> Vec<String> {
        view.lines
            .iter()
            .map(|line| match line {
                LineView::Text { text, .. } => text.clone(),
                LineView::Spacer => String::new(),
            })
            .collect()
    }

    #[test]
    fn starts_with_only_the_welcome_entry() {
        let transcript = Transcript::with_welcome(WELCOME);
        assert_eq!(transcript.len(), 1);
        let (message, view) = transcript.entries().next().unwrap();
        assert_eq!(message.role, ChatRole::Bot);
        assert_eq!(text_lines(view), vec![WELCOME.to_string()]);
        assert_eq!(view.time_label, None);
        assert!(!transcript.has_active_reveals());
    }

    #[test]
    fn user_messages_are_shown_at_once_with_a_label() {
        let mut transcript = Transcript::with_welcome(WELCOME);
        transcript.push_user("What is the win rate?");

        let (message, view) = transcript.entries().last().unwrap();
        assert_eq!(message.role, ChatRole::User);
        assert_eq!(text_lines(view), vec!["What is the win rate?".to_string()]);
        assert!(view.time_label.is_some());
        assert!(!view.is_revealing());
    }

    #[test]
    fn bot_messages_fill_in_as_time_passes() {
        let t0 = Instant::now();
        let mut transcript = Transcript::with_welcome(WELCOME);
        transcript.push_bot("ab\n\ncd", t0);

        transcript.advance(t0 + Duration::from_millis(20));
        let view = transcript.entries().last().unwrap().1;
        assert_eq!(
            view.lines,
            vec![LineView::Text { text: "a".to_string(), typing: true }]
        );
        assert_eq!(view.time_label, None);

        transcript.advance(t0 + Duration::from_millis(60_000));
        let view = transcript.entries().last().unwrap().1;
        assert_eq!(
            view.lines,
            vec![
                LineView::Text { text: "ab".to_string(), typing: false },
                LineView::Spacer,
                LineView::Text { text: "cd".to_string(), typing: false },
            ]
        );
        assert!(view.time_label.is_some());
        assert!(!transcript.has_active_reveals());
        assert_eq!(transcript.next_due(), None);
    }

    #[test]
    fn independent_reveals_advance_together() {
        let t0 = Instant::now();
        let mut transcript = Transcript::with_welcome(WELCOME);
        transcript.push_bot("first", t0);
        transcript.push_bot("second", t0 + Duration::from_millis(30));
        assert_eq!(transcript.next_due(), Some(t0));

        transcript.advance(t0 + Duration::from_millis(45));
        let lines: Vec<Vec<String>> = transcript.entries().skip(1).map(|(_, v)| text_lines(v)).collect();
        assert_eq!(lines, vec![vec!["fir".to_string()], vec!["s".to_string()]]);
    }

    #[test]
    fn reset_keeps_only_the_welcome_entry() {
        let t0 = Instant::now();
        let mut transcript = Transcript::with_welcome(WELCOME);
        for i in 0..5 {
            transcript.push_user(&format!("question {i}"));
            transcript.push_bot("answer", t0);
        }
        assert_eq!(transcript.len(), 11);

        transcript.reset();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].content, WELCOME);
        assert!(!transcript.has_active_reveals());
        assert_eq!(transcript.advance(t0 + Duration::from_secs(60)), 0);
    }
}
