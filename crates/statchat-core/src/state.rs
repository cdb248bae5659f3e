//! UI-agnostic message types
//!
//! This module contains the message records shared by every front end
//! (the TUI and the plain `ask`/`refresh` commands). Records are immutable
//! once created; anything visual about them lives in the transcript view.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format used for the time-of-day label under each message (hour:minute).
pub const TIME_LABEL_FORMAT: &str = "%H:%M";

/// A message in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub rendered_at: DateTime<Local>,
}

/// Who a chat message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Bot, content)
    }

    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            rendered_at: Local::now(),
        }
    }
}

/// Hour:minute label for a point in time, without seconds
pub fn time_label(at: &DateTime<Local>) -> String {
    at.format(TIME_LABEL_FORMAT).to_string()
}

/// Hour:minute label for right now
pub fn current_time_label() -> String {
    time_label(&Local::now())
}
