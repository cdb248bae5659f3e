use std::time::Duration;

use ratatui::layout::Rect;
use statchat_core::{
    StatsClient, Theme, ThemeStore, Transcript, ASK_FAILED_MESSAGE, REFRESH_DONE_MESSAGE,
    REFRESH_FAILED_MESSAGE, REFRESH_STARTED_MESSAGE, WELCOME_MESSAGE,
};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::layout::{chat_rows, ChatRow};

/// One frame of the thinking dots lasts this long
const THINKING_FRAME: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Messages,
    Input,
}

/// Screen regions that react to mouse clicks, recorded during render
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickAreas {
    pub theme_button: Option<Rect>,
    pub reset_button: Option<Rect>,
    pub refresh_button: Option<Rect>,
    pub send_button: Option<Rect>,
    pub chat: Option<Rect>,
    pub input: Option<Rect>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub theme: Theme,
    theme_store: Option<ThemeStore>,

    // Message log
    pub transcript: Transcript,
    pub chat_scroll: usize, // first visible row
    follow_bottom: bool,    // pin the view to the newest row on every draw
    pub chat_height: u16,   // Height of chat area for scroll calculations
    pub chat_width: u16,    // Width of chat area for wrap calculations

    // Question input
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars
    input_locked: bool,
    thinking_since: Option<Instant>,

    // Requests
    client: StatsClient,
    ask_task: Option<JoinHandle<anyhow::Result<String>>>,
    refresh_tasks: Vec<JoinHandle<anyhow::Result<()>>>,

    pub areas: ClickAreas,
}

impl App {
    pub fn new(client: StatsClient, theme_store: Option<ThemeStore>) -> Self {
        let theme = theme_store
            .as_ref()
            .and_then(ThemeStore::load)
            .unwrap_or_default();
        tracing::info!(theme = theme.as_str(), server = client.base_url(), "starting chat");

        Self {
            should_quit: false,
            focus: FocusPane::Input,
            theme,
            theme_store,

            transcript: Transcript::with_welcome(WELCOME_MESSAGE),
            chat_scroll: 0,
            follow_bottom: true,
            chat_height: 0,
            chat_width: 0,

            input: String::new(),
            input_cursor: 0,
            input_locked: false,
            thinking_since: None,

            client,
            ask_task: None,
            refresh_tasks: Vec::new(),

            areas: ClickAreas::default(),
        }
    }

    pub fn server_url(&self) -> &str {
        self.client.base_url()
    }

    // Theme

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        tracing::info!(theme = self.theme.as_str(), "theme toggled");
        if let Some(store) = &self.theme_store {
            if let Err(e) = store.save(self.theme) {
                tracing::warn!(error = %e, "could not persist theme");
            }
        }
    }

    // Input field. Edits are ignored while a question is in flight.

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn insert_char(&mut self, c: char) {
        if self.input_locked {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.insert(byte_pos, c);
        self.input_cursor += 1;
    }

    pub fn delete_char_before_cursor(&mut self) {
        if self.input_locked || self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.remove(byte_pos);
    }

    pub fn delete_char_at_cursor(&mut self) {
        if self.input_locked || self.input_cursor >= self.input.chars().count() {
            return;
        }
        let byte_pos = char_to_byte_index(&self.input, self.input_cursor);
        self.input.remove(byte_pos);
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    pub fn move_cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input.chars().count();
    }

    pub fn focus_input(&mut self) {
        if !self.input_locked {
            self.focus = FocusPane::Input;
        }
    }

    // Question lifecycle: Idle -> Pending -> Idle

    /// Send the typed question. Returns false when nothing was sent.
    pub fn submit_question(&mut self) -> bool {
        if self.input_locked {
            return false;
        }
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return false;
        }

        self.transcript.push_user(&question);
        self.input.clear();
        self.input_cursor = 0;

        // Focus stays on the field so further keystrokes land there and are ignored
        self.input_locked = true;
        self.thinking_since = Some(Instant::now());
        self.scroll_to_bottom();

        tracing::info!(%question, "question submitted");
        let client = self.client.clone();
        self.ask_task = Some(tokio::spawn(async move { client.ask(&question).await }));
        true
    }

    fn finish_question(&mut self, result: anyhow::Result<String>) {
        self.thinking_since = None;
        match result {
            Ok(answer) => {
                tracing::info!(chars = answer.chars().count(), "answer received");
                self.transcript.push_bot(&answer, Instant::now());
                self.input_locked = false;
                self.focus = FocusPane::Input;
            }
            Err(e) => {
                tracing::error!(error = %e, "question failed");
                self.transcript.push_bot(ASK_FAILED_MESSAGE, Instant::now());
                self.input_locked = false;
            }
        }
        self.scroll_to_bottom();
    }

    // Data refresh: independent of the question lock

    pub fn start_refresh(&mut self) {
        self.transcript.push_bot(REFRESH_STARTED_MESSAGE, Instant::now());
        self.scroll_to_bottom();

        let client = self.client.clone();
        self.refresh_tasks.push(tokio::spawn(async move { client.refresh_data().await }));
    }

    fn finish_refresh(&mut self, result: anyhow::Result<()>) {
        let message = match result {
            Ok(()) => {
                tracing::info!("data refresh finished");
                REFRESH_DONE_MESSAGE
            }
            Err(e) => {
                tracing::error!(error = %e, "data refresh failed");
                REFRESH_FAILED_MESSAGE
            }
        };
        self.transcript.push_bot(message, Instant::now());
        self.scroll_to_bottom();
    }

    pub fn has_pending_requests(&self) -> bool {
        self.ask_task.is_some() || !self.refresh_tasks.is_empty()
    }

    /// Apply the results of any requests that have finished
    pub async fn poll_tasks(&mut self) {
        if self.ask_task.as_ref().is_some_and(|task| task.is_finished()) {
            if let Some(task) = self.ask_task.take() {
                let result = task.await.map_err(anyhow::Error::from).and_then(|r| r);
                self.finish_question(result);
            }
        }

        if self.refresh_tasks.iter().any(|task| task.is_finished()) {
            let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.refresh_tasks)
                .into_iter()
                .partition(|task| task.is_finished());
            self.refresh_tasks = pending;
            for task in done {
                let result = task.await.map_err(anyhow::Error::from).and_then(|r| r);
                self.finish_refresh(result);
            }
        }
    }

    /// Conversation reset: keep only the welcome entry and jump to the top.
    /// In-flight requests are left alone.
    pub fn reset_conversation(&mut self) {
        tracing::info!(removed = self.transcript.len().saturating_sub(1), "conversation reset");
        self.transcript.reset();
        // The indicator lives among the messages, so it goes too
        self.thinking_since = None;
        self.chat_scroll = 0;
        self.follow_bottom = false;
    }

    // Animation

    /// Advance reveals and keep the newest content in view
    pub fn on_tick(&mut self, now: Instant) {
        if self.transcript.advance(now) > 0 {
            self.scroll_to_bottom();
        }
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking_since.is_some()
    }

    /// Number of dots to show (1-3) while thinking
    pub fn thinking_dots(&self) -> usize {
        self.thinking_since
            .map(|since| {
                let frames = since.elapsed().as_millis() / THINKING_FRAME.as_millis();
                (frames % 3) as usize + 1
            })
            .unwrap_or(0)
    }

    // Scrolling

    /// Scroll chat to bottom so the newest content is visible, and keep it there
    pub fn scroll_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.chat_scroll = self.max_scroll(self.total_chat_lines());
    }

    pub fn scroll_to_top(&mut self) {
        self.follow_bottom = false;
        self.chat_scroll = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.follow_bottom = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max_scroll = self.max_scroll(self.total_chat_lines());
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll);
        self.follow_bottom = self.chat_scroll == max_scroll;
    }

    /// Called by render once the pane size is known, with the rows about to be drawn
    pub fn fit_scroll(&mut self, total_rows: usize) {
        let max_scroll = self.max_scroll(total_rows);
        self.chat_scroll = if self.follow_bottom {
            max_scroll
        } else {
            self.chat_scroll.min(max_scroll)
        };
    }

    fn max_scroll(&self, total_rows: usize) -> usize {
        total_rows.saturating_sub(self.visible_height())
    }

    fn visible_height(&self) -> usize {
        if self.chat_height > 0 {
            self.chat_height as usize
        } else {
            20
        }
    }

    fn wrap_width(&self) -> usize {
        if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        }
    }

    /// The log as drawn, one entry per terminal row
    pub fn chat_rows(&self) -> Vec<ChatRow> {
        let dots = self.is_thinking().then(|| self.thinking_dots());
        chat_rows(&self.transcript, dots, self.wrap_width())
    }

    fn total_chat_lines(&self) -> usize {
        self.chat_rows().len()
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
