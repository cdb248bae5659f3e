//! Chat log rows, wrapped to the pane width.
//!
//! The chat pane draws exactly one terminal row per [`ChatRow`], so scrolling
//! and rendering agree on how tall the log is.

use statchat_core::{ChatRole, LineView, Transcript};

/// Drawn after the text of a line that is still being typed
pub const TYPING_CURSOR: &str = "▌";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRow {
    Role(ChatRole),
    Text { text: String, cursor: bool },
    TimeLabel(String),
    Thinking { dots: usize },
    Blank,
}

/// Wrap text to fit within a given width, breaking at word boundaries.
/// Words longer than the width are split across rows.
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let piece_len = piece.len();
            if current_len == 0 {
                current_line = piece.iter().collect();
                current_len = piece_len;
            } else if current_len + 1 + piece_len <= width {
                current_line.push(' ');
                current_line.extend(piece);
                current_len += 1 + piece_len;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = piece.iter().collect();
                current_len = piece_len;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Lay out the whole log, followed by the thinking indicator when `thinking_dots` is set
pub fn chat_rows(transcript: &Transcript, thinking_dots: Option<usize>, width: usize) -> Vec<ChatRow> {
    let mut rows = Vec::new();

    for (message, view) in transcript.entries() {
        rows.push(ChatRow::Role(message.role));

        for line in &view.lines {
            match line {
                LineView::Spacer => rows.push(ChatRow::Blank),
                LineView::Text { text, typing } => {
                    // The cursor needs a column of its own
                    let wrap_width = if *typing { width.saturating_sub(1) } else { width };
                    let wrapped = wrap_text_to_width(text, wrap_width);
                    let last = wrapped.len() - 1;
                    rows.extend(wrapped.into_iter().enumerate().map(|(i, text)| ChatRow::Text {
                        text,
                        cursor: *typing && i == last,
                    }));
                }
            }
        }

        if let Some(label) = &view.time_label {
            rows.push(ChatRow::TimeLabel(label.clone()));
        }
        rows.push(ChatRow::Blank);
    }

    if let Some(dots) = thinking_dots {
        rows.push(ChatRow::Role(ChatRole::Bot));
        rows.push(ChatRow::Thinking { dots });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_text_to_width("Messi scored 91 goals in 2012", 12),
            vec!["Messi scored", "91 goals in", "2012"]
        );
    }

    #[test]
    fn long_words_are_split_across_rows() {
        assert_eq!(
            wrap_text_to_width("ab abcdefghij cd", 4),
            vec!["ab", "abcd", "efgh", "ij", "cd"]
        );
    }

    #[test]
    fn blank_text_is_one_empty_row() {
        assert_eq!(wrap_text_to_width("   ", 10), vec![String::new()]);
        assert_eq!(wrap_text_to_width("", 10), vec![String::new()]);
    }

    #[test]
    fn no_row_is_wider_than_the_pane() {
        let text = "Cristiano Ronaldo: 5 Champions League titles, 140 Champions League goals, Supercalifragilistic";
        for width in 1..40 {
            for row in wrap_text_to_width(text, width) {
                assert!(row.chars().count() <= width, "{row:?} wider than {width}");
            }
        }
    }

    #[test]
    fn rows_cover_roles_labels_and_thinking() {
        let t0 = Instant::now();
        let mut transcript = Transcript::with_welcome("Hi there");
        transcript.push_user("goals?");
        transcript.push_bot("ab", t0);
        transcript.advance(t0 + std::time::Duration::from_millis(20));

        let rows = chat_rows(&transcript, Some(2), 20);
        assert_eq!(rows[0], ChatRow::Role(ChatRole::Bot));
        assert_eq!(rows[1], ChatRow::Text { text: "Hi there".to_string(), cursor: false });
        assert_eq!(rows[2], ChatRow::Blank);
        assert_eq!(rows[3], ChatRow::Role(ChatRole::User));
        assert!(matches!(rows[5], ChatRow::TimeLabel(_)));
        assert_eq!(rows[8], ChatRow::Text { text: "a".to_string(), cursor: true });
        assert_eq!(rows.last(), Some(&ChatRow::Thinking { dots: 2 }));
    }
}
