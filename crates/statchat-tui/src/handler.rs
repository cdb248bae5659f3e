use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::time::Instant;
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        // Re-pinned against the new size when the next draw stores it
        AppEvent::Resize => app.scroll_to_bottom(),
        AppEvent::Tick => {
            app.poll_tasks().await;
            app.on_tick(Instant::now());
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work with either pane focused
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('t') => app.toggle_theme(),
            KeyCode::Char('l') => app.reset_conversation(),
            KeyCode::Char('r') => app.start_refresh(),
            _ => {}
        }
        return;
    }

    match app.focus {
        FocusPane::Messages => handle_messages_key(app, key),
        FocusPane::Input => handle_input_key(app, key),
    }
}

fn handle_messages_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::PageDown => app.scroll_down(app.chat_height as usize / 2),
        KeyCode::PageUp => app.scroll_up(app.chat_height as usize / 2),
        KeyCode::Char('g') => app.scroll_to_top(),
        KeyCode::Char('G') => app.scroll_to_bottom(),

        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('r') => app.start_refresh(),
        KeyCode::Char('c') => app.reset_conversation(),

        KeyCode::Tab | KeyCode::Char('i') | KeyCode::Enter => app.focus_input(),
        _ => {}
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => app.focus = FocusPane::Messages,
        KeyCode::Enter => {
            app.submit_question();
        }
        KeyCode::Backspace => app.delete_char_before_cursor(),
        KeyCode::Delete => app.delete_char_at_cursor(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_home(),
        KeyCode::End => app.move_cursor_end(),
        KeyCode::PageDown => app.scroll_down(app.chat_height as usize / 2),
        KeyCode::PageUp => app.scroll_up(app.chat_height as usize / 2),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;
    let hit = |area: Option<Rect>| area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::ScrollDown if hit(app.areas.chat) => app.scroll_down(3),
        MouseEventKind::ScrollUp if hit(app.areas.chat) => app.scroll_up(3),
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(app.areas.theme_button) {
                app.toggle_theme();
            } else if hit(app.areas.reset_button) {
                app.reset_conversation();
            } else if hit(app.areas.refresh_button) {
                app.start_refresh();
            } else if hit(app.areas.send_button) {
                // Inert while locked, like the disabled button it draws as
                app.submit_question();
            } else if hit(app.areas.input) {
                app.focus_input();
            } else if hit(app.areas.chat) {
                app.focus = FocusPane::Messages;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use statchat_core::{StatsClient, Theme};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn offline_app() -> App {
        App::new(StatsClient::new("http://127.0.0.1:1"), None)
    }

    #[tokio::test]
    async fn typing_goes_into_the_input_box() {
        let mut app = offline_app();
        for c in "goals".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_event(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.input, "goal");
        assert_eq!(app.input_cursor, 4);
    }

    #[tokio::test]
    async fn enter_on_blank_input_does_nothing() {
        let mut app = offline_app();
        handle_event(&mut app, key(KeyCode::Char(' '))).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.transcript.len(), 1);
        assert!(!app.is_input_locked());
    }

    #[tokio::test]
    async fn enter_submits_and_locks() {
        let mut app = offline_app();
        for c in "assists".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.is_input_locked());
        assert_eq!(app.transcript.len(), 2);

        // Enter and typing are inert while locked, even after refocusing
        app.focus = FocusPane::Input;
        handle_event(&mut app, key(KeyCode::Char('x'))).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.input.is_empty());
        assert_eq!(app.transcript.len(), 2);
    }

    #[tokio::test]
    async fn keys_typed_while_waiting_are_inert() {
        let mut app = offline_app();
        for c in "goals".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        handle_event(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.is_input_locked());
        assert_eq!(app.focus, FocusPane::Input);

        // Letters that are commands in the message pane go to the locked field
        for c in ['q', 'c', 'r', 't'] {
            handle_event(&mut app, key(KeyCode::Char(c))).await.unwrap();
        }
        assert!(!app.should_quit);
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.theme, Theme::Light);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn control_keys_work_from_the_input_box() {
        let mut app = offline_app();
        handle_event(&mut app, ctrl('t')).await.unwrap();
        assert_eq!(app.theme, Theme::Dark);
        assert!(app.input.is_empty());

        handle_event(&mut app, ctrl('c')).await.unwrap();
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn tab_switches_panes() {
        let mut app = offline_app();
        assert_eq!(app.focus, FocusPane::Input);
        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Messages);
        handle_event(&mut app, key(KeyCode::Char('t'))).await.unwrap();
        assert_eq!(app.theme, Theme::Dark);
        handle_event(&mut app, key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.focus, FocusPane::Input);
    }

    #[tokio::test]
    async fn header_buttons_respond_to_clicks() {
        let mut app = offline_app();
        app.areas.theme_button = Some(Rect::new(10, 0, 3, 1));
        app.areas.reset_button = Some(Rect::new(14, 0, 3, 1));

        handle_event(&mut app, click(11, 0)).await.unwrap();
        assert_eq!(app.theme, Theme::Dark);

        app.transcript.push_user("one");
        app.transcript.push_user("two");
        handle_event(&mut app, click(14, 0)).await.unwrap();
        assert_eq!(app.transcript.len(), 1);

        handle_event(&mut app, click(40, 0)).await.unwrap();
        assert_eq!(app.theme, Theme::Dark);
    }
}
