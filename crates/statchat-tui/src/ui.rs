use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use statchat_core::{ChatRole, Theme};
use crate::app::{App, FocusPane};
use crate::layout::{ChatRow, TYPING_CURSOR};

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    background: Color,
    text: Color,
    muted: Color,
    accent: Color,
    user: Color,
    bot: Color,
    border: Color,
    border_focused: Color,
    button: Style,
    key: Style,
    label: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: Color::White,
            text: Color::Black,
            muted: Color::Gray,
            accent: Color::Blue,
            user: Color::Blue,
            bot: Color::Magenta,
            border: Color::Gray,
            border_focused: Color::Blue,
            button: Style::default().bg(Color::Blue).fg(Color::White),
            key: Style::default().bg(Color::Gray).fg(Color::Black),
            label: Style::default().bg(Color::White).fg(Color::Black),
        },
        Theme::Dark => Palette {
            background: Color::Black,
            text: Color::White,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            user: Color::Cyan,
            bot: Color::Yellow,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            button: Style::default().bg(Color::DarkGray).fg(Color::White),
            key: Style::default().bg(Color::DarkGray).fg(Color::White),
            label: Style::default().bg(Color::Black).fg(Color::White),
        },
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let pal = palette(app.theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(pal.background).fg(pal.text)),
        area,
    );

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area, pal);
    render_chat(app, frame, chat_area, pal);
    render_input(app, frame, input_area, pal);
    render_footer(app, frame, footer_area, pal);
}

fn render_header(app: &mut App, frame: &mut Frame, area: Rect, pal: Palette) {
    let theme_label = format!(" {} ", app.theme.icon());
    let reset_label = " ⟲ chat ";
    let refresh_label = " ⟳ data ";

    let [title_area, theme_area, _, reset_area, _, refresh_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(theme_label.chars().count() as u16),
        Constraint::Length(1),
        Constraint::Length(reset_label.chars().count() as u16),
        Constraint::Length(1),
        Constraint::Length(refresh_label.chars().count() as u16),
    ])
    .areas(area);

    app.areas.theme_button = Some(theme_area);
    app.areas.reset_button = Some(reset_area);
    app.areas.refresh_button = Some(refresh_area);

    let title = Line::from(vec![
        Span::styled(" Messi vs Ronaldo ", Style::default().fg(pal.accent).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(pal.muted),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), title_area);
    frame.render_widget(Paragraph::new(theme_label).style(pal.button), theme_area);
    frame.render_widget(Paragraph::new(reset_label).style(pal.button), reset_area);
    frame.render_widget(Paragraph::new(refresh_label).style(pal.button), refresh_area);
}

fn styled_row(row: ChatRow, pal: Palette) -> Line<'static> {
    let role_line = |label: &'static str, color: Color| {
        Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    };

    match row {
        ChatRow::Role(ChatRole::User) => role_line("You", pal.user),
        ChatRow::Role(ChatRole::Bot) => role_line("Bot", pal.bot),
        ChatRow::Text { text, cursor } => {
            let mut spans = vec![Span::raw(text)];
            if cursor {
                spans.push(Span::styled(TYPING_CURSOR, Style::default().fg(pal.muted)));
            }
            Line::from(spans)
        }
        ChatRow::TimeLabel(label) => Line::from(Span::styled(label, Style::default().fg(pal.muted))),
        // Animated ellipsis: cycles through ".", "..", "..."
        ChatRow::Thinking { dots } => Line::from(Span::styled(
            format!("Thinking{}", ".".repeat(dots)),
            Style::default().fg(pal.muted).add_modifier(Modifier::ITALIC),
        )),
        ChatRow::Blank => Line::default(),
    }
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect, pal: Palette) {
    app.areas.chat = Some(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    // Rows are already wrapped to the inner width, so only the visible slice is drawn
    let rows = app.chat_rows();
    app.fit_scroll(rows.len());
    let lines: Vec<Line> = rows
        .into_iter()
        .skip(app.chat_scroll)
        .take(app.chat_height as usize)
        .map(|row| styled_row(row, pal))
        .collect();

    let border_color = if app.focus == FocusPane::Messages {
        pal.border_focused
    } else {
        pal.border
    };

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" Chat: {} ", app.server_url()));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(chat_block), area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect, pal: Palette) {
    let [field_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(8),
    ])
    .areas(area);

    app.areas.input = Some(field_area);
    app.areas.send_button = Some(send_area);

    let locked = app.is_input_locked();
    let focused = app.focus == FocusPane::Input && !locked;
    let border_color = if focused { pal.border_focused } else { pal.border };
    let title = if locked {
        " Waiting for an answer... "
    } else {
        " Ask a question "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = field_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_style = if locked {
        Style::default().fg(pal.muted)
    } else {
        Style::default().fg(pal.user)
    };
    frame.render_widget(
        Paragraph::new(visible_text).style(text_style).block(input_block),
        field_area,
    );

    let send_style = if locked {
        Style::default().fg(pal.muted)
    } else {
        pal.button
    };
    let send = Paragraph::new("Send")
        .alignment(Alignment::Center)
        .style(send_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.border)),
        );
    frame.render_widget(send, send_area);

    // Show cursor only while the field can take input
    if focused {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((field_area.x + cursor_x + 1, field_area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect, pal: Palette) {
    let (mode_text, mut hints) = match app.focus {
        FocusPane::Input => (
            " ASK ",
            vec![
                Span::styled(" Enter ", pal.key),
                Span::styled(" send ", pal.label),
                Span::styled(" Tab ", pal.key),
                Span::styled(" messages ", pal.label),
            ],
        ),
        FocusPane::Messages => (
            " CHAT ",
            vec![
                Span::styled(" j/k ", pal.key),
                Span::styled(" scroll ", pal.label),
                Span::styled(" Tab ", pal.key),
                Span::styled(" ask ", pal.label),
                Span::styled(" q ", pal.key),
                Span::styled(" quit ", pal.label),
            ],
        ),
    };

    hints.extend(vec![
        Span::styled(" ^T ", pal.key),
        Span::styled(
            format!(" {} theme ", app.theme.toggled().display_name().to_lowercase()),
            pal.label,
        ),
        Span::styled(" ^L ", pal.key),
        Span::styled(" clear chat ", pal.label),
        Span::styled(" ^R ", pal.key),
        Span::styled(" refresh data ", pal.label),
    ]);

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, pal.button),
            Span::styled(" ", pal.label),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(footer_content).style(pal.label), area);
}
