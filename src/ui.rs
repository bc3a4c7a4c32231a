use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
    },
};
use unicode_width::UnicodeWidthChar;
use crate::app::App;
use crate::state::Sender;

const EMPTY_STATE_TEXT: &str = "Ask me anything regarding your personal life";
const JUMP_LABEL: &str = " ↓ Jump to latest (End) ";
const SEND_LABEL: &str = " Send ";

fn cell_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Hard-wrap `text` to `width` terminal cells, one entry per visual row.
///
/// Wide characters count as two cells. Embedded newlines start a new row;
/// empty lines still take one row.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;

        for c in line.chars() {
            let w = cell_width(c);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(c);
            row_width += w;
        }
        rows.push(row);
    }

    rows
}

/// Slice of the draft that fits in `width` cells with the cursor visible,
/// plus the cursor's column inside that slice.
fn input_viewport(draft: &str, cursor: usize, width: usize) -> (String, usize) {
    // One display char per draft char so the cursor index maps directly
    let chars: Vec<char> = draft
        .chars()
        .map(|c| if c == '\n' { '⏎' } else { c })
        .collect();
    if width == 0 {
        return (String::new(), 0);
    }

    let cursor = cursor.min(chars.len());
    let cursor_cell = chars.get(cursor).map_or(1, |&c| cell_width(c).max(1));

    // Walk back from the cursor until the cursor cell no longer fits
    let mut start = cursor;
    let mut used = cursor_cell;
    while start > 0 {
        let w = cell_width(chars[start - 1]);
        if used + w > width {
            break;
        }
        used += w;
        start -= 1;
    }

    let cursor_x = chars[start..cursor].iter().map(|&c| cell_width(c)).sum();

    let mut visible = String::new();
    let mut visible_width = 0;
    for &c in &chars[start..] {
        let w = cell_width(c);
        if visible_width + w > width {
            break;
        }
        visible.push(c);
        visible_width += w;
    }

    (visible, cursor_x)
}

/// Build the transcript as already-wrapped rows so the row count used for
/// scrolling matches exactly what is drawn.
fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();

    for turn in app.conversation.turns() {
        let (label, label_style, text_style, alignment) = match turn.sender() {
            Sender::User => (
                "You",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
                Alignment::Right,
            ),
            Sender::Bot => (
                "Bot",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default(),
                Alignment::Left,
            ),
        };

        lines.push(Line::from(Span::styled(label, label_style)).alignment(alignment));
        for row in wrap_text(turn.text(), width) {
            lines.push(Line::from(Span::styled(row, text_style)).alignment(alignment));
        }
        lines.push(Line::default());
    }

    if app.is_pending() {
        lines.push(Line::from(Span::styled(
            "Bot",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, chat, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Personal AI Chatbot ", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    app.chat_area = Some(area);
    app.jump_area = None;

    let border_color = if app.input.is_focused() { Color::DarkGray } else { Color::Cyan };
    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", app.client.endpoint()));

    let inner = chat_block.inner(area);
    app.chat_height = inner.height;

    if app.conversation.is_empty() && !app.is_pending() {
        let placeholder = Paragraph::new(Text::from(vec![
            Line::default(),
            Line::from(Span::styled(EMPTY_STATE_TEXT, Style::default().fg(Color::DarkGray))),
        ]))
        .alignment(Alignment::Center)
        .block(chat_block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Leave a column for the scrollbar
    let text_width = inner.width.saturating_sub(1) as usize;
    let lines = transcript_lines(app, text_width);
    let total = lines.len() as u32;

    app.scroll.on_content_changed(total, u32::from(inner.height));
    let offset = app.scroll.effective_offset();

    let text_area = Rect {
        width: text_width as u16,
        ..inner
    };
    let chat = Paragraph::new(Text::from(lines))
        .scroll((offset.min(u32::from(u16::MAX)) as u16, 0));
    frame.render_widget(chat_block, area);
    frame.render_widget(chat, text_area);

    if total > u32::from(inner.height) {
        let mut scrollbar_state = ScrollbarState::new(app.scroll.max_offset() as usize)
            .position(offset as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            inner,
            &mut scrollbar_state,
        );
    }

    if app.scroll.show_jump() && inner.height > 0 {
        let width = (JUMP_LABEL.chars().map(cell_width).sum::<usize>() as u16).min(inner.width);
        let jump_area = Rect {
            x: inner.x + inner.width.saturating_sub(width + 1),
            y: inner.y + inner.height - 1,
            width,
            height: 1,
        };
        let jump = Paragraph::new(JUMP_LABEL)
            .style(Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD));
        frame.render_widget(Clear, jump_area);
        frame.render_widget(jump, jump_area);
        app.jump_area = Some(jump_area);
    }
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let send_width = SEND_LABEL.chars().count() as u16 + 2;
    let [text_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(send_width),
    ])
    .areas(area);
    app.send_area = Some(send_area);

    let focused = app.input.is_focused();
    let input_border_color = if focused { Color::Yellow } else { Color::DarkGray };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(input_border_color))
        .title(" Ask anything... ");

    // Inner width = total width - 2 (for borders)
    let inner_width = text_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_x) = input_viewport(app.input.draft(), app.input.cursor(), inner_width);

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, text_area);

    let send_enabled = app.input.can_submit(app.is_pending());
    let send_style = if send_enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let send = Paragraph::new(Span::styled(SEND_LABEL, send_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(send, send_area);

    // Show cursor when editing
    if focused {
        frame.set_cursor_position((text_area.x + cursor_x as u16 + 1, text_area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode, mode_style, hints) = if app.input.is_focused() {
        (
            " INSERT ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
            " Enter send  Esc scroll mode  PgUp/PgDn scroll  Ctrl+End latest  Ctrl+C quit ",
        )
    } else {
        (
            " SCROLL ",
            Style::default().bg(Color::Blue).fg(Color::White),
            " j/k scroll  g/G top/latest  i type  q quit ",
        )
    };

    let footer = Line::from(vec![
        Span::styled(mode, mode_style),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
