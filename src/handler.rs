use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, SCROLL_STEP};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            if app.input.is_focused() {
                app.input.insert_str(&text.replace("\r\n", "\n"));
            }
        }
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::ChatResponse { id, result } => {
            app.apply_response(id, result);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input.is_focused() {
        handle_editing(app, key);
    } else {
        handle_normal(app, key);
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('i') | KeyCode::Tab | KeyCode::Enter => {
            app.input.set_focused(true);
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_down();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_half_page_up();
        }
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.jump_to_latest(),
        _ => {}
    }
}

fn handle_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input.set_focused(false);
        }
        KeyCode::Enter => {
            app.submit_draft();
        }
        KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.jump_to_latest();
        }
        KeyCode::PageDown => app.scroll_half_page_down(),
        KeyCode::PageUp => app.scroll_half_page_up(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) => app.input.insert_char(c),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.scroll_up(SCROLL_STEP);
            }
        }
        MouseEventKind::ScrollDown => {
            if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.scroll_down(SCROLL_STEP);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if app.scroll.show_jump() && app.jump_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.jump_to_latest();
            } else if app.send_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.submit_draft();
            } else if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.input.set_focused(false);
            } else {
                app.input.set_focused(true);
            }
        }
        _ => {}
    }
}
