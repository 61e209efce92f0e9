use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::App;
use crate::tui::AppEvent;

/// Lines moved per mouse wheel notch
const WHEEL_STEP: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Answer(outcome) => app.finish_submit(outcome),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('l') if ctrl => app.clear_conversation(),

        // Alt+1..3 picks a suggestion
        KeyCode::Char(c @ '1'..='9') if alt => {
            let idx = c as usize - '1' as usize;
            app.pick_suggestion(idx);
        }

        KeyCode::Enter => app.submit_draft(),

        KeyCode::PageUp => app.scroll_up(app.chat_height.max(1) / 2),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(1) / 2),

        KeyCode::Backspace => app.delete_before_cursor(),
        KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !ctrl && !alt => app.insert_char(c),
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

    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(x, y, r));

    match mouse.kind {
        MouseEventKind::ScrollDown if in_chat => app.scroll_down(WHEEL_STEP),
        MouseEventKind::ScrollUp if in_chat => app.scroll_up(WHEEL_STEP),
        MouseEventKind::Down(MouseButton::Left) => {
            if app.send_area.is_some_and(|r| point_in_rect(x, y, r)) {
                app.submit_draft();
            } else if let Some(idx) = app
                .suggestion_areas
                .iter()
                .position(|r| point_in_rect(x, y, *r))
            {
                app.pick_suggestion(idx);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AnswerClient;
    use crate::error::ChatError;
    use crate::state::{ChatMessage, APOLOGY, SUGGESTIONS};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::with_client(AnswerClient::new("http://127.0.0.1:9/chat/"), tx)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent {
            code,
            modifiers,
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

    #[test]
    fn typing_edits_the_draft() {
        let mut app = test_app();
        for c in "tour".chars() {
            handle_event(&mut app, key(KeyCode::Char(c), KeyModifiers::NONE));
        }
        handle_event(&mut app, key(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(app.draft_input, "tou");
        assert_eq!(app.cursor, 3);
    }

    #[test]
    fn enter_on_blank_draft_does_nothing() {
        let mut app = test_app();
        app.draft_input = "   ".into();
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.messages.len(), 1);
        assert!(!app.is_loading);
        assert_eq!(app.draft_input, "   ");
    }

    #[test]
    fn alt_digit_picks_suggestion() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Char('3'), KeyModifiers::ALT));
        assert_eq!(app.draft_input, SUGGESTIONS[2]);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn clicking_a_chip_fills_the_draft() {
        let mut app = test_app();
        app.suggestion_areas = vec![Rect::new(0, 10, 8, 1), Rect::new(9, 10, 8, 1)];
        handle_event(&mut app, click(12, 10));
        assert_eq!(app.draft_input, SUGGESTIONS[1]);
    }

    #[test]
    fn answer_event_finishes_request() {
        let mut app = test_app();
        app.is_loading = true;
        handle_event(
            &mut app,
            AppEvent::Answer(Err(ChatError::Transport("connection refused".into()))),
        );
        assert!(!app.is_loading);
        assert_eq!(app.last_error.as_deref(), Some("connection refused"));
        assert_eq!(app.messages.last().unwrap(), &ChatMessage::assistant(APOLOGY));
    }

    #[test]
    fn tick_only_animates_while_loading() {
        let mut app = test_app();
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);
        app.is_loading = true;
        handle_event(&mut app, AppEvent::Tick);
        handle_event(&mut app, AppEvent::Tick);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 0);
        handle_event(&mut app, AppEvent::Tick);
        assert_eq!(app.animation_frame, 1);
    }

    #[test]
    fn resize_repins_the_tail() {
        let mut app = test_app();
        app.chat_height = 5;
        app.thread_rows = 20;
        app.scroll = 3;

        handle_event(&mut app, AppEvent::Resize);
        assert_eq!(app.scroll, 15);

        app.follow_tail = false;
        app.scroll = 3;
        handle_event(&mut app, AppEvent::Resize);
        assert_eq!(app.scroll, 3);
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.draft_input.is_empty());

        let mut app = test_app();
        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }
}
