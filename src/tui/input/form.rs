use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_segmentation::UnicodeSegmentation;

use crate::service::worker::ServiceWorker;
use crate::tui::app::App;

/// Keys while the task form dialog is open
pub fn handle_form(app: &mut App, worker: &ServiceWorker, key: KeyEvent) {
    // Dialog-level actions first
    match key.code {
        KeyCode::Esc => {
            app.close_dialog();
            return;
        }
        KeyCode::Enter => {
            app.submit_dialog(worker);
            return;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.delete_dialog(worker);
            return;
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(dialog) = &mut app.dialog {
                dialog.focus_next();
            }
            return;
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(dialog) = &mut app.dialog {
                dialog.focus_prev();
            }
            return;
        }
        _ => {}
    }

    let Some(dialog) = &mut app.dialog else {
        return;
    };
    let focus = dialog.focus;

    if !focus.is_text() {
        // Selector fields: Left cycles back, Right/Space cycle forward
        let projects = dialog.projects.clone();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => dialog.form.cycle(focus, false, &projects),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                dialog.form.cycle(focus, true, &projects)
            }
            _ => {}
        }
        return;
    }

    // Text fields: single-line grapheme-aware editing
    let cursor = dialog.cursor;
    let Some(text) = dialog.form.text_mut(focus) else {
        return;
    };
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            text.insert(cursor, c);
            dialog.cursor = cursor + c.len_utf8();
        }
        KeyCode::Backspace => {
            let prev = prev_boundary(text, cursor);
            if prev < cursor {
                text.replace_range(prev..cursor, "");
                dialog.cursor = prev;
            }
        }
        KeyCode::Delete => {
            let next = next_boundary(text, cursor);
            if next > cursor {
                text.replace_range(cursor..next, "");
            }
        }
        KeyCode::Left => dialog.cursor = prev_boundary(text, cursor),
        KeyCode::Right => dialog.cursor = next_boundary(text, cursor),
        KeyCode::Home => dialog.cursor = 0,
        KeyCode::End => dialog.cursor = text.len(),
        _ => {}
    }
}

/// Byte offset of the grapheme boundary before `cursor`
fn prev_boundary(s: &str, cursor: usize) -> usize {
    s[..cursor]
        .grapheme_indices(true)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the grapheme boundary after `cursor`
fn next_boundary(s: &str, cursor: usize) -> usize {
    s[cursor..]
        .graphemes(true)
        .next()
        .map(|g| cursor + g.len())
        .unwrap_or(s.len())
}
