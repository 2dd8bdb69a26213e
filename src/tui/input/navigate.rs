use crossterm::event::{KeyCode, KeyEvent};

use crate::model::session::SessionStatus;
use crate::service::worker::ServiceWorker;
use crate::tui::app::{App, View};

/// Keys on the landing view
pub fn handle_landing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char('t') => match app.session_status {
            SessionStatus::Authenticated => {
                app.view = View::Tasks;
                app.cursor = 0;
                app.scroll_offset = 0;
                // Entering the view always fetches fresh
                app.refresh_tasks();
            }
            SessionStatus::Unauthenticated => {
                app.notify_error("Not signed in — run `tm login <token>` first".to_string());
            }
            SessionStatus::Loading => {
                app.notify_info("Checking session…".to_string());
            }
        },
        _ => {}
    }
}

/// Keys on the tasks view
pub fn handle_tasks(app: &mut App, worker: &ServiceWorker, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.view = View::Landing,
        KeyCode::Char('j') | KeyCode::Down => move_cursor(app, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(app, -1),
        KeyCode::Char('g') => {
            app.cursor = 0;
        }
        KeyCode::Char('G') => {
            app.cursor = app.query.tasks().len().saturating_sub(1);
        }
        KeyCode::Char('n') => app.open_create(worker),
        KeyCode::Enter | KeyCode::Char('e') => app.open_edit(worker),
        KeyCode::Char('r') => app.refresh_tasks(),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: i64) {
    let len = app.query.tasks().len();
    if len == 0 {
        return;
    }
    let new = app.cursor as i64 + delta;
    app.cursor = new.clamp(0, len as i64 - 1) as usize;
}
