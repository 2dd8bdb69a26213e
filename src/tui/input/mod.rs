mod form;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent};

use crate::service::worker::ServiceWorker;

use super::app::{App, View};

/// Handle a key event. The dialog, when open, captures all input.
pub fn handle_key(app: &mut App, worker: &ServiceWorker, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if app.dialog.is_some() {
        form::handle_form(app, worker, key);
        return;
    }

    match app.view {
        View::Landing => navigate::handle_landing(app, key),
        View::Tasks => navigate::handle_tasks(app, worker, key),
    }
}
