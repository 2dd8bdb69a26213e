mod dialog;
mod helpers;
mod landing_view;
mod status_row;
mod tasks_view;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, View};

/// Render the whole UI: current view, status row, dialog overlay
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    match app.view {
        View::Landing => landing_view::render_landing(frame, app, chunks[0]),
        View::Tasks => tasks_view::render_tasks(frame, app, chunks[0]),
    }

    status_row::render_status_row(frame, app, chunks[1]);

    if app.dialog.is_some() {
        dialog::render_dialog(frame, app, area);
    }
}
