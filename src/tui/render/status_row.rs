use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, NoticeKind, View};

/// Render the status row (bottom of screen): the active notice, or the
/// key hints for the current view
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let width = area.width as usize;

    let line = if let Some(notice) = &app.notice {
        let fg = match notice.kind {
            NoticeKind::Info => theme.green,
            NoticeKind::Error => theme.red,
        };
        Line::from(Span::styled(
            format!(" {}", notice.text),
            Style::default().fg(fg).bg(bg),
        ))
    } else if app.show_key_hints {
        let hint = match app.view {
            _ if app.dialog.is_some() => "Tab field  Enter save  Esc cancel",
            View::Landing => "Enter open tasks  q quit",
            View::Tasks => "j/k move  Enter edit  n new  r refresh  q quit",
        };
        Line::from(Span::styled(
            format!(" {hint}"),
            Style::default().fg(theme.dim).bg(bg),
        ))
    } else {
        Line::from(Span::styled(
            " ".repeat(width),
            Style::default().bg(bg),
        ))
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
