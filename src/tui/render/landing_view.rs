use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::session::SessionStatus;
use crate::tui::app::App;

/// Render the landing / sign-in view
pub fn render_landing(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);

    let mut lines: Vec<Line> = Vec::new();
    let pad = area.height.saturating_sub(12) / 2;
    for _ in 0..pad {
        lines.push(Line::default());
    }

    lines.push(
        Line::from(Span::styled(
            "TaskMaster",
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    lines.push(
        Line::from(Span::styled(
            "Manage your tasks efficiently",
            Style::default().fg(theme.text),
        ))
        .centered(),
    );
    lines.push(Line::default());

    for feature in [
        "[x] Tasks grouped into projects",
        "[x] Status, priority, and due dates",
        "[x] Fast keyboard-driven workflow",
    ] {
        lines.push(Line::from(Span::styled(feature, Style::default().fg(theme.dim))).centered());
    }
    lines.push(Line::default());

    let cta = match app.session_status {
        SessionStatus::Loading => {
            Span::styled("Checking session…", Style::default().fg(theme.dim))
        }
        SessionStatus::Authenticated => Span::styled(
            "Press Enter to open your tasks",
            Style::default().fg(theme.green),
        ),
        SessionStatus::Unauthenticated => Span::styled(
            "Not signed in — run `tm login <token>`, then restart",
            Style::default().fg(theme.yellow),
        ),
    };
    lines.push(Line::from(cta).centered());

    if app.session_status == SessionStatus::Authenticated
        && let Some(session) = &app.session
    {
        lines.push(Line::default());
        lines.push(
            Line::from(Span::styled(
                format!("signed in as {}", session.display_name()),
                Style::default().fg(theme.dim),
            ))
            .centered(),
        );
    }

    frame.render_widget(Paragraph::new(lines).style(bg), area);
}
