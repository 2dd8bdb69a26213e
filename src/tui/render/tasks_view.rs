use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::model::Task;
use crate::tui::app::App;

/// Render the tasks view: header plus the task list
pub fn render_tasks(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();
    let bg = Style::default().bg(theme.background);

    let mut lines: Vec<Line> = Vec::new();

    let count = app.query.tasks().len();
    lines.push(Line::from(vec![
        Span::styled(
            " Tasks",
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {count} "),
            Style::default().fg(theme.dim),
        ),
    ]));
    lines.push(Line::default());

    if app.query.is_initial_loading() {
        lines.push(Line::from(Span::styled(
            " Loading…",
            Style::default().fg(theme.dim),
        )));
        frame.render_widget(Paragraph::new(lines).style(bg), area);
        return;
    }

    if count == 0 {
        lines.push(Line::from(Span::styled(
            " No tasks yet — press n to create one",
            Style::default().fg(theme.dim),
        )));
        frame.render_widget(Paragraph::new(lines).style(bg), area);
        return;
    }

    // Keep the cursor inside the viewport
    let header_rows = lines.len();
    let visible = (area.height as usize).saturating_sub(header_rows).max(1);
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible {
        app.scroll_offset = app.cursor + 1 - visible;
    }

    let width = area.width as usize;
    let tasks: Vec<Task> = app.query.tasks().to_vec();
    for (i, task) in tasks
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible)
    {
        lines.push(task_row(&app.theme, task, i == app.cursor, width));
    }

    frame.render_widget(Paragraph::new(lines).style(bg), area);
}

fn task_row(theme: &crate::tui::theme::Theme, task: &Task, selected: bool, width: usize) -> Line<'static> {
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let base = Style::default().bg(row_bg);

    let mut spans = vec![
        Span::styled(
            format!(" [{}] ", task.status.checkbox_char()),
            base.fg(theme.status_color(task.status)),
        ),
        Span::styled(
            format!("{:<6} ", task.priority.label().to_lowercase()),
            base.fg(theme.priority_color(task.priority)),
        ),
        Span::styled(
            task.title.clone(),
            if selected {
                base.fg(theme.text_bright)
            } else {
                base.fg(theme.text)
            },
        ),
    ];

    let due = task
        .due_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let right = due.width() + 1;
    if used + right < width {
        spans.push(Span::styled(" ".repeat(width - used - right), base));
        spans.push(Span::styled(due, base.fg(theme.dim)));
        spans.push(Span::styled(" ", base));
    }

    Line::from(spans)
}
