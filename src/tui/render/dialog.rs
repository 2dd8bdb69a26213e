use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::App;
use crate::tui::dialog::DialogState;
use crate::tui::form::FormField;
use crate::tui::theme::Theme;

use super::helpers::centered_rect;

const FIELDS: [FormField; 6] = [
    FormField::Project,
    FormField::Title,
    FormField::Description,
    FormField::Status,
    FormField::Priority,
    FormField::DueDate,
];

/// Render the task form dialog as a centered popup overlay
pub fn render_dialog(frame: &mut Frame, app: &App, area: Rect) {
    let Some(dialog) = &app.dialog else {
        return;
    };
    let theme = &app.theme;

    let popup_w = 56.min(area.width.saturating_sub(2));
    let popup_h = 16.min(area.height.saturating_sub(2));
    let popup = centered_rect(popup_w, popup_h, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight).bg(theme.background))
        .title(Span::styled(
            format!(" {} ", dialog.title()),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(popup);
    frame.render_widget(block.style(Style::default().bg(theme.background)), popup);

    let inner_w = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    let subtitle = if dialog.is_edit() {
        "Make changes to your task here"
    } else {
        "Add a new task to your project"
    };
    lines.push(Line::from(Span::styled(
        format!(" {subtitle}"),
        Style::default().fg(theme.dim).bg(theme.background),
    )));
    lines.push(Line::default());

    for field in FIELDS {
        lines.push(field_line(theme, dialog, field, inner_w));
    }

    lines.push(Line::default());
    lines.push(footer_line(theme, dialog));

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(theme.background)),
        inner,
    );
}

fn field_line(theme: &Theme, dialog: &DialogState, field: FormField, width: usize) -> Line<'static> {
    let focused = dialog.focus == field;
    let bg = Style::default().bg(theme.background);
    let label_style = if focused {
        bg.fg(theme.highlight).add_modifier(Modifier::BOLD)
    } else {
        bg.fg(theme.dim)
    };
    let value_style = if focused {
        bg.fg(theme.text_bright)
    } else {
        bg.fg(theme.text)
    };

    let mut spans = vec![Span::styled(
        format!(" {:<12}", field.label()),
        label_style,
    )];

    match field {
        FormField::Project => {
            let name = dialog
                .form
                .project_id
                .and_then(|id| dialog.projects.iter().find(|p| p.id == id))
                .map(|p| p.name.clone());
            let text = match name {
                Some(name) => name,
                None if !dialog.projects_loaded => "loading…".to_string(),
                None => "(no projects)".to_string(),
            };
            spans.push(selector_span(text, focused, value_style, theme));
        }
        FormField::Status => {
            spans.push(selector_span(
                dialog.form.status.label().to_string(),
                focused,
                value_style,
                theme,
            ));
        }
        FormField::Priority => {
            spans.push(selector_span(
                dialog.form.priority.label().to_string(),
                focused,
                value_style,
                theme,
            ));
        }
        _ => {
            let text = dialog.form.text(field).unwrap_or_default();
            if focused {
                // Split at the cursor and draw a block cursor between
                let (before, after) = text.split_at(dialog.cursor.min(text.len()));
                spans.push(Span::styled(before.to_string(), value_style));
                spans.push(Span::styled(
                    "\u{258C}",
                    bg.fg(theme.highlight),
                ));
                spans.push(Span::styled(after.to_string(), value_style));
            } else if text.is_empty() {
                spans.push(Span::styled(placeholder(field).to_string(), bg.fg(theme.dim)));
            } else {
                spans.push(Span::styled(text.to_string(), value_style));
            }
            // Flag an unparseable due date while it is being typed
            if field == FormField::DueDate && dialog.form.due_date().is_err() {
                spans.push(Span::styled(
                    "  (expected YYYY-MM-DD)".to_string(),
                    bg.fg(theme.red),
                ));
            }
        }
    }

    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), bg));
    }
    Line::from(spans)
}

fn selector_span(text: String, focused: bool, style: Style, theme: &Theme) -> Span<'static> {
    if focused {
        Span::styled(format!("‹ {text} ›"), style.fg(theme.cyan))
    } else {
        Span::styled(text, style)
    }
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Title => "Enter task title",
        FormField::Description => "Enter task description",
        FormField::DueDate => "YYYY-MM-DD (optional)",
        _ => "",
    }
}

fn footer_line(theme: &Theme, dialog: &DialogState) -> Line<'static> {
    let bg = Style::default().bg(theme.background);

    if dialog.submit_in_flight {
        return Line::from(Span::styled(" Saving…", bg.fg(theme.yellow)));
    }
    if dialog.delete_in_flight {
        return Line::from(Span::styled(" Deleting…", bg.fg(theme.yellow)));
    }

    let mut spans = Vec::new();
    if dialog.can_submit() {
        spans.push(Span::styled(" Enter save", bg.fg(theme.green)));
    } else {
        spans.push(Span::styled(" Enter save (title required)", bg.fg(theme.dim)));
    }
    spans.push(Span::styled("  Esc cancel", bg.fg(theme.dim)));
    if dialog.is_edit() {
        spans.push(Span::styled("  ^D delete", bg.fg(theme.red)));
    }
    spans.push(Span::styled("  Tab next field", bg.fg(theme.dim)));
    Line::from(spans)
}
