use chrono::NaiveDate;

use crate::model::{NewTask, Priority, Project, Task, TaskStatus};

/// Form fields in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Project,
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl FormField {
    pub fn next(self) -> FormField {
        match self {
            FormField::Project => FormField::Title,
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Status,
            FormField::Status => FormField::Priority,
            FormField::Priority => FormField::DueDate,
            FormField::DueDate => FormField::Project,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Project => FormField::DueDate,
            FormField::Title => FormField::Project,
            FormField::Description => FormField::Title,
            FormField::Status => FormField::Description,
            FormField::Priority => FormField::Status,
            FormField::DueDate => FormField::Priority,
        }
    }

    /// Free-text fields (the rest are selectors)
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::Description | FormField::DueDate
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Project => "Project",
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Status => "Status",
            FormField::Priority => "Priority",
            FormField::DueDate => "Due date",
        }
    }
}

/// Transient edit state for a single task (or the blank "new task"
/// state). The due date is held as raw text until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date_input: String,
    pub project_id: Option<i64>,
}

impl Default for TaskForm {
    fn default() -> Self {
        TaskForm::defaults()
    }
}

impl TaskForm {
    /// The fixed Create-mode defaults
    pub fn defaults() -> Self {
        TaskForm {
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            due_date_input: String::new(),
            project_id: None,
        }
    }

    /// Edit-mode prefill. The due date renders as a plain calendar date
    /// regardless of any time component the service stored.
    pub fn from_task(task: &Task) -> Self {
        TaskForm {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date_input: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            project_id: Some(task.project_id),
        }
    }

    /// Default the project selector to the first listed project when
    /// nothing is selected yet (Create mode on open).
    pub fn default_project(&mut self, projects: &[Project]) {
        if self.project_id.is_none()
            && let Some(first) = projects.first()
        {
            self.project_id = Some(first.id);
        }
    }

    /// Parsed due date: `Ok(None)` for blank, `Err` for unparseable text
    pub fn due_date(&self) -> Result<Option<NaiveDate>, DueDateError> {
        let raw = self.due_date_input.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DueDateError)
    }

    /// Submission is allowed only with a non-blank title, a selected
    /// project, and a blank or well-formed due date.
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && self.project_id.is_some() && self.due_date().is_ok()
    }

    /// Assemble the record to submit. `None` while `can_submit` is false.
    pub fn draft(&self) -> Option<NewTask> {
        if !self.can_submit() {
            return None;
        }
        Some(NewTask {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            due_date: self.due_date().ok()?,
            project_id: self.project_id?,
        })
    }

    /// Cycle the selector under `field` forward (`delta > 0`) or back
    pub fn cycle(&mut self, field: FormField, forward: bool, projects: &[Project]) {
        match field {
            FormField::Status => {
                self.status = if forward {
                    self.status.next()
                } else {
                    self.status.prev()
                };
            }
            FormField::Priority => {
                self.priority = if forward {
                    self.priority.next()
                } else {
                    self.priority.prev()
                };
            }
            FormField::Project => {
                if projects.is_empty() {
                    return;
                }
                let current = self
                    .project_id
                    .and_then(|id| projects.iter().position(|p| p.id == id))
                    .unwrap_or(0);
                let next = if forward {
                    (current + 1) % projects.len()
                } else {
                    (current + projects.len() - 1) % projects.len()
                };
                self.project_id = Some(projects[next].id);
            }
            _ => {}
        }
    }

    /// Mutable access to the text behind a free-text field
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date_input),
            _ => None,
        }
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::DueDate => Some(&self.due_date_input),
            _ => None,
        }
    }
}

/// The due date text does not parse as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateError;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn projects() -> Vec<Project> {
        vec![
            Project {
                id: 1,
                name: "Alpha".into(),
            },
            Project {
                id: 2,
                name: "Beta".into(),
            },
        ]
    }

    fn sample_task() -> Task {
        Task {
            id: 7,
            title: "Ship the release".into(),
            description: "cut, tag, announce".into(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 1),
            project_id: 2,
        }
    }

    #[test]
    fn test_defaults() {
        let form = TaskForm::defaults();
        assert_eq!(form.title, "");
        assert_eq!(form.description, "");
        assert_eq!(form.status, TaskStatus::Pending);
        assert_eq!(form.priority, Priority::Medium);
        assert_eq!(form.due_date_input, "");
        assert_eq!(form.project_id, None);
    }

    #[test]
    fn test_edit_prefill_matches_task() {
        let form = TaskForm::from_task(&sample_task());
        assert_eq!(form.title, "Ship the release");
        assert_eq!(form.description, "cut, tag, announce");
        assert_eq!(form.status, TaskStatus::InProgress);
        assert_eq!(form.priority, Priority::High);
        assert_eq!(form.due_date_input, "2026-10-01");
        assert_eq!(form.project_id, Some(2));
    }

    #[test]
    fn test_blank_title_blocks_submit() {
        let mut form = TaskForm::defaults();
        form.project_id = Some(1);
        assert!(!form.can_submit());
        assert_eq!(form.draft(), None);

        form.title = "   ".into();
        assert!(!form.can_submit());

        form.title = "real title".into();
        assert!(form.can_submit());
    }

    #[test]
    fn test_missing_project_blocks_submit() {
        let mut form = TaskForm::defaults();
        form.title = "t".into();
        assert!(!form.can_submit());
    }

    #[test]
    fn test_default_project_picks_first() {
        let mut form = TaskForm::defaults();
        form.default_project(&projects());
        assert_eq!(form.project_id, Some(1));
    }

    #[test]
    fn test_default_project_keeps_existing_selection() {
        let mut form = TaskForm::from_task(&sample_task());
        form.default_project(&projects());
        assert_eq!(form.project_id, Some(2));
    }

    #[test]
    fn test_due_date_validation() {
        let mut form = TaskForm::defaults();
        assert_eq!(form.due_date(), Ok(None));

        form.due_date_input = "2026-02-30".into();
        assert_eq!(form.due_date(), Err(DueDateError));

        form.due_date_input = "someday".into();
        assert_eq!(form.due_date(), Err(DueDateError));

        form.due_date_input = " 2026-03-01 ".into();
        assert_eq!(form.due_date(), Ok(NaiveDate::from_ymd_opt(2026, 3, 1)));
    }

    #[test]
    fn test_draft_assembles_record() {
        let mut form = TaskForm::defaults();
        form.title = "  padded  ".into();
        form.description = "body".into();
        form.due_date_input = "2026-03-01".into();
        form.project_id = Some(2);

        let draft = form.draft().unwrap();
        assert_eq!(draft.title, "padded");
        assert_eq!(draft.description, "body");
        assert_eq!(draft.status, TaskStatus::Pending);
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2026, 3, 1));
        assert_eq!(draft.project_id, 2);
    }

    #[test]
    fn test_cycle_selectors() {
        let mut form = TaskForm::defaults();
        form.cycle(FormField::Status, true, &[]);
        assert_eq!(form.status, TaskStatus::InProgress);
        form.cycle(FormField::Status, false, &[]);
        assert_eq!(form.status, TaskStatus::Pending);

        form.cycle(FormField::Priority, true, &[]);
        assert_eq!(form.priority, Priority::High);

        let projects = projects();
        form.cycle(FormField::Project, true, &projects);
        assert_eq!(form.project_id, Some(2));
        form.cycle(FormField::Project, true, &projects);
        assert_eq!(form.project_id, Some(1));
        form.cycle(FormField::Project, false, &projects);
        assert_eq!(form.project_id, Some(2));
    }

    #[test]
    fn test_cycle_project_with_no_projects_is_noop() {
        let mut form = TaskForm::defaults();
        form.cycle(FormField::Project, true, &[]);
        assert_eq!(form.project_id, None);
    }

    #[test]
    fn test_focus_order_round_trips() {
        let mut field = FormField::Project;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, FormField::Project);
        for _ in 0..6 {
            field = field.prev();
        }
        assert_eq!(field, FormField::Project);
    }
}
