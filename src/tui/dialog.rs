use crate::model::{NewTask, Project, Task, TaskPatch};

use super::form::{FormField, TaskForm};

/// Dialog entry mode: Create starts blank, Edit is backed by a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(Task),
}

/// What a submit turns into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    Create(NewTask),
    Update(TaskPatch),
}

/// The task form dialog.
///
/// One instance exists per open; closing drops it, so Create-mode
/// defaults and Edit-mode re-derivation from the current task both fall
/// out of construction. The generation token stamps every request this
/// instance issues; responses carrying another generation belong to a
/// closed or reopened dialog and are discarded by the app.
#[derive(Debug)]
pub struct DialogState {
    pub mode: DialogMode,
    pub form: TaskForm,
    pub focus: FormField,
    /// Byte cursor within the focused text field
    pub cursor: usize,
    pub projects: Vec<Project>,
    pub projects_loaded: bool,
    pub submit_in_flight: bool,
    pub delete_in_flight: bool,
    pub generation: u64,
}

impl DialogState {
    pub fn create(generation: u64) -> Self {
        DialogState {
            mode: DialogMode::Create,
            form: TaskForm::defaults(),
            focus: FormField::Title,
            cursor: 0,
            projects: Vec::new(),
            projects_loaded: false,
            submit_in_flight: false,
            delete_in_flight: false,
            generation,
        }
    }

    pub fn edit(task: Task, generation: u64) -> Self {
        let form = TaskForm::from_task(&task);
        let cursor = form.title.len();
        DialogState {
            mode: DialogMode::Edit(task),
            form,
            focus: FormField::Title,
            cursor,
            projects: Vec::new(),
            projects_loaded: false,
            submit_in_flight: false,
            delete_in_flight: false,
            generation,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DialogMode::Edit(_))
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            DialogMode::Create => "Create Task",
            DialogMode::Edit(_) => "Edit Task",
        }
    }

    /// Project listing arrived. In Create mode with nothing selected,
    /// selection defaults to the first project in returned order.
    pub fn projects_loaded(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.projects_loaded = true;
        self.form.default_project(&self.projects);
    }

    /// Any mutation in flight (submit and delete are mutually disabled)
    pub fn busy(&self) -> bool {
        self.submit_in_flight || self.delete_in_flight
    }

    /// The submit control: enabled only with a valid form and nothing
    /// already in flight
    pub fn can_submit(&self) -> bool {
        self.form.can_submit() && !self.busy()
    }

    /// The delete control: Edit mode only
    pub fn can_delete(&self) -> bool {
        self.is_edit() && !self.busy()
    }

    /// Assemble the mutation for the current mode. `None` while the
    /// submit control is disabled.
    pub fn submit_action(&self) -> Option<SubmitAction> {
        if !self.can_submit() {
            return None;
        }
        let draft = self.form.draft()?;
        Some(match &self.mode {
            DialogMode::Create => SubmitAction::Create(draft),
            DialogMode::Edit(task) => SubmitAction::Update(TaskPatch::from_new(task.id, draft)),
        })
    }

    /// Id to delete, when the delete control is enabled
    pub fn delete_id(&self) -> Option<i64> {
        if !self.can_delete() {
            return None;
        }
        match &self.mode {
            DialogMode::Edit(task) => Some(task.id),
            DialogMode::Create => None,
        }
    }

    /// Move focus, snapping the text cursor to the end of the new field
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
        self.snap_cursor();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
        self.snap_cursor();
    }

    fn snap_cursor(&mut self) {
        self.cursor = self.form.text(self.focus).map_or(0, str::len);
    }
}
