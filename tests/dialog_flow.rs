//! End-to-end tests for the task form dialog flow: an `App` driven by
//! key events, a real `ServiceWorker` thread, and an in-memory backend
//! substituted for the remote service.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use taskmaster::model::session::SessionStatus;
use taskmaster::model::{Priority, Project, Task, TaskStatus};
use taskmaster::service::memory::Op;
use taskmaster::service::worker::ServiceWorker;
use taskmaster::service::{InMemoryTaskService, ServiceError, SessionProvider, TaskService};
use taskmaster::tui::app::{App, NoticeKind, View};
use taskmaster::tui::input::handle_key;
use taskmaster::tui::theme::Theme;

// ---------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------

struct Harness {
    app: App,
    worker: ServiceWorker,
    service: Arc<InMemoryTaskService>,
}

fn harness(service: InMemoryTaskService) -> Harness {
    let service = Arc::new(service);
    let worker = ServiceWorker::spawn(Box::new(Arc::clone(&service)));
    Harness {
        app: App::new(Theme::default(), true),
        worker,
        service,
    }
}

fn alpha_beta() -> Vec<Project> {
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

fn seeded_task(id: i64) -> Task {
    Task {
        id,
        title: format!("Task {id}"),
        description: "details".into(),
        status: TaskStatus::InProgress,
        priority: Priority::High,
        due_date: chrono::NaiveDate::from_ymd_opt(2026, 10, 1),
        project_id: 2,
    }
}

impl Harness {
    fn key(&mut self, code: KeyCode) {
        handle_key(
            &mut self.app,
            &self.worker,
            KeyEvent::new(code, KeyModifiers::NONE),
        );
    }

    fn ctrl(&mut self, c: char) {
        handle_key(
            &mut self.app,
            &self.worker,
            KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL),
        );
    }

    fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            self.key(KeyCode::Char(c));
        }
    }

    /// Tick until `pred` holds (worker responses are processed by ticks)
    fn wait(&mut self, what: &str, pred: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            self.app.tick(&self.worker);
            if pred(&self.app) {
                return;
            }
            if Instant::now() > deadline {
                panic!("timed out waiting for: {what}");
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    /// Tick for a little while without expecting any state change
    fn settle(&mut self) {
        for _ in 0..20 {
            self.app.tick(&self.worker);
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    /// Sign-in, enter the tasks view, wait for the first snapshot
    fn enter_tasks(&mut self) {
        self.wait("session check", |app| {
            app.session_status == SessionStatus::Authenticated
        });
        self.key(KeyCode::Enter);
        assert_eq!(self.app.view, View::Tasks);
        self.wait("task fetch", |app| !app.query.needs_fetch() && !app.query.is_initial_loading());
    }

    /// Open the Create dialog and wait for the project listing
    fn open_create(&mut self) {
        self.key(KeyCode::Char('n'));
        assert!(self.app.dialog.is_some());
        self.wait("project listing", |app| {
            app.dialog.as_ref().is_some_and(|d| d.projects_loaded)
        });
    }
}

// ---------------------------------------------------------------------
// Create flow
// ---------------------------------------------------------------------

#[test]
fn create_defaults_project_to_first_listed() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    h.open_create();

    let dialog = h.app.dialog.as_ref().unwrap();
    assert!(!dialog.is_edit());
    assert_eq!(dialog.form.project_id, Some(1));
    assert_eq!(dialog.form.status, TaskStatus::Pending);
    assert_eq!(dialog.form.priority, Priority::Medium);
    assert_eq!(dialog.form.title, "");
}

#[test]
fn create_submits_closes_and_refetches() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    h.open_create();
    h.type_str("Buy milk");
    h.key(KeyCode::Enter);

    h.wait("dialog close", |app| app.dialog.is_none());
    h.wait("refetch", |app| app.query.tasks().len() == 1);

    assert_eq!(h.service.counts().create, 1);
    // One initial fetch plus exactly one forced refetch
    h.settle();
    assert_eq!(h.service.counts().list_tasks, 2);
    assert_eq!(h.app.query.tasks()[0].title, "Buy milk");
    assert_eq!(h.app.query.tasks()[0].project_id, 1);
    let notice = h.app.notice.as_ref().expect("success notice");
    assert_eq!(notice.kind, NoticeKind::Info);

    // Next open starts from the fixed defaults again
    h.open_create();
    let dialog = h.app.dialog.as_ref().unwrap();
    assert_eq!(dialog.form.title, "");
    assert_eq!(dialog.form.status, TaskStatus::Pending);
    assert_eq!(dialog.form.priority, Priority::Medium);
    assert_eq!(dialog.form.due_date_input, "");
}

#[test]
fn blank_title_never_submits() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    h.open_create();

    h.key(KeyCode::Enter);
    h.settle();

    assert!(h.app.dialog.is_some(), "dialog must stay open");
    assert_eq!(h.service.counts().create, 0);

    // Whitespace is still blank
    h.type_str("   ");
    h.key(KeyCode::Enter);
    h.settle();
    assert_eq!(h.service.counts().create, 0);
}

#[test]
fn closing_create_without_submit_restores_defaults() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    h.open_create();
    h.type_str("half-typed");
    h.key(KeyCode::Tab);
    h.type_str("some description");

    h.key(KeyCode::Esc);
    assert!(h.app.dialog.is_none());

    h.open_create();
    let dialog = h.app.dialog.as_ref().unwrap();
    assert_eq!(dialog.form.title, "");
    assert_eq!(dialog.form.description, "");
}

// ---------------------------------------------------------------------
// Edit flow
// ---------------------------------------------------------------------

#[test]
fn edit_prefills_fields_from_task() {
    let service = InMemoryTaskService::new()
        .with_projects(alpha_beta())
        .with_tasks(vec![seeded_task(7)]);
    let mut h = harness(service);
    h.enter_tasks();

    h.key(KeyCode::Enter); // open edit for the task under the cursor
    let dialog = h.app.dialog.as_ref().unwrap();
    assert!(dialog.is_edit());
    assert_eq!(dialog.form.title, "Task 7");
    assert_eq!(dialog.form.description, "details");
    assert_eq!(dialog.form.status, TaskStatus::InProgress);
    assert_eq!(dialog.form.priority, Priority::High);
    assert_eq!(dialog.form.due_date_input, "2026-10-01");
    assert_eq!(dialog.form.project_id, Some(2));
}

#[test]
fn update_closes_dialog_and_refetches() {
    let service = InMemoryTaskService::new()
        .with_projects(alpha_beta())
        .with_tasks(vec![seeded_task(7)]);
    let mut h = harness(service);
    h.enter_tasks();

    h.key(KeyCode::Enter);
    h.wait("project listing", |app| {
        app.dialog.as_ref().is_some_and(|d| d.projects_loaded)
    });
    h.type_str(" (edited)");
    h.key(KeyCode::Enter);

    h.wait("dialog close", |app| app.dialog.is_none());
    h.wait("refetch", |app| {
        app.query.tasks().first().is_some_and(|t| t.title.ends_with("(edited)"))
    });
    assert_eq!(h.service.counts().update, 1);
    assert_eq!(h.service.counts().create, 0);
}

#[test]
fn delete_closes_dialog_and_next_fetch_lacks_task() {
    let service = InMemoryTaskService::new()
        .with_projects(alpha_beta())
        .with_tasks(vec![seeded_task(7), seeded_task(8)]);
    let mut h = harness(service);
    h.enter_tasks();
    assert_eq!(h.app.query.tasks().len(), 2);

    h.key(KeyCode::Enter); // edit task 7
    h.ctrl('d');

    h.wait("dialog close", |app| app.dialog.is_none());
    h.wait("refetch", |app| app.query.tasks().len() == 1);
    assert_eq!(h.service.counts().delete, 1);
    assert!(h.app.query.tasks().iter().all(|t| t.id != 7));
    h.settle();
    assert_eq!(h.service.counts().list_tasks, 2);
}

#[test]
fn delete_is_unavailable_in_create_mode() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    h.open_create();

    h.ctrl('d');
    h.settle();
    assert!(h.app.dialog.is_some());
    assert_eq!(h.service.counts().delete, 0);
}

// ---------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------

#[test]
fn mutation_failure_keeps_dialog_open_without_refetch() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();
    let fetches_before = h.service.counts().list_tasks;

    h.open_create();
    h.service.fail_next(Op::Create);
    h.type_str("doomed");
    h.key(KeyCode::Enter);

    h.wait("failure notice", |app| {
        app.notice.as_ref().is_some_and(|n| n.kind == NoticeKind::Error)
    });
    assert!(h.app.dialog.is_some(), "dialog must stay open on failure");
    h.settle();
    assert_eq!(
        h.service.counts().list_tasks,
        fetches_before,
        "a failed mutation must not trigger a refetch"
    );

    // The form is intact and a retry succeeds
    assert_eq!(h.app.dialog.as_ref().unwrap().form.title, "doomed");
    h.key(KeyCode::Enter);
    h.wait("dialog close", |app| app.dialog.is_none());
    assert_eq!(h.service.counts().create, 2);
}

#[test]
fn project_listing_failure_is_nonfatal() {
    let service = InMemoryTaskService::new().with_projects(alpha_beta());
    service.fail_next(Op::ListProjects);
    let mut h = harness(service);
    h.enter_tasks();
    h.open_create();

    let dialog = h.app.dialog.as_ref().unwrap();
    assert_eq!(dialog.projects, vec![]);
    assert_eq!(dialog.form.project_id, None);

    // Submission stays blocked without a project; the dialog still works
    h.type_str("title");
    h.key(KeyCode::Enter);
    h.settle();
    assert_eq!(h.service.counts().create, 0);
    assert!(h.app.dialog.is_some());
}

// ---------------------------------------------------------------------
// Session gating
// ---------------------------------------------------------------------

/// Backend with tasks but no session
struct SignedOut(InMemoryTaskService);

impl TaskService for SignedOut {
    fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.0.list_tasks()
    }
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        self.0.list_projects()
    }
    fn create_task(&self, data: &taskmaster::model::NewTask) -> Result<Task, ServiceError> {
        self.0.create_task(data)
    }
    fn update_task(&self, data: &taskmaster::model::TaskPatch) -> Result<Task, ServiceError> {
        self.0.update_task(data)
    }
    fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        self.0.delete_task(id)
    }
}

impl SessionProvider for SignedOut {
    fn fetch_session(&self) -> Result<Option<taskmaster::model::session::Session>, ServiceError> {
        Ok(None)
    }
}

#[test]
fn unauthenticated_session_stays_on_landing() {
    let worker = ServiceWorker::spawn(Box::new(SignedOut(InMemoryTaskService::new())));
    let mut app = App::new(Theme::default(), true);

    let deadline = Instant::now() + Duration::from_secs(5);
    while app.session_status != SessionStatus::Unauthenticated {
        app.tick(&worker);
        assert!(Instant::now() < deadline, "session check timed out");
        std::thread::sleep(Duration::from_millis(2));
    }

    // Enter does not reach the tasks view
    handle_key(&mut app, &worker, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(app.view, View::Landing);
    assert!(app.notice.is_some());

    // Even a forced tasks view falls back on the next tick
    app.view = View::Tasks;
    app.tick(&worker);
    assert_eq!(app.view, View::Landing);
}

// ---------------------------------------------------------------------
// Stale responses
// ---------------------------------------------------------------------

#[test]
fn response_for_closed_dialog_is_discarded() {
    let mut h = harness(InMemoryTaskService::new().with_projects(alpha_beta()));
    h.enter_tasks();

    // Submit, then close before the response is processed (no tick runs
    // between the two key events). The create still lands server-side
    // and the list refetches, but the closed dialog must not resurrect.
    h.open_create();
    h.type_str("sneaky");
    h.key(KeyCode::Enter);
    h.key(KeyCode::Esc);
    assert!(h.app.dialog.is_none());

    h.wait("refetch after stale create", |app| {
        app.query.tasks().iter().any(|t| t.title == "sneaky")
    });
    assert!(h.app.dialog.is_none());
    assert_eq!(h.service.counts().create, 1);
}

#[test]
fn stale_project_listing_does_not_leak_into_new_dialog() {
    let service = InMemoryTaskService::new().with_projects(alpha_beta());
    // First dialog's listing fails; it is closed before the response
    // arrives, and a fresh dialog's listing succeeds.
    service.fail_next(Op::ListProjects);
    let mut h = harness(service);
    h.enter_tasks();

    h.key(KeyCode::Char('n'));
    h.key(KeyCode::Esc);

    h.open_create();
    let dialog = h.app.dialog.as_ref().unwrap();
    assert_eq!(dialog.projects.len(), 2);
    assert_eq!(dialog.form.project_id, Some(1));
}
