use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, warn};

use crate::io::config_io::read_config;
use crate::model::session::{Session, SessionStatus};
use crate::model::Task;
use crate::query::TaskQuery;
use crate::service::worker::{Request, Response, ServiceWorker};
use crate::service::{HttpTaskService, InMemoryTaskService, ServiceError};

use super::dialog::{DialogState, SubmitAction};
use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Splash / sign-in screen
    Landing,
    /// The task list
    Tasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient status-row notification
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    at: Instant,
}

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Main application state
pub struct App {
    pub view: View,
    pub session_status: SessionStatus,
    pub session: Option<Session>,
    pub query: TaskQuery,
    /// Cursor index into the task list
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    pub dialog: Option<DialogState>,
    pub notice: Option<Notice>,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    /// Monotonic dialog-generation counter; see `DialogState`
    next_generation: u64,
    session_requested: bool,
}

impl App {
    pub fn new(theme: Theme, show_key_hints: bool) -> Self {
        App {
            view: View::Landing,
            session_status: SessionStatus::Loading,
            session: None,
            query: TaskQuery::new(),
            cursor: 0,
            scroll_offset: 0,
            dialog: None,
            notice: None,
            should_quit: false,
            theme,
            show_key_hints,
            next_generation: 0,
            session_requested: false,
        }
    }

    // -----------------------------------------------------------------
    // Tick: issue pending fetches, drain worker responses
    // -----------------------------------------------------------------

    pub fn tick(&mut self, worker: &ServiceWorker) {
        if !self.session_requested {
            self.session_requested = true;
            worker.submit(Request::FetchSession);
        }

        for response in worker.poll() {
            self.handle_response(response);
        }

        // Session gate: the tasks view requires authentication. An
        // unauthenticated session falls back to the landing view, which
        // shows the sign-in hint.
        if self.view == View::Tasks && self.session_status == SessionStatus::Unauthenticated {
            self.view = View::Landing;
        }

        if self.view == View::Tasks
            && self.session_status == SessionStatus::Authenticated
            && self.query.needs_fetch()
        {
            self.query.mark_fetching();
            worker.submit(Request::FetchTasks);
        }

        if let Some(notice) = &self.notice
            && notice.at.elapsed() > NOTICE_TTL
        {
            self.notice = None;
        }
    }

    fn handle_response(&mut self, response: Response) {
        match response {
            Response::Session(result) => self.on_session(result),
            Response::Tasks(result) => self.on_tasks(result),
            Response::Projects { generation, result } => self.on_projects(generation, result),
            Response::Created { generation, result } => self.on_created(generation, result),
            Response::Updated { generation, result } => self.on_updated(generation, result),
            Response::Deleted { generation, result } => self.on_deleted(generation, result),
        }
    }

    fn on_session(&mut self, result: Result<Option<Session>, ServiceError>) {
        match result {
            Ok(Some(session)) => {
                self.session_status = SessionStatus::Authenticated;
                self.session = Some(session);
            }
            Ok(None) => {
                self.session_status = SessionStatus::Unauthenticated;
                self.session = None;
            }
            Err(e) => {
                warn!(error = %e, "session check failed");
                self.session_status = SessionStatus::Unauthenticated;
                self.session = None;
                self.notify_error(format!("Could not reach the service: {e}"));
            }
        }
    }

    fn on_tasks(&mut self, result: Result<Vec<Task>, ServiceError>) {
        match result {
            Ok(tasks) => {
                self.query.complete(tasks);
                self.clamp_cursor();
            }
            Err(e) => {
                warn!(error = %e, "task fetch failed");
                self.query.fail();
                self.notify_error(format!("Failed to load tasks: {e}"));
            }
        }
    }

    fn on_projects(&mut self, generation: u64, result: Result<Vec<crate::model::Project>, ServiceError>) {
        let Some(dialog) = self.dialog_for(generation) else {
            return;
        };
        match result {
            Ok(projects) => dialog.projects_loaded(projects),
            Err(e) => {
                // Non-fatal: the selector stays empty
                warn!(error = %e, "project listing failed");
                dialog.projects_loaded(Vec::new());
            }
        }
    }

    fn on_created(&mut self, generation: u64, result: Result<Task, ServiceError>) {
        match result {
            Ok(task) => {
                // The collection changed server-side either way; refetch
                // even if the dialog that asked is already gone.
                self.query.invalidate();
                if self.dialog_for(generation).is_some() {
                    self.dialog = None;
                    self.notify_info(format!("Created \"{}\"", task.title));
                }
            }
            Err(e) => {
                if let Some(dialog) = self.dialog_for(generation) {
                    dialog.submit_in_flight = false;
                    self.notify_error(format!("Failed to create task: {e}"));
                }
            }
        }
    }

    fn on_updated(&mut self, generation: u64, result: Result<Task, ServiceError>) {
        match result {
            Ok(task) => {
                self.query.invalidate();
                if self.dialog_for(generation).is_some() {
                    self.dialog = None;
                    self.notify_info(format!("Updated \"{}\"", task.title));
                }
            }
            Err(e) => {
                if let Some(dialog) = self.dialog_for(generation) {
                    dialog.submit_in_flight = false;
                    self.notify_error(format!("Failed to update task: {e}"));
                }
            }
        }
    }

    fn on_deleted(&mut self, generation: u64, result: Result<(), ServiceError>) {
        match result {
            Ok(()) => {
                self.query.invalidate();
                if self.dialog_for(generation).is_some() {
                    self.dialog = None;
                    self.notify_info("Task deleted".to_string());
                }
            }
            Err(e) => {
                if let Some(dialog) = self.dialog_for(generation) {
                    dialog.delete_in_flight = false;
                    self.notify_error(format!("Failed to delete task: {e}"));
                }
            }
        }
    }

    /// The open dialog, but only if `generation` is its generation.
    /// Responses stamped with any other generation belong to a dialog
    /// that has since closed; they are logged and dropped rather than
    /// mutating unrelated state.
    fn dialog_for(&mut self, generation: u64) -> Option<&mut DialogState> {
        match &mut self.dialog {
            Some(dialog) if dialog.generation == generation => Some(dialog),
            _ => {
                debug!(generation, "discarding stale dialog response");
                None
            }
        }
    }

    // -----------------------------------------------------------------
    // Dialog lifecycle
    // -----------------------------------------------------------------

    /// Open the dialog in Create mode and kick off the project listing
    pub fn open_create(&mut self, worker: &ServiceWorker) {
        let generation = self.bump_generation();
        self.dialog = Some(DialogState::create(generation));
        worker.submit(Request::FetchProjects { generation });
    }

    /// Open the dialog in Edit mode for the task under the cursor
    pub fn open_edit(&mut self, worker: &ServiceWorker) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        let generation = self.bump_generation();
        self.dialog = Some(DialogState::edit(task, generation));
        worker.submit(Request::FetchProjects { generation });
    }

    /// Close without submitting: Create-mode defaults and Edit-mode
    /// re-derivation both come from constructing a fresh `DialogState`
    /// on next open, so in-progress edits are simply discarded.
    pub fn close_dialog(&mut self) {
        self.dialog = None;
    }

    /// Submit the dialog (no-op while the submit control is disabled)
    pub fn submit_dialog(&mut self, worker: &ServiceWorker) {
        let Some(dialog) = &mut self.dialog else {
            return;
        };
        let Some(action) = dialog.submit_action() else {
            return;
        };
        dialog.submit_in_flight = true;
        let generation = dialog.generation;
        match action {
            SubmitAction::Create(data) => worker.submit(Request::Create { generation, data }),
            SubmitAction::Update(data) => worker.submit(Request::Update { generation, data }),
        }
    }

    /// Delete the dialog's backing task (Edit mode only)
    pub fn delete_dialog(&mut self, worker: &ServiceWorker) {
        let Some(dialog) = &mut self.dialog else {
            return;
        };
        let Some(id) = dialog.delete_id() else {
            return;
        };
        dialog.delete_in_flight = true;
        worker.submit(Request::Delete {
            generation: dialog.generation,
            id,
        });
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    // -----------------------------------------------------------------
    // List helpers
    // -----------------------------------------------------------------

    pub fn selected_task(&self) -> Option<&Task> {
        self.query.tasks().get(self.cursor)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.query.tasks().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Manual refresh (also the entry fetch when switching to Tasks)
    pub fn refresh_tasks(&mut self) {
        self.query.invalidate();
    }

    // -----------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------

    pub fn notify_info(&mut self, text: String) {
        self.notice = Some(Notice {
            kind: NoticeKind::Info,
            text,
            at: Instant::now(),
        });
    }

    pub fn notify_error(&mut self, text: String) {
        self.notice = Some(Notice {
            kind: NoticeKind::Error,
            text,
            at: Instant::now(),
        });
    }
}

/// Run the TUI application
pub fn run(offline: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config()?;
    let theme = Theme::from_config(&config.ui);

    let worker = if offline {
        ServiceWorker::spawn(Box::new(InMemoryTaskService::demo()))
    } else {
        ServiceWorker::spawn(Box::new(HttpTaskService::new(&config.service)?))
    };

    let mut app = App::new(theme, config.ui.show_key_hints);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &worker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &ServiceWorker,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.tick(worker);

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, worker, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
