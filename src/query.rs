use crate::model::Task;

/// Fetch state of the cached task collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A fetch is in flight
    Fetching,
    /// Holding the most recent snapshot
    Loaded,
}

/// In-memory cache of the task collection.
///
/// This is deliberately dumb: every successful mutation invalidates the
/// whole query, forcing a full refetch — responses are never merged or
/// patched in place. The snapshot only exists so the list keeps
/// rendering while a refetch is in flight.
#[derive(Debug, Default)]
pub struct TaskQuery {
    tasks: Vec<Task>,
    state: QueryState,
    dirty: bool,
    loaded_once: bool,
}

impl TaskQuery {
    pub fn new() -> Self {
        TaskQuery::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    /// True before the first snapshot has arrived (the "big spinner"
    /// condition; refetches of an existing snapshot render the old list)
    pub fn is_initial_loading(&self) -> bool {
        self.state == QueryState::Fetching && !self.loaded_once
    }

    /// A fetch should be issued now: never fetched, or invalidated,
    /// and none already in flight.
    pub fn needs_fetch(&self) -> bool {
        match self.state {
            QueryState::Fetching => false,
            QueryState::Idle => true,
            QueryState::Loaded => self.dirty,
        }
    }

    /// Record that a fetch was issued
    pub fn mark_fetching(&mut self) {
        self.state = QueryState::Fetching;
        self.dirty = false;
    }

    /// Store a fresh snapshot
    pub fn complete(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.state = QueryState::Loaded;
        self.loaded_once = true;
    }

    /// A fetch failed; fall back to the previous snapshot (if any)
    pub fn fail(&mut self) {
        self.state = if self.loaded_once {
            QueryState::Loaded
        } else {
            QueryState::Idle
        };
    }

    /// Invalidate after a successful mutation. The snapshot is kept for
    /// display but the next tick must refetch.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }
}
