pub mod http;
pub mod memory;
pub mod worker;

pub use http::HttpTaskService;
pub use memory::InMemoryTaskService;

use crate::model::session::Session;
use crate::model::{NewTask, Project, Task, TaskPatch};

/// Error type for remote service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("not signed in — run `tm login <token>`")]
    Unauthenticated,
    #[error("task not found: {0}")]
    NotFound(i64),
    #[error("service returned {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The remote task service contract. Persistence lives behind this
/// boundary; the client never holds an authoritative copy of anything.
pub trait TaskService {
    fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError>;
    fn create_task(&self, data: &NewTask) -> Result<Task, ServiceError>;
    fn update_task(&self, data: &TaskPatch) -> Result<Task, ServiceError>;
    fn delete_task(&self, id: i64) -> Result<(), ServiceError>;
}

/// The auth collaborator contract. `Ok(None)` means no valid session;
/// `Err` is a transport problem (also treated as not signed in, after
/// logging).
pub trait SessionProvider {
    fn fetch_session(&self) -> Result<Option<Session>, ServiceError>;
}

/// A complete backend: task persistence plus session checking, movable
/// onto the worker thread.
pub trait Backend: TaskService + SessionProvider + Send {}

impl<T: TaskService + SessionProvider + Send> Backend for T {}

// Shared handles delegate, so a backend can live on the worker thread
// while a test (or a future second consumer) keeps a reference.
impl<T: TaskService + ?Sized> TaskService for std::sync::Arc<T> {
    fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        (**self).list_tasks()
    }
    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        (**self).list_projects()
    }
    fn create_task(&self, data: &NewTask) -> Result<Task, ServiceError> {
        (**self).create_task(data)
    }
    fn update_task(&self, data: &TaskPatch) -> Result<Task, ServiceError> {
        (**self).update_task(data)
    }
    fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        (**self).delete_task(id)
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for std::sync::Arc<T> {
    fn fetch_session(&self) -> Result<Option<Session>, ServiceError> {
        (**self).fetch_session()
    }
}
