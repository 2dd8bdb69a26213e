use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::model::session::Session;
use crate::model::{NewTask, Project, Task, TaskPatch};

use super::{Backend, ServiceError};

/// A request dispatched from a UI handler to the worker thread.
///
/// Dialog-scoped requests carry the dialog's generation token; the
/// matching response echoes it back so stale responses (from a dialog
/// that has since closed or reopened) can be discarded.
#[derive(Debug)]
pub enum Request {
    FetchSession,
    FetchTasks,
    FetchProjects { generation: u64 },
    Create { generation: u64, data: NewTask },
    Update { generation: u64, data: TaskPatch },
    Delete { generation: u64, id: i64 },
}

/// A completed request, delivered back to the UI tick loop.
#[derive(Debug)]
pub enum Response {
    Session(Result<Option<Session>, ServiceError>),
    Tasks(Result<Vec<Task>, ServiceError>),
    Projects {
        generation: u64,
        result: Result<Vec<Project>, ServiceError>,
    },
    Created {
        generation: u64,
        result: Result<Task, ServiceError>,
    },
    Updated {
        generation: u64,
        result: Result<Task, ServiceError>,
    },
    Deleted {
        generation: u64,
        result: Result<(), ServiceError>,
    },
}

/// Background thread that owns the backend and serves requests.
///
/// Requests are processed strictly in order on a single thread, so a
/// mutation's response always reaches the UI before any refetch issued
/// in reaction to it. The UI never blocks: it enqueues requests and
/// drains `poll()` on each tick (and the worker, not the UI, eats the
/// network latency).
pub struct ServiceWorker {
    tx: mpsc::Sender<Request>,
    rx: mpsc::Receiver<Response>,
}

impl ServiceWorker {
    /// Spawn the worker thread. The thread exits when the
    /// `ServiceWorker` (and with it the request sender) is dropped.
    pub fn spawn(backend: Box<dyn Backend>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::channel::<Response>();

        thread::spawn(move || {
            for request in req_rx {
                debug!(?request, "worker request");
                let response = serve(backend.as_ref(), request);
                if resp_tx.send(response).is_err() {
                    break;
                }
            }
        });

        ServiceWorker {
            tx: req_tx,
            rx: resp_rx,
        }
    }

    /// Enqueue a request. A send failure means the worker thread died;
    /// the UI will simply stop receiving responses, so it is ignored.
    pub fn submit(&self, request: Request) {
        let _ = self.tx.send(request);
    }

    /// Non-blocking drain of completed requests (called each tick).
    pub fn poll(&self) -> Vec<Response> {
        let mut responses = Vec::new();
        while let Ok(resp) = self.rx.try_recv() {
            responses.push(resp);
        }
        responses
    }

    /// Blocking receive with a deadline. The CLI uses this; the TUI
    /// sticks to `poll()`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Response> {
        self.rx.recv_timeout(timeout).ok()
    }
}

fn serve(backend: &dyn Backend, request: Request) -> Response {
    match request {
        Request::FetchSession => Response::Session(backend.fetch_session()),
        Request::FetchTasks => Response::Tasks(backend.list_tasks()),
        Request::FetchProjects { generation } => Response::Projects {
            generation,
            result: backend.list_projects(),
        },
        Request::Create { generation, data } => Response::Created {
            generation,
            result: backend.create_task(&data),
        },
        Request::Update { generation, data } => Response::Updated {
            generation,
            result: backend.update_task(&data),
        },
        Request::Delete { generation, id } => Response::Deleted {
            generation,
            result: backend.delete_task(id),
        },
    }
}
