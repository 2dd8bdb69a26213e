use std::sync::Mutex;

use chrono::NaiveDate;

use crate::model::session::{Session, SessionUser};
use crate::model::{NewTask, Priority, Project, Task, TaskPatch, TaskStatus};

use super::{ServiceError, SessionProvider, TaskService};

/// Which operation a scripted failure should hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    ListTasks,
    ListProjects,
    Create,
    Update,
    Delete,
}

/// Call counts, exposed so tests can assert exactly-once behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_tasks: usize,
    pub list_projects: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    next_id: i64,
    fail_next: Vec<Op>,
    counts: CallCounts,
}

/// In-memory backend: the offline/demo mode behind `tm --offline`, and
/// the deterministic substitute for the remote service in tests.
/// Failures are injected per-operation with `fail_next`.
pub struct InMemoryTaskService {
    inner: Mutex<Inner>,
    user_name: String,
}

impl Default for InMemoryTaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskService {
    pub fn new() -> Self {
        InMemoryTaskService {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
            user_name: "offline".to_string(),
        }
    }

    /// A backend pre-populated with a couple of projects and tasks
    pub fn demo() -> Self {
        let service = Self::new();
        {
            let mut inner = service.inner.lock().unwrap();
            inner.projects = vec![
                Project {
                    id: 1,
                    name: "Personal".into(),
                },
                Project {
                    id: 2,
                    name: "Work".into(),
                },
            ];
            inner.tasks = vec![
                Task {
                    id: 1,
                    title: "Try out taskmaster".into(),
                    description: "Open a task with Enter, create one with n".into(),
                    status: TaskStatus::InProgress,
                    priority: Priority::Medium,
                    due_date: None,
                    project_id: 1,
                },
                Task {
                    id: 2,
                    title: "File the expense report".into(),
                    description: String::new(),
                    status: TaskStatus::Pending,
                    priority: Priority::High,
                    due_date: NaiveDate::from_ymd_opt(2026, 9, 30),
                    project_id: 2,
                },
            ];
            inner.next_id = 3;
        }
        service
    }

    pub fn with_projects(self, projects: Vec<Project>) -> Self {
        self.inner.lock().unwrap().projects = projects;
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
            inner.tasks = tasks;
        }
        self
    }

    /// Make the next call to `op` fail with a simulated server error
    pub fn fail_next(&self, op: Op) {
        self.inner.lock().unwrap().fail_next.push(op);
    }

    pub fn counts(&self) -> CallCounts {
        self.inner.lock().unwrap().counts
    }

    pub fn tasks_snapshot(&self) -> Vec<Task> {
        self.inner.lock().unwrap().tasks.clone()
    }

    fn trip(inner: &mut Inner, op: Op) -> Result<(), ServiceError> {
        if let Some(pos) = inner.fail_next.iter().position(|o| *o == op) {
            inner.fail_next.remove(pos);
            return Err(ServiceError::Http {
                status: 500,
                message: "injected failure".into(),
            });
        }
        Ok(())
    }
}

impl TaskService for InMemoryTaskService {
    fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.list_tasks += 1;
        Self::trip(&mut inner, Op::ListTasks)?;
        Ok(inner.tasks.clone())
    }

    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.list_projects += 1;
        Self::trip(&mut inner, Op::ListProjects)?;
        Ok(inner.projects.clone())
    }

    fn create_task(&self, data: &NewTask) -> Result<Task, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.create += 1;
        Self::trip(&mut inner, Op::Create)?;
        let task = Task {
            id: inner.next_id,
            title: data.title.clone(),
            description: data.description.clone(),
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            project_id: data.project_id,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    fn update_task(&self, data: &TaskPatch) -> Result<Task, ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.update += 1;
        Self::trip(&mut inner, Op::Update)?;
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == data.id)
            .ok_or(ServiceError::NotFound(data.id))?;
        task.title = data.title.clone();
        task.description = data.description.clone();
        task.status = data.status;
        task.priority = data.priority;
        task.due_date = data.due_date;
        task.project_id = data.project_id;
        Ok(task.clone())
    }

    fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        let mut inner = self.inner.lock().unwrap();
        inner.counts.delete += 1;
        Self::trip(&mut inner, Op::Delete)?;
        let before = inner.tasks.len();
        inner.tasks.retain(|t| t.id != id);
        if inner.tasks.len() == before {
            return Err(ServiceError::NotFound(id));
        }
        Ok(())
    }
}

impl SessionProvider for InMemoryTaskService {
    fn fetch_session(&self) -> Result<Option<Session>, ServiceError> {
        Ok(Some(Session {
            user: Some(SessionUser {
                name: Some(self.user_name.clone()),
                email: None,
            }),
        }))
    }
}
