use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};

use crate::model::config::ServiceConfig;
use crate::model::session::Session;
use crate::model::{NewTask, Project, Task, TaskPatch};

use super::{ServiceError, SessionProvider, TaskService};

/// Blocking HTTP/JSON client for the remote task service.
///
/// Routes: `GET/POST /api/tasks`, `PUT/DELETE /api/tasks/{id}`,
/// `GET /api/projects`, `GET /api/auth/session`. Auth is a bearer token.
pub struct HttpTaskService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTaskService {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpTaskService {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Map a non-success response to a `ServiceError`. `id` is attached
    /// to 404s so "task not found" names the task.
    fn check(&self, resp: Response, id: Option<i64>) -> Result<Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ServiceError::Unauthenticated),
            StatusCode::NOT_FOUND if id.is_some() => {
                Err(ServiceError::NotFound(id.unwrap_or_default()))
            }
            _ => {
                let message = resp.text().unwrap_or_default();
                let message = match message.char_indices().nth(200) {
                    Some((idx, _)) => message[..idx].to_string(),
                    None => message,
                };
                Err(ServiceError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

impl TaskService for HttpTaskService {
    fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let resp = self.authed(self.client.get(self.url("/api/tasks"))).send()?;
        Ok(self.check(resp, None)?.json()?)
    }

    fn list_projects(&self) -> Result<Vec<Project>, ServiceError> {
        let resp = self
            .authed(self.client.get(self.url("/api/projects")))
            .send()?;
        Ok(self.check(resp, None)?.json()?)
    }

    fn create_task(&self, data: &NewTask) -> Result<Task, ServiceError> {
        let resp = self
            .authed(self.client.post(self.url("/api/tasks")).json(data))
            .send()?;
        Ok(self.check(resp, None)?.json()?)
    }

    fn update_task(&self, data: &TaskPatch) -> Result<Task, ServiceError> {
        let resp = self
            .authed(
                self.client
                    .put(self.url(&format!("/api/tasks/{}", data.id)))
                    .json(data),
            )
            .send()?;
        Ok(self.check(resp, Some(data.id))?.json()?)
    }

    fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        let resp = self
            .authed(self.client.delete(self.url(&format!("/api/tasks/{id}"))))
            .send()?;
        self.check(resp, Some(id))?;
        Ok(())
    }
}

impl SessionProvider for HttpTaskService {
    fn fetch_session(&self) -> Result<Option<Session>, ServiceError> {
        if self.token.is_none() {
            // No token yet: definitively signed out, skip the round-trip
            return Ok(None);
        }
        let resp = self
            .authed(self.client.get(self.url("/api/auth/session")))
            .send()?;
        match resp.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            _ => {
                let session: Session = self.check(resp, None)?.json()?;
                // An empty session body also means signed out
                Ok(session.user.is_some().then_some(session))
            }
        }
    }
}
