use serde::{Deserialize, Serialize};

/// Session state as reported by the auth collaborator.
///
/// `Loading` is the indeterminate state before the first status check
/// completes; the UI treats it as a loading condition, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// The authenticated user's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<SessionUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// Display name for the status row: name, then email, then a stub
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.name.as_deref().or(u.email.as_deref()))
            .unwrap_or("signed in")
    }
}
