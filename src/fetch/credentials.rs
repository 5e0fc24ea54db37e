//! Data source credentials
//!
//! Credentials live in a value owned by the source for one run. They are
//! read from the environment once and never written anywhere.

use std::env;
use std::fmt;

/// Environment variable holding an OAuth2 access token for the query API
pub const ACCESS_TOKEN_ENV: &str = "BIGQUERY_ACCESS_TOKEN";

/// Environment variable naming the project that runs (and pays for) the query job
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

/// Credentials handed to the query source
#[derive(Clone, PartialEq)]
pub enum Credentials {
    /// No authentication header (local emulators, non-production endpoints)
    Anonymous { project_id: Option<String> },
    /// Bearer access token
    AccessToken {
        project_id: Option<String>,
        token: String,
    },
}

impl Credentials {
    /// Load credentials from the environment; absent token means anonymous
    pub fn from_env() -> Self {
        let project_id = env::var(PROJECT_ENV).ok().filter(|p| !p.trim().is_empty());
        match env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Credentials::AccessToken {
                project_id,
                token: token.trim().to_string(),
            },
            _ => Credentials::Anonymous { project_id },
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Credentials::Anonymous { project_id } | Credentials::AccessToken { project_id, .. } => {
                project_id.as_deref()
            }
        }
    }

    /// Replace the project id (CLI/config override)
    pub fn with_project_id(self, project: Option<String>) -> Self {
        let Some(project) = project else {
            return self;
        };
        match self {
            Credentials::Anonymous { .. } => Credentials::Anonymous {
                project_id: Some(project),
            },
            Credentials::AccessToken { token, .. } => Credentials::AccessToken {
                project_id: Some(project),
                token,
            },
        }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Credentials::AccessToken { token, .. } => Some(token),
            Credentials::Anonymous { .. } => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous { project_id } => f
                .debug_struct("Anonymous")
                .field("project_id", project_id)
                .finish(),
            Credentials::AccessToken { project_id, .. } => f
                .debug_struct("AccessToken")
                .field("project_id", project_id)
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}
