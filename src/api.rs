//! REST client for the daisy planner backend
//!
//! The backend is an opaque collaborator: the client sends one atomic
//! request per mutation, surfaces failures as short messages, and refetches
//! the full task list afterwards instead of patching local state. There are
//! no retries and no update-title endpoint; edits are an explicit delete
//! followed by a create (see the CLI task handlers).

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Planner, Task, TaskStatus, User, ViewType};

/// Async HTTP client for the planner backend. Carries the bearer token for
/// the logged-in session, if any.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    user: User,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[allow(dead_code)]
    message: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }

    /// Map a non-2xx response to an error. 401 becomes `SessionExpired` so
    /// callers can clear the stored token; everything else becomes a short
    /// message, with the body detail kept to debug logging only.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = response.text().await.unwrap_or_default();
        debug!(%url, status = status.as_u16(), body = %body, "backend request failed");

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        let message = extract_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Log in with email and password. Runs without a stored token; a 401
    /// here means bad credentials, not an expired session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .request(reqwest::Method::POST, "/auth/login")
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            let message =
                extract_message(&body).unwrap_or_else(|| "invalid email or password".to_string());
            return Err(Error::LoginFailed(message));
        }

        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let response = self
            .request(reqwest::Method::POST, "/auth/register")
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        let _: MessageResponse = Self::check(response).await?.json().await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<User> {
        let response = self
            .request(reqwest::Method::GET, "/auth/profile")
            .send()
            .await?;
        let profile: ProfileResponse = Self::check(response).await?.json().await?;
        Ok(profile.user)
    }

    pub async fn update_location(&self, location: &str) -> Result<User> {
        let response = self
            .request(reqwest::Method::PATCH, "/auth/profile")
            .json(&serde_json::json!({ "location": location }))
            .send()
            .await?;
        let profile: ProfileResponse = Self::check(response).await?.json().await?;
        Ok(profile.user)
    }

    // =========================================================================
    // Planners
    // =========================================================================

    pub async fn planners(&self) -> Result<Vec<Planner>> {
        let response = self
            .request(reqwest::Method::GET, "/planners")
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_planner(&self, name: &str, view_type: ViewType) -> Result<Planner> {
        let response = self
            .request(reqwest::Method::POST, "/planners")
            .json(&serde_json::json!({ "name": name, "view_type": view_type }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// The full task list for a planner. Views call this again after every
    /// mutation rather than patching their local copy.
    pub async fn tasks(&self, planner_id: i64) -> Result<Vec<Task>> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/planners/{planner_id}/tasks"),
            )
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PlannerNotFound(planner_id.to_string()));
        }
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn create_task(&self, planner_id: i64, title: &str) -> Result<Task> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/planners/{planner_id}/tasks"),
            )
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::PlannerNotFound(planner_id.to_string()));
        }
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn set_task_status(&self, task_id: i64, status: TaskStatus) -> Result<Task> {
        let response = self
            .request(
                reqwest::Method::PATCH,
                &format!("/tasks/{task_id}/status"),
            )
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::TaskNotFound(task_id));
        }
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_task(&self, task_id: i64) -> Result<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/tasks/{task_id}"))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::TaskNotFound(task_id));
        }
        let _: MessageResponse = Self::check(response).await?.json().await?;
        Ok(())
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(str::to_string)
}
