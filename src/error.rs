//! Error types for daisy
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, validation failure, unknown planner/task)
//! - 3: Authentication required (no token, or the backend rejected ours)
//! - 4: Operation failed (network error, backend failure)

use thiserror::Error;

/// Exit codes for the daisy CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const AUTH_REQUIRED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for daisy operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Note text cannot be empty")]
    EmptyNote,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Planner not found: {0}")]
    PlannerNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    // Authentication (exit code 3)
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Session expired or rejected by the server")]
    SessionExpired,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    // Operation failures (exit code 4)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::EmptyNote
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::PlannerNotFound(_)
            | Error::TaskNotFound(_) => exit_codes::USER_ERROR,

            // Authentication
            Error::NotLoggedIn | Error::SessionExpired | Error::LoginFailed(_) => {
                exit_codes::AUTH_REQUIRED
            }

            // Operation failures
            Error::Http(_)
            | Error::Api { .. }
            | Error::WeatherUnavailable(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for daisy operations
pub type Result<T> = std::result::Result<T, Error>;
