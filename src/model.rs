//! Wire types shared with the daisy backend
//!
//! These mirror the JSON the REST service emits. The backend owns the
//! entities; the client only ever holds a read view and refetches after
//! every mutation.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Task status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A task belonging to a planner. The title may carry a slot tag prefix;
/// see the `tag` module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(default)]
    pub planner_id: i64,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Planner view granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewType::Daily => write!(f, "daily"),
            ViewType::Weekly => write!(f, "weekly"),
            ViewType::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for ViewType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(ViewType::Daily),
            "weekly" => Ok(ViewType::Weekly),
            "monthly" => Ok(ViewType::Monthly),
            _ => Err(Error::InvalidArgument(format!(
                "invalid view type '{s}': must be daily, weekly, or monthly"
            ))),
        }
    }
}

/// A named container of tasks with a view granularity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planner {
    pub id: i64,
    pub name: String,
    pub view_type: ViewType,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The logged-in user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub location: Option<String>,
}
