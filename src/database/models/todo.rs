use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Persisted todo row, serialized as-is in API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [TodoStatus::Pending, TodoStatus::InProgress, TodoStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::Completed => "completed",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "status",
                value: s.to_string(),
                expected: "pending, in_progress, completed",
            })
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TodoPriority {
    pub const ALL: [TodoPriority; 3] = [TodoPriority::Low, TodoPriority::Medium, TodoPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
        }
    }
}

impl FromStr for TodoPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TodoPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "priority",
                value: s.to_string(),
                expected: "low, medium, high",
            })
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failures for inbound todo payloads
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingRequiredField(&'static str),

    #[error("Field '{field}' has invalid value '{value}' (expected one of: {expected})")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingRequiredField(field) => *field,
            ValidationError::InvalidValue { field, .. } => *field,
        }
    }
}

/// POST /api/todos body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    /// `null` and an absent field both store an empty description.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// PUT /api/todos/:id body. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// `None` = absent, `Some(None)` = explicit null (clear), `Some(Some(_))` = set.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated input for `TodoStore::create`
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl TryFrom<CreateTodoRequest> for NewTodo {
    type Error = ValidationError;

    fn try_from(req: CreateTodoRequest) -> Result<Self, Self::Error> {
        let title = req.title.unwrap_or_default();
        if title.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField("title"));
        }

        // Empty strings fall back to defaults, same as omitting the field
        let status = match req.status.as_deref() {
            None | Some("") => TodoStatus::default(),
            Some(s) => s.parse()?,
        };
        let priority = match req.priority.as_deref() {
            None | Some("") => TodoPriority::default(),
            Some(p) => p.parse()?,
        };

        Ok(Self {
            title,
            description: req.description.unwrap_or_default(),
            status,
            priority,
            due_date: req.due_date,
        })
    }
}

/// Validated sparse update for `TodoStore::update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    /// Apply the present fields to an in-memory row.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(status) = self.status {
            todo.status = status.as_str().to_string();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority.as_str().to_string();
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}

impl TryFrom<UpdateTodoRequest> for TodoPatch {
    type Error = ValidationError;

    fn try_from(req: UpdateTodoRequest) -> Result<Self, Self::Error> {
        if matches!(&req.title, Some(title) if title.trim().is_empty()) {
            return Err(ValidationError::MissingRequiredField("title"));
        }

        Ok(Self {
            title: req.title,
            description: req.description,
            status: req.status.as_deref().map(str::parse::<TodoStatus>).transpose()?,
            priority: req.priority.as_deref().map(str::parse::<TodoPriority>).transpose()?,
            due_date: req.due_date,
        })
    }
}

/// Exact-match list filters. Values are passed through without enumeration checks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
}

impl TodoFilter {
    /// Treat `?status=` the same as an absent parameter.
    pub fn normalized(self) -> Self {
        Self {
            status: self.status.filter(|s| !s.is_empty()),
            priority: self.priority.filter(|p| !p.is_empty()),
        }
    }
}

/// Per-user status counts. Rows with an unrecognized status count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TodoStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
}
