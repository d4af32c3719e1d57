use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use crate::database::models::TodoPatch;

pub const TODOS_TABLE: &str = "todos";

pub const TODO_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at, updated_at";

/// Typed bind parameter, bound in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    BigInt(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    NullTimestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl SqlResult {
    /// Bind all params onto a `query_as` in order.
    pub fn query_as<'q, T>(&'q self) -> QueryAs<'q, Postgres, T, PgArguments>
    where
        T: for<'r> FromRow<'r, PgRow>,
    {
        let mut q = sqlx::query_as::<_, T>(&self.query);
        for p in self.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q
    }
}

/// Accumulates `$n` placeholders alongside their values.
#[derive(Debug, Default)]
struct Params {
    values: Vec<SqlParam>,
}

impl Params {
    fn push(&mut self, value: SqlParam) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }
}

/// Owner-scoped SELECT over the todos table. The `user_id` predicate is always present.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    user_id: i64,
    id: Option<i64>,
    status: Option<String>,
    priority: Option<String>,
    newest_first: bool,
}

impl SelectQuery {
    pub fn todos(user_id: i64) -> Self {
        Self {
            user_id,
            id: None,
            status: None,
            priority: None,
            newest_first: false,
        }
    }

    pub fn id_eq(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn status_eq(mut self, status: Option<&str>) -> Self {
        self.status = status.map(str::to_string);
        self
    }

    pub fn priority_eq(mut self, priority: Option<&str>) -> Self {
        self.priority = priority.map(str::to_string);
        self
    }

    pub fn order_newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params = Params::default();
        let mut conditions = vec![format!("user_id = {}", params.push(SqlParam::BigInt(self.user_id)))];

        if let Some(id) = self.id {
            conditions.push(format!("id = {}", params.push(SqlParam::BigInt(id))));
        }
        if let Some(status) = &self.status {
            conditions.push(format!("status = {}", params.push(SqlParam::Text(status.clone()))));
        }
        if let Some(priority) = &self.priority {
            conditions.push(format!("priority = {}", params.push(SqlParam::Text(priority.clone()))));
        }

        let mut query = format!(
            "SELECT {} FROM {} WHERE {}",
            TODO_COLUMNS,
            TODOS_TABLE,
            conditions.join(" AND ")
        );
        if self.newest_first {
            query.push_str(" ORDER BY created_at DESC, id DESC");
        }

        SqlResult { query, params: params.values }
    }
}

/// Sparse, owner-scoped UPDATE ... RETURNING. `updated_at` is always assigned,
/// clamped so it never precedes `created_at`.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    id: i64,
    user_id: i64,
    now: DateTime<Utc>,
    patch: TodoPatch,
}

impl UpdateQuery {
    pub fn todo(id: i64, user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            now,
            patch: TodoPatch::default(),
        }
    }

    pub fn patch(mut self, patch: TodoPatch) -> Self {
        self.patch = patch;
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params = Params::default();
        let mut assignments = vec![format!(
            "updated_at = GREATEST({}, created_at)",
            params.push(SqlParam::Timestamp(self.now))
        )];

        if let Some(title) = &self.patch.title {
            assignments.push(format!("title = {}", params.push(SqlParam::Text(title.clone()))));
        }
        if let Some(description) = &self.patch.description {
            assignments.push(format!(
                "description = {}",
                params.push(SqlParam::Text(description.clone()))
            ));
        }
        if let Some(status) = self.patch.status {
            assignments.push(format!(
                "status = {}",
                params.push(SqlParam::Text(status.as_str().to_string()))
            ));
        }
        if let Some(priority) = self.patch.priority {
            assignments.push(format!(
                "priority = {}",
                params.push(SqlParam::Text(priority.as_str().to_string()))
            ));
        }
        if let Some(due_date) = self.patch.due_date {
            let value = match due_date {
                Some(ts) => SqlParam::Timestamp(ts),
                None => SqlParam::NullTimestamp,
            };
            assignments.push(format!("due_date = {}", params.push(value)));
        }

        let id = params.push(SqlParam::BigInt(self.id));
        let user_id = params.push(SqlParam::BigInt(self.user_id));

        let query = format!(
            "UPDATE {} SET {} WHERE id = {} AND user_id = {} RETURNING {}",
            TODOS_TABLE,
            assignments.join(", "),
            id,
            user_id,
            TODO_COLUMNS
        );

        SqlResult { query, params: params.values }
    }
}

fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlParam::BigInt(i) => q.bind(*i),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Timestamp(ts) => q.bind(*ts),
        SqlParam::NullTimestamp => {
            let none: Option<DateTime<Utc>> = None;
            q.bind(none)
        }
    }
}
