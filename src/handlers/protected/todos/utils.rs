use crate::error::ApiError;

/// Parse the `:id` path segment. Anything that is not an i64 is a 400, never a store lookup.
pub fn parse_todo_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid todo ID"))
}
