mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::TestServer;

async fn create(server: &TestServer, user_id: i64, body: Value) -> Result<Value> {
    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(server.token_for(user_id))
        .json(&body)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED, "create failed for {}", body);
    Ok(res.json().await?)
}

async fn get_status(server: &TestServer, user_id: i64, path: &str) -> Result<(StatusCode, Value)> {
    let res = server
        .client
        .get(server.url(path))
        .bearer_auth(server.token_for(user_id))
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn create_applies_defaults() -> Result<()> {
    let server = common::spawn_server().await?;

    let todo = create(&server, 1, json!({"title": "Buy milk"})).await?;

    assert_eq!(todo["title"], "Buy milk");
    assert_eq!(todo["description"], "");
    assert_eq!(todo["status"], "pending");
    assert_eq!(todo["priority"], "medium");
    assert_eq!(todo["user_id"], 1);
    assert!(todo["id"].is_i64());
    assert!(todo.get("due_date").is_none());
    assert_eq!(todo["created_at"], todo["updated_at"]);
    Ok(())
}

#[tokio::test]
async fn null_description_is_stored_empty() -> Result<()> {
    let server = common::spawn_server().await?;

    let todo = create(&server, 1, json!({"title": "t", "description": null})).await?;

    assert_eq!(todo["title"], "t");
    assert_eq!(todo["description"], "");
    Ok(())
}

#[tokio::test]
async fn get_returns_submitted_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let created = create(
        &server,
        1,
        json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "status": "in_progress",
            "priority": "high",
            "due_date": "2030-06-01T09:00:00Z"
        }),
    )
    .await?;

    let (status, fetched) = get_status(&server, 1, &format!("/api/todos/{}", created["id"])).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["description"], "quarterly numbers");
    assert_eq!(fetched["status"], "in_progress");
    assert_eq!(fetched["priority"], "high");
    assert_eq!(fetched["due_date"], "2030-06-01T09:00:00Z");
    Ok(())
}

#[tokio::test]
async fn create_validation_failures_are_bad_requests() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token_for(1);

    for body in [
        json!({}),
        json!({"title": ""}),
        json!({"title": "ok", "status": "done"}),
        json!({"title": "ok", "priority": "urgent"}),
    ] {
        let res = server
            .client
            .post(server.url("/api/todos"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {}", body);
        let payload = res.json::<Value>().await?;
        assert_eq!(payload["code"], "VALIDATION_ERROR");
    }

    // nothing was stored
    let (_, list) = get_status(&server, 1, "/api/todos").await?;
    assert_eq!(list, json!([]));
    Ok(())
}

#[tokio::test]
async fn malformed_body_surfaces_parse_error() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(server.token_for(1))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{\"title\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["code"], "INVALID_JSON");
    assert!(!payload["error"].as_str().unwrap_or_default().is_empty());

    let res = server
        .client
        .post(server.url("/api/todos"))
        .bearer_auth(server.token_for(1))
        .json(&json!({"title": 12}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn invalid_id_is_bad_request() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.token_for(1);

    let res = server
        .client
        .get(server.url("/api/todos/abc"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["error"], "Invalid todo ID");

    let res = server
        .client
        .put(server.url("/api/todos/1.5"))
        .bearer_auth(&token)
        .json(&json!({"title": "x"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .delete(server.url("/api/todos/xyz"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = create(&server, 1, json!({"title": "Buy milk"})).await?;
    let path = format!("/api/todos/{}", created["id"]);

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(server.token_for(1))
        .json(&json!({"status": "completed"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["priority"], "medium");
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_ne!(updated["updated_at"], created["updated_at"]);

    let updated_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(updated["updated_at"].clone())?;
    let created_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(created["created_at"].clone())?;
    assert!(updated_at > created_at);
    Ok(())
}

#[tokio::test]
async fn empty_update_only_refreshes_updated_at() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = create(
        &server,
        1,
        json!({"title": "Stay", "description": "d", "priority": "low", "due_date": "2031-01-01T00:00:00Z"}),
    )
    .await?;
    let path = format!("/api/todos/{}", created["id"]);

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(server.token_for(1))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    for field in ["id", "user_id", "title", "description", "status", "priority", "due_date", "created_at"] {
        assert_eq!(updated[field], created[field], "field {} changed", field);
    }
    assert_ne!(updated["updated_at"], created["updated_at"]);
    Ok(())
}

#[tokio::test]
async fn explicit_null_clears_due_date() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = create(
        &server,
        1,
        json!({"title": "Deadline", "due_date": "2031-01-01T00:00:00Z"}),
    )
    .await?;
    let path = format!("/api/todos/{}", created["id"]);

    // absent due_date leaves it alone
    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(server.token_for(1))
        .json(&json!({"title": "Deadline moved"}))
        .send()
        .await?;
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["due_date"], "2031-01-01T00:00:00Z");

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(server.token_for(1))
        .json(&json!({"due_date": null}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res.json::<Value>().await?;
    assert!(cleared.get("due_date").is_none());
    assert_eq!(cleared["title"], "Deadline moved");
    Ok(())
}

#[tokio::test]
async fn update_validation_and_missing_rows() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = create(&server, 1, json!({"title": "x"})).await?;
    let path = format!("/api/todos/{}", created["id"]);

    let res = server
        .client
        .put(server.url(&path))
        .bearer_auth(server.token_for(1))
        .json(&json!({"status": "archived"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .put(server.url("/api/todos/999999"))
        .bearer_auth(server.token_for(1))
        .json(&json!({"title": "y"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;
    let created = create(&server, 1, json!({"title": "Buy milk"})).await?;
    let path = format!("/api/todos/{}", created["id"]);

    let res = server
        .client
        .delete(server.url(&path))
        .bearer_auth(server.token_for(1))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let payload = res.json::<Value>().await?;
    assert_eq!(payload["message"], "Todo deleted successfully");

    for user_id in [1, 2] {
        let (status, body) = get_status(&server, user_id, &path).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Todo not found");
    }

    let res = server
        .client
        .delete(server.url(&path))
        .bearer_auth(server.token_for(1))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn users_only_see_their_own_todos() -> Result<()> {
    let server = common::spawn_server().await?;
    let a = create(&server, 100, json!({"title": "A's todo"})).await?;
    let b = create(&server, 200, json!({"title": "B's todo"})).await?;

    let (status, list) = get_status(&server, 100, "/api/todos").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([a.clone()]));

    // B cannot read, modify, or delete A's todo
    let a_path = format!("/api/todos/{}", a["id"]);
    let (status, _) = get_status(&server, 200, &a_path).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let res = server
        .client
        .put(server.url(&a_path))
        .bearer_auth(server.token_for(200))
        .json(&json!({"title": "hijacked"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .delete(server.url(&a_path))
        .bearer_auth(server.token_for(200))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let (_, still_there) = get_status(&server, 100, &a_path).await?;
    assert_eq!(still_there, a);

    let (_, list) = get_status(&server, 200, "/api/todos").await?;
    assert_eq!(list, json!([b]));
    Ok(())
}

#[tokio::test]
async fn list_filters_are_exact_and_newest_first() -> Result<()> {
    let server = common::spawn_server().await?;
    create(&server, 1, json!({"title": "one", "status": "completed", "priority": "low"})).await?;
    create(&server, 1, json!({"title": "two", "status": "pending", "priority": "high"})).await?;
    create(&server, 1, json!({"title": "three", "status": "completed", "priority": "high"})).await?;

    let titles = |list: &Value| -> Vec<String> {
        list.as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|t| t["title"].as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default()
    };

    let (_, all) = get_status(&server, 1, "/api/todos").await?;
    assert_eq!(titles(&all), vec!["three", "two", "one"]);

    let (_, completed) = get_status(&server, 1, "/api/todos?status=completed").await?;
    assert_eq!(titles(&completed), vec!["three", "one"]);

    let (_, completed_high) =
        get_status(&server, 1, "/api/todos?status=completed&priority=high").await?;
    assert_eq!(titles(&completed_high), vec!["three"]);

    // empty parameter is the same as no filter
    let (_, blank) = get_status(&server, 1, "/api/todos?status=&priority=").await?;
    assert_eq!(titles(&blank), vec!["three", "two", "one"]);

    // unknown values pass through and match nothing
    let (status, unknown) = get_status(&server, 1, "/api/todos?status=archived").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, json!([]));
    Ok(())
}

#[tokio::test]
async fn stats_count_per_status() -> Result<()> {
    let server = common::spawn_server().await?;
    create(&server, 1, json!({"title": "a"})).await?;
    create(&server, 1, json!({"title": "b", "status": "in_progress"})).await?;
    create(&server, 1, json!({"title": "c", "status": "completed"})).await?;
    create(&server, 1, json!({"title": "d", "status": "completed"})).await?;
    create(&server, 2, json!({"title": "other user"})).await?;

    let (status, stats) = get_status(&server, 1, "/api/todos/stats").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({"total": 4, "pending": 1, "in_progress": 1, "completed": 2})
    );

    let (_, empty) = get_status(&server, 3, "/api/todos/stats").await?;
    assert_eq!(
        empty,
        json!({"total": 0, "pending": 0, "in_progress": 0, "completed": 0})
    );
    Ok(())
}
