//! Integration tests for the remind-web server.
//!
//! These tests start a real axum server on a random port with a canned
//! extraction backend and exercise the REST endpoints.

use std::sync::Arc;

use remind_rs::prelude::*;
use remind_web::{ReplyBody, WebConfig, spawn_web};

/// Helper: spawn a test server on port 0 whose backend answers every prompt
/// with `respond(prompt)`.
async fn spawn_test_server(
    respond: impl Fn(&str) -> Result<String, String> + Send + Sync + 'static,
) -> (Arc<ReminderStore>, String) {
    let backend = FnBackend::new(move |req: &CompletionRequest| respond(&req.prompt));
    let store = Arc::new(ReminderStore::new());
    let extractor = ExtractionClient::new(Arc::new(backend), AgentConfig::default());
    let router = MessageRouter::new(store.clone(), Arc::new(extractor));

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
    };
    let addr = spawn_web(router, config).await.unwrap();
    (store, format!("http://{addr}"))
}

fn call_mom(_prompt: &str) -> Result<String, String> {
    Ok("```json\n{\"task\":\"call mom\",\"time\":\"6pm\",\"date\":\"today\"}\n```".into())
}

async fn post(base: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/message"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

// ── POST /api/message ────────────────────────────────────────────────

#[tokio::test]
async fn help_returns_help_text() {
    let (store, base) = spawn_test_server(call_mom).await;

    let resp = post(&base, serde_json::json!({"conversation_id": "a@c.us", "text": "Hello"})).await;
    assert_eq!(resp.status(), 200);
    let body: ReplyBody = resp.json().await.unwrap();
    assert_eq!(body.reply, remind_rs::format::help());
    assert!(store.is_empty());
}

#[tokio::test]
async fn reminder_is_stored_and_confirmed() {
    let (store, base) = spawn_test_server(call_mom).await;

    let resp = post(
        &base,
        serde_json::json!({"conversation_id": "a@c.us", "text": "Remind me to call mom at 6pm"}),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let body: ReplyBody = resp.json().await.unwrap();
    assert!(body.reply.contains("call mom"));
    assert!(body.reply.contains("6pm"));
    assert!(body.reply.contains("today"));

    let records = store.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].conversation_id, "a@c.us");
}

#[tokio::test]
async fn group_message_returns_204_without_side_effects() {
    let (store, base) = spawn_test_server(call_mom).await;

    // Inferred from the id suffix.
    let resp = post(
        &base,
        serde_json::json!({"conversation_id": "123-456@g.us", "text": "call mom at 6pm"}),
    )
    .await;
    assert_eq!(resp.status(), 204);

    // Explicit flag.
    let resp = post(
        &base,
        serde_json::json!({"conversation_id": "room", "text": "help", "is_group": true}),
    )
    .await;
    assert_eq!(resp.status(), 204);

    assert!(store.is_empty());
}

#[tokio::test]
async fn extraction_failure_returns_apology() {
    let (store, base) = spawn_test_server(|_| Ok(r#"{"task":"call mom","time":"6pm"}"#.into())).await;

    let resp = post(&base, serde_json::json!({"conversation_id": "a", "text": "call mom"})).await;
    assert_eq!(resp.status(), 200);
    let body: ReplyBody = resp.json().await.unwrap();
    assert_eq!(body.reply, remind_rs::format::extraction_failed());
    assert!(store.is_empty());
}

#[tokio::test]
async fn blank_conversation_id_is_rejected() {
    let (_store, base) = spawn_test_server(call_mom).await;
    let resp = post(&base, serde_json::json!({"conversation_id": "  ", "text": "hi"})).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn list_and_clear_round_trip() {
    let (store, base) = spawn_test_server(call_mom).await;

    post(&base, serde_json::json!({"conversation_id": "a", "text": "call mom"})).await;
    post(&base, serde_json::json!({"conversation_id": "b", "text": "call mom again"})).await;
    assert_eq!(store.len(), 2);

    // Listing is global: conversation "c" sees reminders from "a" and "b".
    let body: ReplyBody = post(&base, serde_json::json!({"conversation_id": "c", "text": "list"}))
        .await
        .json()
        .await
        .unwrap();
    assert!(body.reply.contains("1. call mom"));
    assert!(body.reply.contains("2. call mom"));

    let body: ReplyBody = post(&base, serde_json::json!({"conversation_id": "c", "text": "clear"}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body.reply, remind_rs::format::cleared());
    assert!(store.is_empty());
}

#[tokio::test]
async fn concurrent_conversations_both_stored() {
    let (store, base) = spawn_test_server(|prompt| {
        let who = if prompt.contains("alice") { "alice" } else { "bob" };
        Ok(format!(r#"{{"task":"{who} task","time":"not specified","date":"today"}}"#))
    })
    .await;

    let requests = ["alice", "bob"].map(|who| {
        post(
            &base,
            serde_json::json!({"conversation_id": who, "text": format!("remind {who}")}),
        )
    });
    let responses = futures::future::join_all(requests).await;
    assert!(responses.iter().all(|r| r.status() == 200));

    let mut tasks: Vec<String> = store.list().into_iter().map(|r| r.task).collect();
    tasks.sort();
    assert_eq!(tasks, vec!["alice task", "bob task"]);
}

// ── GET endpoints ────────────────────────────────────────────────────

#[tokio::test]
async fn get_reminders_returns_snapshot() {
    let (_store, base) = spawn_test_server(call_mom).await;
    post(&base, serde_json::json!({"conversation_id": "a", "text": "call mom"})).await;

    let resp = reqwest::get(format!("{base}/api/reminders")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["task"], "call mom");
    assert_eq!(items[0]["time"], "6pm");
    assert_eq!(items[0]["date"], "today");
    assert_eq!(items[0]["conversation_id"], "a");
    assert_eq!(items[0]["original_text"], "call mom");
    assert!(items[0]["id"].is_u64());
}

#[tokio::test]
async fn health_reports_count() {
    let (_store, base) = spawn_test_server(call_mom).await;

    let json: serde_json::Value = reqwest::get(format!("{base}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["reminders"], 0);
}
