//! Drives `ApiClient` against a stub server that mimics the API's responses.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use sns_sdk::{ApiClient, ClientError, ListQuery, Session};

#[derive(Clone, Default)]
struct Stub {
    profile_reads: Arc<AtomicUsize>,
    icon_reads: Arc<AtomicUsize>,
    post_reads: Arc<AtomicUsize>,
    owner_post_reads: Arc<AtomicUsize>,
}

fn reads(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

const TOKEN: &str = "alice-id-token";

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(TOKEN)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" })))
}

async fn get_profile(State(stub): State<Stub>, headers: HeaderMap, Path(owner): Path<String>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    stub.profile_reads.fetch_add(1, Ordering::SeqCst);
    match owner.as_str() {
        "alice" => (StatusCode::OK, Json(json!({ "profile": "original" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

async fn put_profile(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(body))
}

fn post_json(id: i64, content: &str) -> Value {
    json!({
        "id": id,
        "type": "post",
        "content": content,
        "user": { "username": "alice", "iconImage": "" },
        "postedAt": "2024-04-22T12:00:00Z",
        "likeCount": 0,
        "isLiked": false
    })
}

async fn list_posts(State(stub): State<Stub>) -> Json<Value> {
    stub.post_reads.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "Items": [post_json(1, "hello world")] }))
}

async fn list_owner_posts(State(stub): State<Stub>, Path(owner): Path<String>) -> Json<Value> {
    stub.owner_post_reads.fetch_add(1, Ordering::SeqCst);
    let items = if owner == "alice" { vec![post_json(1, "hello world")] } else { vec![] };
    Json(json!({ "Items": items }))
}

async fn create_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(post_json(2, body["content"].as_str().unwrap_or_default())))
}

async fn update_post(Path(id): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match id.parse::<i64>() {
        Ok(id) => (StatusCode::OK, Json(post_json(id, body["content"].as_str().unwrap_or_default()))),
        Err(_) => (StatusCode::BAD_REQUEST, Json(json!({ "message": "Bad Request" }))),
    }
}

async fn delete_post() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn get_icon(State(stub): State<Stub>, Path(owner): Path<String>) -> (StatusCode, Json<Value>) {
    stub.icon_reads.fetch_add(1, Ordering::SeqCst);
    match owner.as_str() {
        "alice" => (StatusCode::OK, Json(json!({ "iconImage": "alice.png" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))),
    }
}

async fn put_icon(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn unlike(Path(post_id): Path<i32>) -> (StatusCode, Json<Value>) {
    match post_id {
        1 => (StatusCode::OK, Json(json!({ "likeCount": 0, "isLiked": false }))),
        _ => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "message": "Unprocessable Entity" }))),
    }
}

async fn like(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["postid"].as_i64() {
        Some(1) => (StatusCode::CREATED, Json(json!({ "likeCount": 1, "isLiked": true }))),
        _ => (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "message": "Unprocessable Entity" }))),
    }
}

async fn serve(stub: Stub) -> String {
    let app = Router::new()
        .route("/api/profiles/{owner}", get(get_profile))
        .route("/api/profiles", put(put_profile))
        .route("/api/icons/{owner}", get(get_icon))
        .route("/api/icons", put(put_icon))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/{target}", get(list_owner_posts).put(update_post).delete(delete_post))
        .route("/api/likes", post(like))
        .route("/api/likes/{postid}", delete(unlike))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn refresh(client: &ApiClient) {
    client.list_posts(ListQuery::default()).await.unwrap();
    client.list_owner_posts("alice", ListQuery::default()).await.unwrap();
}

fn alice(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, reqwest::Client::new()).with_session(Session::new("alice", TOKEN))
}

#[tokio::test]
async fn test_profile_is_cached_and_refreshed_by_update() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    assert_eq!(client.get_profile("alice").await.unwrap(), "original");
    assert_eq!(client.get_profile("alice").await.unwrap(), "original");
    assert_eq!(reads(&stub.profile_reads), 1);

    let mut seen = None;
    let saved = client.update_profile_with("updated", |p| seen = Some(p.to_string())).await.unwrap();
    assert_eq!(saved, "updated");
    assert_eq!(seen.as_deref(), Some("updated"));

    assert_eq!(client.get_profile("alice").await.unwrap(), "updated");
    assert_eq!(reads(&stub.profile_reads), 1);
}

#[tokio::test]
async fn test_errors_carry_status_and_message() {
    let client = alice(&serve(Stub::default()).await);

    let missing = client.get_profile("ghost").await.unwrap_err();
    assert_eq!(missing, ClientError::Http { status: 404, message: "Not Found".to_string() });

    let mut called = false;
    let rejected = client.like_with(2, |_| called = true).await.unwrap_err();
    assert_eq!(rejected.status(), Some(422));
    assert!(!called);
}

#[tokio::test]
async fn test_like_invalidates_post_lists() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    let posts = client.list_posts(ListQuery::default()).await.unwrap();
    assert_eq!(posts[0].content, "hello world");
    client.list_posts(ListQuery::default()).await.unwrap();
    assert_eq!(reads(&stub.post_reads), 1);

    let result = client.like(1).await.unwrap();
    assert_eq!(result.like_count, 1);
    assert!(result.is_liked);

    client.list_posts(ListQuery::default()).await.unwrap();
    assert_eq!(reads(&stub.post_reads), 2);
}

#[tokio::test]
async fn test_signed_out_calls_fail_without_a_request() {
    let stub = Stub::default();
    let client = ApiClient::new(serve(stub.clone()).await, reqwest::Client::new());

    assert_eq!(client.get_profile("alice").await.unwrap_err(), ClientError::MissingSession);
    assert_eq!(client.update_profile("x").await.unwrap_err(), ClientError::MissingSession);
    assert_eq!(reads(&stub.profile_reads), 0);
}

#[tokio::test]
async fn test_network_failure() {
    let client = alice("http://127.0.0.1:1");
    assert!(matches!(client.like(1).await, Err(ClientError::Network(_))));
}

#[tokio::test]
async fn test_usernames_are_sent_as_one_path_segment() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    for name in ["alice?x=1", "alice/", "a/b", "alice#top"] {
        let err = client.get_profile(name).await.unwrap_err();
        assert_eq!(err.status(), Some(404), "{}", name);
    }

    assert_eq!(client.get_profile("alice").await.unwrap(), "original");
    assert_eq!(client.get_icon("alice").await.unwrap(), "alice.png");
}

#[tokio::test]
async fn test_icon_update_writes_cache_and_invalidates_post_lists() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    assert_eq!(client.get_icon("alice").await.unwrap(), "alice.png");
    client.list_posts(ListQuery::default()).await.unwrap();
    client.list_owner_posts("alice", ListQuery::default()).await.unwrap();

    let mut seen = None;
    let saved = client.update_icon_with("new.png", |icon| seen = Some(icon.to_string())).await.unwrap();
    assert_eq!(saved, "new.png");
    assert_eq!(seen.as_deref(), Some("new.png"));

    assert_eq!(client.get_icon("alice").await.unwrap(), "new.png");
    assert_eq!(reads(&stub.icon_reads), 1);

    client.list_posts(ListQuery::default()).await.unwrap();
    client.list_owner_posts("alice", ListQuery::default()).await.unwrap();
    assert_eq!(reads(&stub.post_reads), 2);
    assert_eq!(reads(&stub.owner_post_reads), 2);
}

#[tokio::test]
async fn test_unlike_invalidates_post_lists() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    client.list_posts(ListQuery::default()).await.unwrap();

    let mut seen = None;
    let result = client.unlike_with(1, |r| seen = Some(*r)).await.unwrap();
    assert_eq!(result.like_count, 0);
    assert!(!result.is_liked);
    assert_eq!(seen, Some(result));

    assert_eq!(client.unlike(7).await.unwrap_err().status(), Some(422));

    client.list_posts(ListQuery::default()).await.unwrap();
    assert_eq!(reads(&stub.post_reads), 2);
}

#[tokio::test]
async fn test_post_mutations_invalidate_both_lists() {
    let stub = Stub::default();
    let client = alice(&serve(stub.clone()).await);

    refresh(&client).await;
    refresh(&client).await;
    assert_eq!((reads(&stub.post_reads), reads(&stub.owner_post_reads)), (1, 1));

    let created = client.create_post("second post").await.unwrap();
    assert_eq!((created.id, created.content.as_str()), (2, "second post"));
    refresh(&client).await;
    assert_eq!((reads(&stub.post_reads), reads(&stub.owner_post_reads)), (2, 2));

    let mut updated_id = None;
    client.update_post_with(2, "edited", |post| updated_id = Some(post.id)).await.unwrap();
    assert_eq!(updated_id, Some(2));
    refresh(&client).await;
    assert_eq!((reads(&stub.post_reads), reads(&stub.owner_post_reads)), (3, 3));

    let mut deleted = false;
    client.delete_post_with(2, || deleted = true).await.unwrap();
    assert!(deleted);
    refresh(&client).await;
    assert_eq!((reads(&stub.post_reads), reads(&stub.owner_post_reads)), (4, 4));
}
