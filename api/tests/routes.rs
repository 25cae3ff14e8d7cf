use std::sync::Arc;

use ai_llm_service::ChatMessage;
use api::{AppState, ServerConfig, X_REQUEST_ID, router};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chat_store::{
    ChatStore, Interaction, NewInteraction, Rating, RatingOutcome, SqliteChatStore, StoreConfig,
    StoreError, StoredMessage, StoreFuture,
};
use contextor::{
    ChatModel, ChatPipeline, ContextorConfig, ContextorError, Embedder, SnippetIndex,
    SnippetNamespace, ports::PortFuture,
};
use rag_base::CourseSnippet;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct StubModel {
    fail: bool,
}

impl ChatModel for StubModel {
    fn answer<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String> {
        let out = if self.fail {
            Err(ContextorError::Config("completion backend unavailable".into()))
        } else {
            // Echo the student's question so tests can tell turns apart.
            let question = messages[messages.len() - 2].content.clone();
            Ok(format!("answer to {question}"))
        };
        Box::pin(async move { out })
    }

    fn correct<'a>(&'a self, messages: &'a [ChatMessage]) -> PortFuture<'a, String> {
        let text = messages[0].content.clone();
        Box::pin(async move { Ok(text) })
    }
}

struct StubEmbedder {
    fail: bool,
}

impl Embedder for StubEmbedder {
    fn embed<'a>(&'a self, _: &'a str) -> PortFuture<'a, Vec<f32>> {
        let out = if self.fail {
            Err(ContextorError::Config("embeddings backend unavailable".into()))
        } else {
            Ok(vec![0.0; 4])
        };
        Box::pin(async move { out })
    }
}

struct StubIndex;
struct StubNamespace;

impl SnippetIndex for StubIndex {
    fn open<'a>(&'a self) -> PortFuture<'a, Box<dyn SnippetNamespace>> {
        Box::pin(async { Ok(Box::new(StubNamespace) as Box<dyn SnippetNamespace>) })
    }
}

impl SnippetNamespace for StubNamespace {
    fn query<'a>(&'a self, _: Vec<f32>, _: usize) -> PortFuture<'a, Vec<CourseSnippet>> {
        Box::pin(async {
            Ok(vec![CourseSnippet {
                id: "1".into(),
                score: 0.7,
                metadata: json!({ "text": "risk matrix" }),
            }])
        })
    }
}

/// Store whose every call fails.
struct BrokenStore;

fn broken<T>() -> Result<T, StoreError> {
    Err(StoreError::Config("database unavailable".into()))
}

impl ChatStore for BrokenStore {
    fn append<'a>(&'a self, _: NewInteraction) -> StoreFuture<'a, Interaction> {
        Box::pin(async { broken() })
    }

    fn session_interactions<'a>(&'a self, _: &'a str, _: usize) -> StoreFuture<'a, Vec<Interaction>> {
        Box::pin(async { broken() })
    }

    fn recent_messages<'a>(
        &'a self,
        _: Option<&'a str>,
        _: usize,
    ) -> StoreFuture<'a, Vec<StoredMessage>> {
        Box::pin(async { broken() })
    }

    fn rate<'a>(&'a self, _: Uuid, _: Rating) -> StoreFuture<'a, RatingOutcome> {
        Box::pin(async { broken() })
    }

    fn ping<'a>(&'a self) -> StoreFuture<'a, ()> {
        Box::pin(async { broken() })
    }
}

fn app_with(store: Arc<dyn ChatStore>, fail_model: bool) -> Router {
    app_from(store, StubModel { fail: fail_model }, StubEmbedder { fail: false })
}

fn app_from(store: Arc<dyn ChatStore>, model: StubModel, embedder: StubEmbedder) -> Router {
    let pipeline = ChatPipeline::new(
        Arc::new(model),
        Arc::new(embedder),
        Arc::new(StubIndex),
        store.clone(),
        ContextorConfig::default(),
    );
    let config = ServerConfig {
        address: "127.0.0.1:0".into(),
        history_limit: 20,
    };
    router(Arc::new(AppState::new(pipeline, store, None, config)))
}

async fn app(fail_model: bool) -> Router {
    let store = SqliteChatStore::connect(&StoreConfig::in_memory())
        .await
        .unwrap();
    app_with(Arc::new(store), fail_model)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn blank_message_is_400() {
    let app = app(false).await;
    let (status, body) = send(&app, post_json("/api/chat", json!({ "message": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn missing_message_and_malformed_json_are_400() {
    let app = app(false).await;
    let (status, _) = send(&app, post_json("/api/chat", json!({ "sessionId": "s1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message is required");
}

#[tokio::test]
async fn chat_answers_and_returns_ids() {
    let app = app(false).await;
    let (status, body) = send(
        &app,
        post_json("/api/chat", json!({ "message": "What is risk?", "sessionId": "s1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "answer to What is risk?");
    assert_eq!(body["sessionId"], "s1");
    assert!(Uuid::parse_str(body["messageId"].as_str().unwrap()).is_ok());
    assert_eq!(body["history"][0]["role"], "system");
    assert_eq!(body["history"][1]["content"], "What is risk?");
}

#[tokio::test]
async fn downstream_failure_is_500_and_stores_nothing() {
    let app = app(true).await;
    let (status, body) = send(
        &app,
        post_json("/api/chat", json!({ "message": "hello", "sessionId": "s1" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
    assert!(body["reply"].is_null());
    assert_eq!(body["history"], json!([]));

    let (_, history) = send(&app, get("/api/chat-history")).await;
    assert_eq!(history["history"], json!([]));
}

#[tokio::test]
async fn embedding_failure_is_500_and_stores_nothing() {
    let store = SqliteChatStore::connect(&StoreConfig::in_memory())
        .await
        .unwrap();
    let app = app_from(
        Arc::new(store),
        StubModel { fail: false },
        StubEmbedder { fail: true },
    );

    let (status, body) = send(
        &app,
        post_json("/api/chat", json!({ "message": "what is a threat?", "sessionId": "s1" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["reply"].is_null());

    let (_, history) = send(&app, get("/api/chat-history?sessionId=s1")).await;
    assert_eq!(history["history"], json!([]));
}

#[tokio::test]
async fn history_is_chronological() {
    let app = app(false).await;
    for q in ["first", "second"] {
        let (status, _) = send(
            &app,
            post_json("/api/chat", json!({ "message": q, "sessionId": "s1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, get("/api/chat-history?sessionId=s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["history"],
        json!([
            { "sender": "user", "text": "first" },
            { "sender": "bot", "text": "answer to first" },
            { "sender": "user", "text": "second" },
            { "sender": "bot", "text": "answer to second" },
        ])
    );

    let (_, other) = send(&app, get("/api/chat-history?sessionId=nobody")).await;
    assert_eq!(other["history"], json!([]));
}

#[tokio::test]
async fn history_with_failing_store_is_empty_200() {
    let app = app_with(Arc::new(BrokenStore), false);
    let (status, body) = send(&app, get("/api/chat-history")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "history": [] }));
}

#[tokio::test]
async fn rating_is_accepted_once() {
    let app = app(false).await;
    let (_, chat) = send(
        &app,
        post_json("/api/chat", json!({ "message": "What is a CVE?" })),
    )
    .await;
    let id = chat["messageId"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json("/api/rate-message", json!({ "messageId": id, "rating": "helpful" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "messageId": id, "rating": "helpful" }));

    let (status, _) = send(
        &app,
        post_json("/api/rate-message", json!({ "messageId": id, "rating": "unhelpful" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn rating_rejects_bad_input() {
    let app = app(false).await;

    let (status, _) = send(
        &app,
        post_json(
            "/api/rate-message",
            json!({ "messageId": Uuid::new_v4().to_string(), "rating": "meh" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post_json("/api/rate-message", json!({ "messageId": "42", "rating": "helpful" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post_json(
            "/api/rate-message",
            json!({ "messageId": Uuid::new_v4().to_string(), "rating": "helpful" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn health_reports_store_state() {
    let (status, body) = send(&app(false).await, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], true);

    let (status, body) = send(&app_with(Arc::new(BrokenStore), false), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["store"], false);
}

#[tokio::test]
async fn request_id_is_generated_or_propagated() {
    let app = app(false).await;

    let res = app.clone().oneshot(get("/health")).await.unwrap();
    let generated = res.headers().get(X_REQUEST_ID).unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(generated).is_ok());

    let req = Request::builder()
        .uri("/health")
        .header(X_REQUEST_ID, "trace-abc")
        .body(Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.headers().get(X_REQUEST_ID).unwrap(), "trace-abc");
}
