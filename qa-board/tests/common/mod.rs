#![allow(dead_code)]

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::NormalizePath;
use actix_web::{test, web, App};
use qa_board::config::DatabaseConfig;
use qa_board::routes::configure_routes;
use qa_board::validation::ValidationRules;
use qa_board::{AppState, Database};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const USER_ID: &str = "11111111-1111-1111-1111-111111111111";

pub struct TestApp<S> {
    pub db: Database,
    pub app: S,
    /// Holds the database file of file-backed apps
    _dir: Option<TempDir>,
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    >,
> {
    setup_test_app_with_rules(ValidationRules::default()).await
}

pub async fn setup_test_app_with_rules(
    rules: ValidationRules,
) -> anyhow::Result<
    TestApp<
        impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    >,
> {
    let db = Database::in_memory().await?;
    db.init().await?;
    let app = init_app(db.clone(), rules).await;

    Ok(TestApp {
        db,
        app,
        _dir: None,
    })
}

/// An app over a SQLite file with a multi-connection pool, as the server runs it.
pub async fn setup_file_test_app(
    max_connections: u32,
) -> anyhow::Result<
    TestApp<
        impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    >,
> {
    let dir = tempfile::tempdir()?;
    let db = Database::new(&DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("board.db").display()),
        max_connections,
    })
    .await?;
    db.init().await?;
    let app = init_app(db.clone(), ValidationRules::default()).await;

    Ok(TestApp {
        db,
        app,
        _dir: Some(dir),
    })
}

async fn init_app(
    db: Database,
    rules: ValidationRules,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(db, rules)))
            .wrap(NormalizePath::trim())
            .configure(configure_routes),
    )
    .await
}

/// Sends a request and decodes the body as JSON, `Value::Null` when empty.
pub async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body is not JSON")
    };
    (status, value)
}

pub async fn get<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(app, test::TestRequest::get().uri(uri).to_request()).await
}

pub async fn post<S>(app: &S, uri: &str, payload: Value) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri(uri)
            .set_json(payload)
            .to_request(),
    )
    .await
}

pub async fn delete<S>(app: &S, uri: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(app, test::TestRequest::delete().uri(uri).to_request()).await
}

/// Creates a question through the API and returns its id.
pub async fn create_question<S>(app: &S, text: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = post(app, "/questions/", json!({ "text": text })).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["id"].as_i64().expect("question id")
}

/// Creates an answer under `question_id` through the nested route and returns its id.
pub async fn create_answer<S>(app: &S, question_id: i64, text: &str) -> i64
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = post(
        app,
        &format!("/questions/{question_id}/answers/"),
        json!({ "user_id": USER_ID, "text": text }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["id"].as_i64().expect("answer id")
}
