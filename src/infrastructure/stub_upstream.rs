// In-process stand-in for the upstream auth API, used by tests
use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};

pub const VALID_TOKEN: &str = "valid-token";
/// Accepted token whose user no longer exists
pub const GHOST_TOKEN: &str = "ghost-token";

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn authorized(headers: &HeaderMap) -> Result<&str, Response> {
    match bearer(headers) {
        Some(token) if token == VALID_TOKEN || token == GHOST_TOKEN => Ok(token),
        Some(_) => Err(message(StatusCode::UNAUTHORIZED, "Unauthorized")),
        None => Err(message(StatusCode::UNAUTHORIZED, "No token provided")),
    }
}

fn profile() -> Value {
    json!({
        "_id": "u1",
        "email": "ana@example.com",
        "name": "Ana",
        "profilePic": "https://example.com/ana.png",
        "provider": "google",
        "googleId": "g-1"
    })
}

async fn airdata(headers: HeaderMap) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    Json(json!([
        { "_id": "a", "date": "2020-01-01", "aqi": 80, "pm25": 30 },
        { "_id": "b", "date": "2021-01-01T00:00:00.000Z", "aqi": "90", "pm25": 40 },
        { "_id": "c", "date": "2022-01-01", "aqi": 100, "pm25": "n/a" },
        { "_id": "d", "date": "someday", "aqi": 60, "pm25": 20 }
    ]))
    .into_response()
}

async fn user(headers: HeaderMap) -> Response {
    match authorized(&headers) {
        Ok(GHOST_TOKEN) => Json(Value::Null).into_response(),
        Ok(_) => Json(profile()).into_response(),
        Err(response) => response,
    }
}

async fn login(Json(body): Json<Value>) -> Response {
    match (body["email"].as_str(), body["password"].as_str()) {
        (Some("ana@example.com"), Some("secret")) => Json(json!({ "token": VALID_TOKEN })).into_response(),
        (Some("ana@example.com"), _) => message(StatusCode::BAD_REQUEST, "Wrong password"),
        _ => message(StatusCode::BAD_REQUEST, "User not found"),
    }
}

async fn signup(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("ana@example.com") => message(StatusCode::BAD_REQUEST, "User already exists"),
        _ => message(StatusCode::OK, "Signup successful"),
    }
}

async fn update(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    let mut updated = profile();
    updated["name"] = body["name"].clone();
    updated["profilePic"] = body["profilePic"].clone();
    Json(updated).into_response()
}

async fn change_password(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(response) = authorized(&headers) {
        return response;
    }
    match body["currentPassword"].as_str() {
        Some("secret") => message(StatusCode::OK, "Password updated successfully"),
        Some("boom") => message(StatusCode::INTERNAL_SERVER_ERROR, "Password update failed"),
        _ => message(StatusCode::BAD_REQUEST, "Wrong current password"),
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/api/airdata", get(airdata))
        .route("/api/user", get(user))
        .route("/api/login", post(login))
        .route("/api/signup", post(signup))
        .route("/api/user/update", put(update))
        .route("/api/user/change-password", put(change_password))
}

/// Serve `router` on an ephemeral port and return its base URL
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

pub async fn spawn_stub() -> String {
    serve(router()).await
}
