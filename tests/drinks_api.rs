//! End-to-end: router + permission guard + in-memory store.
mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};
use tower::ServiceExt;

use coffee_shop::middleware::auth::requires_auth;

use common::*;

const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];
const BARISTA: &[&str] = &["get:drinks-detail"];

fn latte() -> Value {
    json!({
        "title": "latte",
        "recipe": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]
    })
}

async fn send(app: &Router, req: axum::http::Request<axum::body::Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, json_body(res).await)
}

async fn create_latte(app: &Router) -> i64 {
    let token = token_with(MANAGER);
    let (status, body) = send(app, request("POST", "/api/v1/drinks", Some(&token), Some(latte()))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["drinks"][0]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn guarded_handler_runs_exactly_once_for_a_valid_token() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let probe = get(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            "ok"
        }
    });
    let app: Router = Router::new().route(
        "/probe",
        requires_auth("get:drinks-detail", authorizer(), probe),
    );

    let token = token_with(BARISTA);
    let res = app
        .clone()
        .oneshot(request("GET", "/probe", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // rejected requests never reach the handler
    let res = app.oneshot(request("GET", "/probe", None, None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_header_body() {
    let (status, body) = send(&test_app(), request("GET", "/api/v1/drinks-detail", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": 401,
            "message": {
                "code": "invalid_header",
                "description": "Authorization is not present in the request headers."
            }
        })
    );
}

#[tokio::test]
async fn unknown_kid_is_400_with_invalid_header() {
    let token = sign_with(PRIMARY_PEM, Some("nope"), &claims(MANAGER));
    let (status, body) = send(&test_app(), request("GET", "/api/v1/drinks-detail", Some(&token), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 400);
    assert_eq!(body["message"]["code"], "invalid_header");
    assert_eq!(body["message"]["description"], "Unable to find the appropriate key.");
}

#[tokio::test]
async fn expired_token_is_401_token_expired() {
    let mut c = claims(MANAGER);
    c["exp"] = json!(now() - 60);
    let (status, body) = send(&test_app(), request("GET", "/api/v1/drinks-detail", Some(&sign(&c)), None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"]["code"], "token_expired");
}

#[tokio::test]
async fn barista_cannot_create_or_delete() {
    let app = test_app();
    let id = create_latte(&app).await;
    let token = token_with(BARISTA);

    let (status, body) = send(&app, request("POST", "/api/v1/drinks", Some(&token), Some(latte()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"]["code"], "invalid_permission");

    let (status, _) = send(&app, request("DELETE", &format!("/api/v1/drinks/{id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn token_without_permissions_is_403() {
    let mut c = claims(&[]);
    c.as_object_mut().unwrap().remove("permissions");
    let (status, body) = send(&test_app(), request("GET", "/api/v1/drinks-detail", Some(&sign(&c)), None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], 403);
    assert_eq!(body["message"]["code"], "invalid_permission");
}

#[tokio::test]
async fn public_menu_needs_no_token_and_hides_ingredient_names() {
    let app = test_app();

    let (status, body) = send(&app, request("GET", "/api/v1/drinks", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": 404, "message": "resource not found"}));

    create_latte(&app).await;
    let (status, body) = send(&app, request("GET", "/api/v1/drinks", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["drinks"][0]["recipe"],
        json!([{"color": "brown", "parts": 1}, {"color": "white", "parts": 3}])
    );
}

#[tokio::test]
async fn detail_shows_full_recipe() {
    let app = test_app();
    create_latte(&app).await;

    let token = token_with(BARISTA);
    let (status, body) = send(&app, request("GET", "/api/v1/drinks-detail", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "latte");
    assert_eq!(body["drinks"][0]["recipe"][1]["name"], "milk");
}

#[tokio::test]
async fn create_accepts_a_single_recipe_object() {
    let token = token_with(MANAGER);
    let body = json!({"title": "water", "recipe": {"name": "water", "color": "blue", "parts": 1}});
    let (status, body) = send(&test_app(), request("POST", "/api/v1/drinks", Some(&token), Some(body))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_rejects_bad_bodies() {
    let app = test_app();
    let token = token_with(MANAGER);
    create_latte(&app).await;

    // duplicate title
    let (status, body) = send(&app, request("POST", "/api/v1/drinks", Some(&token), Some(latte()))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], 422);

    let (status, _) = send(&app, request("POST", "/api/v1/drinks", Some(&token), Some(json!({"title": "mocha"})))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        request("POST", "/api/v1/drinks", Some(&token), Some(json!({"title": "mocha", "recipe": []}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let malformed = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/drinks")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], 400);
}

#[tokio::test]
async fn patch_updates_title_and_keeps_recipe() {
    let app = test_app();
    let id = create_latte(&app).await;
    let token = token_with(MANAGER);

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/api/v1/drinks/{id}"), Some(&token), Some(json!({"title": "flat white"}))),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["id"], id);
    assert_eq!(body["drinks"][0]["title"], "flat white");
    assert_eq!(body["drinks"][0]["recipe"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn patch_and_delete_unknown_ids_are_404() {
    let app = test_app();
    let token = token_with(MANAGER);

    let (status, _) = send(
        &app,
        request("PATCH", "/api/v1/drinks/999", Some(&token), Some(json!({"title": "x"}))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", "/api/v1/drinks/999", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", "/api/v1/drinks/abc", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_the_drink() {
    let app = test_app();
    let id = create_latte(&app).await;
    let token = token_with(MANAGER);

    let (status, body) = send(&app, request("DELETE", &format!("/api/v1/drinks/{id}"), Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "delete": id}));

    let (status, _) = send(&app, request("GET", "/api/v1/drinks", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let app = test_app();

    let (status, body) = send(&app, request("GET", "/api/v1/tea", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], 404);

    let (status, body) = send(&app, request("PUT", "/api/v1/drinks", None, None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], 405);
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(&test_app(), request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn malformed_id_is_404_even_without_a_token() {
    let app = test_app();

    for (method, uri) in [
        ("PATCH", "/api/v1/drinks/abc"),
        ("DELETE", "/api/v1/drinks/abc"),
        ("DELETE", "/api/v1/drinks/0"),
    ] {
        let (status, body) = send(&app, request(method, uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["message"], "resource not found");
    }

    // well-formed id still goes through the guard
    let (status, _) = send(&app, request("DELETE", "/api/v1/drinks/7", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
