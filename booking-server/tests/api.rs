use axum::Router;
use axum::body::Body;
use booking_server::{AppState, api};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    api::build_app(AppState::in_memory(), &["http://localhost:3000".to_string()])
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn promo(code: &str, discount_type: &str, value: f64, min: f64) -> Value {
    json!({
        "code": code,
        "discount_type": discount_type,
        "discount_value": value,
        "min_order_amount": min,
        "valid_until": "2099-12-31"
    })
}

async fn create_promo(app: &Router, body: Value) -> Value {
    let (status, resp) = call(app, Method::POST, "/promo/create", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{resp}");
    resp["data"].clone()
}

#[tokio::test]
async fn test_create_promo_returns_created_envelope() {
    let app = app();
    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/create",
        Some(promo(" save10 ", "percentage", 10.0, 1000.0)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["success"], true);
    assert_eq!(resp["code"], 0);
    assert_eq!(resp["message"], "Promo code created successfully");
    assert_eq!(resp["data"]["code"], "SAVE10");
    assert_eq!(resp["data"]["discount_type"], "percentage");
    assert_eq!(resp["data"]["discount_value"], 10.0);
    assert_eq!(resp["data"]["is_active"], true);
}

#[tokio::test]
async fn test_duplicate_code_conflicts() {
    let app = app();
    create_promo(&app, promo("SAVE10", "percentage", 10.0, 0.0)).await;

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/create",
        Some(promo("save10", "fixed", 50.0, 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["success"], false);
    assert_eq!(resp["code"], 1004);
}

#[tokio::test]
async fn test_create_rejects_missing_fields() {
    let app = app();
    let (status, resp) = call(&app, Method::POST, "/promo/create", Some(json!({"code": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp["message"],
        "Code, discount_type, discount_value, and valid_until are required fields"
    );

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/create",
        Some(promo("BAD", "bogus", 10.0, 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Discount type must be either 'percentage' or 'fixed'");
}

#[tokio::test]
async fn test_validate_applies_discount() {
    let app = app();
    create_promo(&app, promo("SAVE10", "percentage", 10.0, 1000.0)).await;
    create_promo(&app, promo("FLAT100", "fixed", 100.0, 500.0)).await;

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "save10", "order_amount": 2000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Promo code applied successfully");
    assert_eq!(resp["data"]["promo_code"], "SAVE10");
    assert_eq!(resp["data"]["discount_amount"], 200.0);
    assert_eq!(resp["data"]["original_amount"], 2000.0);
    assert_eq!(resp["data"]["final_amount"], 1800.0);

    let (_, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "FLAT100", "order_amount": "500"})),
    )
    .await;
    assert_eq!(resp["data"]["discount_amount"], 100.0);
    assert_eq!(resp["data"]["final_amount"], 400.0);
}

#[tokio::test]
async fn test_validate_errors() {
    let app = app();
    create_promo(&app, promo("SAVE10", "percentage", 10.0, 1000.0)).await;

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "SAVE10", "order_amount": 50})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["code"], 1003);
    assert_eq!(resp["message"], "Minimum order amount of 1000.00 required for this promo");
    assert_eq!(resp["details"]["min_order_amount"], 1000.0);

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "NOPE", "order_amount": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["message"], "Invalid promo code");

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"order_amount": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Promo code is required");

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "SAVE10", "order_amount": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Valid order amount is required");
}

#[tokio::test]
async fn test_validate_rejects_oversized_amount() {
    let app = app();
    create_promo(&app, promo("SAVE10", "percentage", 10.0, 0.0)).await;

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "SAVE10", "order_amount": "79228162514264337593543950335"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], false);
    assert_eq!(resp["code"], 9);
    assert_eq!(resp["details"]["field"], "order_amount");
}

#[tokio::test]
async fn test_confirm_rejects_oversized_booking() {
    let app = app();
    let (_, resp) = call(
        &app,
        Method::POST,
        "/experiences/create",
        Some(json!({"title": "Boat Cruise", "price": 1000})),
    )
    .await;
    let id = resp["data"]["id"].as_i64().unwrap();

    let (status, resp) = call(
        &app,
        Method::POST,
        "/checkout/confirm",
        Some(json!({
            "booking": {
                "experience_id": id,
                "quantity": 4000000000u32,
                "price": 7.0e28,
                "timestamp": chrono::Utc::now().timestamp_millis()
            },
            "full_name": "Asha Rao",
            "email": "asha@example.com",
            "agreed_to_terms": true,
            "promo_code": "SAVE10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
    assert_eq!(resp["success"], false);
    assert_eq!(resp["code"], 9);
}

#[tokio::test]
async fn test_preview_reports_inactive() {
    let app = app();
    let mut body = promo("OLD", "fixed", 50.0, 0.0);
    body["is_active"] = json!(false);
    create_promo(&app, body).await;

    let (status, resp) = call(
        &app,
        Method::POST,
        "/promo/preview",
        Some(json!({"code": "old", "order_amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["status"], "inactive");
    assert_eq!(resp["message"], "This promo code is inactive");

    // validate still treats it as unknown
    let (status, _) = call(
        &app,
        Method::POST,
        "/promo/validate",
        Some(json!({"code": "old", "order_amount": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_all_counts_and_filters() {
    let app = app();
    create_promo(&app, promo("A1", "fixed", 10.0, 0.0)).await;
    let mut inactive = promo("B2", "fixed", 10.0, 0.0);
    inactive["is_active"] = json!(false);
    create_promo(&app, inactive).await;

    let (status, resp) = call(&app, Method::GET, "/promo/get-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["count"], 2);
    assert_eq!(resp["data"][0]["code"], "B2");

    let (_, resp) = call(&app, Method::GET, "/promo/get-all?active_only=true", None).await;
    assert_eq!(resp["count"], 1);
    assert_eq!(resp["data"][0]["code"], "A1");

    let (_, resp) = call(&app, Method::GET, "/promo/get-all?active_only=yes", None).await;
    assert_eq!(resp["count"], 2);
}

#[tokio::test]
async fn test_promo_get_update_delete() {
    let app = app();
    let created = create_promo(&app, promo("SPRING", "percentage", 15.0, 0.0)).await;
    let id = created["id"].as_i64().unwrap();

    let (status, resp) = call(&app, Method::GET, &format!("/promo/get/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["code"], "SPRING");

    let (status, resp) = call(
        &app,
        Method::PUT,
        &format!("/promo/update/{id}"),
        Some(json!({"discount_value": 20, "is_active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Promo code updated successfully");
    assert_eq!(resp["data"]["discount_value"], 20.0);
    assert_eq!(resp["data"]["is_active"], false);

    let (status, resp) = call(&app, Method::DELETE, &format!("/promo/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "Promo code deleted successfully");
    assert!(resp.get("data").is_none());

    let (status, resp) = call(&app, Method::GET, &format!("/promo/get/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["code"], 1005);

    let (status, _) = call(&app, Method::DELETE, &format!("/promo/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_use_envelope() {
    let app = app();

    let (status, resp) = call(&app, Method::GET, "/promo/get/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["success"], false);
    assert_eq!(resp["code"], 5);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/promo/validate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_crud() {
    let app = app();
    let (status, resp) = call(
        &app,
        Method::POST,
        "/experiences/create",
        Some(json!({
            "title": "Scuba Diving",
            "description": "Explore the underwater world",
            "image_url": "https://images.example.com/scuba.jpg",
            "price": 2499
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["message"], "Listing created successfully");
    let id = resp["data"]["id"].as_i64().unwrap();

    let (_, resp) = call(&app, Method::GET, "/experiences/experiences", None).await;
    assert_eq!(resp["count"], 1);

    let (status, resp) = call(
        &app,
        Method::PUT,
        &format!("/experiences/update/{id}"),
        Some(json!({"price": 1999})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["data"]["price"], 1999.0);
    assert_eq!(resp["data"]["title"], "Scuba Diving");

    let (status, _) = call(&app, Method::DELETE, &format!("/experiences/delete/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = call(&app, Method::GET, &format!("/experiences/experiences/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(resp["code"], 2001);
}

#[tokio::test]
async fn test_checkout_quote_with_promo() {
    let app = app();
    create_promo(&app, promo("SAVE10", "percentage", 10.0, 1000.0)).await;
    let (_, resp) = call(
        &app,
        Method::POST,
        "/experiences/create",
        Some(json!({"title": "Boat Cruise", "price": 1000})),
    )
    .await;
    let id = resp["data"]["id"].as_i64().unwrap();

    let (status, resp) = call(
        &app,
        Method::POST,
        "/checkout/quote",
        Some(json!({"experience_id": id, "quantity": 2, "promo_code": "save10"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{resp}");
    assert_eq!(resp["data"]["subtotal"], 2000.0);
    assert_eq!(resp["data"]["taxes"], 120.0);
    assert_eq!(resp["data"]["discount"], 200.0);
    assert_eq!(resp["data"]["total"], 1920.0);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "booking-server");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["store"]["status"], "ok");
}
