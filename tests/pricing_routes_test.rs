mod common;

use actix_web::{http::header, test};
use serde_json::json;
use serial_test::serial;

use common::{auth_header, TestApp};

fn preview_body() -> serde_json::Value {
    json!({
        "selection": {
            "service_type": "recurring-cleaning",
            "mode": { "mode": "per_foot", "rate": 4.50 }
        },
        "boat": {
            "length_ft": 35.0,
            "hull": "monohull",
            "vessel": "sailboat",
            "engine": "single"
        },
        "condition": { "paint": "good", "growth_level": 0.0 }
    })
}

#[actix_rt::test]
#[serial]
async fn test_preview_without_auth() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .set_json(&preview_body())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
#[serial]
async fn test_preview_returns_itemized_breakdown() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&preview_body())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["breakdown"]["base_amount"], json!(157.5));
    assert_eq!(body["breakdown"]["final_total"], json!(157.5));
    assert_eq!(body["amount_cents"], json!(15750));
    assert!(body["breakdown"]["surcharges"].as_array().unwrap().is_empty());
}

#[actix_rt::test]
#[serial]
async fn test_preview_composes_surcharges_in_sequence() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = preview_body();
    body["boat"]["hull"] = json!("catamaran");
    body["condition"]["growth_level"] = json!(70.0);

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    // 157.50 x 1.25 x 1.875 with the documented growth tier table.
    assert_eq!(body["breakdown"]["final_total"], json!(369.14));
    assert_eq!(body["amount_cents"], json!(36914));
    assert_eq!(
        body["breakdown"]["surcharges"].as_array().unwrap().len(),
        2
    );
}

#[actix_rt::test]
#[serial]
async fn test_preview_rejects_zero_length() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = preview_body();
    body["boat"]["length_ft"] = json!(0.0);

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[serial]
async fn test_preview_clears_stale_override() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // The discount was recorded against a 157.50 total; the boat length has
    // since changed, so the preview must drop it and say so.
    let mut body = preview_body();
    body["boat"]["length_ft"] = json!(40.0);
    body["price_override"] = json!({
        "mode": "percent",
        "value": 10.0,
        "original_total": 157.50
    });

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["breakdown"]["final_total"], json!(180.0));
    assert_eq!(
        body["override_cleared"],
        json!("Discount cleared due to price change")
    );
}

#[actix_rt::test]
#[serial]
async fn test_preview_applies_current_override() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let mut body = preview_body();
    body["price_override"] = json!({
        "mode": "dollar",
        "value": 50.0,
        "original_total": 157.50
    });

    let req = test::TestRequest::post()
        .uri("/api/pricing/preview")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&body)
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["breakdown"]["final_total"], json!(107.5));
    assert!(body.get("override_cleared").is_none());
}

#[actix_rt::test]
#[serial]
async fn test_quote_requires_customer_id() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Valid pricing input but no customer: rejected before touching storage.
    let req = test::TestRequest::post()
        .uri("/api/pricing/quote")
        .insert_header((header::AUTHORIZATION, auth_header()))
        .set_json(&preview_body())
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
