//! Short link API tests

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::bearer;

#[actix_rt::test]
async fn test_create_with_generated_code() {
    let env = common::test_env().await;
    let (uid, token) = common::sign_up(&env, "gen@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer(&token))
        .set_json(json!({ "url": "https://example.com/page" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    let data = &body["data"];
    assert_eq!(data["generated_code"], true);
    assert_eq!(data["owner_id"], uid.as_str());
    assert_eq!(data["code"].as_str().unwrap().len(), 6);
    assert!(
        data["short_url"]
            .as_str()
            .unwrap()
            .ends_with(data["code"].as_str().unwrap())
    );
}

#[actix_rt::test]
async fn test_anonymous_create_has_no_owner() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .set_json(json!({ "url": "https://example.com", "code": "anon-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["code"], "anon-1");
    assert_eq!(body["data"]["generated_code"], false);
    assert!(body["data"]["owner_id"].is_null());
}

#[actix_rt::test]
async fn test_create_with_invalid_token_is_rejected() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer("expired-or-garbage"))
        .set_json(json!({ "url": "https://example.com", "code": "not-anon" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2002);

    assert!(env.storage.get_link("not-anon").await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_create_rejects_bad_input() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let cases = [
        json!({ "url": "ftp://example.com" }),
        json!({ "url": "not a url" }),
        json!({ "url": "https://example.com", "code": "api" }),
        json!({ "url": "https://example.com", "code": "has space" }),
    ];
    for body in cases {
        let req = TestRequest::post()
            .uri("/api/v1/links")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {}", body);
    }

    // 非法 JSON 同样走统一信封
    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_rt::test]
async fn test_list_and_lookup_by_destination() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "list@example.com").await;
    let app = test_app!(env);

    for (code, url) in [
        ("one", "https://a.example.com"),
        ("two", "https://b.example.com"),
        ("three", "https://a.example.com"),
    ] {
        let req = TestRequest::post()
            .uri("/api/v1/links")
            .insert_header(bearer(&token))
            .set_json(json!({ "url": url, "code": code }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = TestRequest::get()
        .uri("/api/v1/links")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let req = TestRequest::get()
        .uri("/api/v1/links?url=https%3A%2F%2Fa.example.com")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let mut codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["code"].as_str().unwrap())
        .collect();
    codes.sort();
    assert_eq!(codes, vec!["one", "three"]);
}

#[actix_rt::test]
async fn test_list_requires_session() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/api/v1/links").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/api/v1/links")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2002);
}

#[actix_rt::test]
async fn test_archive_enforces_ownership() {
    let env = common::test_env().await;
    let (_, owner_token) = common::sign_up(&env, "owner@example.com").await;
    let (_, other_token) = common::sign_up(&env, "other@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer(&owner_token))
        .set_json(json!({ "url": "https://mine.example.com", "code": "mine" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = TestRequest::post()
        .uri("/api/v1/links/mine/archive")
        .insert_header(bearer(&other_token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = TestRequest::post()
        .uri("/api/v1/links/mine/archive")
        .insert_header(bearer(&owner_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["archived"], true);

    // 归档后不再出现在有效列表中
    let req = TestRequest::get()
        .uri("/api/v1/links")
        .insert_header(bearer(&owner_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = TestRequest::post()
        .uri("/api/v1/links/nope/archive")
        .insert_header(bearer(&owner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);
}

#[actix_rt::test]
async fn test_get_link_and_stats() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "stats@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/links")
        .insert_header(bearer(&token))
        .set_json(json!({ "url": "https://stats.example.com", "code": "st" }))
        .to_request();
    test::call_service(&app, req).await;

    test::call_service(&app, TestRequest::get().uri("/st").to_request()).await;

    let body: Value =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/api/v1/links/st").to_request())
            .await;
    assert_eq!(body["data"]["clicks"], 1);
    assert_eq!(body["data"]["destination_url"], "https://stats.example.com");

    let req = TestRequest::get()
        .uri("/api/v1/links/stats")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_links"], 1);
    assert_eq!(body["data"]["active_links"], 1);
    assert_eq!(body["data"]["total_clicks"], 1);
}
