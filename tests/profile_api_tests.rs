//! Profile, landing page and file API tests

#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{Value, json};

use common::bearer;

const BOUNDARY: &str = "----shrt-test-boundary";

fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_header() -> (&'static str, String) {
    (
        "Content-Type",
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}

#[actix_rt::test]
async fn test_profile_update_and_public_page() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "page@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::patch()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&token))
        .set_json(json!({
            "username": "jane",
            "display_name": "Jane Doe",
            "title": "Engineer",
            "social": { "github": "janedoe" }
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "jane");

    let req = TestRequest::post()
        .uri("/api/v1/me/plp")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Blog", "url": "https://jane.example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, TestRequest::get().uri("/user/jane").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let page = &body["data"];
    assert_eq!(page["display_name"], "Jane Doe");
    assert_eq!(page["links"][0]["title"], "Blog");
    assert_eq!(page["social"][0]["href"], "https://github.com/janedoe");
    assert_eq!(page["avatar_url"], "/gvempire-logo.png");
}

#[actix_rt::test]
async fn test_unknown_public_page_is_404() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let resp = test::call_service(&app, TestRequest::get().uri("/user/ghost").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4000);
}

#[actix_rt::test]
async fn test_invalid_username_rejected() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "badname@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::patch()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "username": ".hidden" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_plp_update_archive_and_ownership() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "plp@example.com").await;
    let (_, other) = common::sign_up(&env, "plp-other@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::post()
        .uri("/api/v1/me/plp")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Shop", "url": "https://shop.example.com" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = TestRequest::patch()
        .uri(&format!("/api/v1/me/plp/{}", id))
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "Store", "order": 3 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["title"], "Store");
    assert_eq!(body["data"]["order"], 3);

    let req = TestRequest::post()
        .uri(&format!("/api/v1/me/plp/{}/archive", id))
        .insert_header(bearer(&other))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = TestRequest::post()
        .uri(&format!("/api/v1/me/plp/{}/archive", id))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri("/api/v1/me/plp")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let req = TestRequest::patch()
        .uri("/api/v1/me/plp/does-not-exist")
        .insert_header(bearer(&token))
        .set_json(json!({ "title": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 4003);
}

#[actix_rt::test]
async fn test_avatar_upload_and_download() {
    let env = common::test_env().await;
    let (uid, token) = common::sign_up(&env, "pics@example.com").await;
    let app = test_app!(env);

    let png = b"\x89PNG\r\n\x1a\nfake-image-bytes";
    let req = TestRequest::put()
        .uri("/api/v1/me/files/avatar")
        .insert_header(bearer(&token))
        .insert_header(multipart_header())
        .set_payload(multipart_body("me.png", "image/png", png))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["size"], png.len());

    let uri = format!("/files/users/{}/profile/avatar", uid);
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("Content-Type").unwrap(), "image/png");
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], &png[..]);

    assert_eq!(
        env.ctx.profiles.image_url(&uid, "avatar").await.unwrap(),
        uri
    );
}

#[actix_rt::test]
async fn test_avatar_rejects_non_image() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "gif@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::put()
        .uri("/api/v1/me/files/avatar")
        .insert_header(bearer(&token))
        .insert_header(multipart_header())
        .set_payload(multipart_body("me.gif", "image/gif", b"GIF89a"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_rt::test]
async fn test_missing_file_is_404() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri("/files/users/nobody/profile/avatar")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_non_image_upload_downloads_as_attachment() {
    let env = common::test_env().await;
    let (uid, token) = common::sign_up(&env, "html@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::put()
        .uri("/api/v1/me/files/page")
        .insert_header(bearer(&token))
        .insert_header(multipart_header())
        .set_payload(multipart_body(
            "page.html",
            "text/html",
            b"<script>alert(1)</script>",
        ))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let uri = format!("/files/users/{}/profile/page", uid);
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/octet-stream"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment"
    );
}

#[actix_rt::test]
async fn test_profile_email_change_syncs_account() {
    let env = common::test_env().await;
    let (_, token) = common::sign_up(&env, "old@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::patch()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&token))
        .set_json(json!({ "contact": { "email": "New@Example.com" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["contact"]["email"], "new@example.com");

    let req = TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "new@example.com");

    let req = TestRequest::post()
        .uri("/api/v1/auth/sign-in")
        .set_json(json!({ "email": "new@example.com", "password": "correct-horse" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::post()
        .uri("/api/v1/auth/sign-in")
        .set_json(json!({ "email": "old@example.com", "password": "correct-horse" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_rt::test]
async fn test_taken_username_leaves_email_unchanged() {
    let env = common::test_env().await;
    let (_, alice) = common::sign_up(&env, "alice@example.com").await;
    let (_, bob) = common::sign_up(&env, "bob@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::patch()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&alice))
        .set_json(json!({ "username": "alice" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::patch()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&bob))
        .set_json(json!({
            "username": "alice",
            "contact": { "email": "bob-new@example.com" }
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let req = TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["email"], "bob@example.com");

    let req = TestRequest::get()
        .uri("/api/v1/me/profile")
        .insert_header(bearer(&bob))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["data"]["username"].is_null());
}
