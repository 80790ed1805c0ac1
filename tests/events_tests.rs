//! Change feed and SSE listener tests

#[macro_use]
mod common;

use std::future::poll_fn;
use std::pin::pin;

use actix_web::body::MessageBody;
use actix_web::test::{self, TestRequest};
use bytes::Bytes;

use common::bearer;
use shrt::services::{ChangeEvent, CreateLinkRequest, FeedItem, NewPlpLink, ProfilePatch};

#[tokio::test]
async fn test_link_creation_notifies_owner_only() {
    let env = common::test_env().await;
    let (uid, _) = common::sign_up(&env, "feed@example.com").await;
    let mut mine = env.ctx.events.subscribe(uid.clone());

    env.ctx
        .links
        .create_link(
            None,
            CreateLinkRequest {
                destination_url: "https://anon.example.com".into(),
                code: Some("anon".into()),
            },
        )
        .await
        .unwrap();
    env.ctx
        .links
        .create_link(
            Some(&uid),
            CreateLinkRequest {
                destination_url: "https://mine.example.com".into(),
                code: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        mine.next().await,
        Some(FeedItem::Event(ChangeEvent::LinksChanged { owner_id: uid }))
    );
}

#[tokio::test]
async fn test_profile_and_plp_changes_are_published() {
    let env = common::test_env().await;
    let (uid, _) = common::sign_up(&env, "pub@example.com").await;
    let mut sub = env.ctx.events.subscribe(uid.clone());

    env.ctx
        .profiles
        .update_profile(
            &uid,
            ProfilePatch {
                bio: Some("hello".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    env.ctx
        .plp
        .add_link(
            &uid,
            NewPlpLink {
                title: "Site".into(),
                url: "https://site.example.com".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        sub.next().await,
        Some(FeedItem::Event(ChangeEvent::ProfileChanged { uid: uid.clone() }))
    );
    assert_eq!(
        sub.next().await,
        Some(FeedItem::Event(ChangeEvent::PlpChanged { uid }))
    );
}

async fn next_chunk<B: MessageBody>(body: std::pin::Pin<&mut B>) -> Bytes {
    let mut body = body;
    match poll_fn(|cx| body.as_mut().poll_next(cx)).await {
        Some(Ok(bytes)) => bytes,
        Some(Err(_)) => panic!("body error"),
        None => panic!("stream ended"),
    }
}

#[actix_rt::test]
async fn test_stream_pushes_snapshots_and_session_events() {
    let env = common::test_env().await;
    let (uid, token) = common::sign_up(&env, "sse@example.com").await;
    let app = test_app!(env);

    let req = TestRequest::get()
        .uri("/api/v1/me/stream")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/event-stream"
    );

    let mut body = pin!(resp.into_body());

    let first = next_chunk(body.as_mut()).await;
    let first = String::from_utf8_lossy(&first);
    assert!(first.starts_with("event: snapshot\ndata: "));
    assert!(first.contains(&uid));

    env.ctx
        .plp
        .add_link(
            &uid,
            NewPlpLink {
                title: "Live".into(),
                url: "https://live.example.com".into(),
                description: None,
            },
        )
        .await
        .unwrap();
    let second = next_chunk(body.as_mut()).await;
    let second = String::from_utf8_lossy(&second);
    assert!(second.starts_with("event: snapshot\n"));
    assert!(second.contains("https://live.example.com"));

    env.ctx.auth.sign_out(&uid);
    let third = next_chunk(body.as_mut()).await;
    assert!(String::from_utf8_lossy(&third).starts_with("event: session\n"));
}

#[actix_rt::test]
async fn test_stream_requires_session() {
    let env = common::test_env().await;
    let app = test_app!(env);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/v1/me/stream").to_request(),
    )
    .await;
    assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}
