//! SSE 监听：推送当前用户的资料和链接快照
//!
//! 连接建立时先推一次完整快照，之后每收到属于该用户的变更事件推一次。
//! 订阅方落后（broadcast lagged）时同样重推完整快照。连接断开即取消订阅。

use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use actix_web::{HttpResponse, web};
use bytes::Bytes;
use futures_util::stream;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::extractors::CurrentUser;
use crate::errors::Result;
use crate::services::{AppContext, ChangeEvent, FeedItem, UserSubscription};

use super::types::{LinkView, ListenerSnapshot};

/// 编码一条 SSE 消息
pub fn sse_frame<T: Serialize>(event: &str, payload: &T) -> Bytes {
    let data = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    Bytes::from(format!("event: {}\ndata: {}\n\n", event, data))
}

async fn snapshot(ctx: &AppContext, uid: &str) -> Result<ListenerSnapshot> {
    let profile = ctx.profiles.get_profile(uid).await?;
    let links = ctx
        .links
        .list_active_for_owner(uid)
        .await?
        .into_iter()
        .map(|link| {
            let short_url = ctx.links.short_url(&link.code);
            LinkView::new(link, short_url)
        })
        .collect();
    let plp = ctx.plp.list_links(uid).await?;

    Ok(ListenerSnapshot {
        profile,
        links,
        plp,
    })
}

async fn snapshot_frame(ctx: &AppContext, uid: &str) -> Bytes {
    match snapshot(ctx, uid).await {
        Ok(snap) => sse_frame("snapshot", &snap),
        Err(e) => {
            warn!("Listener snapshot failed for {}: {}", uid, e);
            sse_frame("error", &serde_json::json!({ "message": e.message() }))
        }
    }
}

struct ListenerState {
    ctx: web::Data<AppContext>,
    subscription: UserSubscription,
    initial: bool,
}

/// `GET /api/v1/me/stream`
pub async fn stream(user: CurrentUser, ctx: web::Data<AppContext>) -> HttpResponse {
    debug!("Listener opened for {}", user.uid);

    let state = ListenerState {
        subscription: ctx.events.subscribe(user.uid.clone()),
        ctx,
        initial: true,
    };

    let body = stream::unfold(state, |mut state| async move {
        let uid = state.subscription.uid().to_string();

        if state.initial {
            state.initial = false;
            let frame = snapshot_frame(&state.ctx, &uid).await;
            return Some((Ok::<_, std::convert::Infallible>(frame), state));
        }

        let frame = match state.subscription.next().await? {
            FeedItem::Event(event @ ChangeEvent::SessionChanged { .. }) => {
                sse_frame("session", &event)
            }
            FeedItem::Event(_) => snapshot_frame(&state.ctx, &uid).await,
            FeedItem::Lagged(missed) => {
                debug!("Listener for {} lagged by {} events", uid, missed);
                snapshot_frame(&state.ctx, &uid).await
            }
        };
        Some((Ok(frame), state))
    });

    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/event-stream"))
        .insert_header((CACHE_CONTROL, "no-cache"))
        .streaming(body)
}
