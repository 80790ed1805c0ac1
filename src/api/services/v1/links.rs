//! 短链接端点

use actix_web::{HttpResponse, Responder, web};
use tracing::info;

use crate::api::extractors::{CurrentUser, OptionalUser};
use crate::errors::Result;
use crate::services::{AppContext, CreateLinkRequest};
use crate::storage::ShortLink;

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_in, created_response, error_from_shrt};
use super::types::{CreatedLink, LinkView, LinksQuery, PostNewLink};

fn to_view(ctx: &AppContext, link: ShortLink) -> LinkView {
    let short_url = ctx.links.short_url(&link.code);
    LinkView::new(link, short_url)
}

fn to_views(ctx: &AppContext, links: Vec<ShortLink>) -> Vec<LinkView> {
    links.into_iter().map(|l| to_view(ctx, l)).collect()
}

/// `POST /api/v1/links`，未携带凭证时按匿名链接处理
pub async fn post_link(
    OptionalUser(user): OptionalUser,
    ctx: web::Data<AppContext>,
    body: web::Json<PostNewLink>,
) -> HttpResponse {
    let body = body.into_inner();
    let owner = user.as_ref().map(|u| u.uid.as_str());

    let req = CreateLinkRequest {
        destination_url: body.url,
        code: body.code,
    };

    match ctx.links.create_link(owner, req).await {
        Ok(result) => {
            info!(
                "API: link '{}' created (owner: {})",
                result.link.code,
                owner.unwrap_or("anonymous")
            );
            created_response(CreatedLink {
                link: to_view(&ctx, result.link),
                generated_code: result.generated_code,
            })
        }
        Err(e) => error_from_shrt(&e),
    }
}

/// `GET /api/v1/links`：当前用户的有效链接；带 `?url=` 时按目标地址查找
pub async fn list_links(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    query: web::Query<LinksQuery>,
) -> impl Responder {
    let result: Result<Vec<ShortLink>> = match query.url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            ctx.links.find_by_destination(url, Some(&user.uid)).await
        }
        _ => ctx.links.list_active_for_owner(&user.uid).await,
    };
    api_result(result.map(|links| to_views(&ctx, links)))
}

/// 按短码查询，不要求登录
pub async fn get_link(ctx: web::Data<AppContext>, path: web::Path<String>) -> impl Responder {
    let code = path.into_inner();
    api_result_in(
        ctx.links.get_link(&code).await.map(|l| to_view(&ctx, l)),
        ErrorCode::LinkNotFound,
    )
}

pub async fn archive_link(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> impl Responder {
    let code = path.into_inner();
    api_result_in(
        ctx.links
            .archive_link(Some(&user.uid), &code)
            .await
            .map(|l| to_view(&ctx, l)),
        ErrorCode::LinkNotFound,
    )
}

pub async fn link_stats(user: CurrentUser, ctx: web::Data<AppContext>) -> impl Responder {
    api_result(ctx.links.stats(&user.uid).await)
}
