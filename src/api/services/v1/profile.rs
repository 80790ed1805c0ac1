//! 个人资料与 PLP 链接端点

use actix_web::{HttpResponse, Responder, web};

use crate::api::extractors::CurrentUser;
use crate::services::{AppContext, NewPlpLink, PlpLinkPatch, ProfilePatch};

use super::error_code::ErrorCode;
use super::helpers::{api_result, api_result_in, created_response, error_from_shrt};

pub async fn get_profile(user: CurrentUser, ctx: web::Data<AppContext>) -> impl Responder {
    api_result_in(
        ctx.profiles.get_profile(&user.uid).await,
        ErrorCode::ProfileNotFound,
    )
}

pub async fn update_profile(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    body: web::Json<ProfilePatch>,
) -> impl Responder {
    api_result_in(
        ctx.profiles
            .update_profile(&user.uid, body.into_inner())
            .await,
        ErrorCode::ProfileNotFound,
    )
}

pub async fn list_plp_links(user: CurrentUser, ctx: web::Data<AppContext>) -> impl Responder {
    api_result(ctx.plp.list_links(&user.uid).await)
}

pub async fn add_plp_link(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    body: web::Json<NewPlpLink>,
) -> HttpResponse {
    match ctx.plp.add_link(&user.uid, body.into_inner()).await {
        Ok(link) => created_response(link),
        Err(e) => error_from_shrt(&e),
    }
}

pub async fn update_plp_link(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    body: web::Json<PlpLinkPatch>,
) -> impl Responder {
    let id = path.into_inner();
    api_result_in(
        ctx.plp.update_link(&user.uid, &id, body.into_inner()).await,
        ErrorCode::PlpLinkNotFound,
    )
}

pub async fn archive_plp_link(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    api_result_in(
        ctx.plp.archive_link(&user.uid, &id).await,
        ErrorCode::PlpLinkNotFound,
    )
}
