//! 用户文件上传

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use bytes::BytesMut;
use futures_util::StreamExt;
use tracing::{error, info};

use crate::api::extractors::CurrentUser;
use crate::services::AppContext;

use super::error_code::ErrorCode;
use super::helpers::{error_from_shrt, error_response, success_response};

/// `PUT /api/v1/me/files/{name}`
///
/// 取 multipart 中名为 `file` 的字段（没有则取第一个文件字段），
/// 写入 `users/{uid}/profile/{name}`。
pub async fn upload_file(
    user: CurrentUser,
    ctx: web::Data<AppContext>,
    path: web::Path<String>,
    mut payload: Multipart,
) -> HttpResponse {
    let name = path.into_inner();
    let max_bytes = ctx.profiles.max_upload_bytes();

    let mut upload: Option<(String, BytesMut)> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                );
            }
        };

        let is_file = field.name() == Some("file")
            || field
                .content_disposition()
                .is_some_and(|cd| cd.get_filename().is_some());
        if !is_file || upload.is_some() {
            // 丢弃多余字段
            while let Some(chunk) = field.next().await {
                if chunk.is_err() {
                    break;
                }
            }
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    if data.len() + bytes.len() > max_bytes {
                        return error_response(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            ErrorCode::FileTooLarge,
                            &format!("File exceeds {} bytes", max_bytes),
                        );
                    }
                    data.extend_from_slice(&bytes);
                }
                Err(e) => {
                    error!("Failed to read upload chunk: {}", e);
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::InvalidMultipartData,
                        &format!("Failed to read file: {}", e),
                    );
                }
            }
        }
        upload = Some((content_type, data));
    }

    let Some((content_type, data)) = upload else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "No file provided",
        );
    };

    match ctx
        .profiles
        .upload_file(&user.uid, &name, &content_type, data.freeze())
        .await
    {
        Ok(stored) => {
            info!("API: {} uploaded {}", user.uid, stored.path);
            success_response(stored)
        }
        Err(e) => error_from_shrt(&e),
    }
}
