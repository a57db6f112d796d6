use crate::error::BillError;
use crate::models::StatsSnapshot;
use crate::service::{BillPipeline, UploadOutcome};
use axum::{
    body::Bytes,
    extract::{Json, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// 上传响应体
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub outcome: Option<UploadOutcome>,
}

/// 统计响应体
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub message: String,
    pub stats: Option<StatsSnapshot>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 票据上传接口: multipart 表单, 文件字段名固定为 file
pub async fn upload_bill(
    State(pipeline): State<Arc<BillPipeline>>,
    mut multipart: Multipart,
) -> Response {
    let (bytes, content_type) = match read_upload(&mut multipart).await {
        Ok(found) => found,
        Err(e) => return upload_error(e),
    };

    match pipeline.process_upload(&bytes, &content_type).await {
        Ok(outcome) => {
            let response = UploadResponse {
                success: true,
                message: format!("Bill {} processed", outcome.bill_id),
                outcome: Some(outcome),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => upload_error(e),
    }
}

/// 遍历表单字段, 取出第一个名为 file 的文件
async fn read_upload(multipart: &mut Multipart) -> Result<(Bytes, String), BillError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BillError::BadUpload(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| BillError::BadUpload(e.to_string()))?;
        return Ok((bytes, content_type));
    }

    Err(BillError::BadUpload("missing file field".to_string()))
}

fn upload_error(err: BillError) -> Response {
    error!("上传处理失败: {}", err);
    let response = UploadResponse {
        success: false,
        message: format!("Error: {}", err),
        outcome: None,
    };
    (err.status_code(), Json(response)).into_response()
}

/// 统计查询接口
pub async fn get_stats(State(pipeline): State<Arc<BillPipeline>>) -> Response {
    match pipeline.stats().await {
        Ok(stats) => {
            let response = StatsResponse {
                success: true,
                message: "OK".to_string(),
                stats: Some(stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("统计查询失败: {}", e);
            let response = StatsResponse {
                success: false,
                message: format!("Error: {}", e),
                stats: None,
            };
            (e.status_code(), Json(response)).into_response()
        }
    }
}
