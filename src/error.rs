use axum::http::StatusCode;
use std::fmt::Display;
use thiserror::Error;

/// 处理失败分类: 提取/累计环节只会产生这几类, HTTP 层据此决定响应码
#[derive(Debug, Error)]
pub enum BillError {
    /// 分析结果结构不符合约定 (缺容器/缺字段值), 本次上传整体中止
    #[error("malformed analysis result: {0}")]
    MalformedAnalysis(String),

    /// 总金额文本中扫不出数字, 只跳过统计累计
    #[error("unparseable total: {0:?}")]
    UnparseableTotal(String),

    /// 上游依赖不可用 (对象存储 / 分析服务 / 数据库)
    #[error("{service} unavailable: {detail}")]
    UpstreamUnavailable {
        service: &'static str,
        detail: String,
    },

    /// 请求体不合规 (multipart 解析失败 / 缺 file 字段)
    #[error("bad upload: {0}")]
    BadUpload(String),
}

impl BillError {
    pub fn upstream(service: &'static str, err: impl Display) -> Self {
        Self::UpstreamUnavailable {
            service,
            detail: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BillError::MalformedAnalysis(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // 正常流程在流水线内部消化, 一旦走到 HTTP 层同样按数据缺陷处理
            BillError::UnparseableTotal(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BillError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            BillError::BadUpload(_) => StatusCode::BAD_REQUEST,
        }
    }
}
