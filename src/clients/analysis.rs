use crate::config::AnalysisConfig;
use crate::error::BillError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// 票据分析客户端: 送入文档字节, 返回原始 JSON, 结构留给提取环节判定
#[async_trait]
pub trait ExpenseAnalyzer: Send + Sync {
    async fn analyze_expense(&self, document: &[u8]) -> Result<Value, BillError>;
}

/// Textract 兼容网关的 HTTP 实现
///
/// 网关走令牌鉴权, 不做 SigV4 签名。
pub struct HttpExpenseAnalyzer {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl HttpExpenseAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// AnalyzeExpense 请求体: 文档字节整体 base64 后内联
fn wire_body(document: &[u8]) -> Value {
    json!({ "Document": { "Bytes": BASE64.encode(document) } })
}

#[async_trait]
impl ExpenseAnalyzer for HttpExpenseAnalyzer {
    async fn analyze_expense(&self, document: &[u8]) -> Result<Value, BillError> {
        let payload =
            serde_json::to_vec(&wire_body(document)).map_err(|e| BillError::upstream("analysis", e))?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header("X-Amz-Target", "Textract.AnalyzeExpense")
            .header("Content-Type", "application/x-amz-json-1.1")
            .body(payload);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BillError::upstream("analysis", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BillError::upstream(
                "analysis",
                format!("HTTP {status}: {body}"),
            ));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| BillError::upstream("analysis", e))
    }
}
