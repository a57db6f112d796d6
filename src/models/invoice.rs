use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 标量字段未识别时的占位值
pub const DEFAULT_TEXT: &str = "N/A";
/// 总金额未识别时的占位值 (沿用历史存量数据的 "0")
pub const DEFAULT_TOTAL: &str = "0";

/// 提取后的票据记录, 构建完成后不再变更, 原样写入票据库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInvoice {
    pub invoice_id: String,
    pub vendor_name: String,
    pub vendor_phone: String,
    pub invoice_date: String,
    /// 保留原始文本, 数值化只发生在统计累计环节
    pub total: String,
    pub items: Vec<BillLineItem>,
    pub created_at: DateTime<Utc>,
}

impl ExtractedInvoice {
    /// 全默认记录 (零单据输入的提取结果)
    pub fn empty(created_at: DateTime<Utc>) -> Self {
        Self {
            invoice_id: DEFAULT_TEXT.to_string(),
            vendor_name: DEFAULT_TEXT.to_string(),
            vendor_phone: DEFAULT_TEXT.to_string(),
            invoice_date: DEFAULT_TEXT.to_string(),
            total: DEFAULT_TOTAL.to_string(),
            items: Vec::new(),
            created_at,
        }
    }
}

/// 单行购买明细, 三个子字段都可能缺席, 缺席的不落库
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillLineItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}
