use serde::Deserialize;

/// 分析服务返回的费用识别结果 (AnalyzeExpense 响应, 外部只读输入)
///
/// 只建模提取用得到的容器; 其余成员 (置信度/几何信息等) 直接忽略。
/// 缺少必备容器属于结构违约, 由调用方映射为 MalformedAnalysis。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisResult {
    pub expense_documents: Vec<ExpenseDocument>,
}

/// 单份费用单据 (一次上传可能切出多份)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpenseDocument {
    pub summary_fields: Vec<ExpenseField>,
    pub line_item_groups: Vec<LineItemGroup>,
}

/// 识别出的字段: 类型 + 检测值
///
/// ValueDetection 允许缺席; 只有类型命中提取表时缺值才算违约。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpenseField {
    #[serde(rename = "Type")]
    pub field_type: FieldType,
    pub value_detection: Option<ValueDetection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldType {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueDetection {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItemGroup {
    pub line_items: Vec<LineItem>,
}

/// 一行购买明细, 内部又是一串字段对
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineItem {
    pub line_item_expense_fields: Vec<ExpenseField>,
}
