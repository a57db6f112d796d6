use crate::error::BillError;
use crate::models::{
    AnalysisResult, BillLineItem, ExpenseField, ExtractedInvoice, DEFAULT_TEXT, DEFAULT_TOTAL,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// 从原始分析响应提取票据记录, created_at 取当前时间
pub fn extract(raw: &Value) -> Result<ExtractedInvoice, BillError> {
    extract_at(raw, Utc::now())
}

/// 提取核心 (纯函数): 同一输入 + 同一时间戳 => 逐位相同的输出
pub fn extract_at(raw: &Value, created_at: DateTime<Utc>) -> Result<ExtractedInvoice, BillError> {
    // 1. 结构校验: 容器缺失或形状不对则整体中止, 不产生部分结果
    let result = AnalysisResult::deserialize(raw)
        .map_err(|e| BillError::MalformedAnalysis(e.to_string()))?;

    // 2. 标量全部置默认值, 明细从空序列开始; 零单据输入到此直接返回
    let mut invoice = ExtractedInvoice::empty(created_at);

    for doc in &result.expense_documents {
        // 3. 汇总字段: 固定映射表, 同类型首个出现者生效 (跨单据同样成立)
        for field in &doc.summary_fields {
            match field.field_type.text.as_str() {
                "VENDOR_NAME" if invoice.vendor_name == DEFAULT_TEXT => {
                    invoice.vendor_name = normalize_newlines(field_value(field)?);
                }
                "TOTAL" if invoice.total == DEFAULT_TOTAL => {
                    invoice.total = normalize_newlines(field_value(field)?);
                }
                "INVOICE_RECEIPT_DATE" if invoice.invoice_date == DEFAULT_TEXT => {
                    invoice.invoice_date = normalize_newlines(field_value(field)?);
                }
                "INVOICE_RECEIPT_ID" if invoice.invoice_id == DEFAULT_TEXT => {
                    invoice.invoice_id = normalize_newlines(field_value(field)?);
                }
                "VENDOR_PHONE" if invoice.vendor_phone == DEFAULT_TEXT => {
                    invoice.vendor_phone = normalize_newlines(field_value(field)?);
                }
                // 已赋值的类型和未识别的类型都静默跳过
                _ => {}
            }
        }

        // 4. 明细行: 不去重, 按出现顺序一行一条, 子字段缺失照样保留
        for group in &doc.line_item_groups {
            for line_item in &group.line_items {
                let mut record = BillLineItem::default();
                for field in &line_item.line_item_expense_fields {
                    match field.field_type.text.as_str() {
                        "ITEM" => record.item = Some(normalize_newlines(field_value(field)?)),
                        // 价格保留原始排版 (币种符号/空白), 数值化推迟到统计环节
                        "PRICE" => record.price = Some(field_value(field)?.to_string()),
                        "QUANTITY" => record.quantity = Some(field_value(field)?.to_string()),
                        _ => {}
                    }
                }
                invoice.items.push(record);
            }
        }
    }

    Ok(invoice)
}

/// 命中映射表的字段缺少检测值属于结构违约
fn field_value(field: &ExpenseField) -> Result<&str, BillError> {
    field
        .value_detection
        .as_ref()
        .map(|v| v.text.as_str())
        .ok_or_else(|| {
            BillError::MalformedAnalysis(format!(
                "field {} has no ValueDetection",
                field.field_type.text
            ))
        })
}

/// 嵌入的换行统一替换成单个空格
fn normalize_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    fn summary(field_type: &str, text: &str) -> Value {
        json!({
            "Type": { "Text": field_type },
            "ValueDetection": { "Text": text }
        })
    }

    fn line_field(field_type: &str, text: &str) -> Value {
        json!({
            "Type": { "Text": field_type },
            "ValueDetection": { "Text": text }
        })
    }

    #[test]
    fn test_zero_documents_yields_all_default_record() {
        let raw = json!({ "ExpenseDocuments": [] });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice, ExtractedInvoice::empty(fixed_time()));
    }

    #[test]
    fn test_first_match_wins_across_documents() {
        let raw = json!({
            "ExpenseDocuments": [
                {
                    "SummaryFields": [summary("TOTAL", "10.00")],
                    "LineItemGroups": []
                },
                {
                    "SummaryFields": [summary("TOTAL", "20.00")],
                    "LineItemGroups": []
                }
            ]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.total, "10.00");
    }

    #[test]
    fn test_first_match_wins_within_one_document() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [
                    summary("VENDOR_NAME", "First Vendor"),
                    summary("VENDOR_NAME", "Second Vendor")
                ],
                "LineItemGroups": []
            }]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.vendor_name, "First Vendor");
    }

    #[test]
    fn test_newlines_normalized_in_summary_but_not_in_price() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [summary("VENDOR_NAME", "Foo\nBar")],
                "LineItemGroups": [{
                    "LineItems": [{
                        "LineItemExpenseFields": [line_field("PRICE", "12.50\n")]
                    }]
                }]
            }]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.vendor_name, "Foo Bar");
        assert_eq!(invoice.items[0].price.as_deref(), Some("12.50\n"));
    }

    #[test]
    fn test_line_items_kept_in_encounter_order_across_groups_and_documents() {
        let one = |name: &str| {
            json!({ "LineItemExpenseFields": [line_field("ITEM", name)] })
        };
        let raw = json!({
            "ExpenseDocuments": [
                {
                    "SummaryFields": [],
                    "LineItemGroups": [
                        { "LineItems": [one("a"), one("b")] },
                        { "LineItems": [one("c")] }
                    ]
                },
                {
                    "SummaryFields": [],
                    "LineItemGroups": [{ "LineItems": [one("a")] }]
                }
            ]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        // 不去重: 第二份单据里重复的 "a" 依旧保留
        let names: Vec<_> = invoice
            .items
            .iter()
            .map(|li| li.item.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_partial_line_item_keeps_absent_quantity_absent() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [],
                "LineItemGroups": [{
                    "LineItems": [{
                        "LineItemExpenseFields": [
                            line_field("ITEM", "Widget"),
                            line_field("PRICE", "$10")
                        ]
                    }]
                }]
            }]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].item.as_deref(), Some("Widget"));
        assert_eq!(invoice.items[0].price.as_deref(), Some("$10"));
        assert!(invoice.items[0].quantity.is_none());
    }

    #[test]
    fn test_unrecognized_field_types_silently_ignored() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [
                    summary("SUBTOTAL", "9.00"),
                    summary("TAX", "1.00"),
                    summary("TOTAL", "10.00")
                ],
                "LineItemGroups": [{
                    "LineItems": [{
                        "LineItemExpenseFields": [
                            line_field("ITEM", "Widget"),
                            line_field("DISCOUNT", "-1.00")
                        ]
                    }]
                }]
            }]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.total, "10.00");
        assert_eq!(invoice.items[0].item.as_deref(), Some("Widget"));
        assert!(invoice.items[0].price.is_none());
    }

    #[test]
    fn test_missing_containers_are_malformed() {
        let missing_documents = json!({});
        assert!(matches!(
            extract_at(&missing_documents, fixed_time()),
            Err(BillError::MalformedAnalysis(_))
        ));

        let missing_summary = json!({ "ExpenseDocuments": [{ "LineItemGroups": [] }] });
        assert!(matches!(
            extract_at(&missing_summary, fixed_time()),
            Err(BillError::MalformedAnalysis(_))
        ));

        let missing_line_items = json!({
            "ExpenseDocuments": [{ "SummaryFields": [], "LineItemGroups": [{}] }]
        });
        assert!(matches!(
            extract_at(&missing_line_items, fixed_time()),
            Err(BillError::MalformedAnalysis(_))
        ));
    }

    #[test]
    fn test_matched_field_without_value_is_malformed() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [{ "Type": { "Text": "VENDOR_NAME" } }],
                "LineItemGroups": []
            }]
        });
        assert!(matches!(
            extract_at(&raw, fixed_time()),
            Err(BillError::MalformedAnalysis(_))
        ));

        // 未命中映射表的字段缺值不算违约
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [{ "Type": { "Text": "ADDRESS" } }],
                "LineItemGroups": []
            }]
        });
        assert!(extract_at(&raw, fixed_time()).is_ok());
    }

    #[test]
    fn test_extract_at_is_idempotent() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [summary("VENDOR_NAME", "Acme"), summary("TOTAL", "$5.00")],
                "LineItemGroups": [{
                    "LineItems": [{
                        "LineItemExpenseFields": [line_field("ITEM", "Pen")]
                    }]
                }]
            }]
        });
        let first = extract_at(&raw, fixed_time()).unwrap();
        let second = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_single_document_end_to_end() {
        let raw = json!({
            "ExpenseDocuments": [{
                "SummaryFields": [
                    summary("VENDOR_NAME", "Acme\nCo"),
                    summary("TOTAL", "$100.00")
                ],
                "LineItemGroups": [{
                    "LineItems": [{
                        "LineItemExpenseFields": [
                            line_field("ITEM", "Widget"),
                            line_field("PRICE", "$10"),
                            line_field("QUANTITY", "2")
                        ]
                    }]
                }]
            }]
        });
        let invoice = extract_at(&raw, fixed_time()).unwrap();
        assert_eq!(invoice.vendor_name, "Acme Co");
        assert_eq!(invoice.total, "$100.00");
        assert_eq!(invoice.invoice_id, "N/A");
        assert_eq!(invoice.invoice_date, "N/A");
        assert_eq!(invoice.vendor_phone, "N/A");
        assert_eq!(
            invoice.items,
            vec![BillLineItem {
                item: Some("Widget".into()),
                price: Some("$10".into()),
                quantity: Some("2".into()),
            }]
        );
    }
}
