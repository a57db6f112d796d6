use crate::clients::{ExpenseAnalyzer, ObjectStorage};
use crate::db::{AggregateStore, RecordStore};
use crate::error::BillError;
use crate::models::{ExtractedInvoice, StatsSnapshot};
use crate::service::{aggregator, extractor};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 票据处理流水线: 存储 → 取回 → 分析 → 提取 → 落库 → 统计累计
///
/// 每次上传独立跑完整条链路, 按线性顺序执行, 第一处失败即中止;
/// 唯一的例外是总额解析不出数字 —— 只跳过统计累计, 票据记录保留。
pub struct BillPipeline {
    storage: Arc<dyn ObjectStorage>,
    analyzer: Arc<dyn ExpenseAnalyzer>,
    records: Arc<dyn RecordStore>,
    aggregates: Arc<dyn AggregateStore>,
}

/// 单次上传的处理结论
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub bill_id: String,
    pub object_key: String,
    pub stats_applied: bool,
    pub invoice: ExtractedInvoice,
}

impl BillPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        analyzer: Arc<dyn ExpenseAnalyzer>,
        records: Arc<dyn RecordStore>,
        aggregates: Arc<dyn AggregateStore>,
    ) -> Self {
        Self {
            storage,
            analyzer,
            records,
            aggregates,
        }
    }

    pub async fn process_upload(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<UploadOutcome, BillError> {
        // 1. 先落对象存储一跳, 键用随机串, 扩展名按内容类型定
        let object_key = format!("{}.{}", Uuid::new_v4(), extension_for(content_type));
        self.storage.put(&object_key, bytes, content_type).await?;

        // 2. 从存储取回再送分析, 保证分析的字节与落盘内容同源
        let stored = self.storage.get(&object_key).await?;
        let raw = self.analyzer.analyze_expense(&stored).await?;

        // 3. 提取摘要字段与行项目
        let invoice = extractor::extract(&raw)?;
        info!(
            "提取完成: vendor={:?} total={:?} items={}",
            invoice.vendor_name,
            invoice.total,
            invoice.items.len()
        );

        // 4. 单票落库, 记录键用随机ID, 不依赖票面内容
        let bill_id = Uuid::new_v4().to_string();
        self.records.put_bill(&bill_id, &invoice).await?;

        // 5. 统计累计; 总额不含数字只跳过这一步, 其他错误照常上抛
        let stats_applied = match aggregator::compute_increment(&invoice) {
            Ok(delta) => {
                self.aggregates.increment_stats(&delta).await?;
                info!(
                    "统计已累计: amount=+{} bills=+{}",
                    delta.amount_delta, delta.bill_delta
                );
                true
            }
            Err(BillError::UnparseableTotal(total)) => {
                warn!("总额 {:?} 解析不出数字, 跳过统计累计", total);
                false
            }
            Err(e) => return Err(e),
        };

        Ok(UploadOutcome {
            bill_id,
            object_key,
            stats_applied,
            invoice,
        })
    }

    pub async fn stats(&self) -> Result<StatsSnapshot, BillError> {
        self.aggregates.fetch_stats().await
    }
}

/// 存储键扩展名: 按上传的内容类型映射, 认不出就落 bin
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/tiff" => "tiff",
        "application/pdf" => "pdf",
        _ => "bin",
    }
}
