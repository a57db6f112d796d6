use crate::db::queries;
use crate::error::BillError;
use crate::models::{ExtractedInvoice, StatsDelta, StatsSnapshot};
use async_trait::async_trait;
use sqlx::PgPool;

/// 票据记录存储: 每票一条, 记录键由调用方生成
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_bill(&self, bill_id: &str, record: &ExtractedInvoice) -> Result<(), BillError>;
}

/// 聚合统计存储: 只接受增量, 增量满足交换律
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn increment_stats(&self, delta: &StatsDelta) -> Result<(), BillError>;
    async fn fetch_stats(&self) -> Result<StatsSnapshot, BillError>;
}

/// PostgreSQL 实现, 一个连接池同时承担两种存储
pub struct PgBillStore {
    pool: PgPool,
}

impl PgBillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgBillStore {
    async fn put_bill(&self, bill_id: &str, record: &ExtractedInvoice) -> Result<(), BillError> {
        queries::insert_bill(&self.pool, bill_id, record)
            .await
            .map_err(|e| BillError::upstream("database", e))
    }
}

#[async_trait]
impl AggregateStore for PgBillStore {
    async fn increment_stats(&self, delta: &StatsDelta) -> Result<(), BillError> {
        queries::increment_stats(&self.pool, delta)
            .await
            .map_err(|e| BillError::upstream("database", e))
    }

    async fn fetch_stats(&self) -> Result<StatsSnapshot, BillError> {
        queries::get_stats(&self.pool)
            .await
            .map_err(|e| BillError::upstream("database", e))
    }
}
