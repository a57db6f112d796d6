use bigdecimal::BigDecimal;
use serde::Serialize;
use sqlx::FromRow;

/// 单次上传产出的统计增量, 两个分量相互独立
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsDelta {
    pub amount_delta: BigDecimal,
    pub bill_delta: i64,
}

/// 全局统计快照 (累计金额 + 累计票据数)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatsSnapshot {
    pub total_amount: BigDecimal,
    pub total_bills: i64,
}

impl StatsSnapshot {
    /// 尚无任何累计时的零快照
    pub fn zero() -> Self {
        Self {
            total_amount: BigDecimal::from(0),
            total_bills: 0,
        }
    }
}
