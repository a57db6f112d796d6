use crate::models::{ExtractedInvoice, StatsDelta, StatsSnapshot};
use sqlx::types::Json;
use sqlx::PgPool;

/// 初始化建表 (幂等), 服务启动时执行一次
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS t_bill_record (
            fid varchar(64) PRIMARY KEY,
            finvoiceid text NOT NULL,
            fvendorname text NOT NULL,
            fvendorphone text NOT NULL,
            finvoicedate text NOT NULL,
            ftotal text NOT NULL,
            fitems jsonb NOT NULL,
            fcreatedat timestamptz NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS t_bill_stats (
            fid smallint PRIMARY KEY,
            ftotalamount numeric(18, 2) NOT NULL DEFAULT 0,
            ftotalbills bigint NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// 插入单票记录
pub async fn insert_bill(
    pool: &PgPool,
    bill_id: &str,
    record: &ExtractedInvoice,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO t_bill_record
            (fid, finvoiceid, fvendorname, fvendorphone, finvoicedate, ftotal, fitems, fcreatedat)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(bill_id)
    .bind(&record.invoice_id)
    .bind(&record.vendor_name)
    .bind(&record.vendor_phone)
    .bind(&record.invoice_date)
    .bind(&record.total)
    .bind(Json(&record.items))
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 统计累计: 单条 upsert 完成自增, 增量可交换, 并发写入不需要读改写
pub async fn increment_stats(pool: &PgPool, delta: &StatsDelta) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO t_bill_stats (fid, ftotalamount, ftotalbills)
        VALUES (1, $1, $2)
        ON CONFLICT (fid) DO UPDATE
        SET ftotalamount = t_bill_stats.ftotalamount + EXCLUDED.ftotalamount,
            ftotalbills  = t_bill_stats.ftotalbills  + EXCLUDED.ftotalbills
        "#,
    )
    .bind(&delta.amount_delta)
    .bind(delta.bill_delta)
    .execute(pool)
    .await?;

    Ok(())
}

/// 查询统计快照, 尚未累计过任何票据时返回零值
pub async fn get_stats(pool: &PgPool) -> Result<StatsSnapshot, sqlx::Error> {
    let snapshot = sqlx::query_as::<_, StatsSnapshot>(
        r#"
        SELECT ftotalamount as total_amount,
               ftotalbills as total_bills
        FROM t_bill_stats
        WHERE fid = 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(snapshot.unwrap_or_else(StatsSnapshot::zero))
}
