use crate::error::BillError;
use crate::models::{ExtractedInvoice, StatsDelta};
use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

lazy_static! {
    /// 金额文本里的第一个带符号十进制数 (可带小数部分)
    static ref NUMBER_TOKEN: Regex = Regex::new(r"[+-]?\d+(\.\d+)?").unwrap();
}

/// 由票据记录计算统计增量: 金额全额入账, 每票计数一次
///
/// 两个分量相互独立, 由聚合存储以可交换的增量方式落账。
pub fn compute_increment(invoice: &ExtractedInvoice) -> Result<StatsDelta, BillError> {
    let token = NUMBER_TOKEN
        .find(&invoice.total)
        .ok_or_else(|| BillError::UnparseableTotal(invoice.total.clone()))?;

    Ok(StatsDelta {
        amount_delta: round_to_cents(token.as_str())?,
        bill_delta: 1,
    })
}

/// 四舍五入到分, 逢5向远离零方向进位
///
/// 直接在十进制数字串上运算再转 BigDecimal, 全程不经过二进制浮点,
/// 从根上避免 0.1 + 0.2 一类的表示误差。
fn round_to_cents(token: &str) -> Result<BigDecimal, BillError> {
    let negative = token.starts_with('-');
    let unsigned = token.trim_start_matches(['+', '-']);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    // 前两位小数并成"分"的整数, 第三位 >= 5 时进一分
    let mut kept: String = frac_part.chars().take(2).collect();
    while kept.len() < 2 {
        kept.push('0');
    }
    let mut cents = BigDecimal::from_str(&format!("{int_part}{kept}"))
        .map_err(|_| BillError::UnparseableTotal(token.to_string()))?;
    if frac_part.chars().nth(2).is_some_and(|c| c >= '5') {
        cents += BigDecimal::from(1);
    }

    let value = cents / BigDecimal::from(100);
    Ok(if negative { -value } else { value })
}
