//! 展示格式化工具

use ams_shared::{ComplaintStatus, PaymentStatus};
use chrono::{NaiveDate, NaiveDateTime};

/// 金额格式化为 `$1,234.50`
pub fn money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

pub fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%m/%d/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn timestamp_date(value: Option<NaiveDateTime>) -> String {
    date(value.map(|t| t.date()))
}

pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn complaint_badge(status: ComplaintStatus) -> &'static str {
    match status {
        ComplaintStatus::Pending => "badge bg-warning",
        ComplaintStatus::InProgress => "badge bg-info",
        ComplaintStatus::Resolved => "badge bg-success",
        ComplaintStatus::Rejected => "badge bg-danger",
        ComplaintStatus::Closed | ComplaintStatus::Unknown => "badge bg-secondary",
    }
}

pub fn payment_badge(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Paid => "badge bg-success",
        PaymentStatus::Pending => "badge bg-warning",
        PaymentStatus::Late | PaymentStatus::Failed => "badge bg-danger",
        PaymentStatus::Refunded | PaymentStatus::Unknown => "badge bg-secondary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_groups_thousands() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(950.5), "$950.50");
        assert_eq!(money(1234.567), "$1,234.57");
        assert_eq!(money(1_000_000.0), "$1,000,000.00");
        assert_eq!(money(-42.0), "-$42.00");
    }

    #[test]
    fn test_missing_dates_render_as_dash() {
        assert_eq!(date(None), "-");
        assert_eq!(date(NaiveDate::from_ymd_opt(2024, 3, 1)), "03/01/2024");
        let ts = NaiveDate::from_ymd_opt(2024, 12, 31).and_then(|d| d.and_hms_opt(23, 0, 0));
        assert_eq!(timestamp_date(ts), "12/31/2024");
    }

    #[test]
    fn test_complaint_badges() {
        assert_eq!(complaint_badge(ComplaintStatus::Pending), "badge bg-warning");
        assert_eq!(complaint_badge(ComplaintStatus::Unknown), "badge bg-secondary");
    }
}
