use chrono::{DateTime, NaiveDate, Utc};

/// `1234550` cents → `"$12,345.50"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// `2025-03-04` → `"Mar 4, 2025"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    format_date(timestamp.date_naive())
}

pub fn format_flag(flag: bool, yes: &str, no: &str) -> String {
    let text = if flag { yes } else { no };
    text.to_string()
}
