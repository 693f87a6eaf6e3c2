use chrono::NaiveDateTime;

/// `"It is 14:05."`
pub fn describe_time(now: NaiveDateTime) -> String {
    format!("It is {}.", now.format("%H:%M"))
}

/// `"Today is Saturday, October 17, 2026."`
pub fn describe_date(now: NaiveDateTime) -> String {
    format!("Today is {}.", now.format("%A, %B %-d, %Y"))
}
