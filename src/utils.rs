use chrono::{DateTime, Local, TimeZone};

/// ctime 风格时间格式，例如 `Thu Jan  1 00:00:00 1970`
const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// 将时间格式化为 ctime 风格字符串（与区域设置无关）
pub fn format_ctime<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(CTIME_FORMAT).to_string()
}

/// 当前本地时间的 ctime 字符串
pub fn ctime_now() -> String {
    format_ctime(&Local::now())
}
