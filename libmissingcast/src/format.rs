//! Thai-language announcement text
//!
//! Everything here is pure: records in, display strings out.

use chrono::{Datelike, NaiveDate};

use crate::types::{MirrorRecord, PrimaryRecord};

/// Shown for missing optional fields and names that are empty after cleanup
pub const UNSPECIFIED: &str = "ไม่ระบุ";

/// Shown when the last-seen date is unknown
pub const UNKNOWN_DATE: &str = "ไม่ทราบ";

pub const ELLIPSIS: &str = "...";

/// Maximum characters of mirror detail text kept in a post
pub const DETAIL_LIMIT: usize = 200;

/// Offset from the Gregorian year to the Buddhist Era year
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Title prefixes removed from names. Order matters: the first match wins,
/// so "นางสาว" must come before "นาง".
pub const HONORIFICS: [&str; 7] = [
    "นาย",
    "นางสาว",
    "นาง",
    "ด.ช.",
    "ด.ญ.",
    "เด็กชาย",
    "เด็กหญิง",
];

const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

const HEADER: &str = "🚨 ประกาศตามหาคนหาย 🚨";
const HASHTAGS: &str = "#คนหาย #ตามหาคนหาย #MissingPerson";

/// Full Thai month name for a 1-based month number
pub fn thai_month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    THAI_MONTHS.get(index).copied()
}

/// Render a date as "15 มกราคม 2567"
pub fn format_thai_date(date: Option<NaiveDate>) -> String {
    let Some(date) = date else {
        return UNKNOWN_DATE.to_string();
    };

    // month() is always 1..=12 for a valid NaiveDate
    let month = thai_month_name(date.month()).unwrap_or(UNKNOWN_DATE);
    format!(
        "{} {} {}",
        date.day(),
        month,
        date.year() + BUDDHIST_ERA_OFFSET
    )
}

/// Parse "15 มกราคม 2567" back into a Gregorian date
pub fn parse_thai_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let day: u32 = parts.next()?.parse().ok()?;
    let month_name = parts.next()?;
    let year: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let month = THAI_MONTHS.iter().position(|m| *m == month_name)? as u32 + 1;
    NaiveDate::from_ymd_opt(year - BUDDHIST_ERA_OFFSET, month, day)
}

/// Remove one leading honorific and collapse whitespace runs to single spaces
pub fn strip_honorific(name: Option<&str>) -> String {
    let name = name.unwrap_or_default().trim();

    let stripped = HONORIFICS
        .iter()
        .find_map(|title| name.strip_prefix(*title))
        .unwrap_or(name);

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        collapsed
    }
}

/// Cut text longer than `limit` characters and append an ellipsis
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Trimmed value, or the "unspecified" placeholder when missing or blank
pub fn or_unspecified(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

pub fn compose_primary(record: &PrimaryRecord) -> String {
    let age = record
        .age
        .map(|age| format!("{} ปี", age))
        .unwrap_or_else(|| UNSPECIFIED.to_string());

    let lines = [
        HEADER.to_string(),
        String::new(),
        format!("ชื่อ: {}", strip_honorific(record.full_name.as_deref())),
        format!("อายุ: {}", age),
        format!("เพศ: {}", or_unspecified(record.gender.as_deref())),
        format!(
            "สถานที่พบเห็นล่าสุด: {}",
            or_unspecified(record.last_seen_location.as_deref())
        ),
        format!("วันที่หายตัว: {}", format_thai_date(record.last_seen_date)),
        String::new(),
        format!(
            "ข้อมูลเพิ่มเติม: {}",
            or_unspecified(record.source_url.as_deref())
        ),
        HASHTAGS.to_string(),
    ];
    lines.join("\n")
}

pub fn compose_mirror(record: &MirrorRecord) -> String {
    let detail = or_unspecified(record.detail.as_deref());

    let lines = [
        HEADER.to_string(),
        String::new(),
        format!("ชื่อ: {}", strip_honorific(record.full_name.as_deref())),
        format!("อายุ: {}", or_unspecified(record.age.as_deref())),
        format!("รายละเอียด: {}", truncate(&detail, DETAIL_LIMIT)),
        String::new(),
        format!(
            "ข้อมูลเพิ่มเติม: {}",
            or_unspecified(record.source_url.as_deref())
        ),
        HASHTAGS.to_string(),
    ];
    lines.join("\n")
}
