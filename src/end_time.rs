use crate::parser::element_text;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use tracing::debug;

pub const EPOCH_ATTRIBUTE: &str = "timems";

pub static MONTHS: [(&str, u32); 12] = [
    ("Jan", 1),
    ("Feb", 2),
    ("Mär", 3),
    ("Apr", 4),
    ("Mai", 5),
    ("Jun", 6),
    ("Jul", 7),
    ("Aug", 8),
    ("Sep", 9),
    ("Okt", 10),
    ("Nov", 11),
    ("Dez", 12),
];

// "(08. Dez. 2019 17:30:42 MEZ)" or "01. Dez. 2019 12:35:50 MEZ"
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[(]?([0-9]{2})\.\s(.+)\.\s([0-9]{4})\s+([0-9]{2}):([0-9]{2}):([0-9]{2})\s+([A-Z]{3,4})[)]?$",
    )
    .expect("end time regex must compile")
});

pub fn parse_end_time(element: ElementRef<'_>, timezone: Tz) -> Option<DateTime<Utc>> {
    if let Some(instant) = epoch_hint(element) {
        return Some(instant);
    }

    let text = element_text(element).replace('\n', " ");
    parse_end_time_text(text.trim(), timezone)
}

pub fn parse_end_time_text(text: &str, timezone: Tz) -> Option<DateTime<Utc>> {
    let Some(caps) = DATE_PATTERN.captures(text) else {
        debug!(input = %text, "unable to parse end time from text");
        return None;
    };

    let month_name = caps.get(2)?.as_str();
    let Some(month) = month_number(month_name) else {
        debug!(input = %text, month = %month_name, "unknown month name in end time");
        return None;
    };

    let day = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let year = caps.get(3)?.as_str().parse::<i32>().ok()?;
    let hour = caps.get(4)?.as_str().parse::<u32>().ok()?;
    let minute = caps.get(5)?.as_str().parse::<u32>().ok()?;
    let second = caps.get(6)?.as_str().parse::<u32>().ok()?;

    let Some(naive) =
        NaiveDate::from_ymd_opt(year, month, day).and_then(|d| d.and_hms_opt(hour, minute, second))
    else {
        debug!(input = %text, "end time components out of range");
        return None;
    };

    timezone
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| timezone.from_local_datetime(&naive).latest())
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(abbrev, _)| *abbrev == name)
        .map(|(_, month)| *month)
}

fn epoch_hint(element: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let raw = element.value().attr(EPOCH_ATTRIBUTE).or_else(|| {
        element
            .descendants()
            .filter_map(ElementRef::wrap)
            .find_map(|el| el.value().attr(EPOCH_ATTRIBUTE))
    })?;

    match raw.trim().parse::<i64>() {
        Ok(millis) => {
            let instant = DateTime::from_timestamp_millis(millis);
            if instant.is_none() {
                debug!(millis, "epoch hint outside representable range; trying date text");
            }
            instant
        }
        Err(err) => {
            debug!(value = %raw, error = %err, "epoch hint is not an integer; trying date text");
            None
        }
    }
}
