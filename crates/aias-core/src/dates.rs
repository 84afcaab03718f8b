// ── Date display helpers ──
//
// Event times are stored as the strings the admin form produced. These
// helpers parse them leniently and render the pieces page templates use.
// Unparseable input is never an error: it yields `None` / `false`.

use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTHS_AR: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

/// Display language of the site.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    fn month_name(self, month0: usize) -> &'static str {
        let table = match self {
            Self::En => &MONTHS_SHORT,
            Self::Ar => &MONTHS_AR,
        };
        table.get(month0).copied().unwrap_or_default()
    }
}

/// Pieces of a date for page templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedDate {
    pub day: u32,
    /// Month name in the display language.
    pub month: String,
    pub year: i32,
    /// Upper-cased English short month, e.g. `MAR`.
    pub month_short: String,
    /// 12-hour clock, e.g. `06:30 PM`.
    pub time: String,
    /// e.g. `March 5, 2025`.
    pub full_date: String,
}

/// Parse a stored date string into an instant in `tz`.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS[.fff]]` (read as local time in
/// `tz`) and `YYYY-MM-DD` (UTC midnight).
pub fn parse_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(tz));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight).with_timezone(tz))
}

/// Format a stored date in the local time zone.
pub fn format_date(input: Option<&str>, lang: Option<Language>) -> Option<FormattedDate> {
    format_date_in(input, lang, &Local)
}

/// Format a stored date in an explicit time zone.
pub fn format_date_in<Tz: TimeZone>(
    input: Option<&str>,
    lang: Option<Language>,
    tz: &Tz,
) -> Option<FormattedDate> {
    let dt = parse_in(input?, tz)?;
    let lang = lang.unwrap_or_default();
    let month0 = usize::try_from(dt.month0()).ok()?;
    let short = MONTHS_SHORT.get(month0)?;
    let long = MONTHS_LONG.get(month0)?;
    let (pm, hour) = dt.hour12();

    Some(FormattedDate {
        day: dt.day(),
        month: lang.month_name(month0).to_owned(),
        year: dt.year(),
        month_short: short.to_uppercase(),
        time: format!("{hour:02}:{:02} {}", dt.minute(), if pm { "PM" } else { "AM" }),
        full_date: format!("{long} {}, {}", dt.day(), dt.year()),
    })
}

/// Whether the date lies before the current instant.
pub fn is_past_event(input: Option<&str>) -> bool {
    is_past_event_at(input, Utc::now())
}

/// Whether the date lies before `now`. `false` for missing or
/// unparseable input.
pub fn is_past_event_at(input: Option<&str>, now: DateTime<Utc>) -> bool {
    input
        .and_then(|s| parse_in(s, &Local))
        .is_some_and(|dt| dt.with_timezone(&Utc) < now)
}
