use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// The time zone in which bills are assigned to calendar days.
///
/// Each timestamp is converted with the rules in force on its own date, so a
/// bill keeps its day across daylight saving changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayZone {
    #[default]
    Utc,
    /// The system time zone
    Local,
    /// A named IANA zone, e.g. `Europe/Berlin`
    Named(Tz),
    Fixed(FixedOffset),
}

impl DayZone {
    /// Parse an IANA zone name, or `local`/`utc`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("local") {
            return Some(DayZone::Local);
        }
        if value.eq_ignore_ascii_case("utc") {
            return Some(DayZone::Utc);
        }
        value.parse::<Tz>().ok().map(DayZone::Named)
    }

    /// Calendar day of `at` in this zone.
    pub fn date_of(&self, at: &DateTime<Utc>) -> NaiveDate {
        match self {
            DayZone::Utc => at.date_naive(),
            DayZone::Local => at.with_timezone(&Local).date_naive(),
            DayZone::Named(tz) => at.with_timezone(tz).date_naive(),
            DayZone::Fixed(offset) => at.with_timezone(offset).date_naive(),
        }
    }

    /// First instant of `day` in this zone.
    pub fn day_start(&self, day: NaiveDate) -> Option<DateTime<Utc>> {
        match self {
            DayZone::Utc => start_in(&Utc, day),
            DayZone::Local => start_in(&Local, day),
            DayZone::Named(tz) => start_in(tz, day),
            DayZone::Fixed(offset) => start_in(offset, day),
        }
    }

    /// Render `at` as a local time in this zone using a strftime pattern.
    pub fn format(&self, at: &DateTime<Utc>, pattern: &str) -> String {
        match self {
            DayZone::Utc => at.format(pattern).to_string(),
            DayZone::Local => at.with_timezone(&Local).format(pattern).to_string(),
            DayZone::Named(tz) => at.with_timezone(tz).format(pattern).to_string(),
            DayZone::Fixed(offset) => at.with_timezone(offset).format(pattern).to_string(),
        }
    }
}

/// Midnight, or the first hour after it when a DST jump skips midnight.
fn start_in<Z: TimeZone>(zone: &Z, day: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = day.and_hms_opt(0, 0, 0)?;
    zone.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            zone.from_local_datetime(&(midnight + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|start| start.with_timezone(&Utc))
}
