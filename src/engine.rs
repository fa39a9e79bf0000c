use crate::model::PlanetDescriptor;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use thiserror::Error;

pub(crate) const EARTH_YEAR_DAYS: f64 = 365.25;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Input-validation failures. Both are user-facing and recoverable; the
/// caller keeps its previous state when one of these comes back.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AgeError {
    #[error("no birth date supplied")]
    MissingBirthDate,
    #[error("birth date is in the future")]
    FutureBirthDate,
}

/// Injected time source so calculations can be pinned in tests. Sampled
/// exactly once per calculation; everything downstream reuses that sample.
pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fractional Earth-years between two instants, using a fixed 365.25-day
/// year (wall-clock millisecond difference; leap seconds and timezones are
/// deliberately ignored).
pub(crate) fn elapsed_earth_years(
    birth: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<f64, AgeError> {
    if birth > now {
        return Err(AgeError::FutureBirthDate);
    }
    let ms = (now - birth).num_milliseconds() as f64;
    Ok(ms / (MS_PER_DAY * EARTH_YEAR_DAYS))
}

/// Elapsed Earth-years expressed in a planet's own years. The period being
/// positive is a configuration invariant of the planet table.
pub(crate) fn planet_age_years(elapsed_earth_years: f64, planet: &PlanetDescriptor) -> f64 {
    elapsed_earth_years / planet.period
}

/// Days until cumulative elapsed time next crosses an exact multiple of the
/// planet's year length. Always in (0, planet_year_days]: at an exact
/// multiple the remainder is 0 and a full planet year comes back, so "today
/// is the birthday" reads as a whole year away, never 0.
pub(crate) fn days_until_planet_birthday(
    birth: DateTime<Utc>,
    now: DateTime<Utc>,
    planet: &PlanetDescriptor,
) -> i64 {
    let planet_year_days = planet.period * EARTH_YEAR_DAYS;
    let age_days = (now - birth).num_milliseconds() as f64 / MS_PER_DAY;
    (planet_year_days - age_days.rem_euclid(planet_year_days)).ceil() as i64
}

/// Calendar age in whole years, months and days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ExactAge {
    pub(crate) years: i32,
    pub(crate) months: i32,
    pub(crate) days: i32,
}

/// Calendar year/month/day delta, borrowing days from the month preceding
/// `today` when the day-of-month has not been reached yet.
pub(crate) fn exact_age(dob: NaiveDate, today: NaiveDate) -> ExactAge {
    let mut years = today.year() - dob.year();
    let mut months = today.month() as i32 - dob.month() as i32;
    let mut days = today.day() as i32 - dob.day() as i32;

    // Borrow days from the months walking backwards from `today`. A single
    // borrow can come up short when the preceding month is shorter than the
    // birth day-of-month (Jan 31 -> Mar 1), hence the loop.
    let (mut by, mut bm) = (today.year(), today.month());
    while days < 0 {
        months -= 1;
        if bm == 1 {
            by -= 1;
            bm = 12;
        } else {
            bm -= 1;
        }
        days += days_in_month(by, bm) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    ExactAge {
        years,
        months,
        days,
    }
}

/// Days until the next calendar anniversary of `dob`. This is the *other*
/// "next birthday" definition the app carries, used only for the Earth stats
/// slot; per-planet countdowns use `days_until_planet_birthday` instead.
/// A Feb 29 anniversary rolls over to Mar 1 in non-leap years. On the
/// birthday itself the result is 0.
pub(crate) fn days_to_next_earth_birthday(dob: NaiveDate, today: NaiveDate) -> i64 {
    let anniversary = |year: i32| {
        NaiveDate::from_ymd_opt(year, dob.month(), dob.day())
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .unwrap_or(today)
    };

    let mut next = anniversary(today.year());
    if next < today {
        next = anniversary(today.year() + 1);
    }
    (next - today).num_days()
}

fn days_in_month(year: i32, month: u32) -> i64 {
    let (ny, nm) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(ny, nm, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days(),
        _ => 30,
    }
}

/// Avatar glyph for the header, by Earth age bracket.
pub(crate) fn avatar_for_age(earth_years: f64) -> &'static str {
    if earth_years > 90.0 {
        "👽"
    } else if earth_years > 60.0 {
        "👴"
    } else if earth_years > 20.0 {
        "👨‍🚀"
    } else if earth_years > 13.0 {
        "👱"
    } else if earth_years > 4.0 {
        "👦"
    } else {
        "👶"
    }
}

/// Countdown formatting: short waits in days, longer ones in average months.
pub(crate) fn format_countdown(days: i64) -> String {
    if days < 60 {
        format!("{days} days")
    } else {
        format!("{:.1} mo", days as f64 / 30.44)
    }
}
