use crate::engine::{self, AgeError, Clock};
use crate::model::{planet_by_name, PlanetDescriptor, Profile, PLANETS};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// One calculation's worth of derived time. Both instants come from a single
/// clock sample, so every later render (including selection changes) reuses
/// the same base and never re-reads the clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AgeSnapshot {
    pub(crate) birth: DateTime<Utc>,
    pub(crate) sampled_at: DateTime<Utc>,
    pub(crate) elapsed_earth_years: f64,
}

/// Where the coordinator sits in its little lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CalcState {
    /// No birth date known at all.
    NoProfile,
    /// A birth date is loaded but nothing has been computed yet.
    ProfileLoaded,
    /// A snapshot exists; results are on screen and selection is live.
    Calculated,
}

/// View-model for the hero slot (the selected planet).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HeroView {
    pub(crate) name: &'static str,
    pub(crate) icon: &'static str,
    pub(crate) age_line: String,
    pub(crate) sub_line: String,
    pub(crate) gravity_line: String,
    pub(crate) badge: String,
    pub(crate) birthday_line: String,
    pub(crate) fact: &'static str,
}

/// View-model for one comparison card (every non-selected planet).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct CardView {
    pub(crate) name: &'static str,
    pub(crate) icon: &'static str,
    pub(crate) age_line: String,
    pub(crate) birthday_line: String,
    pub(crate) fact: &'static str,
}

/// Earth-only extras: the calendar definition of age and next birthday.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EarthStats {
    pub(crate) exact_line: String,
    pub(crate) next_birthday_line: String,
}

/// Everything the presentation surface needs for one frame. Text only, no
/// layout, no terminal cells.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewFrame {
    pub(crate) avatar: &'static str,
    pub(crate) hero: HeroView,
    pub(crate) cards: Vec<CardView>,
    pub(crate) earth: EarthStats,
}

/// Owns the profile and the current snapshot; fans one elapsed-years scalar
/// out across the planet table and partitions it into hero + cards.
pub(crate) struct Coordinator {
    profile: Profile,
    snapshot: Option<AgeSnapshot>,
    planets: &'static [PlanetDescriptor],
}

impl Coordinator {
    pub(crate) fn new() -> Self {
        Self {
            profile: Profile::new(),
            snapshot: None,
            planets: &PLANETS,
        }
    }

    pub(crate) fn state(&self) -> CalcState {
        match (&self.profile.dob, &self.snapshot) {
            (None, _) => CalcState::NoProfile,
            (Some(_), None) => CalcState::ProfileLoaded,
            (Some(_), Some(_)) => CalcState::Calculated,
        }
    }

    pub(crate) fn dob(&self) -> Option<NaiveDate> {
        self.profile.dob
    }

    pub(crate) fn selected_planet(&self) -> &str {
        &self.profile.selected_planet
    }

    /// Load a persisted birth date without computing anything yet.
    pub(crate) fn load_dob(&mut self, dob: NaiveDate) {
        self.profile.dob = Some(dob);
        self.snapshot = None;
    }

    /// Store the date and compute a fresh snapshot from one clock sample.
    /// On any failure the previous profile and snapshot stay untouched.
    pub(crate) fn calculate(&mut self, dob: NaiveDate, clock: &dyn Clock) -> Result<(), AgeError> {
        let birth = dob.and_time(NaiveTime::MIN).and_utc();
        let now = clock.now();
        let elapsed = engine::elapsed_earth_years(birth, now)?;

        self.profile.dob = Some(dob);
        self.snapshot = Some(AgeSnapshot {
            birth,
            sampled_at: now,
            elapsed_earth_years: elapsed,
        });
        Ok(())
    }

    /// Recompute from the already-stored date (startup auto-calculation).
    pub(crate) fn recalculate(&mut self, clock: &dyn Clock) -> Result<(), AgeError> {
        let dob = self.profile.dob.ok_or(AgeError::MissingBirthDate)?;
        self.calculate(dob, clock)
    }

    /// Swap the hero planet. Only meaningful once calculated; otherwise (or
    /// for an unknown name) this is a guarded no-op. Never resamples the
    /// clock, so the displayed base stays stable while browsing.
    pub(crate) fn select_planet(&mut self, name: &str) {
        if self.snapshot.is_none() || planet_by_name(name).is_none() {
            return;
        }
        self.profile.selected_planet = name.to_string();
    }

    /// Cycle the selection forwards or backwards through the planet table.
    pub(crate) fn select_adjacent(&mut self, step: i32) {
        if self.snapshot.is_none() {
            return;
        }
        let len = self.planets.len() as i32;
        let cur = self
            .planets
            .iter()
            .position(|p| p.name == self.profile.selected_planet)
            .unwrap_or(0) as i32;
        let next = (cur + step).rem_euclid(len) as usize;
        self.profile.selected_planet = self.planets[next].name.to_string();
    }

    /// Back to the blank state: no date, no snapshot, Earth in the hero slot.
    pub(crate) fn reset(&mut self) {
        self.profile = Profile::new();
        self.snapshot = None;
    }

    /// Build the view-models for the current snapshot, or None before any
    /// calculation. Pure: same snapshot and selection, same frame.
    pub(crate) fn frame(&self) -> Option<ViewFrame> {
        let snap = self.snapshot.as_ref()?;
        let dob = self.profile.dob?;

        let selected = planet_by_name(&self.profile.selected_planet)
            .or_else(|| planet_by_name("Earth"))?;

        let hero = HeroView {
            name: selected.name,
            icon: selected.icon,
            age_line: format!(
                "{:.2} Years",
                engine::planet_age_years(snap.elapsed_earth_years, selected)
            ),
            sub_line: format!("1 Year = {} Earth Years", selected.period),
            gravity_line: format!("Surface gravity: {}× Earth", selected.gravity),
            badge: if selected.name == "Earth" {
                "You are here 🌍".to_string()
            } else {
                format!("Selected: {}", selected.name)
            },
            birthday_line: engine::format_countdown(engine::days_until_planet_birthday(
                snap.birth,
                snap.sampled_at,
                selected,
            )),
            fact: selected.fact,
        };

        let cards = self
            .planets
            .iter()
            .filter(|p| p.name != selected.name)
            .map(|p| CardView {
                name: p.name,
                icon: p.icon,
                age_line: format!(
                    "{:.2} Years",
                    engine::planet_age_years(snap.elapsed_earth_years, p)
                ),
                birthday_line: engine::format_countdown(engine::days_until_planet_birthday(
                    snap.birth,
                    snap.sampled_at,
                    p,
                )),
                fact: p.fact,
            })
            .collect();

        let today = snap.sampled_at.date_naive();
        let exact = engine::exact_age(dob, today);
        let earth = EarthStats {
            exact_line: format!(
                "Exactly {}y {}m {}d on Earth",
                exact.years, exact.months, exact.days
            ),
            next_birthday_line: format!(
                "Next Earth birthday: {} days",
                engine::days_to_next_earth_birthday(dob, today)
            ),
        };

        Some(ViewFrame {
            avatar: engine::avatar_for_age(snap.elapsed_earth_years),
            hero,
            cards,
            earth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;

    struct FixedClock(StdCell<DateTime<Utc>>);

    impl FixedClock {
        fn at(y: i32, m: u32, d: u32) -> Self {
            Self(StdCell::new(date(y, m, d).and_time(NaiveTime::MIN).and_utc()))
        }
        fn advance_days(&self, days: i64) {
            self.0.set(self.0.get() + chrono::Duration::days(days));
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0.get()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn calculate_produces_earth_hero_and_seven_cards() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();

        assert_eq!(co.state(), CalcState::Calculated);
        let frame = co.frame().unwrap();
        assert_eq!(frame.hero.name, "Earth");
        assert_eq!(frame.hero.badge, "You are here 🌍");
        assert_eq!(frame.cards.len(), 7);
        assert!(frame.cards.iter().all(|c| c.name != "Earth"));
        assert_eq!(frame.hero.age_line, "24.00 Years");
        assert_eq!(frame.avatar, "👨‍🚀");
    }

    #[test]
    fn selection_reuses_snapshot_even_if_the_clock_moves() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();

        clock.advance_days(100);
        co.select_planet("Mars");
        let first = co.frame().unwrap();
        co.select_planet("Mars");
        let second = co.frame().unwrap();

        // idempotent, and still computed from the original sample
        assert_eq!(first, second);
        assert_eq!(first.hero.name, "Mars");
        assert_eq!(first.hero.age_line, "12.76 Years");
        assert_eq!(first.hero.badge, "Selected: Mars");
    }

    #[test]
    fn selection_is_guarded_before_calculation() {
        let mut co = Coordinator::new();
        co.select_planet("Mars");
        assert_eq!(co.selected_planet(), "Earth");
        co.select_adjacent(1);
        assert_eq!(co.selected_planet(), "Earth");

        let clock = FixedClock::at(2024, 1, 1);
        co.load_dob(date(2000, 1, 1));
        assert_eq!(co.state(), CalcState::ProfileLoaded);
        co.select_planet("Mars");
        assert_eq!(co.selected_planet(), "Earth");

        co.recalculate(&clock).unwrap();
        co.select_planet("Mars");
        assert_eq!(co.selected_planet(), "Mars");
    }

    #[test]
    fn unknown_planet_names_are_ignored() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();
        co.select_planet("Pluto");
        assert_eq!(co.selected_planet(), "Earth");
    }

    #[test]
    fn select_adjacent_wraps_both_ways() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();

        co.select_adjacent(-3); // Earth is index 2: wraps to Neptune
        assert_eq!(co.selected_planet(), "Neptune");
        co.select_adjacent(1);
        assert_eq!(co.selected_planet(), "Mercury");
    }

    #[test]
    fn future_date_rejection_leaves_prior_state_untouched() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();
        co.select_planet("Saturn");
        let before = co.frame().unwrap();

        let err = co.calculate(date(2024, 1, 2), &clock).unwrap_err();
        assert_eq!(err, AgeError::FutureBirthDate);
        assert_eq!(co.frame().unwrap(), before);
        assert_eq!(co.dob(), Some(date(2000, 1, 1)));
    }

    #[test]
    fn recalculate_without_a_date_is_missing_input() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        assert_eq!(co.recalculate(&clock).unwrap_err(), AgeError::MissingBirthDate);
        assert!(co.frame().is_none());
    }

    #[test]
    fn reset_returns_to_no_profile() {
        let clock = FixedClock::at(2024, 1, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 1), &clock).unwrap();
        co.select_planet("Jupiter");

        co.reset();
        assert_eq!(co.state(), CalcState::NoProfile);
        assert!(co.frame().is_none());
        assert_eq!(co.selected_planet(), "Earth");
    }

    #[test]
    fn birth_on_calculation_day_shows_zero_ages() {
        let clock = FixedClock::at(2024, 5, 5);
        let mut co = Coordinator::new();
        co.calculate(date(2024, 5, 5), &clock).unwrap();
        let frame = co.frame().unwrap();
        assert_eq!(frame.hero.age_line, "0.00 Years");
        assert!(frame.cards.iter().all(|c| c.age_line == "0.00 Years"));
        // Earth's countdown at elapsed zero: a full 366-day (ceil) year
        assert_eq!(frame.hero.birthday_line, "12.0 mo");
    }

    #[test]
    fn earth_stats_use_the_calendar_definitions() {
        let clock = FixedClock::at(2024, 3, 1);
        let mut co = Coordinator::new();
        co.calculate(date(2000, 1, 31), &clock).unwrap();
        let frame = co.frame().unwrap();
        assert_eq!(frame.earth.exact_line, "Exactly 24y 0m 30d on Earth");
        // Jan 31 2025 is 336 days past Mar 1 2024
        assert_eq!(frame.earth.next_birthday_line, "Next Earth birthday: 336 days");
    }
}
