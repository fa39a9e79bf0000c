use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Static description of a planet. One entry per name; Earth is always
/// present with a period of exactly 1.0.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PlanetDescriptor {
    pub(crate) name: &'static str,
    /// Orbital period as a multiple of one Earth-year (365.25 days). > 0.
    pub(crate) period: f64,
    /// Surface gravity relative to Earth. Informational only.
    pub(crate) gravity: f64,
    pub(crate) icon: &'static str,
    pub(crate) fact: &'static str,
}

pub(crate) const PLANETS: [PlanetDescriptor; 8] = [
    PlanetDescriptor {
        name: "Mercury",
        period: 0.2408,
        gravity: 0.38,
        icon: "🪙",
        fact: "A year is only 88 Earth days!",
    },
    PlanetDescriptor {
        name: "Venus",
        period: 0.6152,
        gravity: 0.91,
        icon: "✨",
        fact: "A day on Venus is longer than a year!",
    },
    PlanetDescriptor {
        name: "Earth",
        period: 1.0,
        gravity: 1.0,
        icon: "🌍",
        fact: "The only known planet with life!",
    },
    PlanetDescriptor {
        name: "Mars",
        period: 1.8808,
        gravity: 0.38,
        icon: "🔴",
        fact: "Home of Olympus Mons, largest volcano.",
    },
    PlanetDescriptor {
        name: "Jupiter",
        period: 11.862,
        gravity: 2.34,
        icon: "🌩️",
        fact: "Could fit 1,300 Earths inside!",
    },
    PlanetDescriptor {
        name: "Saturn",
        period: 29.447,
        gravity: 1.06,
        icon: "🪐",
        fact: "Its density is so low, it would float in water.",
    },
    PlanetDescriptor {
        name: "Uranus",
        period: 84.016,
        gravity: 0.92,
        icon: "❄️",
        fact: "Rotates on its side like a rolling ball.",
    },
    PlanetDescriptor {
        name: "Neptune",
        period: 164.79,
        gravity: 1.19,
        icon: "🌊",
        fact: "Has supersonic winds up to 1,200 mph.",
    },
];

pub(crate) fn planet_by_name(name: &str) -> Option<&'static PlanetDescriptor> {
    PLANETS.iter().find(|p| p.name == name)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// The single mutable cross-call state: the user's birth date and which
/// planet currently sits in the hero slot.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Profile {
    pub(crate) dob: Option<NaiveDate>,
    pub(crate) selected_planet: String,
}

impl Profile {
    pub(crate) fn new() -> Self {
        Self {
            dob: None,
            selected_planet: "Earth".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scene {
    Main,
    Quiz,
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_table_invariants() {
        // one descriptor per name, all periods positive
        for (i, p) in PLANETS.iter().enumerate() {
            assert!(p.period > 0.0, "{} has non-positive period", p.name);
            assert!(p.gravity > 0.0, "{} has non-positive gravity", p.name);
            assert!(
                PLANETS.iter().skip(i + 1).all(|q| q.name != p.name),
                "duplicate planet {}",
                p.name
            );
        }
        let earth = planet_by_name("Earth").unwrap();
        assert_eq!(earth.period, 1.0);
    }

    #[test]
    fn lookup_by_name() {
        assert!(planet_by_name("Mars").is_some());
        assert!(planet_by_name("Pluto").is_none());
    }

    #[test]
    fn theme_round_trip() {
        for t in [Theme::Dark, Theme::Light] {
            assert_eq!(Theme::parse(t.as_str()), Some(t));
            assert_eq!(t.toggled().toggled(), t);
        }
        assert_eq!(Theme::parse("sepia"), None);
    }
}
