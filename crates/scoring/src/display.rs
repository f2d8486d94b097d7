use serde::{Deserialize, Serialize};

use crate::guess::Guess;
use crate::score::distance_ratio;

pub const KM_TO_MILES: f64 = 0.621371;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
}

impl DistanceUnit {
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km * KM_TO_MILES,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "miles",
        }
    }
}

/// Whole-unit distance, e.g. `"1234 km"`.
pub fn format_distance(distance_km: f64, unit: DistanceUnit) -> String {
    format!("{} {}", unit.from_km(distance_km).round(), unit.suffix())
}

/// Text shown next to a guess: neighbours say so instead of a distance.
pub fn guess_label(guess: &Guess, unit: DistanceUnit) -> String {
    if guess.is_neighbor {
        "Borders".to_string()
    } else {
        format_distance(guess.distance_km, unit)
    }
}

/// One square per guess for the share text.
pub fn share_emoji(distance_km: f64, max_distance_km: f64) -> &'static str {
    let ratio = distance_ratio(distance_km, max_distance_km);
    if ratio == 0.0 {
        "🟩"
    } else if ratio < 0.1 {
        "🟥"
    } else if ratio < 0.4 {
        "🟧"
    } else if ratio < 0.6 {
        "🟨"
    } else {
        "⬜"
    }
}

/// `"<heading> - <n> guesses"`, a blank line, then the emoji row.
pub fn share_text(heading: &str, guesses: &[Guess], max_distance_km: f64) -> String {
    let row: String = guesses
        .iter()
        .map(|g| share_emoji(g.distance_km, max_distance_km))
        .collect();
    format!("{heading} - {} guesses\n\n{row}", guesses.len())
}
