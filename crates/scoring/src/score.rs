use foundation::math::distance_km;
use regions::{AdjacencyIndex, Region, RegionCatalog};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::ScoringConfig;
use crate::error::ScoringError;

/// Outcome of scoring one guess against the target.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Great-circle distance between centroids; 0 for an exact match.
    pub distance_km: f64,
    pub is_neighbor: bool,
    pub exact_match: bool,
}

/// Score `guessed` against `target`. Pure; no side effects.
pub fn score(guessed: &Region, target: &Region, adjacency: &AdjacencyIndex) -> ScoreResult {
    let exact_match = guessed.id() == target.id();
    let distance_km = if exact_match {
        0.0
    } else {
        distance_km(guessed.centroid(), target.centroid())
    };
    ScoreResult {
        distance_km,
        is_neighbor: !exact_match && adjacency.are_adjacent(guessed.id().as_str(), target.id().as_str()),
        exact_match,
    }
}

/// Id-based [`score`]. Unknown ids are an error, never substituted.
pub fn score_ids(
    catalog: &RegionCatalog,
    adjacency: &AdjacencyIndex,
    guessed_id: &str,
    target_id: &str,
) -> Result<ScoreResult, ScoringError> {
    let lookup = |id: &str| {
        catalog
            .get(id)
            .ok_or_else(|| ScoringError::NotFound { id: id.to_string() })
    };
    let guessed = lookup(guessed_id)?;
    let target = lookup(target_id)?;
    Ok(score(guessed, target, adjacency))
}

/// Fill colour for a scored guess.
///
/// Exact match wins, then adjacency, then the distance ramp. A neighbour
/// always gets the border colour however close its centroid is.
pub fn color_for(result: &ScoreResult, config: &ScoringConfig) -> Color {
    if result.exact_match {
        config.solved_color
    } else if result.is_neighbor {
        config.border_color
    } else {
        distance_color(
            result.distance_km,
            config.max_distance_km,
            config.near_color,
            config.far_color,
        )
    }
}

/// Cubic ease-out ramp from `near` at 0 km to `far` at `max_distance_km`.
pub fn distance_color(distance_km: f64, max_distance_km: f64, near: Color, far: Color) -> Color {
    let eased = 1.0 - (1.0 - distance_ratio(distance_km, max_distance_km)).powi(3);
    far.mix(near, 1.0 - eased)
}

/// `min(distance / max, 1)`, with non-positive maxima saturating.
pub fn distance_ratio(distance_km: f64, max_distance_km: f64) -> f64 {
    if max_distance_km.is_nan() || max_distance_km <= 0.0 {
        return 1.0;
    }
    (distance_km / max_distance_km).clamp(0.0, 1.0)
}
