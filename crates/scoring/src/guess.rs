use std::cmp::Ordering;

use foundation::math::stable_total_cmp_f64;
use regions::{AdjacencyIndex, RegionCatalog, RegionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::config::ScoringConfig;
use crate::display::share_emoji;
use crate::error::ScoringError;
use crate::score::{ScoreResult, color_for, score};

/// One scored submission. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    pub region_id: String,
    pub name: String,
    pub distance_km: f64,
    pub is_neighbor: bool,
    pub exact_match: bool,
    pub color: Color,
}

impl Guess {
    pub fn result(&self) -> ScoreResult {
        ScoreResult {
            distance_km: self.distance_km,
            is_neighbor: self.is_neighbor,
            exact_match: self.exact_match,
        }
    }
}

/// Guesses against a single target, in submission order.
///
/// The board is the boundary where duplicate and post-win submissions are
/// refused, so re-submitting the same region is idempotent: the second
/// attempt fails and leaves the board untouched.
#[derive(Debug, Clone)]
pub struct GuessBoard {
    target: RegionId,
    guesses: Vec<Guess>,
    config: ScoringConfig,
}

impl GuessBoard {
    pub fn new(target: impl Into<RegionId>, config: ScoringConfig) -> Self {
        Self {
            target: target.into(),
            guesses: Vec::new(),
            config,
        }
    }

    /// Rebuild a board from persisted guesses, re-checking the same rules
    /// [`GuessBoard::submit`] enforces. Every id must exist in `catalog` and
    /// `exact_match` must agree with the target; the stored distance and
    /// colour are kept as saved.
    pub fn restore(
        catalog: &RegionCatalog,
        target: impl Into<RegionId>,
        config: ScoringConfig,
        guesses: Vec<Guess>,
    ) -> Result<Self, ScoringError> {
        let mut board = Self::new(target, config);
        if !catalog.contains_id(board.target.as_str()) {
            return Err(ScoringError::NotFound {
                id: board.target.to_string(),
            });
        }
        for guess in guesses {
            board.check_accepts(&guess.region_id)?;
            if !catalog.contains_id(&guess.region_id) {
                return Err(ScoringError::NotFound { id: guess.region_id });
            }
            if guess.exact_match != (guess.region_id == board.target.as_str()) {
                return Err(ScoringError::InconsistentGuess { id: guess.region_id });
            }
            board.guesses.push(guess);
        }
        Ok(board)
    }

    pub fn target(&self) -> &RegionId {
        &self.target
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    pub fn solved(&self) -> bool {
        self.guesses.iter().any(|g| g.exact_match)
    }

    pub fn contains(&self, region_id: &str) -> bool {
        self.guesses.iter().any(|g| g.region_id == region_id)
    }

    /// Score a validated region id and record it.
    pub fn submit(
        &mut self,
        catalog: &RegionCatalog,
        adjacency: &AdjacencyIndex,
        region_id: &str,
    ) -> Result<&Guess, ScoringError> {
        self.check_accepts(region_id)?;
        let not_found = |id: &str| ScoringError::NotFound { id: id.to_string() };
        let guessed = catalog.get(region_id).ok_or_else(|| not_found(region_id))?;
        let target = catalog
            .get(self.target.as_str())
            .ok_or_else(|| not_found(self.target.as_str()))?;

        let result = score(guessed, target, adjacency);
        let guess = Guess {
            region_id: guessed.id().to_string(),
            name: guessed.name().to_string(),
            distance_km: result.distance_km,
            is_neighbor: result.is_neighbor,
            exact_match: result.exact_match,
            color: color_for(&result, &self.config),
        };
        debug!(
            region = %guess.region_id,
            distance_km = guess.distance_km,
            neighbor = guess.is_neighbor,
            solved = guess.exact_match,
            "guess recorded"
        );
        self.guesses.push(guess);
        Ok(&self.guesses[self.guesses.len() - 1])
    }

    fn check_accepts(&self, region_id: &str) -> Result<(), ScoringError> {
        if self.solved() {
            return Err(ScoringError::AlreadySolved);
        }
        if self.contains(region_id) {
            return Err(ScoringError::DuplicateGuess {
                id: region_id.to_string(),
            });
        }
        Ok(())
    }

    /// Guesses as listed to the player: the exact match first, then
    /// neighbours, then by ascending distance. Ties keep submission order.
    pub fn display_order(&self) -> Vec<&Guess> {
        let mut sorted: Vec<&Guess> = self.guesses.iter().collect();
        sorted.sort_by(|a, b| display_cmp(a, b));
        sorted
    }

    /// Emoji row in submission order.
    pub fn share_row(&self) -> String {
        self.guesses
            .iter()
            .map(|g| share_emoji(g.distance_km, self.config.max_distance_km))
            .collect()
    }
}

fn display_cmp(a: &Guess, b: &Guess) -> Ordering {
    b.exact_match
        .cmp(&a.exact_match)
        .then(b.is_neighbor.cmp(&a.is_neighbor))
        .then_with(|| stable_total_cmp_f64(a.distance_km, b.distance_km))
}

#[cfg(test)]
mod tests {
    use super::GuessBoard;
    use crate::config::ScoringConfig;
    use crate::error::ScoringError;
    use pretty_assertions::assert_eq;
    use regions::{Polygon, Region, RegionCatalog, Ring};

    fn rect(id: &str, west: f64, east: f64, south: f64, north: f64) -> Region {
        let ring = Ring::from(vec![[west, south], [east, south], [east, north], [west, north]]);
        Region::new(id, format!("{id} Sea"), vec![Polygon::new(vec![ring])]).unwrap()
    }

    fn catalog() -> RegionCatalog {
        RegionCatalog::new(vec![
            rect("target", 0.0, 10.0, 0.0, 10.0),
            rect("next", 10.0, 20.0, 0.0, 10.0),
            rect("far", 100.0, 110.0, 0.0, 10.0),
            rect("mid", 40.0, 50.0, 0.0, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn records_in_submission_order_and_sorts_for_display() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        for id in ["far", "mid", "next", "target"] {
            board.submit(&catalog, adjacency, id).unwrap();
        }
        let submitted: Vec<&str> = board.guesses().iter().map(|g| g.region_id.as_str()).collect();
        assert_eq!(submitted, vec!["far", "mid", "next", "target"]);

        let shown: Vec<&str> = board
            .display_order()
            .into_iter()
            .map(|g| g.region_id.as_str())
            .collect();
        assert_eq!(shown, vec!["target", "next", "mid", "far"]);
        assert!(board.solved());
        assert_eq!(board.guesses()[3].name, "target Sea");
    }

    #[test]
    fn duplicate_is_rejected_without_changing_board() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        board.submit(&catalog, adjacency, "mid").unwrap();
        assert_eq!(
            board.submit(&catalog, adjacency, "mid").unwrap_err(),
            ScoringError::DuplicateGuess {
                id: "mid".to_string()
            }
        );
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn nothing_accepted_after_win() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        board.submit(&catalog, adjacency, "target").unwrap();
        assert_eq!(
            board.submit(&catalog, adjacency, "far").unwrap_err(),
            ScoringError::AlreadySolved
        );
    }

    #[test]
    fn unknown_region_is_not_found() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        assert!(matches!(
            board.submit(&catalog, adjacency, "atlantis"),
            Err(ScoringError::NotFound { .. })
        ));
        assert!(board.is_empty());
    }

    #[test]
    fn restore_replays_rules() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        board.submit(&catalog, adjacency, "mid").unwrap();
        board.submit(&catalog, adjacency, "next").unwrap();

        let json = serde_json::to_string(board.guesses()).unwrap();
        let saved = serde_json::from_str(&json).unwrap();
        let restored =
            GuessBoard::restore(&catalog, "target", ScoringConfig::default(), saved).unwrap();
        assert_eq!(restored.guesses(), board.guesses());

        let mut dup = board.guesses().to_vec();
        dup.push(dup[0].clone());
        assert!(matches!(
            GuessBoard::restore(&catalog, "target", ScoringConfig::default(), dup),
            Err(ScoringError::DuplicateGuess { .. })
        ));
    }

    #[test]
    fn restore_rejects_unknown_and_inconsistent_guesses() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        board.submit(&catalog, adjacency, "mid").unwrap();
        let saved = board.guesses().to_vec();

        let mut unknown = saved.clone();
        unknown[0].region_id = "atlantis".to_string();
        assert_eq!(
            GuessBoard::restore(&catalog, "target", ScoringConfig::default(), unknown)
                .unwrap_err(),
            ScoringError::NotFound {
                id: "atlantis".to_string()
            }
        );

        let mut forged = saved.clone();
        forged[0].exact_match = true;
        assert_eq!(
            GuessBoard::restore(&catalog, "target", ScoringConfig::default(), forged)
                .unwrap_err(),
            ScoringError::InconsistentGuess {
                id: "mid".to_string()
            }
        );

        assert!(matches!(
            GuessBoard::restore(&catalog, "atlantis", ScoringConfig::default(), saved),
            Err(ScoringError::NotFound { .. })
        ));
    }

    #[test]
    fn share_row_follows_submission_order() {
        let catalog = catalog();
        let adjacency = catalog.adjacency().unwrap();
        let mut board = GuessBoard::new("target", ScoringConfig::default());
        board.submit(&catalog, adjacency, "next").unwrap();
        board.submit(&catalog, adjacency, "target").unwrap();
        assert_eq!(board.share_row(), "🟥🟩");
    }
}
