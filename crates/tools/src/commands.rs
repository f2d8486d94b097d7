use std::fmt::Write as _;

use foundation::math::{LonLat, distance_km, initial_bearing_deg};
use regions::{Region, RegionCatalog};
use scoring::{DistanceUnit, GuessBoard, ScoringConfig, guess_label, share_emoji};

use crate::error::CliError;

/// Resolve a display name (case-insensitive) or, failing that, an id.
pub fn resolve<'a>(catalog: &'a RegionCatalog, name_or_id: &str) -> Result<&'a Region, CliError> {
    catalog
        .find_by_name(name_or_id)
        .or_else(|| catalog.get(name_or_id.trim()))
        .ok_or_else(|| CliError::UnknownName(name_or_id.to_string()))
}

/// One line per region: id, name, centroid, neighbour count.
pub fn inspect(catalog: &RegionCatalog) -> Result<String, CliError> {
    let adjacency = catalog.adjacency()?;
    let mut out = String::new();
    for region in catalog.iter() {
        let c = region.centroid();
        let _ = writeln!(
            out,
            "{}\t{}\t({:.3}, {:.3})\t{} neighbours",
            region.id(),
            region.name(),
            c.lon,
            c.lat,
            adjacency.neighbor_count(region.id().as_str()),
        );
    }
    Ok(out)
}

pub fn neighbors(catalog: &RegionCatalog, name: &str) -> Result<String, CliError> {
    let region = resolve(catalog, name)?;
    let adjacency = catalog.adjacency()?;
    let mut out = String::new();
    for id in adjacency.neighbors(region.id().as_str()) {
        let label = catalog.get(id.as_str()).map_or(id.as_str(), Region::name);
        let _ = writeln!(out, "{label}");
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreOptions {
    pub unit: DistanceUnit,
    pub json: bool,
}

/// Replay `guesses` against `target` through a [`GuessBoard`].
///
/// Rejected guesses (unknown, duplicate, after the win) are reported inline
/// and do not stop the replay.
pub fn score(
    catalog: &RegionCatalog,
    config: &ScoringConfig,
    target: &str,
    guesses: &[String],
    options: ScoreOptions,
) -> Result<String, CliError> {
    let target = resolve(catalog, target)?;
    let adjacency = catalog.adjacency()?;
    let mut board = GuessBoard::new(target.id().clone(), config.clone());
    let mut out = String::new();

    for name in guesses {
        let outcome = resolve(catalog, name).and_then(|region| {
            board
                .submit(catalog, adjacency, region.id().as_str())
                .map(Clone::clone)
                .map_err(CliError::from)
        });
        match outcome {
            Ok(guess) if !options.json => {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    guess.name,
                    guess_label(&guess, options.unit),
                    guess.color.to_hex(),
                    share_emoji(guess.distance_km, config.max_distance_km),
                );
            }
            Ok(_) => {}
            Err(e) if !options.json => {
                let _ = writeln!(out, "{name}\trejected: {e}");
            }
            Err(_) => {}
        }
    }

    if options.json {
        return serde_json::to_string_pretty(board.guesses()).map_err(CliError::Json);
    }
    let status = if board.solved() { "solved" } else { "unsolved" };
    let _ = writeln!(out, "\n{} guesses, {status}\n{}", board.len(), board.share_row());
    Ok(out)
}

pub fn distance(a: LonLat, b: LonLat, unit: DistanceUnit) -> String {
    let km = distance_km(a, b);
    format!(
        "{} (bearing {:.1} deg)",
        scoring::format_distance(km, unit),
        initial_bearing_deg(a, b)
    )
}
