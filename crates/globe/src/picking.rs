use foundation::math::{LonLat, Vec2};
use regions::{Region, is_on_visible_hemisphere};

use crate::projection::ProjectionEngine;

/// A region under the pointer.
#[derive(Debug, Clone, Copy)]
pub struct PickHit<'a> {
    pub region: &'a Region,
    /// Geographic position under the pointer.
    pub position: LonLat,
}

/// First region (in iteration order) containing the point under `screen`.
///
/// Points off the disc or on the far hemisphere never hit anything.
pub fn pick_region<'a, I>(engine: &ProjectionEngine, regions: I, screen: Vec2) -> Option<PickHit<'a>>
where
    I: IntoIterator<Item = &'a Region>,
{
    let position = engine.invert(screen)?;
    if !is_on_visible_hemisphere(position, engine.rotation()) {
        return None;
    }
    regions
        .into_iter()
        .find(|region| region.contains(position))
        .map(|region| PickHit { region, position })
}
