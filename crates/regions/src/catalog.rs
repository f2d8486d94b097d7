use std::collections::HashMap;

use once_cell::unsync::OnceCell;
use tracing::debug;

use crate::adjacency::{AdjacencyIndex, build_adjacency};
use crate::error::GeometryError;
use crate::region::{Region, RegionId};

/// The loaded region dataset.
///
/// Ordering contract:
/// - `iter()` yields regions in dataset order.
///
/// The adjacency index is derived on first use and cached for the lifetime
/// of the catalog; the region set never changes after construction.
#[derive(Debug)]
pub struct RegionCatalog {
    regions: Vec<Region>,
    by_id: HashMap<RegionId, usize>,
    adjacency: OnceCell<AdjacencyIndex>,
}

impl RegionCatalog {
    pub fn new(regions: Vec<Region>) -> Result<Self, GeometryError> {
        let mut by_id = HashMap::with_capacity(regions.len());
        for (index, region) in regions.iter().enumerate() {
            if by_id.insert(region.id().clone(), index).is_some() {
                return Err(GeometryError::DuplicateRegionId {
                    id: region.id().to_string(),
                });
            }
        }
        debug!(regions = regions.len(), "region catalog loaded");
        Ok(Self {
            regions,
            by_id,
            adjacency: OnceCell::new(),
        })
    }

    /// Catalog with adjacency supplied by the data source (e.g. a topology).
    pub fn with_adjacency(
        regions: Vec<Region>,
        adjacency: AdjacencyIndex,
    ) -> Result<Self, GeometryError> {
        let catalog = Self::new(regions)?;
        if let Some(unknown) = adjacency.ids().find(|id| !catalog.by_id.contains_key(*id)) {
            return Err(GeometryError::UnknownRegionId {
                id: unknown.to_string(),
            });
        }
        // A fresh cell cannot already hold a value.
        let _ = catalog.adjacency.set(adjacency);
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: &str) -> Option<&Region> {
        self.by_id.get(id).map(|&i| &self.regions[i])
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Exact, case-insensitive name lookup. Surrounding whitespace is ignored.
    pub fn find_by_name(&self, name: &str) -> Option<&Region> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.regions
            .iter()
            .find(|r| r.name().to_lowercase() == wanted)
    }

    /// Adjacency across the whole catalog, built once on first call.
    pub fn adjacency(&self) -> Result<&AdjacencyIndex, GeometryError> {
        self.adjacency
            .get_or_try_init(|| build_adjacency(&self.regions))
    }
}
