//! In-memory district catalog: domain records, dataset loading, and the read-only queries.

pub mod domain;
mod loader;
pub mod query;

pub use domain::{Campus, District, DistrictSummary, FeatureCollection, SpendingBreakdown};
pub use loader::DatasetError;
pub use query::{DistrictQuery, GeoLayer, SchoolRecord, SpendingSummary};

/// Immutable snapshot of the district dataset taken at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    districts: Vec<District>,
    geojson_districts: FeatureCollection,
    geojson_campuses: FeatureCollection,
}

impl Catalog {
    pub fn new(districts: Vec<District>) -> Self {
        Self {
            districts,
            ..Self::default()
        }
    }

    pub fn with_geojson(
        mut self,
        districts: FeatureCollection,
        campuses: FeatureCollection,
    ) -> Self {
        self.geojson_districts = districts;
        self.geojson_campuses = campuses;
        self
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}
