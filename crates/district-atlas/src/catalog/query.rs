use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{Campus, District, DistrictSummary, FeatureCollection};
use super::Catalog;

/// Filters accepted by the district search.
///
/// Every field is optional; an absent or blank value places no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DistrictQuery {
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub min_spend: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub max_debt: Option<f64>,
}

impl DistrictQuery {
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    fn admits(&self, district: &District, needle: Option<&str>) -> bool {
        if let Some(min_spend) = self.min_spend {
            if district.per_pupil_spending < min_spend {
                return false;
            }
        }
        if let Some(max_debt) = self.max_debt {
            if district.total_debt > max_debt {
                return false;
            }
        }
        match needle {
            Some(needle) => {
                district.name.to_lowercase().contains(needle)
                    || district
                        .campuses
                        .iter()
                        .any(|campus| campus.name.to_lowercase().contains(needle))
            }
            None => true,
        }
    }
}

/// Result of an identifier lookup: either a district or one of its campuses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchoolRecord<'a> {
    District(&'a District),
    Campus(&'a Campus),
}

impl SchoolRecord<'_> {
    pub fn id(&self) -> &str {
        match self {
            SchoolRecord::District(district) => &district.id,
            SchoolRecord::Campus(campus) => &campus.id,
        }
    }
}

/// Aggregate finance figures across the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total_spending: f64,
    pub avg_per_pupil: f64,
    pub district_count: usize,
}

/// Which GeoJSON layer to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayer {
    Districts,
    Campuses,
}

impl Catalog {
    /// Districts whose name or any campus name contains `q` (case-insensitive), within the
    /// spending and debt thresholds. Results keep dataset order.
    pub fn search(&self, query: &DistrictQuery) -> Vec<DistrictSummary> {
        let needle = query.q.as_deref().map(str::to_lowercase);
        self.districts
            .iter()
            .filter(|district| query.admits(district, needle.as_deref()))
            .map(District::summary)
            .collect()
    }

    /// First record carrying `id`, walking each district before its own campuses.
    pub fn find(&self, id: &str) -> Option<SchoolRecord<'_>> {
        self.districts.iter().find_map(|district| {
            if district.id == id {
                return Some(SchoolRecord::District(district));
            }
            district
                .campuses
                .iter()
                .find(|campus| campus.id == id)
                .map(SchoolRecord::Campus)
        })
    }

    pub fn summary(&self) -> SpendingSummary {
        let district_count = self.districts.len();
        let total_spending = self
            .districts
            .iter()
            .map(|district| district.spending.total())
            .sum();
        let avg_per_pupil = if district_count == 0 {
            0.0
        } else {
            self.districts
                .iter()
                .map(|district| district.per_pupil_spending)
                .sum::<f64>()
                / district_count as f64
        };

        SpendingSummary {
            total_spending,
            avg_per_pupil,
            district_count,
        }
    }

    pub fn geojson(&self, layer: GeoLayer) -> &FeatureCollection {
        match layer {
            GeoLayer::Districts => &self.geojson_districts,
            GeoLayer::Campuses => &self.geojson_campuses,
        }
    }
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.is_empty()))
}

fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|err| serde::de::Error::custom(format!("'{value}' is not a number ({err})")))
        })
        .transpose()
}
