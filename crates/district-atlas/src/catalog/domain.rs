use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// Top-level administrative entity with its campuses and finance figures.
///
/// Fields the API does not interpret are kept in `attributes` and echoed back on lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub campuses: Vec<Campus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub per_pupil_spending: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_debt: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spending: SpendingBreakdown,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl District {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            campuses: Vec::new(),
            per_pupil_spending: 0.0,
            total_debt: 0.0,
            spending: SpendingBreakdown::default(),
            attributes: Map::new(),
        }
    }

    pub fn summary(&self) -> DistrictSummary {
        DistrictSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A school owned by exactly one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campus {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Campus {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Map::new(),
        }
    }
}

/// Spending split across the four reporting categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingBreakdown {
    #[serde(default, deserialize_with = "null_as_default")]
    pub instruction: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub administration: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operations: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub other: f64,
}

impl SpendingBreakdown {
    pub fn total(&self) -> f64 {
        self.instruction + self.administration + self.operations + self.other
    }
}

/// Treats an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictSummary {
    pub id: String,
    pub name: String,
}

/// GeoJSON `FeatureCollection` kept as an opaque document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCollection(Value);

impl FeatureCollection {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Number of entries under `features`, or zero when the document has none.
    pub fn feature_count(&self) -> usize {
        self.0
            .get("features")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self(json!({ "type": "FeatureCollection", "features": [] }))
    }
}
