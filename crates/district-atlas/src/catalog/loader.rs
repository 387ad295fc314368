use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use super::domain::{District, FeatureCollection};
use super::Catalog;

/// On-disk shape of the district dataset.
#[derive(Debug, Deserialize)]
struct DatasetDocument {
    districts: Vec<District>,
    #[serde(default)]
    geojson_districts: Option<FeatureCollection>,
    #[serde(default)]
    geojson_campuses: Option<FeatureCollection>,
    /// Single-layer key from older datasets; `geojson_districts` wins when both are present.
    #[serde(default)]
    geojson: Option<FeatureCollection>,
}

/// Failure to bring the district dataset into memory.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("dataset {} is not a valid district document: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Catalog {
    /// Load the dataset at `path`.
    ///
    /// A missing file yields an empty catalog; a file that exists but does not parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "district dataset not found, serving an empty catalog");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(DatasetError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let catalog =
            Self::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            districts = catalog.len(),
            district_features = catalog.geojson_districts.feature_count(),
            campus_features = catalog.geojson_campuses.feature_count(),
            "district dataset loaded"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let document: DatasetDocument = serde_json::from_reader(reader)?;
        let districts_layer = document
            .geojson_districts
            .or(document.geojson)
            .unwrap_or_default();
        Ok(Self::new(document.districts)
            .with_geojson(districts_layer, document.geojson_campuses.unwrap_or_default()))
    }
}
