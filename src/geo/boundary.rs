//! GeoJSON municipality boundaries.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::EstabReaderConfig;
use crate::error::util::safe_read_to_string;
use crate::error::{Error, Result};
use crate::utils::logging::log_degraded;

use super::normalize_name;

/// One boundary feature with its matching key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryFeature {
    /// Value of the name property, if present and textual
    pub name: Option<String>,
    /// Normalized name; `""` when the name is missing
    pub key: String,
    /// Feature properties as read
    pub properties: Map<String, Value>,
    /// Feature geometry as read
    pub geometry: Value,
}

/// The features of a GeoJSON `FeatureCollection`, in file order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoundaryCollection {
    features: Vec<BoundaryFeature>,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Value,
}

impl BoundaryCollection {
    /// Parse a `FeatureCollection`, reading names from `name_property`
    ///
    /// # Errors
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Boundary`]
    /// when the document is not a feature collection.
    pub fn from_geojson_str(json: &str, name_property: &str) -> Result<Self> {
        let raw: RawCollection = serde_json::from_str(json).map_err(Error::from)?;
        if raw.kind != "FeatureCollection" {
            return Err(Error::Boundary(format!(
                "expected a FeatureCollection, found '{}'",
                raw.kind
            ))
            .into());
        }

        let features = raw
            .features
            .into_iter()
            .map(|feature| {
                let properties = feature.properties.unwrap_or_default();
                let name = properties
                    .get(name_property)
                    .and_then(Value::as_str)
                    .map(str::to_string);
                BoundaryFeature {
                    key: normalize_name(name.as_deref()),
                    name,
                    properties,
                    geometry: feature.geometry,
                }
            })
            .collect();

        Ok(Self { features })
    }

    /// Read a GeoJSON file
    pub fn from_path(path: &Path, name_property: &str) -> Result<Self> {
        let json = safe_read_to_string(path, "reading municipality boundaries")?;
        let collection = Self::from_geojson_str(&json, name_property)
            .map_err(|e| e.context(format!("Invalid boundaries in {}", path.display())))?;

        let unnamed = collection.features.iter().filter(|f| f.name.is_none()).count();
        if unnamed > 0 {
            log::warn!(
                "{unnamed} boundary feature(s) in {} lack a '{name_property}' property",
                path.display()
            );
        }
        log::info!(
            "Loaded {} boundary features from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Read a GeoJSON file, logging and returning `None` on failure
    #[must_use]
    pub fn load_or_degrade(path: &Path, config: &EstabReaderConfig) -> Option<Self> {
        match Self::from_path(path, &config.boundary_name_property) {
            Ok(collection) => Some(collection),
            Err(e) => {
                log_degraded("municipality map", format!("{e:#}"));
                None
            }
        }
    }

    #[must_use]
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
