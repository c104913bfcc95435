//! Municipality boundaries from GeoJSON.
//!
//! Boundary files from different sources name the same attributes
//! differently (`GEOCODIGO` vs `CD_MUN`, `NOME` vs `NM_MUN`, ...). Features are
//! normalized once at load time into [`Municipality`] values so renderers never
//! look at raw property bags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Property names tried, in order, for each canonical attribute.
pub const CODE_KEYS: [&str; 4] = ["GEOCODIGO", "CD_MUN", "cd_geocmu", "geocodigo"];
pub const NAME_KEYS: [&str; 4] = ["NOME", "NM_MUN", "nm_mun", "nome"];
pub const STATE_KEYS: [&str; 3] = ["UF", "SIGLA_UF", "uf"];

pub const UNKNOWN_NAME: &str = "Nome não disponível";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }
}

/// Canonical municipality feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipality {
    /// IBGE municipality code, when the source carries one.
    pub code: Option<String>,
    pub name: String,
    pub state: Option<String>,
    pub geometry: Value,
}

impl Municipality {
    pub fn from_feature(feature: &Feature) -> Self {
        let props = &feature.properties;
        Self {
            code: first_property(props, &CODE_KEYS),
            name: first_property(props, &NAME_KEYS).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            state: first_property(props, &STATE_KEYS),
            geometry: feature.geometry.clone(),
        }
    }
}

/// First key with a usable value. Strings must be non-empty; numbers are
/// rendered without a fractional part when they are integers.
fn first_property(props: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match props.get(*k)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(
            n.as_u64()
                .map(|u| u.to_string())
                .or_else(|| n.as_i64().map(|i| i.to_string()))
                .unwrap_or_else(|| n.to_string()),
        ),
        _ => None,
    })
}

pub fn normalize_features(collection: &FeatureCollection) -> Vec<Municipality> {
    collection
        .features
        .iter()
        .map(Municipality::from_feature)
        .collect()
}

pub fn load_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing GeoJSON in {}", path.display()))
}

/// Load and normalize a boundary file.
pub fn load_municipalities<P: AsRef<Path>>(path: P) -> Result<Vec<Municipality>> {
    Ok(normalize_features(&load_collection(path)?))
}

/// Concatenate the features of several collections, in order.
pub fn combine(collections: impl IntoIterator<Item = FeatureCollection>) -> FeatureCollection {
    FeatureCollection::new(collections.into_iter().flat_map(|c| c.features).collect())
}

/// Merge per-state boundary files into one collection. Missing or unreadable
/// inputs are logged and skipped.
pub fn combine_files<P: AsRef<Path>>(paths: &[P]) -> FeatureCollection {
    let loaded = paths.iter().filter_map(|p| {
        let p = p.as_ref();
        match load_collection(p) {
            Ok(c) => {
                log::info!("added {} features from {}", c.features.len(), p.display());
                Some(c)
            }
            Err(e) => {
                log::warn!("skipping {}: {:#}", p.display(), e);
                None
            }
        }
    });
    combine(loaded)
}

pub fn save_collection<P: AsRef<Path>>(collection: &FeatureCollection, path: P) -> Result<()> {
    let path = path.as_ref();
    let s = serde_json::to_string(collection)?;
    fs::write(path, s).with_context(|| format!("writing {}", path.display()))
}

/// First candidate boundary file that exists on disk.
pub fn resolve_boundary_file(candidates: &[PathBuf]) -> Option<&Path> {
    candidates.iter().map(PathBuf::as_path).find(|p| p.is_file())
}
