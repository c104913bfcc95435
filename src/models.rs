use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Harvest figures for one crop in one municipality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRecord {
    /// Hectares harvested. Absent or `null` in the source means "no data".
    #[serde(default)]
    pub harvested_area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

impl CropRecord {
    pub fn new(harvested_area: f64, municipality_name: &str, state_code: &str) -> Self {
        Self {
            harvested_area: Some(harvested_area),
            municipality_name: Some(municipality_name.to_string()),
            state_code: Some(state_code.to_string()),
        }
    }

    /// Area if it is a usable, strictly positive number.
    pub fn positive_area(&self) -> Option<f64> {
        self.harvested_area.filter(|v| v.is_finite() && *v > 0.0)
    }

    /// `"Name (UF)"`, `"Name"`, or the municipality code when no name is known.
    pub fn label(&self, code: &str) -> String {
        match (self.municipality_name.as_deref(), self.state_code.as_deref()) {
            (Some(name), Some(uf)) if !uf.is_empty() => format!("{name} ({uf})"),
            (Some(name), _) => name.to_string(),
            (None, _) => code.to_string(),
        }
    }
}

/// Municipality code -> record, for a single crop.
pub type CropData = BTreeMap<String, CropRecord>;

/// Crop-major dataset: crop name -> municipality code -> record.
/// Serializes as the plain nested JSON object served by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropTable {
    crops: BTreeMap<String, CropData>,
}

impl CropTable {
    pub fn new(crops: BTreeMap<String, CropData>) -> Self {
        Self { crops }
    }

    pub fn crop_names(&self) -> Vec<String> {
        self.crops.keys().cloned().collect()
    }

    pub fn get(&self, crop: &str) -> Option<&CropData> {
        self.crops.get(crop)
    }

    pub fn insert(&mut self, crop: &str, code: &str, record: CropRecord) {
        self.crops
            .entry(crop.to_string())
            .or_default()
            .insert(code.to_string(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CropData)> {
        self.crops.iter()
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Distinct municipality codes across every crop.
    pub fn municipality_codes(&self) -> BTreeSet<&str> {
        self.crops
            .values()
            .flat_map(|data| data.keys().map(String::as_str))
            .collect()
    }

    pub fn total_records(&self) -> usize {
        self.crops.values().map(BTreeMap::len).sum()
    }

    /// Pivot a municipality-major source into the crop-major layout.
    /// Non-positive areas are dropped.
    pub fn from_municipality_major(source: &BTreeMap<String, MunicipalityEntry>) -> Self {
        let mut table = Self::default();
        for (code, entry) in source {
            for (crop, area) in &entry.crops {
                if !(area.is_finite() && *area > 0.0) {
                    continue;
                }
                table.insert(
                    crop,
                    code,
                    CropRecord {
                        harvested_area: Some(*area),
                        municipality_name: Some(entry.municipality_name.clone()),
                        state_code: Some(entry.state_code.clone()),
                    },
                );
            }
        }
        table
    }

    /// Flatten into one row per (crop, municipality).
    pub fn to_rows(&self) -> Vec<CropRow> {
        self.crops
            .iter()
            .flat_map(|(crop, data)| {
                data.iter().map(move |(code, rec)| CropRow {
                    municipality_code: code.clone(),
                    municipality_name: rec.municipality_name.clone().unwrap_or_default(),
                    state_code: rec.state_code.clone().unwrap_or_default(),
                    crop: crop.clone(),
                    harvested_area: rec.harvested_area,
                })
            })
            .collect()
    }
}

/// Municipality-major source entry: one municipality with all its crops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalityEntry {
    pub municipality_name: String,
    pub state_code: String,
    #[serde(default)]
    pub crops: BTreeMap<String, f64>,
}

/// Tidy structure used for CSV import/export (one row = one crop in one municipality).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRow {
    pub municipality_code: String,
    pub municipality_name: String,
    pub state_code: String,
    pub crop: String,
    pub harvested_area: Option<f64>,
}

/// Brazilian federative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct State {
    pub code: &'static str,
    pub name: &'static str,
}

pub const STATES: [State; 27] = [
    State { code: "AC", name: "Acre" },
    State { code: "AL", name: "Alagoas" },
    State { code: "AP", name: "Amapá" },
    State { code: "AM", name: "Amazonas" },
    State { code: "BA", name: "Bahia" },
    State { code: "CE", name: "Ceará" },
    State { code: "DF", name: "Distrito Federal" },
    State { code: "ES", name: "Espírito Santo" },
    State { code: "GO", name: "Goiás" },
    State { code: "MA", name: "Maranhão" },
    State { code: "MT", name: "Mato Grosso" },
    State { code: "MS", name: "Mato Grosso do Sul" },
    State { code: "MG", name: "Minas Gerais" },
    State { code: "PA", name: "Pará" },
    State { code: "PB", name: "Paraíba" },
    State { code: "PR", name: "Paraná" },
    State { code: "PE", name: "Pernambuco" },
    State { code: "PI", name: "Piauí" },
    State { code: "RJ", name: "Rio de Janeiro" },
    State { code: "RN", name: "Rio Grande do Norte" },
    State { code: "RS", name: "Rio Grande do Sul" },
    State { code: "RO", name: "Rondônia" },
    State { code: "RR", name: "Roraima" },
    State { code: "SC", name: "Santa Catarina" },
    State { code: "SP", name: "São Paulo" },
    State { code: "SE", name: "Sergipe" },
    State { code: "TO", name: "Tocantins" },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("Crop \"{0}\" not found")]
    UnknownCrop(String),
}
