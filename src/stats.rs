use crate::models::{CropData, CropTable, DataError};
use crate::scale::ValueRange;
use serde::{Deserialize, Serialize};

/// Number of bars in the per-crop ranking chart.
pub const TOP_N: usize = 20;

/// Dataset-wide counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_crops: usize,
    /// Distinct municipality codes across all crops.
    pub total_municipalities: usize,
    pub total_records: usize,
}

pub fn statistics(table: &CropTable) -> Statistics {
    Statistics {
        total_crops: table.len(),
        total_municipalities: table.municipality_codes().len(),
        total_records: table.total_records(),
    }
}

/// Color range of one crop, over its positive harvested areas.
pub fn crop_range(data: &CropData) -> ValueRange {
    ValueRange::from_values(data.values().filter_map(|r| r.positive_area()))
}

/// Bar-chart payload: parallel `labels`/`data` arrays, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub crop_name: String,
}

/// The `n` municipalities with the largest harvested area for `crop`.
///
/// Ties keep municipality-code order. Records without a positive area are
/// left out of the ranking.
pub fn top_municipalities(table: &CropTable, crop: &str, n: usize) -> Result<ChartData, DataError> {
    let data = table
        .get(crop)
        .ok_or_else(|| DataError::UnknownCrop(crop.to_string()))?;

    let mut ranked: Vec<(String, f64)> = data
        .iter()
        .filter_map(|(code, rec)| rec.positive_area().map(|a| (rec.label(code), a)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    let (labels, data) = ranked.into_iter().unzip();
    Ok(ChartData {
        labels,
        data,
        crop_name: crop.to_string(),
    })
}

/// Summary statistics for one crop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub crop: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub total: f64,
}

pub fn crop_summary(crop: &str, data: &CropData) -> Summary {
    let mut vals: Vec<f64> = Vec::with_capacity(data.len());
    let mut missing = 0;
    for rec in data.values() {
        match rec.positive_area() {
            Some(v) => vals.push(v),
            None => missing += 1,
        }
    }
    vals.sort_by(f64::total_cmp);

    let count = vals.len();
    let total: f64 = vals.iter().sum();
    let mean = (count > 0).then(|| total / count as f64);
    let median = if count == 0 {
        None
    } else if count % 2 == 1 {
        Some(vals[count / 2])
    } else {
        Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
    };

    Summary {
        crop: crop.to_string(),
        count,
        missing,
        min: vals.first().copied(),
        max: vals.last().copied(),
        mean,
        median,
        total,
    }
}

/// Summaries for every crop, in crop-name order.
pub fn crop_summaries(table: &CropTable) -> Vec<Summary> {
    table.iter().map(|(crop, data)| crop_summary(crop, data)).collect()
}
