//! Presentation state for one map/chart view.
//!
//! A [`ViewState`] owns everything the renderers need: the selected crop, its
//! data, the color range derived from it, and the user's base color. Crop
//! loads are two-phase: [`ViewState::begin_request`] hands out a token, and
//! [`ViewState::apply_crop_data`] only accepts the response carrying the most
//! recent token. A slow response for a crop the user has already moved away
//! from is dropped instead of overwriting the newer selection.

use crate::color::hex_to_rgb;
use crate::geo::Municipality;
use crate::models::CropData;
use crate::scale::{
    ColorScale, DEFAULT_BASE_COLOR, LegendStep, NO_DATA_COLOR, ScaleError, ValueRange,
};
use crate::stats::crop_range;
use crate::viz::util::format_hectares;
use serde::Serialize;

/// Legend steps shown on the map by default.
pub const DEFAULT_LEGEND_STEPS: usize = 5;

/// Identifies one crop load. Only the newest token is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestToken {
    seq: u64,
    crop: String,
}

impl RequestToken {
    pub fn crop(&self) -> &str {
        &self.crop
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was issued after this one; the data was discarded.
    Stale,
}

/// Fill/stroke for one map feature, in Leaflet path-option terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub fill_color: String,
    pub weight: f64,
    pub opacity: f64,
    pub color: String,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub fn no_data() -> Self {
        Self {
            fill_color: NO_DATA_COLOR.to_string(),
            weight: 0.5,
            opacity: 0.8,
            color: "#cccccc".to_string(),
            fill_opacity: 0.3,
        }
    }

    pub fn filled(fill_color: String) -> Self {
        Self {
            fill_color,
            weight: 0.5,
            opacity: 0.9,
            color: "#ffffff".to_string(),
            fill_opacity: 0.8,
        }
    }
}

/// Popup content for one feature: a heading plus text lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

/// A municipality ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledFeature {
    pub code: Option<String>,
    pub name: String,
    pub state: Option<String>,
    pub harvested_area: Option<f64>,
    pub style: FeatureStyle,
    pub popup: Popup,
    pub geometry: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub crop_name: String,
    pub min: f64,
    pub max: f64,
    pub steps: Vec<LegendStep>,
    pub no_data_color: String,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    crop: Option<String>,
    data: CropData,
    base_color: String,
    scale: ColorScale,
    latest_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_COLOR)
    }
}

impl ViewState {
    /// New empty view. A malformed `base_color` falls back to the default.
    pub fn new(base_color: &str) -> Self {
        let base_color = sanitize_base_color(base_color);
        Self {
            crop: None,
            data: CropData::new(),
            scale: ColorScale::new(ValueRange::default(), &base_color),
            base_color,
            latest_seq: 0,
        }
    }

    pub fn crop(&self) -> Option<&str> {
        self.crop.as_deref()
    }

    pub fn data(&self) -> &CropData {
        &self.data
    }

    pub fn range(&self) -> ValueRange {
        self.scale.range
    }

    pub fn base_color(&self) -> &str {
        &self.base_color
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    /// Start loading `crop`. Any token handed out earlier becomes stale.
    pub fn begin_request(&mut self, crop: &str) -> RequestToken {
        self.latest_seq += 1;
        RequestToken {
            seq: self.latest_seq,
            crop: crop.to_string(),
        }
    }

    /// Install the data fetched for `token`, unless a newer request exists.
    pub fn apply_crop_data(&mut self, token: RequestToken, data: CropData) -> ApplyOutcome {
        if token.seq != self.latest_seq {
            log::debug!(
                "dropping stale data for {:?} (request {}, latest {})",
                token.crop,
                token.seq,
                self.latest_seq
            );
            return ApplyOutcome::Stale;
        }
        let range = crop_range(&data);
        self.scale = ColorScale::new(range, &self.base_color);
        self.data = data;
        self.crop = Some(token.crop);
        ApplyOutcome::Applied
    }

    /// Change the base color. Returns `false` (and keeps the default) when
    /// `hex` is malformed.
    pub fn set_base_color(&mut self, hex: &str) -> bool {
        let valid = hex_to_rgb(hex).is_some();
        self.base_color = sanitize_base_color(hex);
        self.scale = ColorScale::new(self.scale.range, &self.base_color);
        valid
    }

    pub fn color_for(&self, code: Option<&str>) -> String {
        let area = code.and_then(|c| self.data.get(c)).and_then(|r| r.harvested_area);
        self.scale.color_for_value(area)
    }

    pub fn feature_style(&self, municipality: &Municipality) -> FeatureStyle {
        let area = self.positive_area(municipality);
        match self.scale.rgb_for_value(area) {
            Some(rgb) => FeatureStyle::filled(rgb.to_hex()),
            None => FeatureStyle::no_data(),
        }
    }

    pub fn popup(&self, municipality: &Municipality) -> Popup {
        let title = match municipality.state.as_deref() {
            Some(uf) => format!("{} ({})", municipality.name, uf),
            None => municipality.name.clone(),
        };
        let crop = self.crop.as_deref().unwrap_or("-");
        let code = municipality.code.as_deref().unwrap_or("N/A");
        let mut lines = vec![format!("Cultura: {crop}")];
        match self.positive_area(municipality) {
            Some(area) => lines.push(format!("Área Colhida: {} hectares", format_hectares(area))),
            None => lines.push("Dados não disponíveis".to_string()),
        }
        lines.push(format!("Código: {code}"));
        Popup { title, lines }
    }

    pub fn styled_features(&self, municipalities: &[Municipality]) -> Vec<StyledFeature> {
        municipalities
            .iter()
            .map(|m| StyledFeature {
                code: m.code.clone(),
                name: m.name.clone(),
                state: m.state.clone(),
                harvested_area: self.positive_area(m),
                style: self.feature_style(m),
                popup: self.popup(m),
                geometry: m.geometry.clone(),
            })
            .collect()
    }

    /// Colors for a chart dataset, one per value, on this view's scale.
    pub fn chart_colors(&self, values: &[f64]) -> Vec<String> {
        values
            .iter()
            .map(|v| self.scale.color_for_value(Some(*v)))
            .collect()
    }

    pub fn legend(&self, steps: usize) -> Result<Legend, ScaleError> {
        let range = self.scale.range;
        Ok(Legend {
            crop_name: self.crop.clone().unwrap_or_default(),
            min: range.min,
            max: range.max,
            steps: self.scale.legend(steps)?,
            no_data_color: NO_DATA_COLOR.to_string(),
        })
    }

    fn positive_area(&self, municipality: &Municipality) -> Option<f64> {
        let code = municipality.code.as_deref()?;
        self.data.get(code)?.positive_area()
    }
}

fn sanitize_base_color(hex: &str) -> String {
    match hex_to_rgb(hex) {
        Some(rgb) => rgb.to_hex(),
        None => {
            log::debug!("invalid base color {hex:?}, using {DEFAULT_BASE_COLOR}");
            DEFAULT_BASE_COLOR.to_ascii_lowercase()
        }
    }
}
