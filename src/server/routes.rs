//! JSON API handlers.
//!
//! Every response is HTTP 200. Success bodies carry `"success": true` next to
//! their payload; failures are `{"success": false, "error": "..."}`.

use super::state::AppState;
use crate::geo::Municipality;
use crate::models::{CropData, STATES, State as Uf};
use crate::scale::ValueRange;
use crate::stats::{self, ChartData, Statistics, TOP_N};
use crate::view::{DEFAULT_LEGEND_STEPS, Legend, StyledFeature, ViewState};
use crate::viz::{self, ChartOptions};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Application-level failure, reported in the body rather than the status.
#[derive(Debug)]
pub struct ApiError(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Json(ErrorBody {
            success: false,
            error: self.0,
        })
        .into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(e: E) -> Self {
        ApiError(format!("{:#}", e.into()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

fn ok<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

type ApiResult<T> = Result<Json<Success<T>>, ApiError>;

/// `?color=` (base hex) and `?steps=` (legend swatches). Both are optional;
/// `steps` is kept as text so a bad value becomes an error body, not a 400.
#[derive(Debug, Default, Deserialize)]
pub struct StyleQuery {
    pub color: Option<String>,
    pub steps: Option<String>,
}

impl StyleQuery {
    fn steps(&self) -> Result<usize, ApiError> {
        match self.steps.as_deref() {
            None | Some("") => Ok(DEFAULT_LEGEND_STEPS),
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ApiError(format!("invalid steps: {s:?}"))),
        }
    }

    /// View for `crop` under this query's color.
    fn view(&self, state: &AppState, crop: &str) -> ViewState {
        let mut view = ViewState::default();
        if let Some(color) = self.color.as_deref() {
            view.set_base_color(color);
        }
        let token = view.begin_request(crop);
        let data = state.table.get(crop).cloned().unwrap_or_default();
        view.apply_crop_data(token, data);
        view
    }
}

#[derive(Debug, Serialize)]
pub struct CropsBody {
    pub crops: Vec<String>,
}

pub async fn crops(State(state): State<AppState>) -> ApiResult<CropsBody> {
    Ok(ok(CropsBody {
        crops: state.table.crop_names(),
    }))
}

#[derive(Debug, Serialize)]
pub struct CropDataBody {
    pub data: CropData,
}

/// Unknown crops yield an empty `data` object.
pub async fn crop_data(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
) -> ApiResult<CropDataBody> {
    let data = state.table.get(&crop_name).cloned().unwrap_or_default();
    if data.is_empty() {
        log::debug!("no records for crop {crop_name:?}");
    }
    Ok(ok(CropDataBody { data }))
}

pub async fn statistics(State(state): State<AppState>) -> ApiResult<Statistics> {
    Ok(ok(stats::statistics(&state.table)))
}

#[derive(Debug, Serialize)]
pub struct ChartBody {
    pub chart_data: ChartData,
    /// Bar colors on the crop's scale, parallel to `chart_data.data`.
    pub colors: Vec<String>,
}

pub async fn crop_chart_data(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
    Query(query): Query<StyleQuery>,
) -> ApiResult<ChartBody> {
    let chart_data = stats::top_municipalities(&state.table, &crop_name, TOP_N)?;
    let colors = query.view(&state, &crop_name).chart_colors(&chart_data.data);
    Ok(ok(ChartBody { chart_data, colors }))
}

#[derive(Debug, Serialize)]
pub struct StatesBody {
    pub states: &'static [Uf],
}

pub async fn states() -> ApiResult<StatesBody> {
    Ok(ok(StatesBody { states: &STATES }))
}

#[derive(Debug, Serialize)]
pub struct LegendBody {
    pub legend: Legend,
}

pub async fn legend(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
    Query(query): Query<StyleQuery>,
) -> ApiResult<LegendBody> {
    let steps = query.steps()?;
    let legend = query.view(&state, &crop_name).legend(steps)?;
    Ok(ok(LegendBody { legend }))
}

#[derive(Debug, Serialize)]
pub struct ChoroplethBody {
    pub crop_name: String,
    pub base_color: String,
    pub range: ValueRange,
    pub legend: Legend,
    pub features: Vec<StyledFeature>,
}

/// Every boundary feature with its fill style and popup for `crop_name`.
pub async fn choropleth(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
    Query(query): Query<StyleQuery>,
) -> ApiResult<ChoroplethBody> {
    let boundaries = state
        .boundaries
        .clone()
        .ok_or_else(|| ApiError("municipality boundaries are not available".to_string()))?;
    let steps = query.steps()?;
    let view = query.view(&state, &crop_name);
    Ok(ok(ChoroplethBody {
        crop_name,
        base_color: view.base_color().to_string(),
        range: view.range(),
        legend: view.legend(steps)?,
        features: view.styled_features(&boundaries),
    }))
}

#[derive(Debug, Serialize)]
pub struct BoundariesBody<'a> {
    pub source: String,
    pub features: &'a [Municipality],
}

/// Serialized straight from the shared boundary list.
pub async fn boundaries(State(state): State<AppState>) -> Result<Response, ApiError> {
    let (Some(features), Some(file)) = (&state.boundaries, &state.boundary_file) else {
        return Err(ApiError(
            "municipality boundaries are not available".to_string(),
        ));
    };
    Ok(ok(BoundariesBody {
        source: file.display().to_string(),
        features: features.as_slice(),
    })
    .into_response())
}

/// Ranking chart as SVG, colored on the crop's scale.
pub async fn crop_chart_svg(
    State(state): State<AppState>,
    Path(crop_name): Path<String>,
    Query(query): Query<StyleQuery>,
) -> Result<Response, ApiError> {
    let chart = stats::top_municipalities(&state.table, &crop_name, TOP_N)?;
    let view = query.view(&state, &crop_name);
    let opts = ChartOptions {
        legend_steps: query.steps()?,
        ..ChartOptions::default()
    };
    let svg = viz::render_chart_svg(&chart, view.scale(), &opts)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}
