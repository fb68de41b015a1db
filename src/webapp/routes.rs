//! Dashboard endpoints
//!
//! - `GET /`: the dashboard page
//! - `GET /api/v1/surface`: plotly figure for the requested parameters
//! - `GET /api/v1/surface/data`: the raw grid and values
//! - `GET /api/v1/surface.png`: heatmap rendering
//! - `GET /health`: liveness probe

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{figure, page, AppState};
use crate::error::SurfaceError;
use crate::models::{GridSpec, MarketParameters, OptionType, PriceSurface};
use crate::utils::{encode_png, plot_price_surface_in_memory};

/// Query string accepted by the surface endpoints; missing fields take the dashboard defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurfaceQuery {
    pub interest_rate: Option<f64>,
    pub volatility: Option<f64>,
    pub strike: Option<f64>,
    pub option_type: Option<OptionType>,
}

impl SurfaceQuery {
    pub fn into_parameters(self) -> MarketParameters {
        let defaults = MarketParameters::default();
        MarketParameters {
            interest_rate: self.interest_rate.unwrap_or(defaults.interest_rate),
            volatility: self.volatility.unwrap_or(defaults.volatility),
            strike: self.strike.unwrap_or(defaults.strike),
            option_type: self.option_type.unwrap_or(defaults.option_type),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Error wrapper that maps library failures onto HTTP status codes
#[derive(Debug)]
pub struct ApiError(SurfaceError);

impl From<SurfaceError> for ApiError {
    fn from(err: SurfaceError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            SurfaceError::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "invalid_parameter"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            warn!("Request failed: {}", self.0);
        }

        let body = ErrorResponse {
            error: kind.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceDataResponse {
    pub parameters: MarketParameters,
    pub grid: GridSpec,
    pub stock_prices: Vec<f64>,
    pub taus: Vec<f64>,
    pub prices: Vec<Vec<f64>>,
}

impl From<&PriceSurface> for SurfaceDataResponse {
    fn from(surface: &PriceSurface) -> Self {
        Self {
            parameters: surface.parameters,
            grid: surface.grid,
            stock_prices: surface.stock_prices.to_vec(),
            taus: surface.taus.to_vec(),
            prices: surface.to_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1/surface", get(surface_figure_handler))
        .route("/api/v1/surface/data", get(surface_data_handler))
        .route("/api/v1/surface.png", get(surface_png_handler))
        .route("/health", get(health_handler))
}

/// Malformed query strings are reported like any other invalid parameter
fn parse_query(
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> Result<SurfaceQuery, ApiError> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(rejection) => Err(SurfaceError::InvalidParameter(rejection.body_text()).into()),
    }
}

fn compute(
    state: &AppState,
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> Result<PriceSurface, ApiError> {
    let params = parse_query(query)?.into_parameters();
    debug!("Surface request: {:?}", params);
    Ok(state.calculator.compute(&params)?)
}

async fn index_handler() -> Html<String> {
    Html(page::render_index(&MarketParameters::default()))
}

async fn surface_figure_handler(
    State(state): State<AppState>,
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let surface = compute(&state, query)?;
    Ok(Json(figure::figure_json(&surface)?))
}

async fn surface_data_handler(
    State(state): State<AppState>,
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> Result<Json<SurfaceDataResponse>, ApiError> {
    let surface = compute(&state, query)?;
    Ok(Json(SurfaceDataResponse::from(&surface)))
}

async fn surface_png_handler(
    State(state): State<AppState>,
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let surface = compute(&state, query)?;

    let bytes = tokio::task::spawn_blocking(move || {
        let img = plot_price_surface_in_memory(&surface)?;
        encode_png(&img)
    })
    .await
    .map_err(|e| SurfaceError::Other(format!("render task failed: {}", e)))??;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
