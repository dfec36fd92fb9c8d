use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::domain::PredictionResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub district: Option<String>,
    pub date: Option<String>,
}

/// Forecast record with the dataset's column names on the wire.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    #[serde(rename = "District")]
    pub district: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Load Demand (MW)")]
    pub load_demand_mw: f64,
    #[serde(rename = "Price (₹/unit)")]
    pub price_per_unit: f64,
    #[serde(rename = "Blackout Risk (%)")]
    pub blackout_risk_pct: f64,
    #[serde(rename = "Installed Capacity (MW)")]
    pub installed_capacity_mw: f64,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            district: result.district,
            date: result.date.format("%Y-%m-%d").to_string(),
            load_demand_mw: result.load_demand_mw,
            price_per_unit: result.price_per_unit,
            blackout_risk_pct: result.blackout_risk_pct,
            installed_capacity_mw: result.installed_capacity_mw,
        }
    }
}

/// GET /predict?district=<name>&date=<YYYY-MM-DD>
///
/// The district is validated before the date; a well-formed but
/// unparseable date is a prediction failure, not a bad request.
pub async fn predict(
    State(st): State<AppState>,
    Query(q): Query<PredictQuery>,
) -> Result<Json<PredictResponse>, ApiError> {
    let district = q.district.as_deref().unwrap_or("");
    if !st.pipeline.registry().contains(district) {
        return Err(ApiError::InvalidDistrict);
    }

    let raw_date = q.date.as_deref().unwrap_or("").trim();
    if raw_date.is_empty() {
        return Err(ApiError::MissingDate);
    }

    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|e| ApiError::PredictionFailed(format!("bad date '{raw_date}': {e}")))?;

    let result = st.pipeline.predict(district, date)?;
    Ok(Json(result.into()))
}

#[derive(Debug, Serialize)]
pub struct DistrictsResponse {
    pub districts: Vec<String>,
}

/// GET /districts - the districts with trained models.
pub async fn list_districts(State(st): State<AppState>) -> Json<DistrictsResponse> {
    Json(DistrictsResponse {
        districts: st
            .pipeline
            .registry()
            .districts()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
