use std::sync::Arc;

use chrono::NaiveDate;

use super::registry::ModelRegistry;
use super::{FEATURE_INSTALLED_CAPACITY, FEATURE_LOAD_DEMAND, FEATURE_PRICE};
use crate::dataset::DatasetStore;
use crate::domain::{round2, PredictionResult};
use crate::error::ForecastError;

/// Request-time prediction over the trained registry.
///
/// The three models run in a strict order: the predicted load demand from
/// step 1 is the regressor input for both the price and blackout models.
/// Reordering the steps, or feeding either downstream model anything other
/// than that predicted load, changes results.
#[derive(Clone)]
pub struct PredictionPipeline {
    store: Arc<DatasetStore>,
    registry: Arc<ModelRegistry>,
}

impl PredictionPipeline {
    pub fn new(store: Arc<DatasetStore>, registry: Arc<ModelRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    /// Predict load demand, price, and blackout risk for one district and
    /// date.
    pub fn predict(
        &self,
        district: &str,
        date: NaiveDate,
    ) -> Result<PredictionResult, ForecastError> {
        let triple = self.registry.get(district)?;
        let installed_capacity_mw = self.store.installed_capacity(district)?;

        // The true future price is unknown at prediction time; the
        // historical mean stands in for it.
        let mean_price = self
            .store
            .mean_price(district)
            .ok_or_else(|| ForecastError::UnknownDistrict(district.to_string()))?;

        let load_pred = triple
            .load
            .predict(
                date,
                &[
                    (FEATURE_PRICE, mean_price),
                    (FEATURE_INSTALLED_CAPACITY, installed_capacity_mw),
                ],
            )
            .map_err(|e| ForecastError::prediction(e.to_string()))?;

        let price_pred = triple
            .price
            .predict(date, &[(FEATURE_LOAD_DEMAND, load_pred)])
            .map_err(|e| ForecastError::prediction(e.to_string()))?;

        let blackout_pred = triple
            .blackout
            .predict(
                date,
                &[
                    (FEATURE_LOAD_DEMAND, load_pred),
                    (FEATURE_INSTALLED_CAPACITY, installed_capacity_mw),
                ],
            )
            .map_err(|e| ForecastError::prediction(e.to_string()))?;

        Ok(PredictionResult {
            district: district.to_string(),
            date,
            load_demand_mw: round2(load_pred),
            price_per_unit: round2(price_pred),
            blackout_risk_pct: round2(blackout_pred),
            installed_capacity_mw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::train_registry;

    const HEADER: &str =
        "Date,District,Load Demand (MW),Price (₹/unit),Blackout Risk (%),Installed Capacity (MW)";

    /// A district whose history is exactly linear: load rises 2 MW/day,
    /// price is exactly 2% of load, risk is exactly 10% of load.
    fn linear_pipeline() -> PredictionPipeline {
        let mut csv = String::from(HEADER);
        for day in 0..30 {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(day);
            let load = 100.0 + 2.0 * day as f64;
            csv.push_str(&format!(
                "\n{date},North,{load},{price},{risk},500.0",
                price = load * 0.02,
                risk = load * 0.1,
            ));
        }
        let store = Arc::new(DatasetStore::from_reader(csv.as_bytes()).unwrap());
        let registry = Arc::new(train_registry(&store, 2));
        PredictionPipeline::new(store, registry)
    }

    fn target_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let pipeline = linear_pipeline();
        let a = pipeline.predict("North", target_date()).unwrap();
        let b = pipeline.predict("North", target_date()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_downstream_models_consume_predicted_load() {
        let pipeline = linear_pipeline();
        let result = pipeline.predict("North", target_date()).unwrap();

        // price = 2% of load and risk = 10% of load in the training data,
        // so the chained predictions must track the predicted load, not any
        // independently extrapolated value.
        assert!(
            (result.price_per_unit - result.load_demand_mw * 0.02).abs() < 0.05,
            "price {} does not track load {}",
            result.price_per_unit,
            result.load_demand_mw
        );
        assert!(
            (result.blackout_risk_pct - result.load_demand_mw * 0.1).abs() < 0.05,
            "risk {} does not track load {}",
            result.blackout_risk_pct,
            result.load_demand_mw
        );
    }

    #[test]
    fn test_load_prediction_ignores_downstream_inputs() {
        let pipeline = linear_pipeline();
        let triple = pipeline.registry().get("North").unwrap();
        let capacity = pipeline.store().installed_capacity("North").unwrap();
        let mean_price = pipeline.store().mean_price("North").unwrap();

        let load = triple
            .load
            .predict(
                target_date(),
                &[
                    (FEATURE_PRICE, mean_price),
                    (FEATURE_INSTALLED_CAPACITY, capacity),
                ],
            )
            .unwrap();

        // Feeding a different load into the price model moves the price
        // prediction but can never move the load prediction.
        let price_a = triple
            .price
            .predict(target_date(), &[(FEATURE_LOAD_DEMAND, load)])
            .unwrap();
        let price_b = triple
            .price
            .predict(target_date(), &[(FEATURE_LOAD_DEMAND, load + 50.0)])
            .unwrap();
        assert!((price_a - price_b).abs() > 1e-6);

        let load_again = triple
            .load
            .predict(
                target_date(),
                &[
                    (FEATURE_PRICE, mean_price),
                    (FEATURE_INSTALLED_CAPACITY, capacity),
                ],
            )
            .unwrap();
        assert_eq!(load, load_again);
    }

    #[test]
    fn test_rounding_and_capacity_passthrough() {
        let pipeline = linear_pipeline();
        let result = pipeline.predict("North", target_date()).unwrap();

        for value in [
            result.load_demand_mw,
            result.price_per_unit,
            result.blackout_risk_pct,
        ] {
            assert_eq!(value, round2(value), "{value} is not 2-decimal rounded");
        }
        assert_eq!(result.installed_capacity_mw, 500.0);
    }

    #[test]
    fn test_unknown_district() {
        let pipeline = linear_pipeline();
        let err = pipeline.predict("East", target_date()).unwrap_err();
        assert!(matches!(err, ForecastError::UnknownDistrict(d) if d == "East"));
    }
}
