use tracing::{info, warn};

use super::registry::{ModelRegistry, ModelTriple};
use super::{FEATURE_INSTALLED_CAPACITY, FEATURE_LOAD_DEMAND, FEATURE_PRICE};
use crate::dataset::DatasetStore;
use crate::error::ForecastError;
use crate::model::{ModelError, TrendModel};

/// Train the three models for every district in the store.
///
/// Districts are fitted independently; a district that fails to fit is
/// logged and skipped, never aborting the run for the others.
pub fn train_registry(store: &DatasetStore, min_rows: usize) -> ModelRegistry {
    let mut registry = ModelRegistry::default();
    for district in store.districts() {
        match train_district(store, district, min_rows) {
            Ok(triple) => {
                info!(district, "trained model triple");
                registry.insert(triple);
            }
            Err(e) => {
                warn!(district, error = %e, "skipping district");
            }
        }
    }
    info!(
        trained = registry.len(),
        total = store.districts().len(),
        "training pipeline finished"
    );
    registry
}

/// Fit the load, price, and blackout models from one district's history.
pub fn train_district(
    store: &DatasetStore,
    district: &str,
    min_rows: usize,
) -> Result<ModelTriple, ForecastError> {
    let history = store
        .history(district)
        .ok_or_else(|| ForecastError::UnknownDistrict(district.to_string()))?;

    let dates: Vec<_> = history.iter().map(|o| o.date).collect();
    let loads: Vec<_> = history.iter().map(|o| o.load_demand_mw).collect();
    let prices: Vec<_> = history.iter().map(|o| o.price_per_unit).collect();
    let risks: Vec<_> = history.iter().map(|o| o.blackout_risk_pct).collect();
    let capacities: Vec<_> = history.iter().map(|o| o.installed_capacity_mw).collect();

    let map_err = |e: ModelError| match e {
        ModelError::TooFewRows { rows, min } => ForecastError::InsufficientData {
            district: district.to_string(),
            rows,
            min,
        },
        other => ForecastError::DataLoad(format!("district '{district}': {other}")),
    };

    let load = TrendModel::fit(
        FEATURE_LOAD_DEMAND,
        &dates,
        &loads,
        &[
            (FEATURE_PRICE.to_string(), prices.clone()),
            (FEATURE_INSTALLED_CAPACITY.to_string(), capacities.clone()),
        ],
        min_rows,
    )
    .map_err(map_err)?;

    let price = TrendModel::fit(
        FEATURE_PRICE,
        &dates,
        &prices,
        &[(FEATURE_LOAD_DEMAND.to_string(), loads.clone())],
        min_rows,
    )
    .map_err(map_err)?;

    let blackout = TrendModel::fit(
        "blackout_risk",
        &dates,
        &risks,
        &[
            (FEATURE_LOAD_DEMAND.to_string(), loads),
            (FEATURE_INSTALLED_CAPACITY.to_string(), capacities),
        ],
        min_rows,
    )
    .map_err(map_err)?;

    Ok(ModelTriple {
        district: district.to_string(),
        installed_capacity_mw: store.installed_capacity(district)?,
        load,
        price,
        blackout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Date,District,Load Demand (MW),Price (₹/unit),Blackout Risk (%),Installed Capacity (MW)";

    fn store(rows: &[&str]) -> DatasetStore {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        DatasetStore::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_triple_exists_iff_district_trained() {
        let store = store(&[
            "2024-01-01,North,110.0,5.9,10.0,500.0",
            "2024-01-02,North,120.0,6.1,12.0,500.0",
            "2024-01-03,North,115.0,6.0,11.0,500.0",
            "2024-01-01,Tiny,50.0,3.0,5.0,100.0",
        ]);
        let registry = train_registry(&store, 2);

        assert_eq!(registry.districts(), vec!["North"]);
        assert!(registry.get("North").is_ok());
        assert!(matches!(
            registry.get("Tiny").unwrap_err(),
            ForecastError::UnknownDistrict(_)
        ));
    }

    #[test]
    fn test_short_history_is_insufficient_data() {
        let store = store(&[
            "2024-01-01,Tiny,50.0,3.0,5.0,100.0",
            "2024-01-01,North,110.0,5.9,10.0,500.0",
            "2024-01-02,North,120.0,6.1,12.0,500.0",
        ]);
        let err = train_district(&store, "Tiny", 2).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientData { rows: 1, min: 2, .. }
        ));
    }

    #[test]
    fn test_triple_schemas_and_capacity() {
        let store = store(&[
            "2024-01-01,North,110.0,5.9,10.0,500.0",
            "2024-01-02,North,120.0,6.1,12.0,500.0",
            "2024-01-03,North,115.0,6.0,11.0,500.0",
        ]);
        let triple = train_district(&store, "North", 2).unwrap();

        assert_eq!(triple.installed_capacity_mw, 500.0);
        assert_eq!(
            triple.load.regressors(),
            &[FEATURE_PRICE.to_string(), FEATURE_INSTALLED_CAPACITY.to_string()]
        );
        assert_eq!(triple.price.regressors(), &[FEATURE_LOAD_DEMAND.to_string()]);
        assert_eq!(
            triple.blackout.regressors(),
            &[
                FEATURE_LOAD_DEMAND.to_string(),
                FEATURE_INSTALLED_CAPACITY.to_string()
            ]
        );
    }

    #[test]
    fn test_unknown_district_train() {
        let store = store(&[
            "2024-01-01,North,110.0,5.9,10.0,500.0",
            "2024-01-02,North,120.0,6.1,12.0,500.0",
        ]);
        assert!(matches!(
            train_district(&store, "East", 2).unwrap_err(),
            ForecastError::UnknownDistrict(_)
        ));
    }
}
