//! Dataset store: loads the historical per-district time series once at
//! startup and serves read-only slices to the training and prediction
//! pipelines.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{DistrictProfile, Observation};
use crate::error::ForecastError;

/// One row of the source file, with the column names it actually carries.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Load Demand (MW)")]
    load_demand_mw: f64,
    #[serde(rename = "Price (₹/unit)")]
    price_per_unit: f64,
    #[serde(rename = "Blackout Risk (%)")]
    blackout_risk_pct: f64,
    #[serde(rename = "Installed Capacity (MW)")]
    installed_capacity_mw: f64,
}

/// In-memory index over the historical observations, keyed by district.
///
/// Built once at startup and never mutated afterwards, so it is safe to
/// share across request handlers without locking.
#[derive(Debug)]
pub struct DatasetStore {
    histories: BTreeMap<String, Vec<Observation>>,
    profiles: BTreeMap<String, DistrictProfile>,
}

impl DatasetStore {
    /// Load the dataset from a CSV file on disk.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, ForecastError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            ForecastError::data_load(format!("cannot open {}: {e}", path.display()))
        })?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV byte stream.
    pub fn from_reader(reader: impl Read) -> Result<Self, ForecastError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut histories: BTreeMap<String, Vec<Observation>> = BTreeMap::new();

        for (i, record) in csv_reader.deserialize::<RawRecord>().enumerate() {
            let line = i + 2; // header is line 1
            let raw = record
                .map_err(|e| ForecastError::data_load(format!("line {line}: {e}")))?;
            let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|e| {
                ForecastError::data_load(format!("line {line}: bad date '{}': {e}", raw.date))
            })?;
            let observation = Observation {
                date,
                district: raw.district.trim().to_string(),
                load_demand_mw: raw.load_demand_mw,
                price_per_unit: raw.price_per_unit,
                blackout_risk_pct: raw.blackout_risk_pct,
                installed_capacity_mw: raw.installed_capacity_mw,
            };
            observation
                .validate()
                .map_err(|e| ForecastError::data_load(format!("line {line}: {e}")))?;
            histories
                .entry(observation.district.clone())
                .or_default()
                .push(observation);
        }

        if histories.is_empty() {
            return Err(ForecastError::data_load("dataset contains no data rows"));
        }

        let mut profiles = BTreeMap::new();
        for (district, history) in histories.iter_mut() {
            history.sort_by_key(|o| o.date);
            for pair in history.windows(2) {
                if pair[0].date == pair[1].date {
                    return Err(ForecastError::data_load(format!(
                        "district '{district}' has duplicate observations for {}",
                        pair[0].date
                    )));
                }
            }
            // Capacity is constant per district in well-formed data; if it
            // varies, the most recent observation wins.
            let latest = history.last().map(|o| o.installed_capacity_mw);
            if let Some(installed_capacity_mw) = latest {
                profiles.insert(
                    district.clone(),
                    DistrictProfile {
                        district: district.clone(),
                        installed_capacity_mw,
                    },
                );
            }
        }

        Ok(Self {
            histories,
            profiles,
        })
    }

    /// All districts present in the source data, sorted.
    pub fn districts(&self) -> Vec<&str> {
        self.histories.keys().map(String::as_str).collect()
    }

    /// The district's observations in ascending date order.
    pub fn history(&self, district: &str) -> Option<&[Observation]> {
        self.histories.get(district).map(Vec::as_slice)
    }

    /// Installed capacity for the district, resolved from the most recent
    /// observation when the source data disagrees with itself.
    pub fn installed_capacity(&self, district: &str) -> Result<f64, ForecastError> {
        self.profiles
            .get(district)
            .map(|p| p.installed_capacity_mw)
            .ok_or_else(|| ForecastError::UnknownDistrict(district.to_string()))
    }

    pub fn profile(&self, district: &str) -> Option<&DistrictProfile> {
        self.profiles.get(district)
    }

    /// Mean price over the district's full history. Used as the stand-in
    /// price feature at prediction time, since the true future price is
    /// unknown.
    pub fn mean_price(&self, district: &str) -> Option<f64> {
        let history = self.histories.get(district)?;
        if history.is_empty() {
            return None;
        }
        let sum: f64 = history.iter().map(|o| o.price_per_unit).sum();
        Some(sum / history.len() as f64)
    }
}
