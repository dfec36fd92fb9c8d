use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One historical record for a district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub district: String,
    pub load_demand_mw: f64,
    pub price_per_unit: f64,
    pub blackout_risk_pct: f64,
    pub installed_capacity_mw: f64,
}

impl Observation {
    /// Validate the value bounds the dataset guarantees downstream code.
    pub fn validate(&self) -> Result<(), String> {
        if self.district.trim().is_empty() {
            return Err("district must be non-empty".to_string());
        }
        if self.load_demand_mw < 0.0 || !self.load_demand_mw.is_finite() {
            return Err(format!(
                "load demand must be finite and non-negative, got {}",
                self.load_demand_mw
            ));
        }
        if self.price_per_unit < 0.0 || !self.price_per_unit.is_finite() {
            return Err(format!(
                "price must be finite and non-negative, got {}",
                self.price_per_unit
            ));
        }
        if !(0.0..=100.0).contains(&self.blackout_risk_pct) {
            return Err(format!(
                "blackout risk must be within [0, 100], got {}",
                self.blackout_risk_pct
            ));
        }
        if self.installed_capacity_mw < 0.0 || !self.installed_capacity_mw.is_finite() {
            return Err(format!(
                "installed capacity must be finite and non-negative, got {}",
                self.installed_capacity_mw
            ));
        }
        Ok(())
    }
}

/// Static per-district attributes derived from the historical data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictProfile {
    pub district: String,
    pub installed_capacity_mw: f64,
}

/// Point-in-time forecast for one district and date.
///
/// The three predicted values are rounded to 2 decimal places; installed
/// capacity is the stored constant, passed through unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub district: String,
    pub date: NaiveDate,
    pub load_demand_mw: f64,
    pub price_per_unit: f64,
    pub blackout_risk_pct: f64,
    pub installed_capacity_mw: f64,
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(load: f64, price: f64, risk: f64, cap: f64) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            district: "D1".to_string(),
            load_demand_mw: load,
            price_per_unit: price,
            blackout_risk_pct: risk,
            installed_capacity_mw: cap,
        }
    }

    #[test]
    fn test_observation_bounds() {
        assert!(obs(100.0, 5.0, 20.0, 500.0).validate().is_ok());
        assert!(obs(-1.0, 5.0, 20.0, 500.0).validate().is_err());
        assert!(obs(100.0, -0.01, 20.0, 500.0).validate().is_err());
        assert!(obs(100.0, 5.0, 100.5, 500.0).validate().is_err());
        assert!(obs(100.0, 5.0, -0.5, 500.0).validate().is_err());
        assert!(obs(100.0, 5.0, 20.0, f64::NAN).validate().is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(123.4567), 123.46);
        assert_eq!(round2(-2.345), -2.35);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(7.0), 7.0);
    }

    proptest::proptest! {
        #[test]
        fn round2_stays_within_half_a_cent(value in -1.0e6f64..1.0e6) {
            let rounded = round2(value);
            proptest::prop_assert!((rounded - value).abs() <= 0.005 + 1e-9);
            proptest::prop_assert_eq!(rounded, round2(rounded));
        }
    }
}
