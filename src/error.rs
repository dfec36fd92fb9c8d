use thiserror::Error;

/// Failure taxonomy for the forecasting service.
///
/// Startup failures (`DataLoad`) are fatal; `InsufficientData` is recovered
/// per district by the training pipeline; the remaining variants surface at
/// request time through the API layer.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    #[error("district '{district}' has {rows} observation(s), need at least {min}")]
    InsufficientData {
        district: String,
        rows: usize,
        min: usize,
    },

    #[error("unknown district: {0}")]
    UnknownDistrict(String),

    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl ForecastError {
    pub fn data_load(msg: impl Into<String>) -> Self {
        Self::DataLoad(msg.into())
    }

    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::Prediction(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::UnknownDistrict("Nowhere".to_string());
        assert_eq!(err.to_string(), "unknown district: Nowhere");

        let err = ForecastError::InsufficientData {
            district: "D1".to_string(),
            rows: 1,
            min: 2,
        };
        assert!(err.to_string().contains("D1"));
        assert!(err.to_string().contains("1 observation"));
    }
}
