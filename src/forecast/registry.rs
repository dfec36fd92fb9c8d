use std::collections::BTreeMap;

use crate::error::ForecastError;
use crate::model::TrendModel;

/// The three trained models for one district, plus the capacity constant
/// they were trained against.
#[derive(Debug, Clone)]
pub struct ModelTriple {
    pub district: String,
    pub installed_capacity_mw: f64,
    pub load: TrendModel,
    pub price: TrendModel,
    pub blackout: TrendModel,
}

/// District -> trained models. Built once by the training pipeline before
/// the server starts; read-only afterwards, so concurrent reads need no
/// synchronization.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    triples: BTreeMap<String, ModelTriple>,
}

impl ModelRegistry {
    pub fn insert(&mut self, triple: ModelTriple) {
        self.triples.insert(triple.district.clone(), triple);
    }

    pub fn get(&self, district: &str) -> Result<&ModelTriple, ForecastError> {
        self.triples
            .get(district)
            .ok_or_else(|| ForecastError::UnknownDistrict(district.to_string()))
    }

    pub fn contains(&self, district: &str) -> bool {
        self.triples.contains_key(district)
    }

    /// Districts with a trained triple, sorted.
    pub fn districts(&self) -> Vec<&str> {
        self.triples.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
