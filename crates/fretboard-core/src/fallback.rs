//! Static sample data served when every candidate query fails.
//!
//! Records are raw JSON in the same loose shape a backend might return, so
//! they go through the normalizer like any other response.

use std::collections::HashMap;

use serde_json::{Value, json};

/// Supplier of raw fallback records.
pub trait FallbackSupplier: Send + Sync {
  fn brands(&self) -> Vec<Value>;

  /// Models of `brand_id`; empty when the brand is unknown.
  fn models(&self, brand_id: &str) -> Vec<Value>;

  /// A single model by id, for the detail page.
  fn model(&self, model_id: &str) -> Option<Value> {
    let _ = model_id;
    None
  }
}

/// In-memory fallback table keyed by brand id.
///
/// [`StaticFallback::default`] is empty; [`StaticFallback::sample`] carries
/// a small storefront catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
  brands: Vec<Value>,
  models: HashMap<String, Vec<Value>>,
}

impl StaticFallback {
  /// Add a brand and its models. Insertion order is the listing order.
  pub fn with_brand(mut self, id: &str, name: &str, models: Vec<Value>) -> Self {
    self.brands.push(json!({ "id": id, "name": name }));
    self.models.insert(id.to_string(), models);
    self
  }

  pub fn sample() -> Self {
    Self::default()
      .with_brand("1", "Fender", vec![
        json!({ "id": "101", "name": "Stratocaster", "type": "Electric", "price": 1299, "year": 1954 }),
        json!({ "id": "102", "name": "Telecaster", "type": "Electric", "price": 1199, "year": 1950 }),
        json!({ "id": "103", "name": "Jazz Bass", "type": "Bass", "price": 1399, "year": 1960 }),
      ])
      .with_brand("2", "Gibson", vec![
        json!({ "id": "201", "name": "Les Paul Standard", "type": "Electric", "price": 2799, "year": 1952 }),
        json!({ "id": "202", "name": "SG Standard", "type": "Electric", "price": 1899, "year": 1961 }),
        json!({ "id": "203", "name": "J-45", "type": "Acoustic", "price": 2999, "year": 1942 }),
      ])
      .with_brand("3", "Ibanez", vec![
        json!({ "id": "301", "name": "RG550", "type": "Electric", "price": 999, "year": 1987 }),
        json!({ "id": "302", "name": "SR500E", "type": "Bass", "price": 849 }),
      ])
      .with_brand("4", "Martin", vec![
        json!({ "id": "401", "name": "D-28", "type": "Acoustic", "price": 3199, "year": 1931 }),
      ])
  }
}

impl FallbackSupplier for StaticFallback {
  fn brands(&self) -> Vec<Value> { self.brands.clone() }

  fn models(&self, brand_id: &str) -> Vec<Value> {
    self.models.get(brand_id).cloned().unwrap_or_default()
  }

  fn model(&self, model_id: &str) -> Option<Value> {
    self.brands.iter().find_map(|brand| {
      let models = self.models.get(brand["id"].as_str()?)?;
      let mut found = models.iter().find(|m| m["id"] == model_id)?.clone();
      if let Some(obj) = found.as_object_mut() {
        obj.insert("brand".to_string(), brand.clone());
      }
      Some(found)
    })
  }
}
