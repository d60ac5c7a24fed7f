//! Canonical catalog entities.
//!
//! Backends disagree on field names and types; these are the shapes the rest
//! of the system sees once [`crate::normalize`] has done its work. `id` and
//! `name` are always non-empty. Every other field is `None` when the source
//! record had nothing usable for it.

use serde::{Deserialize, Serialize};

// ─── Brand ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
  pub id:        String,
  pub name:      String,
  pub image_url: Option<String>,
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// A guitar model as listed on a brand page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
  pub id:          String,
  pub name:        String,
  /// Body style or category, e.g. `Electric`, `Acoustic`, `Bass`.
  #[serde(rename = "type")]
  pub kind:        Option<String>,
  pub price:       Option<f64>,
  pub image_url:   Option<String>,
  pub year:        Option<i32>,
  pub description: Option<String>,
}

// ─── Model details ───────────────────────────────────────────────────────────

/// Hardware specification block of a model detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specs {
  #[serde(rename = "type")]
  pub kind:         Option<String>,
  pub body:         Option<String>,
  pub neck:         Option<String>,
  pub scale_length: Option<String>,
  pub pickups:      Option<String>,
  pub strings:      Option<String>,
}

impl Specs {
  /// Labelled rows for every populated field, in display order.
  pub fn rows(&self) -> Vec<(&'static str, &str)> {
    [
      ("Type", &self.kind),
      ("Body", &self.body),
      ("Neck", &self.neck),
      ("Scale length", &self.scale_length),
      ("Pickups", &self.pickups),
      ("Strings", &self.strings),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
    .collect()
  }
}

/// A well-known player associated with a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Musician {
  pub id:         String,
  pub name:       String,
  pub photo_url:  Option<String>,
  pub instrument: Option<String>,
  pub note:       Option<String>,
}

/// Everything the model detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDetails {
  #[serde(flatten)]
  pub model:     Model,
  pub brand:     Option<Brand>,
  pub specs:     Specs,
  pub musicians: Vec<Musician>,
}
