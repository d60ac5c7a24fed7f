//! Field normalization for schema-unknown records.
//!
//! Each canonical field has an ordered list of key aliases; the first alias
//! holding a usable value wins. Normalization is total: any JSON value,
//! including `{}` or a bare scalar, yields an entity with a non-empty `id` and
//! `name`.

use serde_json::{Map, Value};

use crate::entity::{Brand, Model, ModelDetails, Musician, Specs};

// ─── Aliases ─────────────────────────────────────────────────────────────────

const MODEL_ID:    &[&str] = &["id", "_id", "uuid", "modelId", "key"];
const BRAND_ID:    &[&str] = &["id", "_id", "uuid", "brandId", "key"];
const PERSON_ID:   &[&str] = &["id", "_id", "uuid", "musicianId", "key"];
const NAME:        &[&str] = &["name", "title", "modelName", "brandName", "label"];
const KIND:        &[&str] = &["type", "category", "kind", "modelType"];
const PRICE:       &[&str] = &["price", "priceEur", "cost", "amount"];
const IMAGE:       &[&str] = &["imageUrl", "imageURL", "image", "img", "thumbnail", "photoUrl", "logoUrl"];
const YEAR:        &[&str] = &["year", "releaseYear", "modelYear"];
const DESCRIPTION: &[&str] = &["description", "desc", "summary", "blurb"];

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Conversion from a raw, schema-unknown record into a canonical entity.
pub trait Normalize: Sized {
  /// Prefix of the generated name for records that carry none.
  const PLACEHOLDER: &'static str;

  /// Normalize `raw`, found at position `index` in its source list.
  fn normalize(raw: &Value, index: usize) -> Self;
}

/// Normalize every record of a list, preserving order.
pub fn normalize_all<'a, T, I>(items: I) -> Vec<T>
where
  T: Normalize,
  I: IntoIterator<Item = &'a Value>,
{
  items
    .into_iter()
    .enumerate()
    .map(|(index, raw)| T::normalize(raw, index))
    .collect()
}

impl Normalize for Brand {
  const PLACEHOLDER: &'static str = "Brand";

  fn normalize(raw: &Value, index: usize) -> Self {
    let fields = fields(raw);
    let (id, name) = identity::<Self>(fields, BRAND_ID, index);
    Brand { id, name, image_url: first_text(fields, IMAGE) }
  }
}

impl Normalize for Model {
  const PLACEHOLDER: &'static str = "Model";

  fn normalize(raw: &Value, index: usize) -> Self {
    let fields = fields(raw);
    let (id, name) = identity::<Self>(fields, MODEL_ID, index);
    Model {
      id,
      name,
      kind: first_text(fields, KIND),
      price: first_present(fields, PRICE).and_then(price),
      image_url: first_text(fields, IMAGE),
      year: first_present(fields, YEAR).and_then(year),
      description: first_text(fields, DESCRIPTION),
    }
  }
}

impl Normalize for Musician {
  const PLACEHOLDER: &'static str = "Musician";

  fn normalize(raw: &Value, index: usize) -> Self {
    let fields = fields(raw);
    let (id, name) = identity::<Self>(fields, PERSON_ID, index);
    Musician {
      id,
      name,
      photo_url: first_text(fields, &["photoUrl", "photo", "imageUrl", "image"]),
      instrument: first_text(fields, &["instrument"]),
      note: first_text(fields, &["note", "notes", "bio"]),
    }
  }
}

impl Normalize for ModelDetails {
  const PLACEHOLDER: &'static str = Model::PLACEHOLDER;

  fn normalize(raw: &Value, index: usize) -> Self {
    let fields = fields(raw);
    let specs = fields
      .and_then(|f| f.get("specs"))
      .map(normalize_specs)
      .unwrap_or_default();

    let mut model = Model::normalize(raw, index);
    if model.kind.is_none() {
      model.kind = specs.kind.clone();
    }

    let brand = fields
      .and_then(|f| f.get("brand"))
      .filter(|b| b.is_object())
      .map(|b| Brand::normalize(b, 0));

    let musicians = match fields.and_then(|f| f.get("musicians")) {
      Some(Value::Array(items)) => normalize_all(items),
      _ => Vec::new(),
    };

    ModelDetails { model, brand, specs, musicians }
  }
}

fn normalize_specs(raw: &Value) -> Specs {
  let fields = fields(raw);
  Specs {
    kind:         first_text(fields, KIND),
    body:         first_text(fields, &["body", "bodyWood", "bodyType"]),
    neck:         first_text(fields, &["neck", "neckWood", "neckProfile"]),
    scale_length: first_text(fields, &["scaleLength", "scale"]),
    pickups:      first_text(fields, &["pickups", "pickup", "electronics"]),
    strings:      first_text(fields, &["strings", "stringCount"]),
  }
}

// ─── Field extraction ────────────────────────────────────────────────────────

fn fields(raw: &Value) -> Option<&Map<String, Value>> {
  raw.as_object()
}

fn identity<T: Normalize>(
  fields: Option<&Map<String, Value>>,
  id_keys: &[&str],
  index: usize,
) -> (String, String) {
  let id = first_scalar(fields, id_keys).unwrap_or_else(|| index.to_string());
  let name = first_scalar(fields, NAME)
    .unwrap_or_else(|| format!("{} {}", T::PLACEHOLDER, index + 1));
  (id, name)
}

/// First non-null value among `keys`.
fn first_present<'a>(
  fields: Option<&'a Map<String, Value>>,
  keys: &[&str],
) -> Option<&'a Value> {
  let fields = fields?;
  keys.iter().filter_map(|k| fields.get(*k)).find(|v| !v.is_null())
}

/// First non-blank string among `keys`.
fn first_text(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
  let fields = fields?;
  keys.iter().find_map(|k| match fields.get(*k) {
    Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
    _ => None,
  })
}

/// First non-blank string or number among `keys`, rendered as text.
fn first_scalar(fields: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
  let fields = fields?;
  keys.iter().find_map(|k| match fields.get(*k) {
    Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
    Some(Value::Number(n)) => Some(n.to_string()),
    _ => None,
  })
}

// ─── Coercions ───────────────────────────────────────────────────────────────

/// Numbers pass through; strings are stripped to digits, `.` and `-` and
/// parsed. Anything non-finite is treated as absent.
fn price(value: &Value) -> Option<f64> {
  let parsed = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => parse_price(s),
    _ => None,
  };
  parsed.filter(|p| p.is_finite())
}

/// Parse a display price such as `"€1,299"` or `"$ 2 450.50"`.
pub fn parse_price(text: &str) -> Option<f64> {
  let cleaned: String = text
    .chars()
    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
    .collect();
  cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Only genuine JSON numbers holding a whole value are accepted.
fn year(value: &Value) -> Option<i32> {
  let Value::Number(n) = value else { return None };
  if let Some(i) = n.as_i64() {
    return i32::try_from(i).ok();
  }
  n.as_f64()
    .filter(|f| f.is_finite() && f.fract() == 0.0)
    .filter(|f| *f >= f64::from(i32::MIN) && *f <= f64::from(i32::MAX))
    .map(|f| f as i32)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn empty_object_gets_placeholder_identity() {
    let m = Model::normalize(&json!({}), 4);
    assert_eq!(m.id, "4");
    assert_eq!(m.name, "Model 5");
    assert_eq!(m.price, None);
    assert_eq!(m.kind, None);
  }

  #[test]
  fn non_object_input_is_total() {
    for raw in [json!(null), json!(3), json!("x"), json!([1, 2])] {
      let b = Brand::normalize(&raw, 0);
      assert_eq!(b.id, "0");
      assert_eq!(b.name, "Brand 1");
    }
  }

  #[test]
  fn numeric_id_is_stringified() {
    let b = Brand::normalize(&json!({ "brandId": 17, "brandName": "Gretsch" }), 0);
    assert_eq!(b.id, "17");
    assert_eq!(b.name, "Gretsch");
  }

  #[test]
  fn blank_id_falls_through_to_next_alias() {
    let m = Model::normalize(&json!({ "id": "  ", "_id": "abc", "name": "SG" }), 0);
    assert_eq!(m.id, "abc");
  }

  #[test]
  fn price_with_currency_symbol_and_grouping() {
    let m = Model::normalize(&json!({ "id": "x", "name": "y", "price": "€1,299" }), 0);
    assert_eq!(m.price, Some(1299.0));
  }

  #[test]
  fn unparseable_price_is_absent() {
    let m = Model::normalize(&json!({ "id": "x", "name": "y", "price": "N/A" }), 0);
    assert_eq!(m.price, None);
  }

  #[test]
  fn numeric_price_passes_through() {
    let m = Model::normalize(&json!({ "id": "x", "name": "y", "cost": 849.5 }), 0);
    assert_eq!(m.price, Some(849.5));
  }

  #[test]
  fn parse_price_edge_cases() {
    assert_eq!(parse_price("$ 2 450.50"), Some(2450.5));
    assert_eq!(parse_price("-"), None);
    assert_eq!(parse_price("1.2.3"), None);
    assert_eq!(parse_price(""), None);
  }

  #[test]
  fn year_requires_a_json_number() {
    let m = Model::normalize(&json!({ "year": "1959" }), 0);
    assert_eq!(m.year, None);
    let m = Model::normalize(&json!({ "releaseYear": 1959 }), 0);
    assert_eq!(m.year, Some(1959));
    let m = Model::normalize(&json!({ "year": 1959.5 }), 0);
    assert_eq!(m.year, None);
  }

  #[test]
  fn image_aliases_in_priority_order() {
    let m = Model::normalize(
      &json!({ "image": "b.png", "imageUrl": "a.png" }),
      0,
    );
    assert_eq!(m.image_url.as_deref(), Some("a.png"));
    let b = Brand::normalize(&json!({ "logoUrl": "logo.svg" }), 0);
    assert_eq!(b.image_url.as_deref(), Some("logo.svg"));
  }

  #[test]
  fn empty_strings_are_absent_not_blank() {
    let m = Model::normalize(&json!({ "type": "", "description": " " }), 0);
    assert_eq!(m.kind, None);
    assert_eq!(m.description, None);
  }

  #[test]
  fn details_pull_nested_brand_specs_and_musicians() {
    let raw = json!({
      "id": 12,
      "name": "Les Paul Standard",
      "brand": { "id": 2, "name": "Gibson" },
      "specs": { "type": "Electric", "body": "Mahogany", "pickups": "" },
      "musicians": [{ "id": "m1", "name": "Slash", "instrument": "Lead" }, {}]
    });
    let d = ModelDetails::normalize(&raw, 0);
    assert_eq!(d.model.id, "12");
    assert_eq!(d.model.kind.as_deref(), Some("Electric"));
    assert_eq!(d.brand.as_ref().map(|b| b.name.as_str()), Some("Gibson"));
    assert_eq!(d.specs.rows(), vec![("Type", "Electric"), ("Body", "Mahogany")]);
    assert_eq!(d.musicians.len(), 2);
    assert_eq!(d.musicians[1].name, "Musician 2");
  }
}
