//! Structural matching over response payloads of unknown shape.
//!
//! Where the entity list lives in a response depends on which candidate
//! query produced it (`data.findBrandModels`, `data.brand.models`, ...).
//! Instead of a fixed path, the payload is searched depth-first, visiting
//! object keys in the order the payload presents them. Search depth is
//! bounded by [`MAX_DEPTH`].

use serde_json::{Map, Value};

/// Keys that can identify an entity.
pub const ID_LIKE: &[&str] = &["id", "_id", "uuid", "key", "modelId", "brandId"];

/// Keys that can name an entity.
pub const NAME_LIKE: &[&str] = &["name", "title", "modelName", "brandName", "label"];

/// Maximum nesting visited below the payload root.
pub const MAX_DEPTH: usize = 32;

/// Return the first non-empty array whose first element looks like an entity.
///
/// Empty arrays never match: an empty list cannot prove that it is the right
/// field. Sibling or deeper arrays after the first match are ignored.
pub fn find_entity_list(payload: &Value) -> Option<&[Value]> {
  find_list(payload, 0)
}

/// Return the first root field whose value looks like an entity.
///
/// Used for single-entity lookups such as `findUniqueModel(id:)`, where the
/// payload holds one object rather than a list. Only objects directly under
/// a root field qualify; children such as `brand` are never taken for the
/// entity itself.
pub fn find_entity(payload: &Value) -> Option<&Value> {
  let Value::Object(root) = payload else {
    return None;
  };
  root
    .values()
    .find(|v| matches!(v, Value::Object(map) if is_entity(map)))
}

/// Whether `map` carries a non-null id-like and a non-null name-like key.
pub fn is_entity(map: &Map<String, Value>) -> bool {
  has_value(map, ID_LIKE) && has_value(map, NAME_LIKE)
}

fn has_value(map: &Map<String, Value>, keys: &[&str]) -> bool {
  keys.iter().any(|k| map.get(*k).is_some_and(|v| !v.is_null()))
}

fn is_entity_list(items: &[Value]) -> bool {
  matches!(items.first(), Some(Value::Object(first)) if is_entity(first))
}

fn find_list(value: &Value, depth: usize) -> Option<&[Value]> {
  if depth > MAX_DEPTH {
    return None;
  }
  match value {
    Value::Array(items) if is_entity_list(items) => Some(items.as_slice()),
    Value::Array(items) => items.iter().find_map(|v| find_list(v, depth + 1)),
    Value::Object(map) => map.values().find_map(|v| find_list(v, depth + 1)),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn direct_list_matches() {
    let data = json!({ "findBrandModels": [{ "id": "1", "name": "Strat" }] });
    let list = find_entity_list(&data).unwrap();
    assert_eq!(list.len(), 1);
  }

  #[test]
  fn nested_list_under_parent_node_matches() {
    let data = json!({
      "brand": { "id": "1", "name": "Fender", "models": [{ "id": "a", "title": "Tele" }] }
    });
    let list = find_entity_list(&data).unwrap();
    assert_eq!(list[0]["title"], "Tele");
  }

  #[test]
  fn first_qualifying_array_in_key_order_wins() {
    let data = json!({
      "later": [{ "id": "z", "name": "second" }],
      "earlier": [{ "id": "a", "name": "first" }]
    });
    let list = find_entity_list(&data).unwrap();
    assert_eq!(list[0]["name"], "second");
  }

  #[test]
  fn depth_first_before_siblings() {
    let data = json!({
      "wrapper": { "inner": [{ "id": 1, "name": "deep" }] },
      "sibling": [{ "id": 2, "name": "shallow" }]
    });
    assert_eq!(find_entity_list(&data).unwrap()[0]["name"], "deep");
  }

  #[test]
  fn empty_and_unrecognized_arrays_do_not_match() {
    let data = json!({
      "models": [],
      "tags": ["a", "b"],
      "rows": [{ "id": 1 }],
    });
    assert!(find_entity_list(&data).is_none());
  }

  #[test]
  fn empty_array_is_skipped_for_a_later_match() {
    let data = json!({ "models": [], "guitarModels": [{ "id": 1, "name": "x" }] });
    assert_eq!(find_entity_list(&data).unwrap()[0]["name"], "x");
  }

  #[test]
  fn null_payload_does_not_match() {
    assert!(find_entity_list(&Value::Null).is_none());
    assert!(find_entity(&Value::Null).is_none());
  }

  #[test]
  fn depth_is_bounded() {
    let mut data = json!([{ "id": 1, "name": "too deep" }]);
    for _ in 0..=MAX_DEPTH {
      data = json!({ "next": data });
    }
    assert!(find_entity_list(&data).is_none());
  }

  #[test]
  fn single_entity_skips_the_root() {
    let data = json!({
      "id": "root",
      "name": "root",
      "findUniqueModel": { "id": 9, "name": "ES-335", "brand": { "id": 2, "name": "Gibson" } }
    });
    let found = find_entity(&data).unwrap();
    assert_eq!(found["name"], "ES-335");
  }

  #[test]
  fn single_entity_never_descends_into_children() {
    let data = json!({
      "findUniqueModel": { "id": "201", "price": 10, "brand": { "id": "2", "name": "Gibson" } }
    });
    assert!(find_entity(&data).is_none());
  }

  #[test]
  fn null_keys_do_not_make_an_entity() {
    let data = json!({ "findUniqueModel": { "id": null, "name": null } });
    assert!(find_entity(&data).is_none());
    let data = json!({ "models": [{ "id": null, "name": "x" }] });
    assert!(find_entity_list(&data).is_none());
  }
}
