//! Candidate query catalogs.
//!
//! A catalog is an ordered list of guesses about how the backend exposes a
//! collection. Order is priority: when several candidates would match, the
//! earliest one wins. Catalogs are plain data, built once and shared
//! read-only between concurrent resolutions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Sort tokens guessed for the sorted variants of the direct list field.
pub const SORT_TOKENS: &[&str] = &["NAME_ASC", "NAME_DESC", "PRICE_ASC", "PRICE_DESC"];

const BRAND_SELECTION: &str = "id name";
const MODEL_SELECTION: &str = "id name type price year imageUrl description";
const DETAIL_SELECTION: &str = "id name price year imageUrl \
  brand { id name } \
  specs { type body neck scaleLength pickups strings } \
  musicians { id name photoUrl instrument note }";

// ─── Identifier ──────────────────────────────────────────────────────────────

/// A caller-supplied identifier together with its numeric reading, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
  pub raw:    &'a str,
  /// Set only when `raw` parses as a finite, whole number.
  pub number: Option<i64>,
}

impl<'a> Identifier<'a> {
  pub fn parse(raw: &'a str) -> Self {
    let number = raw
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|n| n.is_finite() && n.fract() == 0.0)
      .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
      .map(|n| n as i64);
    Self { raw, number }
  }
}

// ─── Variable binding ────────────────────────────────────────────────────────

/// GraphQL type of the identifier argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
  Id,
  Int,
}

impl ArgType {
  pub fn graphql(self) -> &'static str {
    match self {
      ArgType::Id => "ID!",
      ArgType::Int => "Int!",
    }
  }
}

/// How a candidate turns an identifier into its variables map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableBinding {
  /// The query takes no variables.
  None,
  /// A single identifier argument named `arg`.
  Identifier { arg: &'static str, ty: ArgType },
}

impl VariableBinding {
  /// Whether the binding can be applied to `id`.
  ///
  /// `Int!` bindings need an identifier with a numeric reading; they are
  /// skipped otherwise rather than sent and rejected.
  pub fn applies_to(&self, id: Option<Identifier<'_>>) -> bool {
    match (self, id) {
      (VariableBinding::None, _) => true,
      (VariableBinding::Identifier { ty: ArgType::Id, .. }, id) => id.is_some(),
      (VariableBinding::Identifier { ty: ArgType::Int, .. }, id) => {
        id.and_then(|i| i.number).is_some()
      }
    }
  }

  /// Build the variables map. Never fails; an inapplicable binding yields
  /// `null` for the argument.
  pub fn bind(&self, id: Option<Identifier<'_>>) -> Map<String, Value> {
    let mut vars = Map::new();
    if let VariableBinding::Identifier { arg, ty } = self {
      let value = match (ty, id) {
        (ArgType::Id, Some(id)) => Value::from(id.raw),
        (ArgType::Int, Some(Identifier { number: Some(n), .. })) => Value::from(n),
        _ => Value::Null,
      };
      vars.insert((*arg).to_string(), value);
    }
    vars
  }
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// One guess about the backend schema.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
  /// Unique within its catalog; shown in diagnostics.
  pub name:      String,
  pub document:  String,
  pub variables: VariableBinding,
}

impl CandidateQuery {
  /// A query with no arguments, e.g. `findAllBrands { id name }`.
  pub fn bare(field: &str, selection: &str) -> Self {
    Self {
      name:      field.to_string(),
      document:  format!("query {{ {field} {{ {selection} }} }}"),
      variables: VariableBinding::None,
    }
  }

  /// A root field taking the identifier, e.g. `modelsByBrand(brandId: Int!)`.
  ///
  /// With `sort`, the token is passed inline as an enum literal so the
  /// document does not need to name the backend's sort enum type.
  pub fn by_id(
    field: &str,
    arg: &'static str,
    ty: ArgType,
    sort: Option<&str>,
    selection: &str,
  ) -> Self {
    let ty_name = ty.graphql();
    let (name, args) = match sort {
      Some(token) => (
        format!("{field}({arg}: {ty_name}, sortBy: {token})"),
        format!("{arg}: ${arg}, sortBy: {token}"),
      ),
      None => (format!("{field}({arg}: {ty_name})"), format!("{arg}: ${arg}")),
    };
    Self {
      name,
      document: format!("query (${arg}: {ty_name}) {{ {field}({args}) {{ {selection} }} }}"),
      variables: VariableBinding::Identifier { arg, ty },
    }
  }

  /// A parent node looked up by identifier with the list nested under
  /// `child`, e.g. `brand(id: ID!) { models { ... } }`.
  pub fn nested(
    parent: &str,
    child: &str,
    arg: &'static str,
    ty: ArgType,
    selection: &str,
  ) -> Self {
    let ty_name = ty.graphql();
    Self {
      name:      format!("{parent}({arg}: {ty_name}).{child}"),
      document:  format!(
        "query (${arg}: {ty_name}) {{ {parent}({arg}: ${arg}) {{ id name {child} {{ {selection} }} }} }}"
      ),
      variables: VariableBinding::Identifier { arg, ty },
    }
  }

  pub fn requires_numeric_id(&self) -> bool {
    matches!(self.variables, VariableBinding::Identifier { ty: ArgType::Int, .. })
  }
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// Where sorted variants of a list field go relative to its unsorted ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPlacement {
  /// Unsorted first: a backend without a sort argument costs no extra round
  /// trips before the plain query is tried.
  #[default]
  AfterUnsorted,
  BeforeUnsorted,
}

/// An ordered, immutable list of candidates with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
  candidates: Vec<CandidateQuery>,
}

/// Argument name and type variations, in priority order.
static ARG_VARIANTS: [(&str, ArgType); 4] = [
  ("id", ArgType::Id),
  ("brandId", ArgType::Id),
  ("id", ArgType::Int),
  ("brandId", ArgType::Int),
];

impl Catalog {
  /// Build a catalog from `candidates`, rejecting duplicate names.
  pub fn new(candidates: Vec<CandidateQuery>) -> Result<Self> {
    let mut seen = HashSet::new();
    for c in &candidates {
      if !seen.insert(c.name.as_str()) {
        return Err(Error::DuplicateCandidate(c.name.clone()));
      }
    }
    Ok(Self { candidates })
  }

  /// Candidates for "all brands". None take an argument.
  pub fn all_brands() -> Self {
    let candidates = ["findAllBrands", "brands", "allBrands", "getBrands"]
      .into_iter()
      .map(|field| CandidateQuery::bare(field, BRAND_SELECTION))
      .collect();
    Self { candidates }
  }

  /// Candidates for "models of brand X", sorted variants after unsorted.
  pub fn models_for_brand() -> Self {
    Self::models_for_brand_with(SortPlacement::default())
  }

  /// Candidates for "models of brand X", in increasing structural distance
  /// from the most likely shape:
  ///
  /// 1. `findBrandModels` with every argument name/type variation, plus its
  ///    sorted variants (placed per `placement`);
  /// 2. other list field names under the same variations;
  /// 3. a parent brand node with the list nested under a child field.
  pub fn models_for_brand_with(placement: SortPlacement) -> Self {
    let direct = || {
      ARG_VARIANTS.iter().map(|&(arg, ty)| {
        CandidateQuery::by_id("findBrandModels", arg, ty, None, MODEL_SELECTION)
      })
    };
    let sorted = || {
      SORT_TOKENS.iter().flat_map(|&token| {
        ARG_VARIANTS[..2].iter().map(move |&(arg, ty)| {
          CandidateQuery::by_id("findBrandModels", arg, ty, Some(token), MODEL_SELECTION)
        })
      })
    };

    let mut candidates: Vec<CandidateQuery> = match placement {
      SortPlacement::AfterUnsorted => direct().chain(sorted()).collect(),
      SortPlacement::BeforeUnsorted => sorted().chain(direct()).collect(),
    };

    for field in ["modelsByBrand", "findModelsByBrand", "models"] {
      candidates.extend(ARG_VARIANTS.iter().map(|&(arg, ty)| {
        CandidateQuery::by_id(field, arg, ty, None, MODEL_SELECTION)
      }));
    }

    for parent in ["brand", "brandById", "findUniqueBrand", "findBrandById"] {
      for ty in [ArgType::Id, ArgType::Int] {
        for child in ["models", "guitarModels", "brandModels"] {
          candidates.push(CandidateQuery::nested(parent, child, "id", ty, MODEL_SELECTION));
        }
      }
    }

    Self { candidates }
  }

  /// Candidates for a single model's detail page.
  pub fn model_details() -> Self {
    let mut candidates = Vec::new();
    for ty in [ArgType::Id, ArgType::Int] {
      for field in ["findUniqueModel", "model", "modelById", "guitar"] {
        candidates.push(CandidateQuery::by_id(field, "id", ty, None, DETAIL_SELECTION));
      }
    }
    Self { candidates }
  }

  pub fn candidates(&self) -> &[CandidateQuery] { &self.candidates }

  pub fn iter(&self) -> impl Iterator<Item = &CandidateQuery> { self.candidates.iter() }

  pub fn len(&self) -> usize { self.candidates.len() }

  pub fn is_empty(&self) -> bool { self.candidates.is_empty() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn names(catalog: &Catalog) -> Vec<&str> {
    catalog.iter().map(|c| c.name.as_str()).collect()
  }

  #[test]
  fn builtin_catalogs_have_unique_names() {
    for catalog in [
      Catalog::all_brands(),
      Catalog::models_for_brand(),
      Catalog::models_for_brand_with(SortPlacement::BeforeUnsorted),
      Catalog::model_details(),
    ] {
      assert!(Catalog::new(catalog.candidates().to_vec()).is_ok());
    }
  }

  #[test]
  fn duplicate_names_are_rejected() {
    let c = CandidateQuery::bare("brands", "id name");
    let err = Catalog::new(vec![c.clone(), c]).unwrap_err();
    assert!(matches!(err, Error::DuplicateCandidate(n) if n == "brands"));
  }

  #[test]
  fn models_catalog_starts_with_the_natural_shape() {
    let catalog = Catalog::models_for_brand();
    let names = names(&catalog);
    assert_eq!(
      &names[..4],
      &[
        "findBrandModels(id: ID!)",
        "findBrandModels(brandId: ID!)",
        "findBrandModels(id: Int!)",
        "findBrandModels(brandId: Int!)",
      ]
    );
    assert_eq!(names[4], "findBrandModels(id: ID!, sortBy: NAME_ASC)");
    assert_eq!(names.last().copied(), Some("findBrandById(id: Int!).brandModels"));
  }

  #[test]
  fn sort_placement_moves_sorted_variants_first() {
    let catalog = Catalog::models_for_brand_with(SortPlacement::BeforeUnsorted);
    let names = names(&catalog);
    assert_eq!(names[0], "findBrandModels(id: ID!, sortBy: NAME_ASC)");
    assert_eq!(names[8], "findBrandModels(id: ID!)");
    assert_eq!(catalog.len(), Catalog::models_for_brand().len());
  }

  #[test]
  fn documents_declare_and_use_the_argument() {
    let c = CandidateQuery::by_id("modelsByBrand", "brandId", ArgType::Int, None, "id name");
    assert_eq!(
      c.document,
      "query ($brandId: Int!) { modelsByBrand(brandId: $brandId) { id name } }"
    );
    let sorted =
      CandidateQuery::by_id("findBrandModels", "id", ArgType::Id, Some("PRICE_DESC"), "id");
    assert!(sorted.document.contains("findBrandModels(id: $id, sortBy: PRICE_DESC)"));
    let nested = CandidateQuery::nested("brand", "guitarModels", "id", ArgType::Id, "id name");
    assert_eq!(
      nested.document,
      "query ($id: ID!) { brand(id: $id) { id name guitarModels { id name } } }"
    );
  }

  #[test]
  fn identifier_numeric_reading() {
    assert_eq!(Identifier::parse("7").number, Some(7));
    assert_eq!(Identifier::parse(" 42 ").number, Some(42));
    assert_eq!(Identifier::parse("1.5").number, None);
    assert_eq!(Identifier::parse("fender").number, None);
    assert_eq!(Identifier::parse("NaN").number, None);
    assert_eq!(Identifier::parse("inf").number, None);
  }

  #[test]
  fn bindings_follow_the_argument_type() {
    let id = Some(Identifier::parse("7"));
    let as_id = VariableBinding::Identifier { arg: "id", ty: ArgType::Id };
    let as_int = VariableBinding::Identifier { arg: "brandId", ty: ArgType::Int };
    assert_eq!(Value::Object(as_id.bind(id)), json!({ "id": "7" }));
    assert_eq!(Value::Object(as_int.bind(id)), json!({ "brandId": 7 }));
    assert!(VariableBinding::None.bind(id).is_empty());

    let word = Some(Identifier::parse("fender"));
    assert!(as_id.applies_to(word));
    assert!(!as_int.applies_to(word));
    assert!(!as_id.applies_to(None));
    assert!(VariableBinding::None.applies_to(None));
  }
}
