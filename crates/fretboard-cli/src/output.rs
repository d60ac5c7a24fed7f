//! Terminal rendering of resolution reports.

use std::fmt::Write as _;

use fretboard_core::{
  entity::{Brand, Model, ModelDetails},
  report::ResolutionReport,
};
use serde::Serialize;

const DEFAULT_BLURB: &str = "Beautiful tone, built to last.";

/// One-entity text rendering.
pub trait Render {
  fn render(&self) -> String;
}

impl Render for Brand {
  fn render(&self) -> String { format!("{:>6}  {}", self.id, self.name) }
}

impl Render for Model {
  fn render(&self) -> String {
    format!("{:>6}  {:<28} {}\n        {}", self.id, self.name, format_price(self.price), blurb(self))
  }
}

impl Render for ModelDetails {
  fn render(&self) -> String {
    let model = &self.model;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", model.name, model.id);
    if let Some(brand) = &self.brand {
      let _ = writeln!(out, "by {}", brand.name);
    }
    let _ = writeln!(out, "{}", format_price(model.price));
    if let Some(description) = &model.description {
      let _ = writeln!(out, "\n{description}");
    }

    let rows = self.specs.rows();
    if !rows.is_empty() {
      let _ = writeln!(out, "\nSpecifications");
      for (label, value) in rows {
        let _ = writeln!(out, "  {label:<14}{value}");
      }
    }

    if !self.musicians.is_empty() {
      let _ = writeln!(out, "\nPlayed by");
      for m in &self.musicians {
        match &m.instrument {
          Some(instrument) => {
            let _ = writeln!(out, "  {} ({instrument})", m.name);
          }
          None => {
            let _ = writeln!(out, "  {}", m.name);
          }
        }
      }
    }
    out.trim_end().to_string()
  }
}

/// `€1,299` for a known price, `Price on request` otherwise.
pub fn format_price(price: Option<f64>) -> String {
  let Some(price) = price else {
    return "Price on request".to_string();
  };
  let whole = price.abs().round() as u64;
  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  let sign = if price < 0.0 && whole > 0 { "-" } else { "" };
  format!("{sign}€{grouped}")
}

/// Short summary line: the description when there is one, otherwise the
/// populated parts of type, year and price.
pub fn blurb(model: &Model) -> String {
  if let Some(description) = &model.description {
    return description.clone();
  }
  let parts: Vec<String> = [
    model.kind.clone(),
    model.year.map(|y| y.to_string()),
    model.price.map(|p| format_price(Some(p))),
  ]
  .into_iter()
  .flatten()
  .collect();
  if parts.is_empty() { DEFAULT_BLURB.to_string() } else { parts.join(" • ") }
}

/// Print `report` to stdout, as JSON or as text.
pub fn print_report<T>(report: &ResolutionReport<T>, json: bool, diagnostics: bool) -> anyhow::Result<()>
where
  T: Render + Serialize,
{
  if json {
    println!("{}", serde_json::to_string_pretty(report)?);
    return Ok(());
  }

  if report.used_fallback {
    println!("(backend matched no known query; showing sample data)");
  }
  if report.is_empty() {
    println!("No results.");
  }
  for entity in &report.entities {
    println!("{}", entity.render());
  }

  if diagnostics {
    println!();
    println!("request {}", report.request_id);
    match &report.matched_candidate {
      Some(name) => println!("matched: {name}"),
      None => println!("matched: none"),
    }
    for attempt in &report.attempts {
      println!("  {attempt}");
    }
  }
  Ok(())
}
