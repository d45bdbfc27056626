// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod legacy;
mod types;
mod unified;

pub use types::*;
use crate::parser::{Collector, EventKind};

lazy_static! {
  /// The ordered catalogue: first match wins, so more qualified patterns
  /// must precede generic ones
  static ref CATALOGUE: Vec<CatalogueEntry> = {
    let mut entries = unified::catalogue();
    entries.extend(legacy::catalogue());
    entries
  };
}

pub fn catalogue() -> &'static [CatalogueEntry] {
  &CATALOGUE
}

/// Finds the first catalogue entry matching a canonical line, skipping
/// entries that can't occur in a log written by `hint`
pub fn identify(line: &str, hint: Collector) -> Option<&'static CatalogueEntry> {
  CATALOGUE.iter()
    .filter(|entry| entry.applies_to(hint))
    .find(|entry| entry.pattern.is_match(line))
}

/// Classifies a canonical line, returning the pattern captures for extraction
pub fn classify_with(line: &str, hint: Collector) -> Classification {
  CATALOGUE.iter()
    .filter(|entry| entry.applies_to(hint))
    .find_map(|entry| entry.pattern.captures(line).map(|captures| Classification {
      kind: entry.kind,
      captures: Some(captures)
    }))
    .unwrap_or_else(Classification::unknown)
}

/// Classifies a canonical line against the full catalogue
pub fn classify(line: &str) -> EventKind {
  identify(line, Collector::Unknown)
    .map(|entry| entry.kind)
    .unwrap_or(EventKind::Unknown)
}
