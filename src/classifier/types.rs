// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fmt;

use regex::{Captures, Regex};

use crate::parser::{Collector, EventKind};

/// How a catalogue pattern is anchored
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchMode {
  /// Anchored at both ends; trailing whitespace is tolerated
  Full,

  /// Anchored at the start only, for lines known to carry remnants of other
  /// events after the recognized part
  Loose
}

impl fmt::Display for MatchMode {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// One entry in the ordered catalogue
#[derive(Debug)]
pub struct CatalogueEntry {
  pub kind: EventKind,
  pub pattern: Regex,
  pub mode: MatchMode
}

impl CatalogueEntry {
  /// Builds a fully anchored entry. Only called while building the static
  /// catalogue, so an invalid pattern is a programming error.
  pub fn full(kind: EventKind, body: &str) -> CatalogueEntry {
    CatalogueEntry {
      kind,
      pattern: Regex::new(&format!(r"^(?:{})\s*$", body)).unwrap(),
      mode: MatchMode::Full
    }
  }

  pub fn loose(kind: EventKind, body: &str) -> CatalogueEntry {
    CatalogueEntry {
      kind,
      pattern: Regex::new(&format!(r"^(?:{})", body)).unwrap(),
      mode: MatchMode::Loose
    }
  }

  /// True if this entry may appear in a log written by the given collector
  pub fn applies_to(&self, hint: Collector) -> bool {
    self.kind.collector().is_compatible(hint)
  }
}

/// The result of classifying one canonical line
#[derive(Debug)]
pub struct Classification<'t> {
  pub kind: EventKind,

  /// Captures from the winning pattern, `None` for `EventKind::Unknown`
  pub captures: Option<Captures<'t>>
}

impl<'t> Classification<'t> {
  pub fn unknown() -> Classification<'t> {
    Classification {
      kind: EventKind::Unknown,
      captures: None
    }
  }

  pub fn is_unknown(&self) -> bool {
    self.kind == EventKind::Unknown
  }
}
