// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::collections::HashSet;
use std::fmt;

/// Markers describing where the pass is within an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextToken {
  /// The last fragment started a new canonical line
  BeginningOfEvent,

  /// A begin line opened a unified event that has not seen its end line
  Unified,

  /// A safepoint enter line is stashed in the entangled buffer waiting for
  /// its leave and total-time lines
  SafepointPending,

  /// The last line was a summary written without a begin line. Only the
  /// times line directly after it may still be appended.
  StandaloneSummary
}

impl fmt::Display for ContextToken {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreprocessState {
  Idle,
  AssemblingEvent,
  EntangledBuffering
}

/// A raw line held back from output
#[derive(Debug, Clone, PartialEq)]
pub struct RawFragment {
  pub line_number: usize,
  pub text: String
}

/// Mutable state for one preprocessing pass. Never shared between inputs.
#[derive(Debug, Default)]
pub struct PreprocessContext {
  pub tokens: HashSet<ContextToken>,

  /// Lines belonging to other events that were interleaved with the event
  /// being assembled, in arrival order
  pub entangled: Vec<RawFragment>
}

impl PreprocessContext {
  pub fn new() -> PreprocessContext {
    PreprocessContext::default()
  }

  pub fn has(&self, token: ContextToken) -> bool {
    self.tokens.contains(&token)
  }

  pub fn set(&mut self, token: ContextToken) {
    self.tokens.insert(token);
  }

  pub fn clear(&mut self, token: ContextToken) {
    self.tokens.remove(&token);
  }

  pub fn clear_all(&mut self) {
    self.tokens.clear();
  }

  /// True if an event or a safepoint bracket is still incomplete
  pub fn is_open(&self) -> bool {
    self.has(ContextToken::Unified) || self.has(ContextToken::SafepointPending)
  }

  pub fn state(&self) -> PreprocessState {
    if !self.entangled.is_empty() {
      PreprocessState::EntangledBuffering
    } else if self.is_open() {
      PreprocessState::AssemblingEvent
    } else {
      PreprocessState::Idle
    }
  }

  /// Removes and returns every buffered line, in arrival order
  pub fn drain_entangled(&mut self) -> Vec<RawFragment> {
    self.entangled.drain(..).collect()
  }
}
