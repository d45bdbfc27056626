// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::classifier;
use crate::parser::{
  extract, Collector, Diagnostic, DiagnosticKind, Event, EventKind
};
use crate::preprocess::{CanonicalLine, Preprocessor};

/// Options consumed by a parsing pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
  /// Reassemble multi-line events before classification
  pub preprocess: bool,

  /// Restricts the catalogue to one collector family
  pub collector: Option<Collector>
}

impl Default for ParseOptions {
  fn default() -> ParseOptions {
    ParseOptions {
      preprocess: true,
      collector: None
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Output {
  Event(Event),
  Diagnostic(Diagnostic)
}

/// The result of a complete pass
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ParseResult {
  pub events: Vec<Event>,
  pub diagnostics: Vec<Diagnostic>
}

impl ParseResult {
  fn extend(&mut self, outputs: Vec<Output>) {
    for output in outputs {
      match output {
        Output::Event(event) => self.events.push(event),
        Output::Diagnostic(diagnostic) => self.diagnostics.push(diagnostic)
      }
    }
  }
}

/// Parses one input, line by line. One parser must be used per input.
#[derive(Debug)]
pub struct GcParser {
  options: ParseOptions,
  preprocessor: Preprocessor,
  hint: Collector,
  events: usize,
  diagnostics: usize
}

impl GcParser {
  pub fn new(options: ParseOptions) -> GcParser {
    GcParser {
      options,
      preprocessor: Preprocessor::new(options.preprocess),
      hint: options.collector.unwrap_or(Collector::Unknown),
      events: 0,
      diagnostics: 0
    }
  }

  /// The collector family currently narrowing the catalogue
  pub fn collector(&self) -> Collector {
    self.hint
  }

  /// Feeds one raw line, returning anything completed by it
  pub fn push(&mut self, line: &str) -> Vec<Output> {
    let mut outputs = Vec::new();

    for canonical in self.preprocessor.push(line) {
      self.handle(canonical, &mut outputs);
    }

    outputs
  }

  /// Ends the input, returning the remaining events
  pub fn finish(mut self) -> Vec<Output> {
    let mut outputs = Vec::new();

    let preprocessor = std::mem::replace(
      &mut self.preprocessor, Preprocessor::new(self.options.preprocess)
    );
    for canonical in preprocessor.finish() {
      self.handle(canonical, &mut outputs);
    }

    info!(
      events = self.events,
      diagnostics = self.diagnostics,
      collector = %self.hint,
      "finished parsing"
    );

    outputs
  }

  /// Stops the pass early, discarding any partially assembled event
  pub fn cancel(self) {
    self.preprocessor.cancel();
  }

  fn diagnostic(
    &mut self, canonical: &CanonicalLine, kind: DiagnosticKind, outputs: &mut Vec<Output>
  ) {
    self.diagnostics += 1;
    outputs.push(Output::Diagnostic(Diagnostic {
      line_number: canonical.line_number,
      raw: canonical.text.clone(),
      kind
    }));
  }

  fn handle(&mut self, canonical: CanonicalLine, outputs: &mut Vec<Output>) {
    if canonical.text.trim().is_empty() {
      return;
    }

    if canonical.stray {
      warn!(line_number = canonical.line_number, "stray line");
      self.diagnostic(&canonical, DiagnosticKind::StrayLine, outputs);
      return;
    }

    let classification = classifier::classify_with(&canonical.text, self.hint);
    let captures = match classification.captures {
      Some(captures) => captures,
      None => {
        debug!(line_number = canonical.line_number, "unrecognized line");
        self.diagnostic(&canonical, DiagnosticKind::UnknownLine, outputs);
        return;
      }
    };

    let kind = classification.kind;

    match extract(kind, &captures) {
      Ok(event) => {
        if event.diagnostics.contains(&DiagnosticKind::MalformedTimestamp) {
          self.diagnostic(&canonical, DiagnosticKind::MalformedTimestamp, outputs);
        }

        if kind == EventKind::UnifiedHeader && self.options.collector.is_none() {
          info!(collector = %event.collector, "detected collector");
          self.hint = event.collector;
        }

        self.events += 1;
        outputs.push(Output::Event(event));
      },
      Err(e) => {
        warn!(line_number = canonical.line_number, error = %e, "dropping event");
        self.diagnostic(&canonical, DiagnosticKind::DroppedEvent {
          kind,
          error: e.to_string()
        }, outputs);
      }
    }
  }
}

/// Parses a complete input in one call
pub fn parse_lines<I, S>(lines: I, options: ParseOptions) -> ParseResult
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>
{
  let mut parser = GcParser::new(options);
  let mut result = ParseResult::default();

  for line in lines {
    result.extend(parser.push(line.as_ref()));
  }

  result.extend(parser.finish());
  result
}
