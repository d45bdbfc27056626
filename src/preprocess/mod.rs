// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

mod context;
mod throwaway;
mod unified;

use tracing::{debug, warn};

pub use context::{ContextToken, PreprocessContext, PreprocessState, RawFragment};
pub use throwaway::is_throwaway;
pub use unified::{preprocess_line, Fragment};

/// One complete logical event as a single line
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalLine {
  /// 1-based number of the raw line the event starts on
  pub line_number: usize,

  pub text: String,

  /// Set for a raw line that belongs to no event, e.g. an end line arriving
  /// after its event was already complete
  pub stray: bool
}

impl CanonicalLine {
  fn new(line_number: usize, text: String) -> CanonicalLine {
    CanonicalLine { line_number, text, stray: false }
  }
}

/// Streams raw lines into canonical lines.
///
/// Each raw line is held until the following line arrives so the rules can
/// look one line ahead. Canonical lines are returned once they are known to
/// be complete, i.e. when the next canonical line begins.
#[derive(Debug)]
pub struct Preprocessor {
  enabled: bool,
  context: PreprocessContext,
  line_number: usize,
  prior: Option<String>,
  held: Option<(usize, String)>,
  current: Option<CanonicalLine>,

  /// Stray lines seen while `current` was open, written after it
  strays: Vec<CanonicalLine>
}

impl Preprocessor {
  /// A disabled preprocessor passes every raw line through unchanged
  pub fn new(enabled: bool) -> Preprocessor {
    Preprocessor {
      enabled,
      context: PreprocessContext::new(),
      line_number: 0,
      prior: None,
      held: None,
      current: None,
      strays: Vec::new()
    }
  }

  pub fn state(&self) -> PreprocessState {
    self.context.state()
  }

  pub fn push(&mut self, line: &str) -> Vec<CanonicalLine> {
    self.line_number += 1;

    if !self.enabled {
      return vec![CanonicalLine::new(self.line_number, line.to_string())];
    }

    let mut completed = Vec::new();
    if let Some((number, held)) = self.held.take() {
      self.process(number, &held, Some(line), &mut completed);
      self.prior = Some(held);
    }

    self.held = Some((self.line_number, line.to_string()));
    completed
  }

  /// Completes the pass: the last line is processed with no lookahead, and
  /// anything still buffered is emitted after it.
  pub fn finish(mut self) -> Vec<CanonicalLine> {
    let mut completed = Vec::new();

    if let Some((number, held)) = self.held.take() {
      self.process(number, &held, None, &mut completed);
    }

    if let Some(current) = self.current.take() {
      completed.push(current);
    }
    completed.append(&mut self.strays);

    let leftover = self.context.drain_entangled();
    if !leftover.is_empty() {
      debug!(count = leftover.len(), "flushing entangled lines at end of input");
    }

    for fragment in leftover {
      completed.push(CanonicalLine::new(fragment.line_number, fragment.text));
    }

    completed
  }

  /// Abandons the pass. A partially assembled event and any buffered lines
  /// are discarded rather than guessed at.
  pub fn cancel(self) {
    if self.current.is_some() || !self.context.entangled.is_empty() {
      debug!(
        line_number = self.line_number,
        buffered = self.context.entangled.len(),
        "discarding partially assembled event"
      );
    }
  }

  fn process(
    &mut self,
    line_number: usize,
    line: &str,
    next: Option<&str>,
    completed: &mut Vec<CanonicalLine>
  ) {
    let fragments = preprocess_line(
      &mut self.context, line_number, self.prior.as_deref(), line, next
    );

    for fragment in fragments {
      match fragment {
        Fragment::Begin { line_number, text } => {
          if let Some(done) = self.current.take() {
            completed.push(done);
          }
          completed.append(&mut self.strays);

          self.current = Some(CanonicalLine::new(line_number, text));
        },
        Fragment::Stray { line_number, text } => {
          let stray = CanonicalLine { line_number, text, stray: true };
          if self.current.is_some() {
            self.strays.push(stray);
          } else {
            completed.push(stray);
          }
        },
        Fragment::Append(text) => match &mut self.current {
          Some(current) => current.text.push_str(&text),
          None => {
            warn!(line_number, "continuation line with no open event");
            self.current = Some(CanonicalLine {
              line_number,
              text: line.trim_end().to_string(),
              stray: true
            });
          }
        }
      }
    }
  }
}

/// Preprocesses a complete input
pub fn preprocess_all<I, S>(lines: I) -> Vec<CanonicalLine>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>
{
  let mut preprocessor = Preprocessor::new(true);
  let mut canonical = Vec::new();

  for line in lines {
    canonical.extend(preprocessor.push(line.as_ref()));
  }

  canonical.extend(preprocessor.finish());
  canonical
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  fn texts(lines: &[CanonicalLine]) -> Vec<&str> {
    lines.iter().map(|l| l.text.as_str()).collect()
  }

  #[test]
  fn test_serial_young_assembly() {
    let canonical = preprocess_all(&[
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure)",
      "[0.112s][info][gc,heap ] GC(3) DefNew: 1016K->128K(1152K)",
      "[0.112s][info][gc,heap ] GC(3) Tenured: 929K->1044K(1552K)",
      "[0.112s][info][gc,metaspace ] GC(3) Metaspace: 1222K->1222K(1056768K)",
      "[0.112s][info][gc ] GC(3) Pause Young (Allocation Failure) 1M->1M(2M) 0.700ms",
      "[0.112s][info][gc,cpu ] GC(3) User=0.00s Sys=0.00s Real=0.00s",
    ]);

    assert_that!(texts(&canonical)).is_equal_to(vec![concat!(
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure) ",
      "DefNew: 1016K->128K(1152K) Tenured: 929K->1044K(1552K) ",
      "Metaspace: 1222K->1222K(1056768K) 1M->1M(2M) 0.700ms ",
      "User=0.00s Sys=0.00s Real=0.00s"
    )]);
    assert_that!(canonical[0].line_number).is_equal_to(1);
  }

  #[test]
  fn test_serial_old_after_young() {
    let canonical = preprocess_all(&[
      "[0.073s][info][gc,start     ] GC(2) Pause Young (Allocation Failure)",
      "[0.075s][info][gc,start     ] GC(2) Pause Full (Allocation Failure)",
      "[0.075s][info][gc,phases,start] GC(2) Phase 1: Mark live objects",
      "[0.076s][info][gc,phases      ] GC(2) Phase 1: Mark live objects 0.595ms",
      "[0.076s][info][gc             ] GC(2) Pause Full (Allocation Failure) 0M->0M(2M) 1.699ms",
      "[0.076s][info][gc,heap        ] GC(2) DefNew: 983K->0K(1152K)",
      "[0.076s][info][gc,heap        ] GC(2) Tenured: 1044K->1550K(1552K)",
      "[0.076s][info][gc,metaspace   ] GC(2) Metaspace: 1223K->1223K(1056768K)",
      "[0.076s][info][gc             ] GC(2) Pause Young (Allocation Failure) 1M->0M(2M) 3.061ms",
      "[0.076s][info][gc,cpu         ] GC(2) User=0.00s Sys=0.00s Real=0.00s",
    ]);

    assert_that!(texts(&canonical)).is_equal_to(vec![concat!(
      "[0.075s][info][gc,start     ] GC(2) Pause Full (Allocation Failure) ",
      "DefNew: 983K->0K(1152K) Tenured: 1044K->1550K(1552K) ",
      "Metaspace: 1223K->1223K(1056768K) 1M->0M(2M) 3.061ms ",
      "User=0.00s Sys=0.00s Real=0.00s"
    )]);
  }

  #[test]
  fn test_g1_young_assembly() {
    let canonical = preprocess_all(&[
      "[0.368s][info][gc,start     ] GC(6) Pause Young (Normal) (G1 Evacuation Pause)",
      "[0.368s][info][gc,task      ] GC(6) Using 2 workers of 4 for evacuation",
      "[0.369s][info][gc,phases    ] GC(6)   Pre Evacuate Collection Set: 0.0ms",
      "[0.369s][info][gc,phases    ] GC(6)   Evacuate Collection Set: 0.7ms",
      "[0.369s][info][gc,phases    ] GC(6)   Post Evacuate Collection Set: 0.1ms",
      "[0.369s][info][gc,phases    ] GC(6)   Other: 0.1ms",
      "[0.369s][info][gc,heap      ] GC(6) Eden regions: 1->0(1)",
      "[0.369s][info][gc,heap      ] GC(6) Survivor regions: 1->1(1)",
      "[0.369s][info][gc,heap      ] GC(6) Old regions: 2->2",
      "[0.369s][info][gc,heap      ] GC(6) Humongous regions: 0->0",
      "[0.369s][info][gc,metaspace ] GC(6) Metaspace: 9085K->9085K(1058816K)",
      "[0.369s][info][gc           ] GC(6) Pause Young (Normal) (G1 Evacuation Pause) 3M->2M(7M) 0.929ms",
      "[0.369s][info][gc,cpu       ] GC(6) User=0.01s Sys=0.00s Real=0.01s",
    ]);

    assert_that!(texts(&canonical)).is_equal_to(vec![concat!(
      "[0.368s][info][gc,start     ] GC(6) Pause Young (Normal) (G1 Evacuation Pause) ",
      "Metaspace: 9085K->9085K(1058816K) 3M->2M(7M) 0.929ms ",
      "User=0.01s Sys=0.00s Real=0.01s"
    )]);
  }

  #[test]
  fn test_passthrough_separates_lines() {
    let canonical = preprocess_all(&[
      "[0.053s][info][gc] GC(0) Pause Young (Allocation Failure) 0M->0M(1M) 0.914ms",
      "[0.060s][info][gc] GC(1) Pause Young (Allocation Failure) 0M->0M(1M) 0.512ms",
    ]);

    assert_that!(canonical).has_length(2);
    assert_that!(canonical[1].line_number).is_equal_to(2);
  }

  #[test]
  fn test_idempotent() {
    let first = preprocess_all(&[
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure)",
      "[0.112s][info][gc,heap ] GC(3) DefNew: 1016K->128K(1152K)",
      "[0.112s][info][gc,heap ] GC(3) Tenured: 929K->1044K(1552K)",
      "[0.112s][info][gc ] GC(3) Pause Young (Allocation Failure) 1M->1M(2M) 0.700ms",
      "[0.112s][info][gc,cpu ] GC(3) User=0.00s Sys=0.00s Real=0.00s",
      "[0.200s][info][gc] GC(4) Pause Young (Allocation Failure) 0M->0M(1M) 0.914ms",
      "[0.054s][info][gc] GC(5) Concurrent Mark 1.260ms",
      "[1.000s][info][safepoint] Entering safepoint region: GenCollectForAllocation",
      "[1.002s][info][safepoint] Leaving safepoint region",
      "[1.002s][info][safepoint] Total time for which application threads were stopped: 0.0020000 seconds, Stopping threads took: 0.0000100 seconds",
    ]);
    let second = preprocess_all(texts(&first));

    assert_that!(texts(&second)).is_equal_to(texts(&first));
  }

  #[test]
  fn test_entanglement_resolution() {
    let canonical = preprocess_all(&[
      "[10.000s][info][safepoint] Entering safepoint region: G1CollectForAllocation",
      "[10.001s][info][gc,start] GC(5) Pause Young (Normal) (G1 Evacuation Pause)",
      "[10.002s][info][gc] GC(4) Concurrent Cycle 45.123ms",
      "[10.003s][info][gc,heap] GC(5) Metaspace: 9085K->9085K(1058816K)",
      "[10.004s][info][gc] GC(5) Pause Young (Normal) (G1 Evacuation Pause) 3M->2M(7M) 3.000ms",
      "[10.004s][info][gc,cpu] GC(5) User=0.01s Sys=0.00s Real=0.01s",
      "[10.004s][info][safepoint] Leaving safepoint region",
      "[10.004s][info][safepoint] Total time for which application threads were stopped: 0.0040000 seconds, Stopping threads took: 0.0000100 seconds",
    ]);

    assert_that!(texts(&canonical)).is_equal_to(vec![
      concat!(
        "[10.001s][info][gc,start] GC(5) Pause Young (Normal) (G1 Evacuation Pause) ",
        "Metaspace: 9085K->9085K(1058816K) 3M->2M(7M) 3.000ms ",
        "User=0.01s Sys=0.00s Real=0.01s"
      ),
      concat!(
        "[10.000s][info][safepoint] Entering safepoint region: G1CollectForAllocation",
        "[10.004s][info][safepoint] Leaving safepoint region",
        "[10.004s][info][safepoint] Total time for which application threads were ",
        "stopped: 0.0040000 seconds, Stopping threads took: 0.0000100 seconds"
      ),
      "[10.002s][info][gc] GC(4) Concurrent Cycle 45.123ms",
    ]);
    assert_that!(canonical[1].line_number).is_equal_to(1);
    assert_that!(canonical[2].line_number).is_equal_to(3);
  }

  #[test]
  fn test_deferred_safepoint_promoted_by_concurrent() {
    let canonical = preprocess_all(&[
      "[10.000s][info][safepoint] Entering safepoint region: G1CollectForAllocation",
      "[10.001s][info][gc,start] GC(5) Pause Young (Normal) (G1 Evacuation Pause)",
      "[10.004s][info][gc] GC(5) Pause Young (Normal) (G1 Evacuation Pause) 3M->2M(7M) 3.000ms",
      "[10.004s][info][gc,cpu] GC(5) User=0.01s Sys=0.00s Real=0.01s",
      "[10.004s][info][gc] GC(6) Concurrent Cycle",
      "[10.004s][info][safepoint] Leaving safepoint region",
      "[10.004s][info][safepoint] Total time for which application threads were stopped: 0.0040000 seconds, Stopping threads took: 0.0000100 seconds",
    ]);

    assert_that!(canonical).has_length(3);
    assert_that!(canonical[1].text.starts_with("[10.000s][info][safepoint] Entering")).is_true();
    assert_that!(canonical[1].text.contains("Total time")).is_true();
    assert_that!(canonical[2].text.as_str())
      .is_equal_to("[10.004s][info][gc] GC(6) Concurrent Cycle");
  }

  #[test]
  fn test_disabled() {
    let mut preprocessor = Preprocessor::new(false);
    let out = preprocessor.push("[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure)");

    assert_that!(out).has_length(1);
    assert_that!(preprocessor.finish()).is_empty();
  }

  #[test]
  fn test_finish_flushes_partial() {
    let mut preprocessor = Preprocessor::new(true);
    assert_that!(preprocessor.push(
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure)"
    )).is_empty();
    assert_that!(preprocessor.push(
      "[0.112s][info][gc,heap ] GC(3) DefNew: 1016K->128K(1152K)"
    )).is_empty();
    assert_that!(preprocessor.state()).is_equal_to(PreprocessState::AssemblingEvent);

    let rest = preprocessor.finish();
    assert_that!(rest).has_length(1);
    assert_that!(rest[0].text.ends_with("DefNew: 1016K->128K(1152K)")).is_true();
  }

  #[test]
  fn test_stray_line() {
    let canonical = preprocess_all(&[
      "[0.112s][info][gc,cpu ] GC(3) User=0.00s Sys=0.00s Real=0.00s",
    ]);

    assert_that!(canonical).has_length(1);
    assert_that!(canonical[0].stray).is_true();
  }

  #[test]
  fn test_stray_after_complete_event() {
    let canonical = preprocess_all(&[
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure)",
      "[0.112s][info][gc,heap ] GC(3) DefNew: 1016K->128K(1152K)",
      "[0.112s][info][gc,heap ] GC(3) Tenured: 929K->1044K(1552K)",
      "[0.112s][info][gc ] GC(3) Pause Young (Allocation Failure) 1M->1M(2M) 0.700ms",
      "[0.112s][info][gc,cpu ] GC(3) User=0.00s Sys=0.00s Real=0.00s",
      "[0.113s][info][gc,cpu ] GC(3) User=0.00s Sys=0.00s Real=0.00s",
    ]);

    assert_that!(canonical).has_length(2);
    assert_that!(canonical[0].stray).is_false();
    assert_that!(canonical[0].text.as_str()).is_equal_to(concat!(
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure) ",
      "DefNew: 1016K->128K(1152K) Tenured: 929K->1044K(1552K) ",
      "1M->1M(2M) 0.700ms User=0.00s Sys=0.00s Real=0.00s"
    ));
    assert_that!(canonical[1].stray).is_true();
    assert_that!(canonical[1].line_number).is_equal_to(6);
  }

  #[test]
  fn test_stray_written_after_open_line() {
    let canonical = preprocess_all(&[
      "[0.053s][info][gc] GC(0) Pause Young (Allocation Failure) 0M->0M(1M) 0.914ms",
      "[0.054s][info][gc,heap] GC(0) DefNew: 983K->0K(1152K)",
      "[0.060s][info][gc] GC(1) Pause Young (Allocation Failure) 0M->0M(1M) 0.512ms",
    ]);

    assert_that!(canonical.iter().map(|l| l.line_number).collect::<Vec<_>>())
      .is_equal_to(vec![1, 2, 3]);
    assert_that!(canonical.iter().map(|l| l.stray).collect::<Vec<_>>())
      .is_equal_to(vec![false, true, false]);
  }
}
