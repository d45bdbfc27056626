// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Reassembly rules for unified logging.
//!
//! With detailed logging (`-Xlog:gc*`) one collection is written over many
//! lines: a begin line, per-generation details, a summary and a times line.
//! Concurrent phases and safepoint brackets written by other threads may be
//! interleaved with them. Each raw line is looked at with the line before and
//! the line after it and turned into fragments of canonical lines.

use regex::Regex;
use tracing::debug;

use crate::classifier;
use crate::parser::EventKind;
use crate::patterns::*;
use super::context::{ContextToken, PreprocessContext, RawFragment};
use super::throwaway::is_throwaway;

/// Output of one preprocessing step
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
  /// Starts a new canonical line, completing the previous one
  Begin {
    line_number: usize,
    text: String
  },

  /// Continues the canonical line being assembled
  Append(String),

  /// A line that belongs to no event. It is written on its own once the
  /// canonical line being assembled is complete.
  Stray {
    line_number: usize,
    text: String
  }
}

impl Fragment {
  fn begin(line_number: usize, text: &str) -> Fragment {
    Fragment::Begin {
      line_number,
      text: text.to_string()
    }
  }

  fn append(text: &str) -> Fragment {
    Fragment::Append(text.to_string())
  }

  fn stray(line_number: usize, text: &str) -> Fragment {
    Fragment::Stray {
      line_number,
      text: text.to_string()
    }
  }
}

lazy_static! {
  static ref CONCURRENT_BEGIN: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Concurrent (?:Mark|Preclean|Reset|Sweep) {})\s*$",
    UNIFIED_DECORATOR, DURATION
  )).unwrap();

  static ref SIZED_PAUSE_BEGIN: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Pause (?:Initial Mark|Remark|Cleanup) {} {})\s*$",
    UNIFIED_DECORATOR, sizes_unnamed(), DURATION
  )).unwrap();

  static ref YOUNG_BEGIN: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Pause Young(?: \((?:{})\))? \((?:{})\))\s*$",
    UNIFIED_DECORATOR, G1_YOUNG_TYPE, TRIGGER_ANY
  )).unwrap();

  static ref FULL_BEGIN: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Pause Full \((?:{})\))\s*$",
    UNIFIED_DECORATOR, TRIGGER_ANY
  )).unwrap();

  static ref SERIAL_OLD_BEGIN: Regex = Regex::new(&format!(
    r"^{} Pause Full \((?:Allocation Failure|Metadata GC Threshold|System\.gc\(\))\)\s*$",
    UNIFIED_DECORATOR
  )).unwrap();

  static ref SAFEPOINT_BEGIN: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Entering safepoint region: (?:{}))\s*$",
    UNIFIED_DECORATOR, SAFEPOINT_TRIGGER
  )).unwrap();

  static ref SPACE_DATA: Regex = Regex::new(&format!(
    concat!(
      r"^{}(?P<payload> (?:CMS|DefNew|Metaspace|ParNew|PSYoungGen|PSOldGen",
      r"|ParOldGen|Tenured): {})\s*$"
    ),
    UNIFIED_DECORATOR, sizes_unnamed()
  )).unwrap();

  static ref YOUNG_DATA: Regex = Regex::new(&format!(
    r"^{} Pause Young \(Allocation Failure\)(?P<payload> {} {})\s*$",
    UNIFIED_DECORATOR, sizes_unnamed(), DURATION
  )).unwrap();

  static ref FULL_DATA: Regex = Regex::new(&format!(
    r"^{} Pause Full \((?:{})\)(?P<payload> {} {})\s*$",
    UNIFIED_DECORATOR, TRIGGER_ANY, sizes_unnamed(), DURATION
  )).unwrap();

  static ref G1_YOUNG_DATA: Regex = Regex::new(&format!(
    r"^{} Pause Young(?: \((?:{})\))? \((?:{})\)(?P<payload> {} {})\s*$",
    UNIFIED_DECORATOR, G1_YOUNG_TYPE, TRIGGER_G1_YOUNG_DATA, sizes_unnamed(), DURATION
  )).unwrap();

  static ref SAFEPOINT_LEAVE: Regex = Regex::new(&format!(
    r"^(?P<payload>{} Leaving safepoint region)\s*$",
    UNIFIED_DECORATOR
  )).unwrap();

  static ref SAFEPOINT_TOTAL: Regex = Regex::new(&format!(
    concat!(
      r"^(?P<payload>{} Total time for which application threads were stopped:",
      r" {} seconds, Stopping threads took: {} seconds)\s*$"
    ),
    UNIFIED_DECORATOR, DURATION_SECS, DURATION_SECS
  )).unwrap();

  static ref TIMES_DATA: Regex = Regex::new(&format!(
    r"^{}(?P<payload>{})\s*$",
    UNIFIED_DECORATOR, TIMES
  )).unwrap();
}

fn payload<'t>(re: &Regex, line: &'t str) -> Option<&'t str> {
  re.captures(line)
    .and_then(|caps| caps.name("payload"))
    .map(|m| m.as_str())
}

fn matches(re: &Regex, line: Option<&str>) -> bool {
  line.map(|l| re.is_match(l)).unwrap_or(false)
}

fn is_safepoint_begin(fragment: &RawFragment) -> bool {
  SAFEPOINT_BEGIN.is_match(&fragment.text)
}

fn open_event(ctx: &mut PreprocessContext) {
  ctx.set(ContextToken::BeginningOfEvent);
  ctx.set(ContextToken::Unified);
}

fn has_stashed_safepoint(ctx: &PreprocessContext) -> bool {
  ctx.entangled.iter().any(is_safepoint_begin)
}

/// Removes the stashed safepoint enter line from the entangled buffer, if
/// there is one
fn take_stashed_safepoint(ctx: &mut PreprocessContext) -> Option<RawFragment> {
  let position = ctx.entangled.iter().position(is_safepoint_begin)?;

  ctx.clear(ContextToken::SafepointPending);
  Some(ctx.entangled.remove(position))
}

/// Only the newest safepoint enter waits for a leave line. Older enters never
/// saw theirs and are written out as strays.
fn release_stashed_safepoints(ctx: &mut PreprocessContext, out: &mut Vec<Fragment>) {
  if !has_stashed_safepoint(ctx) {
    return;
  }

  let (release, keep): (Vec<RawFragment>, Vec<RawFragment>) = ctx.drain_entangled()
    .into_iter()
    .partition(is_safepoint_begin);

  debug!(released = release.len(), "releasing safepoint enter that was never left");
  ctx.entangled = keep;
  for fragment in release {
    out.push(Fragment::Stray {
      line_number: fragment.line_number,
      text: fragment.text
    });
  }
}

fn flush_entangled(ctx: &mut PreprocessContext, out: &mut Vec<Fragment>) {
  for fragment in ctx.drain_entangled() {
    out.push(Fragment::Begin {
      line_number: fragment.line_number,
      text: fragment.text
    });
  }
}

/// A new begin line while the previous event never saw its end line: lines
/// buffered for the stale event are released so the buffer stays bounded.
/// A stashed safepoint enter belongs to the new event and stays.
fn release_stale(ctx: &mut PreprocessContext, out: &mut Vec<Fragment>) {
  if !ctx.has(ContextToken::Unified) || ctx.entangled.is_empty() {
    return;
  }

  let (keep, release): (Vec<RawFragment>, Vec<RawFragment>) = ctx.drain_entangled()
    .into_iter()
    .partition(is_safepoint_begin);

  debug!(released = release.len(), "releasing lines buffered for an unfinished event");
  ctx.entangled = keep;
  for fragment in release {
    out.push(Fragment::Begin {
      line_number: fragment.line_number,
      text: fragment.text
    });
  }
}

/// Preprocesses a single raw line given its neighbors.
///
/// Returns the fragments to write, in order. An empty result means the line
/// was consumed: thrown away, buffered, or dropped as a duplicate summary.
pub fn preprocess_line(
  ctx: &mut PreprocessContext,
  line_number: usize,
  prior: Option<&str>,
  line: &str,
  next: Option<&str>
) -> Vec<Fragment> {
  let mut out = Vec::new();

  if line.trim().is_empty() {
    return out;
  }

  let after_summary = ctx.has(ContextToken::StandaloneSummary);
  ctx.clear(ContextToken::StandaloneSummary);

  // begin lines
  if let Some(text) = payload(&CONCURRENT_BEGIN, line)
    .or_else(|| payload(&SIZED_PAUSE_BEGIN, line))
  {
    release_stale(ctx, &mut out);
    out.push(Fragment::begin(line_number, text));
    open_event(ctx);
  } else if let Some(text) = payload(&YOUNG_BEGIN, line) {
    release_stale(ctx, &mut out);
    if matches(&SERIAL_OLD_BEGIN, next) {
      // the young collection failed over to a serial full collection, which
      // reports the young collection's figures
      debug!(line_number, "young pause begin subsumed by full collection");
    } else {
      out.push(Fragment::begin(line_number, text));
    }
    open_event(ctx);
  } else if let Some(text) = payload(&FULL_BEGIN, line) {
    // a serial full begin right after a suppressed young begin continues
    // that event
    if !(matches(&YOUNG_BEGIN, prior) && SERIAL_OLD_BEGIN.is_match(line)) {
      release_stale(ctx, &mut out);
    }
    out.push(Fragment::begin(line_number, text));
    open_event(ctx);
  } else if let Some(text) = payload(&SAFEPOINT_BEGIN, line) {
    if next.is_none() || matches(&SAFEPOINT_LEAVE, next) {
      out.push(Fragment::begin(line_number, text));
      open_event(ctx);
    } else {
      release_stashed_safepoints(ctx, &mut out);
      debug!(line_number, "stashing safepoint enter until its bracket closes");
      ctx.entangled.push(RawFragment { line_number, text: text.to_string() });
      ctx.set(ContextToken::SafepointPending);
    }

  // middle lines
  } else if let Some(text) = payload(&SPACE_DATA, line) {
    if ctx.is_open() {
      out.push(Fragment::append(text));
    } else {
      debug!(line_number, "heap detail line with no open event");
      out.push(Fragment::stray(line_number, line.trim_end()));
    }
    ctx.clear(ContextToken::BeginningOfEvent);
  } else if let Some(text) = payload(&YOUNG_DATA, line) {
    if ctx.has(ContextToken::Unified) {
      out.push(Fragment::append(text));
    } else {
      out.push(Fragment::begin(line_number, line.trim_end()));
      ctx.set(ContextToken::StandaloneSummary);
    }
    ctx.clear(ContextToken::BeginningOfEvent);
  } else if let Some(text) = payload(&FULL_DATA, line)
    .or_else(|| payload(&G1_YOUNG_DATA, line))
  {
    if !ctx.has(ContextToken::Unified) {
      out.push(Fragment::begin(line_number, line.trim_end()));
      ctx.set(ContextToken::StandaloneSummary);
    } else if matches(&TIMES_DATA, next) {
      out.push(Fragment::append(text));
    } else {
      debug!(line_number, "dropping summary superseded by a later summary");
    }
    ctx.clear(ContextToken::BeginningOfEvent);
  } else if let Some(text) = payload(&SAFEPOINT_LEAVE, line) {
    if matches(&SAFEPOINT_BEGIN, prior) {
      out.push(Fragment::append(text));
    } else if let Some(stashed) = take_stashed_safepoint(ctx) {
      out.push(Fragment::Begin {
        line_number: stashed.line_number,
        text: format!("{}{}", stashed.text, text)
      });
      ctx.set(ContextToken::Unified);
    } else if ctx.is_open() {
      out.push(Fragment::append(text));
    } else {
      debug!(line_number, "safepoint leave line with no open safepoint");
      out.push(Fragment::stray(line_number, line.trim_end()));
    }
    ctx.clear(ContextToken::BeginningOfEvent);

  // end lines
  } else if let Some(text) = payload(&SAFEPOINT_TOTAL, line) {
    if !ctx.is_open() {
      debug!(line_number, "safepoint total line with no open safepoint");
      out.push(Fragment::stray(line_number, line.trim_end()));
      return out;
    }

    out.push(Fragment::append(text));
    ctx.clear_all();
    flush_entangled(ctx, &mut out);
  } else if let Some(text) = payload(&TIMES_DATA, line) {
    if !ctx.is_open() && !after_summary {
      debug!(line_number, "times line with no open event");
      out.push(Fragment::stray(line_number, line.trim_end()));
      return out;
    }

    out.push(Fragment::append(text));
    ctx.clear(ContextToken::BeginningOfEvent);
    ctx.clear(ContextToken::Unified);

    if matches(&SAFEPOINT_LEAVE, next) {
      // the bracket around this event closes next: start it now and hold the
      // remaining lines until it is complete
      if let Some(stashed) = take_stashed_safepoint(ctx) {
        out.push(Fragment::Begin {
          line_number: stashed.line_number,
          text: stashed.text
        });
        ctx.set(ContextToken::Unified);
      } else {
        flush_entangled(ctx, &mut out);
      }
    } else if has_stashed_safepoint(ctx) {
      debug!(line_number, "deferring entangled lines until the safepoint closes");
    } else {
      flush_entangled(ctx, &mut out);
    }

  // everything else
  } else if classifier::classify(line) == EventKind::UnifiedConcurrent && !is_throwaway(line) {
    if ctx.has(ContextToken::Unified) {
      debug!(line_number, "buffering concurrent line interleaved with an open event");
      ctx.entangled.push(RawFragment { line_number, text: line.trim_end().to_string() });
    } else if let Some(stashed) = take_stashed_safepoint(ctx) {
      out.push(Fragment::Begin {
        line_number: stashed.line_number,
        text: stashed.text
      });
      open_event(ctx);
      ctx.entangled.push(RawFragment { line_number, text: line.trim_end().to_string() });
    } else {
      out.push(Fragment::begin(line_number, line.trim_end()));
      ctx.set(ContextToken::BeginningOfEvent);
    }
  } else if is_throwaway(line) {
    debug!(line_number, "throwaway line");
  } else {
    out.push(Fragment::begin(line_number, line.trim_end()));
  }

  out
}
