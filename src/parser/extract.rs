// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use regex::Captures;
use snafu::Snafu;

use super::decorator::Decorator;
use super::trigger::{SafepointTrigger, Trigger};
use super::types::*;
use super::util::{micros_to_millis, parse_scaled};

#[derive(Debug, Snafu)]
pub enum ExtractError {
  #[snafu(display("invalid number in {}: {:?}", field, value))]
  InvalidNumber {
    field: String,
    value: String
  },

  #[snafu(display("invalid memory size in {}: {:?}", field, value))]
  InvalidMemory {
    field: String,
    value: String
  },

  #[snafu(display("incomplete memory figures for {}", generation))]
  IncompleteMemory {
    generation: Generation
  },

  #[snafu(display("line does not match the {} pattern", kind))]
  PatternMismatch {
    kind: EventKind
  }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

static GENERATIONS: &[(Generation, &str)] = &[
  (Generation::Young, "young"),
  (Generation::Old, "old"),
  (Generation::Combined, "combined"),
  (Generation::Metaspace, "metaspace")
];

fn scaled(caps: &Captures, field: &str, scale: u32) -> Result<Option<u64>> {
  match caps.name(field) {
    Some(m) => parse_scaled(m.as_str(), scale)
      .map(Some)
      .ok_or_else(|| ExtractError::InvalidNumber {
        field: field.to_string(),
        value: m.as_str().to_string()
      }),
    None => Ok(None)
  }
}

fn memory(caps: &Captures, field: &str) -> Result<Option<Memory>> {
  match caps.name(field) {
    Some(m) => Memory::parse(m.as_str())
      .map(|memory| Some(memory.convert_to(MemoryUnit::Kilobytes)))
      .ok_or_else(|| ExtractError::InvalidMemory {
        field: field.to_string(),
        value: m.as_str().to_string()
      }),
    None => Ok(None)
  }
}

fn delta(
  caps: &Captures, generation: Generation, prefix: &str
) -> Result<Option<MemoryDelta>> {
  let before = memory(caps, &format!("{}_before", prefix))?;
  let after = memory(caps, &format!("{}_after", prefix))?;
  let capacity = memory(caps, &format!("{}_capacity", prefix))?;

  match (before, after, capacity) {
    (Some(before), Some(after), Some(capacity)) => {
      Ok(Some(MemoryDelta { before, after, capacity }))
    },
    (None, None, None) => Ok(None),
    _ => Err(ExtractError::IncompleteMemory { generation })
  }
}

fn times(caps: &Captures) -> Result<Option<Times>> {
  let user = scaled(caps, "user", 2)?;
  let sys = scaled(caps, "sys", 2)?;
  let real = scaled(caps, "real", 2)?;

  Ok(match (user, sys, real) {
    (Some(user), Some(sys), Some(real)) => Some(Times { user, sys, real }),
    _ => None
  })
}

/// Duration in microseconds from whichever duration group the pattern has.
/// Safepoints report the stopped time.
fn duration(caps: &Captures) -> Result<u64> {
  if let Some(micros) = scaled(caps, "duration", 3)? {
    return Ok(micros);
  }

  if let Some(micros) = scaled(caps, "duration_secs", 6)? {
    return Ok(micros);
  }

  Ok(scaled(caps, "stopped", 6)?.unwrap_or(0))
}

/// Builds an event from the captures of the catalogue pattern for `kind`.
///
/// Numeric failures are errors for this line only; the caller decides
/// whether to drop the event.
pub fn extract(kind: EventKind, caps: &Captures) -> Result<Event> {
  let log_entry = caps.get(0).map(|m| m.as_str()).unwrap_or("");
  let mut event = Event::new(kind, log_entry);

  let decorator = match caps.name("decorator") {
    Some(m) => Decorator::parse(m.as_str()),
    None => return Err(ExtractError::PatternMismatch { kind })
  };

  // safepoint lines are stamped when the bracket closes
  let end_decorator = caps.name("end_decorator")
    .map(|m| Decorator::parse(m.as_str()));
  let timing = end_decorator.as_ref().unwrap_or(&decorator);

  if timing.is_malformed() {
    event.diagnostics.push(DiagnosticKind::MalformedTimestamp);
  }

  event.duration = duration(caps)?;
  event.time_to_stop = scaled(caps, "stopping", 6)?;

  let end = timing.timestamp();
  event.timestamp = if kind.is_end_anchored() {
    end.saturating_sub(micros_to_millis(event.duration))
  } else {
    end
  };

  event.datestamp = decorator.datestamp;
  event.gc_id = decorator.gc_id;

  event.trigger = caps.name("trigger").map(|m| Trigger::parse(m.as_str()));
  event.safepoint_trigger = caps.name("safepoint_trigger")
    .map(|m| SafepointTrigger::parse(m.as_str()));

  if let Some(m) = caps.name("collector") {
    event.collector = Collector::from_header(m.as_str());
  }

  for (generation, prefix) in GENERATIONS {
    let value = delta(caps, *generation, prefix)?;
    if let Some(d) = &value {
      if d.exceeds_capacity() {
        event.diagnostics.push(DiagnosticKind::CapacityExceeded {
          generation: *generation
        });
      }
    }

    match generation {
      Generation::Young => event.young = value,
      Generation::Old => event.old = value,
      Generation::Combined => event.combined = value,
      Generation::Metaspace => event.metaspace = value
    }
  }

  event.times = times(caps)?;

  Ok(event)
}
