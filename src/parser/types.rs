// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Deserialize};

use super::trigger::{SafepointTrigger, Trigger};
use super::util::{micros_to_millis, parse_scaled};

/// Every logical event the catalogue can recognize
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
  UnifiedSerialNew,
  UnifiedParNew,
  UnifiedParallelScavenge,
  UnifiedSerialOld,
  UnifiedParallelCompactingOld,
  UnifiedG1YoungPause,
  UnifiedG1FullGc,
  UnifiedYoung,
  UnifiedOld,
  UnifiedCmsInitialMark,
  UnifiedRemark,
  UnifiedG1Cleanup,
  UnifiedConcurrent,
  UnifiedSafepoint,
  UnifiedHeader,

  G1Concurrent,
  ApplicationStoppedTime,
  ParallelScavenge,
  ParallelCompactingOld,
  SerialNew,

  Unknown
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl EventKind {
  /// True if application threads are stopped for the whole event
  pub fn is_blocking(self) -> bool {
    match self {
      EventKind::UnifiedSerialNew
        | EventKind::UnifiedParNew
        | EventKind::UnifiedParallelScavenge
        | EventKind::UnifiedSerialOld
        | EventKind::UnifiedParallelCompactingOld
        | EventKind::UnifiedG1YoungPause
        | EventKind::UnifiedG1FullGc
        | EventKind::UnifiedYoung
        | EventKind::UnifiedOld
        | EventKind::UnifiedCmsInitialMark
        | EventKind::UnifiedRemark
        | EventKind::UnifiedG1Cleanup
        | EventKind::ParallelScavenge
        | EventKind::ParallelCompactingOld
        | EventKind::SerialNew => true,
      _ => false
    }
  }

  /// True for safepoint bracket events (time-to-safepoint accounting)
  pub fn is_safepoint(self) -> bool {
    match self {
      EventKind::UnifiedSafepoint | EventKind::ApplicationStoppedTime => true,
      _ => false
    }
  }

  /// True if the event reports whole-heap before/after/capacity figures
  pub fn reports_combined(self) -> bool {
    self.is_blocking()
  }

  /// True if the event carries a collection cause
  pub fn has_trigger(self) -> bool {
    match self {
      EventKind::UnifiedSerialNew
        | EventKind::UnifiedParNew
        | EventKind::UnifiedParallelScavenge
        | EventKind::UnifiedSerialOld
        | EventKind::UnifiedParallelCompactingOld
        | EventKind::UnifiedG1YoungPause
        | EventKind::UnifiedG1FullGc
        | EventKind::UnifiedYoung
        | EventKind::UnifiedOld
        | EventKind::ParallelScavenge
        | EventKind::ParallelCompactingOld
        | EventKind::SerialNew => true,
      _ => false
    }
  }

  /// True if the logged timestamp marks the end of the event, so the start
  /// is derived by subtracting the duration.
  pub fn is_end_anchored(self) -> bool {
    self.is_blocking() || self.is_safepoint()
  }

  /// True for unified logging (JDK 9+) kinds
  pub fn is_unified(self) -> bool {
    match self {
      EventKind::G1Concurrent
        | EventKind::ApplicationStoppedTime
        | EventKind::ParallelScavenge
        | EventKind::ParallelCompactingOld
        | EventKind::SerialNew
        | EventKind::Unknown => false,
      _ => true
    }
  }

  /// The collector family this kind implies, or `Unknown` if it is logged by
  /// more than one family. The serial full collection is also what the
  /// parallel collector runs when it is not using parallel compaction.
  pub fn collector(self) -> Collector {
    match self {
      EventKind::UnifiedSerialNew | EventKind::SerialNew => Collector::Serial,
      EventKind::UnifiedParallelScavenge
        | EventKind::UnifiedParallelCompactingOld
        | EventKind::ParallelScavenge
        | EventKind::ParallelCompactingOld => Collector::Parallel,
      EventKind::UnifiedParNew
        | EventKind::UnifiedCmsInitialMark => Collector::Cms,
      EventKind::UnifiedG1YoungPause
        | EventKind::UnifiedG1FullGc
        | EventKind::UnifiedG1Cleanup
        | EventKind::G1Concurrent => Collector::G1,
      _ => Collector::Unknown
    }
  }
}

/// Collector families
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collector {
  Serial,
  Parallel,
  Cms,
  G1,
  Shenandoah,
  Z,
  Unknown
}

impl fmt::Display for Collector {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl FromStr for Collector {
  type Err = Box<dyn Error>;

  fn from_str(s: &str) -> Result<Collector, Box<dyn Error>> {
    match s.to_lowercase().as_str() {
      "serial" => Ok(Collector::Serial),
      "parallel" | "ps" => Ok(Collector::Parallel),
      "cms" => Ok(Collector::Cms),
      "g1" => Ok(Collector::G1),
      "shenandoah" => Ok(Collector::Shenandoah),
      "z" | "zgc" => Ok(Collector::Z),
      _ => bail!(format!("invalid collector: {}", s))
    }
  }
}

impl Collector {
  /// Maps the name in a `Using <collector>` header line
  pub fn from_header(name: &str) -> Collector {
    match name {
      "Serial" => Collector::Serial,
      "Parallel" => Collector::Parallel,
      "Concurrent Mark Sweep" => Collector::Cms,
      "G1" => Collector::G1,
      "Shenandoah" => Collector::Shenandoah,
      "The Z Garbage Collector" => Collector::Z,
      _ => Collector::Unknown
    }
  }

  /// True if an event of this family may appear in a log written by `hint`.
  /// Kinds shared between families (`Unknown`) are compatible with anything.
  pub fn is_compatible(self, hint: Collector) -> bool {
    self == Collector::Unknown || hint == Collector::Unknown || self == hint
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
  #[serde(rename = "B")]
  Bytes,
  #[serde(rename = "K")]
  Kilobytes,
  #[serde(rename = "M")]
  Megabytes,
  #[serde(rename = "G")]
  Gigabytes
}

impl MemoryUnit {
  pub fn from_char(c: char) -> Option<MemoryUnit> {
    match c.to_ascii_uppercase() {
      'B' => Some(MemoryUnit::Bytes),
      'K' => Some(MemoryUnit::Kilobytes),
      'M' => Some(MemoryUnit::Megabytes),
      'G' => Some(MemoryUnit::Gigabytes),
      _ => None
    }
  }

  pub fn bytes(self) -> u64 {
    match self {
      MemoryUnit::Bytes => 1,
      MemoryUnit::Kilobytes => 1024,
      MemoryUnit::Megabytes => 1024 * 1024,
      MemoryUnit::Gigabytes => 1024 * 1024 * 1024
    }
  }

  fn symbol(self) -> char {
    match self {
      MemoryUnit::Bytes => 'B',
      MemoryUnit::Kilobytes => 'K',
      MemoryUnit::Megabytes => 'M',
      MemoryUnit::Gigabytes => 'G'
    }
  }
}

/// A memory size as logged. Comparisons are made on the byte value, so
/// `1M == 1024K`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Memory {
  pub value: f64,
  pub unit: MemoryUnit
}

impl Memory {
  pub fn new(value: f64, unit: MemoryUnit) -> Memory {
    Memory { value, unit }
  }

  pub fn kilobytes(value: u64) -> Memory {
    Memory::new(value as f64, MemoryUnit::Kilobytes)
  }

  /// Parses a logged size such as `1016K` or `906.5K`
  pub fn parse(s: &str) -> Option<Memory> {
    let unit = MemoryUnit::from_char(s.chars().last()?)?;
    let tenths = parse_scaled(&s[..s.len() - 1], 1)?;

    Some(Memory::new(tenths as f64 / 10.0, unit))
  }

  pub fn bytes(&self) -> f64 {
    self.value * self.unit.bytes() as f64
  }

  pub fn convert_to(&self, unit: MemoryUnit) -> Memory {
    Memory::new(self.bytes() / unit.bytes() as f64, unit)
  }

  /// The size in whole kilobytes, rounded
  pub fn to_kilobytes(&self) -> u64 {
    (self.bytes() / 1024.0).round() as u64
  }
}

impl PartialEq for Memory {
  fn eq(&self, other: &Memory) -> bool {
    self.bytes() == other.bytes()
  }
}

impl PartialOrd for Memory {
  fn partial_cmp(&self, other: &Memory) -> Option<Ordering> {
    self.bytes().partial_cmp(&other.bytes())
  }
}

impl fmt::Display for Memory {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}{}", self.value, self.unit.symbol())
  }
}

/// A before/after/capacity triple for one area of the heap
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MemoryDelta {
  pub before: Memory,
  pub after: Memory,
  pub capacity: Memory
}

impl MemoryDelta {
  /// The JVM occasionally logs occupancy above the reported capacity. This
  /// is kept as logged and flagged.
  pub fn exceeds_capacity(&self) -> bool {
    self.before > self.capacity || self.after > self.capacity
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
  Young,
  Old,
  Combined,
  Metaspace
}

impl fmt::Display for Generation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// CPU times for a pause, in centiseconds
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Times {
  pub user: u64,
  pub sys: u64,
  pub real: u64
}

impl Times {
  /// (user + sys) / real, or `None` when wall time rounds to zero
  pub fn parallelism(&self) -> Option<f64> {
    if self.real == 0 {
      None
    } else {
      Some((self.user + self.sys) as f64 / self.real as f64)
    }
  }
}

/// Per-event and per-line anomalies. None of these stop a pass.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// No catalogue entry matched the canonical line
  UnknownLine,

  /// No timestamp could be recovered from the decorator
  MalformedTimestamp,

  /// before or after occupancy is larger than capacity
  CapacityExceeded { generation: Generation },

  /// The line classified but a field could not be extracted
  DroppedEvent { kind: EventKind, error: String },

  /// A continuation fragment arrived with no event open
  StrayLine
}

impl fmt::Display for DiagnosticKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DiagnosticKind::UnknownLine => write!(f, "unrecognized line"),
      DiagnosticKind::MalformedTimestamp => write!(f, "malformed timestamp"),
      DiagnosticKind::CapacityExceeded { generation } => write!(
        f, "{} occupancy exceeds capacity", generation
      ),
      DiagnosticKind::DroppedEvent { kind, error } => write!(
        f, "dropped {} event: {}", kind, error
      ),
      DiagnosticKind::StrayLine => write!(f, "stray line with no open event")
    }
  }
}

/// A line-level anomaly reported on the side channel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Diagnostic {
  /// 1-based number of the first raw line of the canonical line
  pub line_number: usize,

  pub raw: String,

  #[serde(flatten)]
  pub kind: DiagnosticKind
}

/// A structured garbage collector event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
  pub kind: EventKind,

  pub collector: Collector,

  /// Start of the event, in milliseconds of JVM uptime (or epoch
  /// milliseconds when only datestamps are logged)
  pub timestamp: u64,

  /// Duration in microseconds
  pub duration: u64,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub datestamp: Option<DateTime<FixedOffset>>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub gc_id: Option<u64>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub trigger: Option<Trigger>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub safepoint_trigger: Option<SafepointTrigger>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub young: Option<MemoryDelta>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub old: Option<MemoryDelta>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub combined: Option<MemoryDelta>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub metaspace: Option<MemoryDelta>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub times: Option<Times>,

  /// Time to reach the safepoint, in microseconds
  #[serde(skip_serializing_if = "Option::is_none")]
  pub time_to_stop: Option<u64>,

  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub diagnostics: Vec<DiagnosticKind>,

  /// The canonical line this event was extracted from
  pub log_entry: String
}

impl Event {
  pub fn new(kind: EventKind, log_entry: &str) -> Event {
    Event {
      kind,
      collector: kind.collector(),
      timestamp: 0,
      duration: 0,
      datestamp: None,
      gc_id: None,
      trigger: None,
      safepoint_trigger: None,
      young: None,
      old: None,
      combined: None,
      metaspace: None,
      times: None,
      time_to_stop: None,
      diagnostics: Vec::new(),
      log_entry: log_entry.to_string()
    }
  }

  /// End of the event in milliseconds
  pub fn end_timestamp(&self) -> u64 {
    self.timestamp + micros_to_millis(self.duration)
  }
}
