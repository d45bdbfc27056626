// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Resolves the timestamp prefix of a log line.
//!
//! Unified logging writes bracketed decorations, e.g.
//! `[2019-05-09T01:39:00.763+0000][5355ms][info][gc] GC(0)`, where any subset of
//! the time fields may be present. Legacy logging writes `datestamp: uptime: `
//! and some JDK 8 builds interleave the writes of concurrent threads, so the
//! same prefix may show up duplicated or glued together:
//! `2017-01-20T23:20:52.028-0500: 1513438.9002017-01-20T23:20:52.028-0500: : `
//!
//! Resolution scans the prefix for time tokens left to right and then picks:
//!  1. the last uptime in milliseconds
//!  2. the last uptime in seconds, rounded half-up to milliseconds
//!  3. the last datestamp, as epoch milliseconds
//!
//! A datestamp that disagrees with the uptime is kept as metadata only.

use chrono::{DateTime, FixedOffset};
use regex::Regex;

use super::util::{parse_datestamp, parse_scaled};

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
  pub datestamp: Option<DateTime<FixedOffset>>,

  /// Uptime from a seconds token, in milliseconds
  pub uptime: Option<u64>,

  /// Uptime from a milliseconds token
  pub uptime_millis: Option<u64>,

  pub level: Option<String>,
  pub tags: Vec<String>,
  pub gc_id: Option<u64>
}

impl Decorator {
  /// Parses a decorator substring. This never fails: a decorator with no
  /// recoverable time token is reported by `is_malformed()`.
  pub fn parse(text: &str) -> Decorator {
    lazy_static! {
      static ref TIME_TOKEN: Regex = Regex::new(concat!(
        r"(?P<datestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]\d{3}(?:[+-]\d{4})?)",
        r"|(?P<millis>\d{1,13})ms",
        r"|(?P<secs>\d{1,10}[.,]\d{3})"
      )).unwrap();

      static ref BRACKET: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
      static ref TAGS: Regex = Regex::new(r"^[a-z][a-z0-9]*(?:,[a-z0-9]+)*$").unwrap();
      static ref GC_ID: Regex = Regex::new(r"GC\((\d{1,10})\)").unwrap();
    }

    let mut decorator = Decorator {
      datestamp: None,
      uptime: None,
      uptime_millis: None,
      level: None,
      tags: Vec::new(),
      gc_id: None
    };

    for caps in TIME_TOKEN.captures_iter(text) {
      if let Some(m) = caps.name("millis") {
        if let Ok(millis) = m.as_str().parse() {
          decorator.uptime_millis = Some(millis);
        }
      } else if let Some(m) = caps.name("secs") {
        if let Some(millis) = parse_scaled(m.as_str(), 3) {
          decorator.uptime = Some(millis);
        }
      } else if let Some(m) = caps.name("datestamp") {
        // a datestamp without an offset can't be placed in time, skip it
        if let Some(datestamp) = parse_datestamp(m.as_str()) {
          decorator.datestamp = Some(datestamp);
        }
      }
    }

    for caps in BRACKET.captures_iter(text) {
      let field = caps[1].trim();

      match field {
        "trace" | "debug" | "info" | "warning" | "error" => {
          decorator.level = Some(field.to_string());
        },
        _ if TAGS.is_match(field) => {
          decorator.tags = field.split(',').map(String::from).collect();
        },
        _ => ()
      }
    }

    if let Some(caps) = GC_ID.captures(text) {
      decorator.gc_id = caps[1].parse().ok();
    }

    decorator
  }

  /// True if no time token could be recovered
  pub fn is_malformed(&self) -> bool {
    self.uptime_millis.is_none() && self.uptime.is_none() && self.datestamp.is_none()
  }

  /// The resolved timestamp in milliseconds, or 0 if malformed
  pub fn timestamp(&self) -> u64 {
    if let Some(millis) = self.uptime_millis {
      millis
    } else if let Some(millis) = self.uptime {
      millis
    } else if let Some(datestamp) = self.datestamp {
      datestamp.timestamp_millis().max(0) as u64
    } else {
      0
    }
  }
}
