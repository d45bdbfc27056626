// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Catalogue entries for pre-unified (JDK 8 and earlier) logging

use crate::parser::EventKind;
use crate::patterns::*;
use super::types::CatalogueEntry;

const G1_CONCURRENT_PHASES: &str = concat!(
  r"root-region-scan-start|root-region-scan-end|mark-start|mark-end",
  r"|mark-abort|mark-reset-for-overflow|cleanup-start|cleanup-end",
  r"|string-deduplication"
);

pub fn catalogue() -> Vec<CatalogueEntry> {
  let d = format!("(?P<decorator>{})", LEGACY_DECORATOR);
  let trigger = format!(r"(?: \((?P<trigger>{})\))?", TRIGGER_ANY);
  let young = sizes("young");
  let old = sizes("old");
  let combined = sizes("combined");
  let metaspace = sizes("metaspace");
  let t = legacy_times();

  vec![
    CatalogueEntry::full(EventKind::SerialNew, &format!(
      concat!(
        r"{d}\[GC{trigger} (?:{deco})\[DefNew: {young}, {secs} secs\] {combined},",
        r" (?P<duration_secs>{secs}) secs\]{t}"
      ),
      d = d, trigger = trigger, deco = LEGACY_DECORATOR, young = young,
      combined = combined, secs = DURATION_SECS, t = t
    )),
    CatalogueEntry::full(EventKind::ParallelScavenge, &format!(
      concat!(
        r"{d}\[GC{trigger} \[PSYoungGen: {young}\] {combined},",
        r" (?P<duration_secs>{secs}) secs\]{t}"
      ),
      d = d, trigger = trigger, young = young, combined = combined,
      secs = DURATION_SECS, t = t
    )),
    CatalogueEntry::full(EventKind::ParallelCompactingOld, &format!(
      concat!(
        r"{d}\[Full GC{trigger} \[PSYoungGen: {young}\] \[ParOldGen: {old}\]",
        r" {combined}, \[Metaspace: {metaspace}\], (?P<duration_secs>{secs}) secs\]{t}"
      ),
      d = d, trigger = trigger, young = young, old = old, combined = combined,
      metaspace = metaspace, secs = DURATION_SECS, t = t
    )),
    CatalogueEntry::full(EventKind::ApplicationStoppedTime, &format!(
      concat!(
        r"{d}Total time for which application threads were stopped:",
        r" (?P<stopped>{secs}) seconds",
        r"(?:, Stopping threads took: (?P<stopping>{secs}) seconds)?"
      ),
      d = d, secs = DURATION_SECS
    )),

    // G1 concurrent lines are often glued to the remnants of a pause
    // written by another thread, only the prefix is reliable
    CatalogueEntry::loose(EventKind::G1Concurrent, &format!(
      concat!(
        r"{d}\[GC concurrent-(?:{phases})",
        r"(?:, (?P<duration_secs>{secs})(?: secs?)?\])?"
      ),
      d = d, phases = G1_CONCURRENT_PHASES, secs = DURATION_SECS
    ))
  ]
}
