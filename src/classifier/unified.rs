// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Catalogue entries for unified logging (`-Xlog:gc*`), matched against
//! canonical lines produced by the preprocessor.

use crate::parser::EventKind;
use crate::patterns::*;
use super::types::CatalogueEntry;

/// Concurrent phases logged by G1, CMS, Shenandoah and Z
const CONCURRENT_PHASES: &str = concat!(
  r"Mark From Roots|Mark Cycle|Mark Abort|Mark Reset For Overflow|Mark",
  r"|Abortable Preclean|Preclean|Sweep|Reset|Cycle|Undo Cycle",
  r"|Clear Claimed Marks|Scan Root Regions|Rebuild Remembered Sets",
  r"|Cleanup for Next Mark|Create Live Data|Complete Cleanup|Uncommit",
  r"|Cleanup|Evacuation|Update Refs|Reset Relocation Set|Select Relocation Set",
  r"|Prepare Relocation Set|Relocate|Process Non-Strong References|Mark Continue"
);

const HEADER_COLLECTORS: &str = concat!(
  r"Serial|Parallel|Concurrent Mark Sweep|G1|Shenandoah",
  r"|The Z Garbage Collector"
);

/// Unified entries, most qualified first
pub fn catalogue() -> Vec<CatalogueEntry> {
  let d = format!("(?P<decorator>{})", UNIFIED_DECORATOR);
  let any = format!("(?P<trigger>{})", TRIGGER_ANY);
  let young = sizes("young");
  let old = sizes("old");
  let combined = sizes("combined");
  let meta = format!("(?: Metaspace: {})?", sizes("metaspace"));
  let dur = duration();
  let t = times();

  vec![
    CatalogueEntry::full(EventKind::UnifiedSerialNew, &format!(
      r"{d} Pause Young \({any}\) DefNew: {young} Tenured: {old}{meta} {combined} {dur}{t}",
      d = d, any = any, young = young, old = old, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedParNew, &format!(
      r"{d} Pause Young \({any}\) ParNew: {young} CMS: {old}{meta} {combined} {dur}{t}",
      d = d, any = any, young = young, old = old, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedParallelScavenge, &format!(
      concat!(
        r"{d} Pause Young \({any}\) PSYoungGen: {young} (?:PSOldGen|ParOldGen): {old}",
        r"{meta} {combined} {dur}{t}"
      ),
      d = d, any = any, young = young, old = old, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedSerialOld, &format!(
      concat!(
        r"{d} Pause Full \({any}\) (?:DefNew|PSYoungGen): {young}",
        r" (?:Tenured|PSOldGen): {old}{meta} {combined} {dur}{t}"
      ),
      d = d, any = any, young = young, old = old, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedParallelCompactingOld, &format!(
      r"{d} Pause Full \({any}\) PSYoungGen: {young} ParOldGen: {old}{meta} {combined} {dur}{t}",
      d = d, any = any, young = young, old = old, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedG1YoungPause, &format!(
      r"{d} Pause Young \((?:{kind})\) \({any}\){meta} {combined} {dur}{t}",
      d = d, kind = G1_YOUNG_TYPE, any = any, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedG1YoungPause, &format!(
      r"{d} Pause Young \((?P<trigger>{g1})\){meta} {combined} {dur}{t}",
      d = d, g1 = TRIGGER_G1_YOUNG, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedG1FullGc, &format!(
      r"{d} Pause Full \((?P<trigger>{g1})\){meta} {combined} {dur}{t}",
      d = d, g1 = TRIGGER_G1_FULL, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedYoung, &format!(
      r"{d} Pause Young \((?P<trigger>{young})\){meta} {combined} {dur}{t}",
      d = d, young = TRIGGER_YOUNG, meta = meta,
      combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedOld, &format!(
      r"{d} Pause Full \({any}\){meta} {combined} {dur}{t}",
      d = d, any = any, meta = meta, combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedCmsInitialMark, &format!(
      r"{d} Pause Initial Mark {combined} {dur}{t}",
      d = d, combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedRemark, &format!(
      r"{d} Pause Remark {combined} {dur}{t}",
      d = d, combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedG1Cleanup, &format!(
      r"{d} Pause Cleanup {combined} {dur}{t}",
      d = d, combined = combined, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedConcurrent, &format!(
      concat!(
        r"{d} Concurrent (?:{phases})",
        r"(?: \(\d{{1,10}}[.,]\d{{3}}s(?:, \d{{1,10}}[.,]\d{{3}}s)?\))?",
        r"(?: {dur})?{t}"
      ),
      d = d, phases = CONCURRENT_PHASES, dur = dur, t = t
    )),
    CatalogueEntry::full(EventKind::UnifiedSafepoint, &format!(
      concat!(
        r"{d} Entering safepoint region: (?P<safepoint_trigger>{trigger})",
        r"{deco} Leaving safepoint region",
        r"(?P<end_decorator>{deco}) Total time for which application threads were",
        r" stopped: (?P<stopped>{secs}) seconds, Stopping threads took:",
        r" (?P<stopping>{secs}) seconds"
      ),
      d = d, trigger = SAFEPOINT_TRIGGER, deco = UNIFIED_DECORATOR,
      secs = DURATION_SECS
    )),
    CatalogueEntry::full(EventKind::UnifiedHeader, &format!(
      r"{d} Using (?P<collector>{collectors})",
      d = d, collectors = HEADER_COLLECTORS
    ))
  ]
}
