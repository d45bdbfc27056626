// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Regex fragments shared by the preprocessor and the event catalogue.
//!
//! None of these fragments contain named capture groups, so they can be
//! repeated freely inside a single pattern. Callers wrap them in named groups
//! where a value needs to be pulled out.

/// Unified logging decorator: one or more bracketed time fields, optional
/// pid/tid, level and tags, then an optional ` GC(n)` id.
///
/// Time fields are a datestamp (`2019-05-09T01:39:00.763+0000`), uptime in
/// seconds (`0.053s`) or uptime in milliseconds (`5355ms`).
pub const UNIFIED_DECORATOR: &str = concat!(
  r"(?:\[(?:",
  r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]\d{3}[+-]\d{4}",
  r"|\d{1,10}[.,]\d{3}s",
  r"|\d{1,13}ms",
  r")\])+",
  r"(?:\[\d{1,10}\]){0,2}",
  r"(?:\[(?:trace|debug|info|warning|error)\s*\])?",
  r"(?:\[[a-z0-9,]+\s*\])?",
  r"(?: GC\(\d{1,10}\))?"
);

/// Legacy decorator: any run of datestamps, uptimes, colons and spaces.
///
/// This is deliberately permissive to tolerate the duplicated and glued
/// timestamps some JDK 8 builds write, e.g.
/// `2017-01-20T23:20:52.028-0500: 1513438.9002017-01-20T23:20:52.028-0500: : `
pub const LEGACY_DECORATOR: &str = concat!(
  r"(?:",
  r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[.,]\d{3}[+-]\d{4}",
  r"|\d{1,10}[.,]\d{3}",
  r"|[:\s]",
  r")*"
);

/// A memory size with unit, e.g. `1016K`, `8186M`, `906.5K`
pub const SIZE: &str = r"\d{1,12}(?:[.,]\d)?[BKMG]";

/// Unified logging duration in milliseconds, e.g. `0.700ms`
pub const DURATION: &str = r"\d{1,7}[.,]\d{1,3}ms";

/// Legacy duration in seconds, e.g. `0.0346620`
pub const DURATION_SECS: &str = r"\d{1,7}[.,]\d{7}";

/// Unified logging times block, e.g. ` User=0.01s Sys=0.00s Real=0.01s`
pub const TIMES: &str = r" User=\d{1,5}[.,]\d{2}s Sys=\d{1,5}[.,]\d{2}s Real=\d{1,5}[.,]\d{2}s";

/// Any trigger text. Specific trigger vocabularies are applied after capture.
pub const TRIGGER_ANY: &str = r"System\.gc\(\)|[A-Za-z0-9 .\-]+";

/// Young pause triggers logged by the serial, parallel and CMS collectors
pub const TRIGGER_YOUNG: &str =
  r"Allocation Failure|GCLocker Initiated GC|Metadata GC Threshold|System\.gc\(\)";

/// Young pause triggers that only G1 logs without a pause type
pub const TRIGGER_G1_YOUNG: &str =
  r"G1 Evacuation Pause|G1 Humongous Allocation|G1 Preventive Collection";

/// Young pause triggers accepted for G1 young summaries
pub const TRIGGER_G1_YOUNG_DATA: &str = concat!(
  r"G1 Evacuation Pause|G1 Humongous Allocation|G1 Preventive Collection",
  r"|GCLocker Initiated GC|Metadata GC Threshold|System\.gc\(\)"
);

/// Full collection triggers that only G1 logs
pub const TRIGGER_G1_FULL: &str = concat!(
  r"G1 Evacuation Pause|G1 Compaction Pause|G1 Humongous Allocation",
  r"|GCLocker Initiated GC"
);

/// G1 young pause types
pub const G1_YOUNG_TYPE: &str = r"Normal|Prepare Mixed|Mixed|Concurrent Start";

/// Safepoint VM operations that bracket GC work or other runtime operations.
///
/// `Exit` and `Halt` are intentionally absent, they are sentinels logged at
/// shutdown and are thrown away by the preprocessor.
pub const SAFEPOINT_TRIGGER: &str = concat!(
  r"BulkRevokeBias|CGC_Operation|ChangeBreakpoints|ClassLoaderStatsOperation",
  r"|CleanClassLoaderDataMetaspaces|Cleanup|CollectForMetadataAllocation",
  r"|Deoptimize|DumpHashtable|FindDeadlocks|ForceSafepoint",
  r"|G1CollectForAllocation|G1CollectFull|G1Concurrent|G1PauseCleanup",
  r"|G1PauseRemark|G1TryInitiateConcMark|GC_HeapInspection",
  r"|GenCollectForAllocation|GenCollectFull|GetAllStackTraces",
  r"|GetThreadListStackTraces|HandshakeAllThreads|HandshakeFallback",
  r"|HeapDumper|ICBufferFull|JFRCheckpoint|ParallelGCFailedAllocation",
  r"|ParallelGCSystemGC|PrintJNI|PrintThreads|RedefineClasses|RevokeBias",
  r"|ShenandoahDegeneratedGC|ShenandoahFinalMarkStartEvac",
  r"|ShenandoahFinalUpdateRefs|ShenandoahInitMark|ShenandoahInitUpdateRefs",
  r"|ThreadDump|ZMarkEnd|ZMarkStart|ZRelocateStart|ZVerify"
);

/// Named memory triple, e.g. `(?P<young_before>..)->(?P<young_after>..)(..)`
pub fn sizes(generation: &str) -> String {
  format!(
    r"(?P<{g}_before>{s})->(?P<{g}_after>{s})\((?P<{g}_capacity>{s})\)",
    g = generation,
    s = SIZE
  )
}

/// Unnamed memory triple, e.g. `1016K->128K(1152K)`
pub fn sizes_unnamed() -> String {
  format!(r"{s}->{s}\({s}\)", s = SIZE)
}

/// Named unified duration: `(?P<duration>0.700)ms`
pub fn duration() -> String {
  r"(?P<duration>\d{1,7}[.,]\d{1,3})ms".to_string()
}

/// Optional named unified times block
pub fn times() -> String {
  concat!(
    r"(?: User=(?P<user>\d{1,5}[.,]\d{2})s",
    r" Sys=(?P<sys>\d{1,5}[.,]\d{2})s",
    r" Real=(?P<real>\d{1,5}[.,]\d{2})s)?"
  ).to_string()
}

/// Optional named legacy times block,
/// e.g. ` [Times: user=0.00 sys=0.00, real=0.01 secs]`
pub fn legacy_times() -> String {
  concat!(
    r"(?: \[Times: user=(?P<user>\d{1,5}[.,]\d{2})",
    r" sys=(?P<sys>\d{1,5}[.,]\d{2}),",
    r" real=(?P<real>\d{1,5}[.,]\d{2}) secs\])?"
  ).to_string()
}
