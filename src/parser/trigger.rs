// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use std::fmt;

use regex::RegexSet;
use serde::{Serialize, Deserialize};

/// The logged cause of a collection
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
  AllocationFailure,
  Ergonomics,
  SystemGc,
  MetadataGcThreshold,
  G1EvacuationPause,
  G1CompactionPause,
  G1HumongousAllocation,
  G1PreventiveCollection,
  GcLockerInitiatedGc,
  HeapDumpInitiatedGc,
  HeapInspectionInitiatedGc,
  ToSpaceExhausted,
  CmsInitialMark,
  CmsFinalRemark,
  DiagnosticCommand,
  LastDitchCollection,
  Unknown
}

impl fmt::Display for Trigger {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl Trigger {
  /// Maps logged trigger text to a known cause. Unrecognized text is not an
  /// error, it maps to `Trigger::Unknown`.
  pub fn parse(text: &str) -> Trigger {
    lazy_static! {
      // most specific first, the lowest matching index wins
      static ref TRIGGERS: RegexSet = RegexSet::new(&[
        r"^G1 Humongous Allocation$",
        r"^G1 Evacuation Pause$",
        r"^G1 Compaction Pause$",
        r"^G1 Preventive Collection$",
        r"^GCLocker Initiated GC$",
        r"^Heap Dump Initiated GC$",
        r"^Heap Inspection Initiated GC$",
        r"^Metadata GC Threshold$",
        r"^Last ditch collection$",
        r"^CMS Initial Mark$",
        r"^CMS Final Remark$",
        r"^To-space exhausted$",
        r"^Diagnostic Command$",
        r"^System\.gc\(\)$",
        r"^Allocation Failure$",
        r"^Ergonomics$",
      ]).unwrap();
    }

    for index in TRIGGERS.matches(text.trim()).iter() {
      return match index {
        0 => Trigger::G1HumongousAllocation,
        1 => Trigger::G1EvacuationPause,
        2 => Trigger::G1CompactionPause,
        3 => Trigger::G1PreventiveCollection,
        4 => Trigger::GcLockerInitiatedGc,
        5 => Trigger::HeapDumpInitiatedGc,
        6 => Trigger::HeapInspectionInitiatedGc,
        7 => Trigger::MetadataGcThreshold,
        8 => Trigger::LastDitchCollection,
        9 => Trigger::CmsInitialMark,
        10 => Trigger::CmsFinalRemark,
        11 => Trigger::ToSpaceExhausted,
        12 => Trigger::DiagnosticCommand,
        13 => Trigger::SystemGc,
        14 => Trigger::AllocationFailure,
        15 => Trigger::Ergonomics,
        _ => continue
      };
    }

    Trigger::Unknown
  }
}

/// The VM operation that requested a safepoint
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafepointTrigger {
  G1CollectForAllocation,
  G1CollectFull,
  G1Concurrent,
  G1PauseCleanup,
  G1PauseRemark,
  G1TryInitiateConcMark,
  #[serde(rename = "CGC_Operation")]
  CgcOperation,
  CollectForMetadataAllocation,
  GenCollectForAllocation,
  GenCollectFull,
  ParallelGCFailedAllocation,
  ParallelGCSystemGC,
  #[serde(rename = "GC_HeapInspection")]
  GcHeapInspection,
  HeapDumper,
  RevokeBias,
  BulkRevokeBias,
  Deoptimize,
  Cleanup,
  ForceSafepoint,
  HandshakeAllThreads,
  ICBufferFull,
  RedefineClasses,
  ThreadDump,
  FindDeadlocks,
  Unknown
}

impl fmt::Display for SafepointTrigger {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

impl SafepointTrigger {
  pub fn parse(text: &str) -> SafepointTrigger {
    match text.trim() {
      "G1CollectForAllocation" => SafepointTrigger::G1CollectForAllocation,
      "G1CollectFull" => SafepointTrigger::G1CollectFull,
      "G1Concurrent" => SafepointTrigger::G1Concurrent,
      "G1PauseCleanup" => SafepointTrigger::G1PauseCleanup,
      "G1PauseRemark" => SafepointTrigger::G1PauseRemark,
      "G1TryInitiateConcMark" => SafepointTrigger::G1TryInitiateConcMark,
      "CGC_Operation" => SafepointTrigger::CgcOperation,
      "CollectForMetadataAllocation" => SafepointTrigger::CollectForMetadataAllocation,
      "GenCollectForAllocation" => SafepointTrigger::GenCollectForAllocation,
      "GenCollectFull" => SafepointTrigger::GenCollectFull,
      "ParallelGCFailedAllocation" => SafepointTrigger::ParallelGCFailedAllocation,
      "ParallelGCSystemGC" => SafepointTrigger::ParallelGCSystemGC,
      "GC_HeapInspection" => SafepointTrigger::GcHeapInspection,
      "HeapDumper" => SafepointTrigger::HeapDumper,
      "RevokeBias" => SafepointTrigger::RevokeBias,
      "BulkRevokeBias" => SafepointTrigger::BulkRevokeBias,
      "Deoptimize" => SafepointTrigger::Deoptimize,
      "Cleanup" => SafepointTrigger::Cleanup,
      "ForceSafepoint" => SafepointTrigger::ForceSafepoint,
      "HandshakeAllThreads" => SafepointTrigger::HandshakeAllThreads,
      "ICBufferFull" => SafepointTrigger::ICBufferFull,
      "RedefineClasses" => SafepointTrigger::RedefineClasses,
      "ThreadDump" => SafepointTrigger::ThreadDump,
      "FindDeadlocks" => SafepointTrigger::FindDeadlocks,
      _ => SafepointTrigger::Unknown
    }
  }
}
