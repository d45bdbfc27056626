// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

pub mod decorator;
mod extract;
mod trigger;
mod types;
pub mod util;

use crate::classifier;
pub use decorator::Decorator;
pub use extract::{extract, ExtractError};
pub use trigger::{SafepointTrigger, Trigger};
pub use types::*;

/// Classifies and extracts a single canonical line.
///
/// Returns Ok(None) if no catalogue entry matches, or Err if the line
/// matched but a field could not be extracted.
pub fn parse_event(line: &str, hint: Collector) -> Result<Option<Event>, ExtractError> {
  let classification = classifier::classify_with(line, hint);

  match classification.captures {
    Some(captures) => extract(classification.kind, &captures).map(Some),
    None => Ok(None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  fn parse(line: &str) -> Event {
    parse_event(line, Collector::Unknown).unwrap().unwrap()
  }

  #[test]
  fn test_unified_young_standalone() {
    let event = parse(
      "[0.053s][info][gc] GC(0) Pause Young (Allocation Failure) 0M->0M(1M) 0.914ms"
    );

    assert_that!(event.kind).is_equal_to(EventKind::UnifiedYoung);
    assert_that!(event.timestamp).is_equal_to(52);
    assert_that!(event.duration).is_equal_to(914);
    assert_that!(event.trigger).is_equal_to(Some(Trigger::AllocationFailure));
    assert_that!(event.gc_id).is_equal_to(Some(0));

    let combined = event.combined.unwrap();
    assert_that!(combined.before.to_kilobytes()).is_equal_to(0);
    assert_that!(combined.after.to_kilobytes()).is_equal_to(0);
    assert_that!(combined.capacity.to_kilobytes()).is_equal_to(1024);
    assert_that!(event.young).is_none();
  }

  #[test]
  fn test_unified_serial_new() {
    let event = parse(concat!(
      "[0.112s][info][gc,start ] GC(3) Pause Young (Allocation Failure) ",
      "DefNew: 1016K->128K(1152K) Tenured: 929K->1044K(1552K) ",
      "Metaspace: 1222K->1222K(1056768K) 1M->1M(2M) 0.700ms ",
      "User=0.00s Sys=0.00s Real=0.00s"
    ));

    assert_that!(event.kind).is_equal_to(EventKind::UnifiedSerialNew);
    assert_that!(event.collector).is_equal_to(Collector::Serial);
    assert_that!(event.timestamp).is_equal_to(111);
    assert_that!(event.duration).is_equal_to(700);
    assert_that!(event.young.unwrap().before.to_kilobytes()).is_equal_to(1016);
    assert_that!(event.old.unwrap().after.to_kilobytes()).is_equal_to(1044);
    assert_that!(event.metaspace.unwrap().capacity.to_kilobytes()).is_equal_to(1_056_768);
    assert_that!(event.times).is_equal_to(Some(Times { user: 0, sys: 0, real: 0 }));
    assert_that!(event.diagnostics.is_empty()).is_true();
  }

  #[test]
  fn test_unified_g1_full() {
    let event = parse(concat!(
      "[2021-03-13T03:37:40.051+0530][79853119ms] GC(8646) Pause Full ",
      "(G1 Evacuation Pause) Metaspace: 214120K->214120K(1257472K) ",
      "8186M->8178M(8192M) 2127.343ms User=16.40s Sys=0.09s Real=2.13s"
    ));

    assert_that!(event.kind).is_equal_to(EventKind::UnifiedG1FullGc);
    assert_that!(event.timestamp).is_equal_to(79_853_119 - 2127);
    assert_that!(event.duration).is_equal_to(2_127_343);
    assert_that!(event.datestamp).is_some();
    assert_that!(event.combined.unwrap().before.to_kilobytes()).is_equal_to(8186 * 1024);
    assert_that!(event.times.unwrap().user).is_equal_to(1640);
  }

  #[test]
  fn test_unified_safepoint() {
    let event = parse(concat!(
      "[2021-09-14T11:40:53.379-0500][144.035s][info][safepoint    ] Entering safepoint ",
      "region: CollectForMetadataAllocation",
      "[2021-09-14T11:40:53.379-0500][144.036s][info][safepoint    ] Leaving safepoint region",
      "[2021-09-14T11:40:53.379-0500][144.036s][info][safepoint    ] Total time for which ",
      "application threads were stopped: 0.0004546 seconds, Stopping threads took: ",
      "0.0002048 seconds"
    ));

    assert_that!(event.kind).is_equal_to(EventKind::UnifiedSafepoint);
    assert_that!(event.safepoint_trigger)
      .is_equal_to(Some(SafepointTrigger::CollectForMetadataAllocation));
    assert_that!(event.duration).is_equal_to(455);
    assert_that!(event.time_to_stop).is_equal_to(Some(205));
    assert_that!(event.timestamp).is_equal_to(144_036);
    assert_that!(event.end_timestamp()).is_equal_to(144_036);
  }

  #[test]
  fn test_unified_header() {
    let event = parse("[0.003s][info][gc] Using G1");

    assert_that!(event.kind).is_equal_to(EventKind::UnifiedHeader);
    assert_that!(event.collector).is_equal_to(Collector::G1);
    assert_that!(event.timestamp).is_equal_to(3);
  }

  #[test]
  fn test_legacy_parallel_scavenge() {
    let event = parse(concat!(
      "2016-02-09T06:22:10.399-0500: 10.102: [GC (Allocation Failure) ",
      "[PSYoungGen: 512K->464K(1024K)] 512K->472K(1536K), 0.0010810 secs] ",
      "[Times: user=0.00 sys=0.00, real=0.00 secs]"
    ));

    assert_that!(event.kind).is_equal_to(EventKind::ParallelScavenge);
    assert_that!(event.duration).is_equal_to(1081);
    assert_that!(event.timestamp).is_equal_to(10_101);
    assert_that!(event.young.unwrap().capacity.to_kilobytes()).is_equal_to(1024);
  }

  #[test]
  fn test_legacy_g1_concurrent_timestamps() {
    let cases = vec![
      ("50.136: [GC concurrent-root-region-scan-end, 0.0346620 secs]", 50_136),
      ("2016-02-09T06:22:10.399-0500: 28039.161: [GC concurrent-root-region-scan-start]", 28_039_161),
      (concat!(
        "27744.494: [GC concurrent-mark-start], 0.3349320 secs] 10854M->9765M(26624M) ",
        "[Times: user=0.98 sys=0.00, real=0.33 secs]"
      ), 27_744_494),
      ("8.556: [GC concurrent-string-deduplication, 906.5K->410.2K(496.3K), avg 54.8%, 0.0162924 secs]", 8556),
      ("23743.632: 23743.632: [GC concurrent-root-region-scan-start]", 23_743_632),
      ("449391.280: [GC concurrent-root-region-scan-end, 0.0033660]", 449_391_280),
      ("449391.442: [GC concurrent-mark-end, 0.1620950 sec]", 449_391_442),
      ("1048.227: [GC concurrent-mark-reset-for-overflow]", 1_048_227),
      (concat!(
        "2017-01-20T23:18:29.584-0500: 1513296.456: 2017-01-20T23:18:29.584-0500: ",
        "[GC concurrent-root-region-scan-start]"
      ), 1_513_296_456),
      (concat!(
        "2017-01-20T23:20:52.028-0500: 1513438.9002017-01-20T23:20:52.028-0500: : ",
        "[GC concurrent-mark-start]"
      ), 1_513_438_900),
      (concat!(
        "2017-01-20T23:49:17.968-0500: 2017-01-20T23:49:17.968-05001515144.840: : ",
        "[GC concurrent-mark-start]"
      ), 1_515_144_840),
      (concat!(
        "2017-01-21T00:58:45.921-05002017-01-21T00:58:45.921-0500: : 1519312.793: ",
        "[GC concurrent-mark-start]"
      ), 1_519_312_793),
      ("1516186.5322017-01-21T00:06:39.660-0500: : 1516186.532: [GC concurrent-mark-start]", 1_516_186_532),
      (": 2017-01-21T09:59:17.908-0500: 1551744.7801551744.780: : [GC concurrent-mark-start]", 1_551_744_780),
    ];

    for (line, expected) in cases {
      let event = parse(line);
      assert_that!(event.kind).named(line).is_equal_to(EventKind::G1Concurrent);
      assert_that!(event.timestamp).named(line).is_equal_to(expected);
      assert_that!(event.diagnostics.is_empty()).named(line).is_true();
    }
  }

  #[test]
  fn test_legacy_g1_concurrent_durations() {
    let event = parse("50.136: [GC concurrent-root-region-scan-end, 0.0346620 secs]");

    assert_that!(event.duration).is_equal_to(34_662);
    assert_that!(event.kind.is_blocking()).is_false();
  }

  #[test]
  fn test_legacy_g1_concurrent_no_timestamp() {
    let event = parse(": [GC concurrent-root-region-scan-start]");

    assert_that!(event.timestamp).is_equal_to(0);
    assert_that!(event.diagnostics).is_equal_to(vec![DiagnosticKind::MalformedTimestamp]);
  }

  #[test]
  fn test_unknown_is_not_an_error() {
    assert_that!(parse_event("not a gc log line", Collector::Unknown)).is_ok_containing(None);
  }
}
