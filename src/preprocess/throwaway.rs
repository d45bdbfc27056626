// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

//! Unified logging lines that carry nothing the catalogue reports on: phase
//! sub-timings, worker counts, region counts, ergonomics dumps, bare begin
//! lines whose figures are logged again on a later line, and shutdown
//! sentinels.

use regex::RegexSet;

use crate::patterns::*;

/// Adaptive size policy dumps from the parallel collector
const ERGONOMICS: &str = concat!(
  r"(?:Adjusting|Scaled) eden|avg_promoted|avg_survived|Base_footprint:",
  r"|    capacities|Desired survivor size|Do scavenge:|    eden:",
  r"|    \[ {0,2}(?:eden|from|to)_start|  Eden, (?:from|to), (?:to|from):",
  r"|    from:|Live_space:|  minor pause:|Minor_pause:|No full after scavenge",
  r"|Old eden_size:|old_gen_capacity:|PSYoungGen::resize_spaces|      to:",
  r"|Young generation size:"
);

pub fn is_throwaway(line: &str) -> bool {
  lazy_static! {
    static ref THROWAWAY: RegexSet = {
      let d = UNIFIED_DECORATOR;
      let patterns: Vec<String> = vec![
        format!(r"^{} Phase \d: .+$", d),
        format!(
          r"^{} Using \d{{1,3}} workers of \d{{1,3}} for (?:evacuation|full compaction|marking)$",
          d
        ),
        format!(
          concat!(
            r"^{}   (?:(?:Pre Evacuate|Evacuate|Post Evacuate) Collection Set",
            r"|Merge Heap Roots|Other): {}$"
          ),
          d, DURATION
        ),
        format!(
          r"^{} (?:Eden|Survivor|Old|Archive|Humongous) regions: \d{{1,6}}->\d{{1,6}}(?:\(\d{{1,6}}\))?$",
          d
        ),
        format!(r"^{} Pause (?:Remark|Cleanup|Initial Mark)\s*$", d),
        format!(
          concat!(
            r"^{} Cleaned string and symbol table, strings: \d{{1,7}} processed,",
            r" \d{{1,6}} removed, symbols: \d{{1,7}} processed, \d{{1,6}} removed$"
          ),
          d
        ),
        format!(r"^{} Mark (?:closed|open) archive regions in map:.+$", d),
        format!(r"^{} MMU target violated:.+$", d),
        format!(r"^{} Attempting maximally compacting collection$", d),
        format!(
          concat!(
            r"^{} (?:Adjust Roots|Compaction Phase|Marking Phase|Post Compact",
            r"|Summary Phase)(?: {})?$"
          ),
          d, DURATION
        ),
        format!(r"^{} Old: {}$", d, sizes_unnamed()),
        format!(r"^{} Concurrent (?:Mark|Preclean|Reset|Sweep)\s*$", d),
        format!(r"^{} Application time:.+$", d),
        format!(r"^{} To-space exhausted$", d),
        format!(r"^{} (?:PS)?AdaptiveSize.*$", d),
        format!(r"^{} (?:{}).*$", d, ERGONOMICS),
        format!(r"^{} Entering safepoint region: (?:Exit|Halt)\s*$", d),
      ];

      RegexSet::new(&patterns).unwrap()
    };
  }

  THROWAWAY.is_match(line)
}
