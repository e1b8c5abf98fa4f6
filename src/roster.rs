// 🔍 Roster tools - duplicate names and the demo roster
// Duplicates are flagged by NAME only; ids stay distinct.

use crate::participant::Participant;
use std::collections::{HashMap, HashSet};

/// How many duplicate names the warning lists before eliding
pub const DUPLICATE_PREVIEW_LIMIT: usize = 5;

// ============================================================================
// DUPLICATE DETECTION
// ============================================================================

/// Names that occur more than once, each reported once.
///
/// A name is flagged when its second occurrence is seen, so the result is
/// ordered by the position of that second occurrence.
pub fn find_duplicate_names(participants: &[Participant]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for p in participants {
        let count = counts.entry(p.name.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(p.name.clone());
        }
    }

    duplicates
}

/// Keep the first participant for every name, preserving order and ids
pub fn remove_duplicate_names(participants: &[Participant]) -> Vec<Participant> {
    let mut seen: HashSet<&str> = HashSet::new();

    participants
        .iter()
        .filter(|p| seen.insert(p.name.as_str()))
        .cloned()
        .collect()
}

/// "A, B, C, D, E..." style preview for the duplicate warning
pub fn duplicate_summary(names: &[String]) -> String {
    let shown: Vec<&str> = names
        .iter()
        .take(DUPLICATE_PREVIEW_LIMIT)
        .map(String::as_str)
        .collect();

    let mut summary = shown.join(", ");
    if names.len() > DUPLICATE_PREVIEW_LIMIT {
        summary.push_str("...");
    }
    summary
}

// ============================================================================
// SAMPLE ROSTER
// ============================================================================

/// Demo list for trying the draw and grouping without typing names
pub fn sample_roster() -> &'static str {
    "王小明, 李小華, 陳大文, 林怡君, 張志偉, 劉淑芬, 楊家豪, 黃雅婷,
趙子龍, 孫悟空, 豬八戒, 沙悟淨,
賈寶玉, 林黛玉,
哈利波特, 妙麗, 榮恩,
魯夫, 索隆, 娜美,
鳴人, 佐助, 小櫻,
炭治郎, 禰豆子, 善逸, 伊之助,
五條悟, 虎杖悠仁, 伏黑惠"
}
