//! Flattens the two-level branch records of a harness report into one
//! `Branch` per (site, arm) pair.
//!
//! Malformed entries are skipped with a warning rather than failing the
//! whole analysis: a bad branch record from an instrumenter should degrade
//! to "no finding for that branch", never to "no diagnostics at all".

use tracing::warn;

use crate::model::{Branch, CoverageResult, RawBranchArm, RawBranchSite, Range};

impl Branch {
    /// Build one `Branch` per (site, arm) pair from a coverage snapshot.
    ///
    /// Output order follows the stored order of sites and arms, so two
    /// calls on the same input produce the same sequence.
    #[must_use]
    pub fn build_from(result: &CoverageResult) -> Vec<Branch> {
        let mut branches = Vec::new();

        for (site_idx, site) in result.branches.iter().enumerate() {
            if site.arms.is_empty() {
                warn!(site = site_idx, "branch site has no outcome arms, skipping");
                continue;
            }
            for (arm_idx, arm) in site.arms.iter().enumerate() {
                match build_branch(site, arm) {
                    Some(branch) => branches.push(branch),
                    None => {
                        warn!(
                            site = site_idx,
                            arm = arm_idx,
                            "malformed branch arm, skipping"
                        );
                    }
                }
            }
        }

        branches
    }
}

fn build_branch(site: &RawBranchSite, arm: &RawBranchArm) -> Option<Branch> {
    let hit_count = match arm.hits {
        Some(n) if n >= 0 => n as u64,
        _ => return None,
    };

    // An arm without its own range falls back to the whole construct's.
    let range = arm
        .range
        .and_then(range_from_raw)
        .or_else(|| site.range.and_then(range_from_raw))?;

    Some(Branch {
        kind: site.kind.clone().unwrap_or_else(|| "branch".to_string()),
        outcome: arm.kind.clone().unwrap_or_default(),
        range,
        hit_count,
    })
}

fn range_from_raw(raw: [i64; 4]) -> Option<Range> {
    let [sl, sc, el, ec] = raw;
    let to_u32 = |n: i64| u32::try_from(n).ok();
    Some(Range::new(to_u32(sl)?, to_u32(sc)?, to_u32(el)?, to_u32(ec)?))
}
