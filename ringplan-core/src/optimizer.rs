//! # Group Size Search
//!
//! Picks the group size for a group stage by scoring every candidate size between a lower and
//! an upper bound. Candidates whose matches do not fit into the [`Capacity`] are discarded.
//! The remaining candidates are scored by:
//!
//! ```text
//! |capacity - matches| + 1.5 * (competitors % groups) + 2 * |matches_per_ring - round(matches_per_ring)|
//! ```
//!
//! The lowest score wins. Changing the weights changes which group size is chosen.
use crate::groups::{expected_matches, partition_sizes, GroupStage};
use crate::utils::NumExt;
use crate::Capacity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weight of the number of groups that receive an extra competitor.
pub const BALANCE_WEIGHT: f64 = 1.5;

/// Weight of the uneven distribution of matches across rings.
pub const RING_BALANCE_WEIGHT: f64 = 2.0;

/// A scored group size.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Candidate {
    pub group_size: u32,
    pub num_groups: u32,
    pub matches: u32,
    pub score: f64,
}

/// Returns all group sizes in `min_size..=max_size` that fit into `capacity`, in ascending
/// order of the group size.
pub fn candidates(
    competitors: u32,
    rings: u32,
    capacity: &Capacity,
    min_size: u32,
    max_size: u32,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for group_size in min_size..=max_size {
        let matches = expected_matches(competitors as usize, group_size as usize);

        if matches == 0 || capacity.is_exceeded_by(matches) {
            log::debug!(
                "Discarding group size {} with {} matches (capacity {})",
                group_size,
                matches,
                capacity.capacity_matches
            );
            continue;
        }

        let num_groups = partition_sizes(competitors as usize, group_size as usize).len();
        let extra = competitors as usize % num_groups;

        let matches_per_ring = matches as f64 / f64::from(rings.max(1));
        let ring_balance = (matches_per_ring - matches_per_ring.round()).abs();

        let utilization = (f64::from(capacity.capacity_matches) - matches as f64).abs();

        let score =
            utilization + BALANCE_WEIGHT * extra as f64 + RING_BALANCE_WEIGHT * ring_balance;

        candidates.push(Candidate {
            group_size,
            num_groups: num_groups as u32,
            matches: matches as u32,
            score,
        });
    }

    candidates
}

/// Returns the best group size in `min_size..=max_size` or `None` if no group size fits
/// into `capacity`. The smaller group size wins if two sizes have the same score.
pub fn best_group_size(
    competitors: u32,
    rings: u32,
    capacity: &Capacity,
    min_size: u32,
    max_size: u32,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for candidate in candidates(competitors, rings, capacity, min_size, max_size) {
        if best.map_or(true, |best| candidate.score < best.score) {
            best = Some(candidate);
        }
    }

    match &best {
        Some(best) => log::debug!(
            "Selected group size {} ({} groups, {} matches, score {})",
            best.group_size,
            best.num_groups,
            best.matches,
            best.score
        ),
        None => log::warn!(
            "No group size between {} and {} fits into {} matches",
            min_size,
            max_size,
            capacity.capacity_matches
        ),
    }

    best
}

/// Returns the largest power of two group count that keeps at least `min_size` competitors in
/// every group. Returns at least 1.
///
/// # Examples
///
/// ```
/// # use ringplan_core::optimizer::target_group_count;
/// assert_eq!(target_group_count(13, 4), 2);
/// assert_eq!(target_group_count(32, 4), 8);
/// assert_eq!(target_group_count(7, 4), 1);
/// ```
pub fn target_group_count(competitors: u32, min_size: u32) -> usize {
    ((competitors / min_size.max(1)) as usize).prev_power_of_two()
}

/// Redistributes the competitors of `stage` into [`target_group_count`] groups if the stage
/// has a different number of groups. Competitors are sorted ascending and every group takes
/// `ceil(remaining / groups_left)` of them, then all matches are regenerated.
pub fn coerce_group_count(stage: GroupStage, competitors: u32, min_size: u32) -> GroupStage {
    let target = target_group_count(competitors, min_size);

    if stage.groups().len() == target {
        return stage;
    }

    log::debug!(
        "Coercing {} groups into {} groups",
        stage.groups().len(),
        target
    );

    let rings = stage.rings();
    let (groups, _) = stage.into_parts();

    let mut pool: Vec<_> = groups
        .into_iter()
        .flat_map(|group| group.competitors)
        .collect();
    if pool.is_empty() {
        pool.extend(1..=competitors);
    }
    pool.sort_unstable();

    let mut groups = Vec::with_capacity(target);
    let mut rest = pool.as_slice();
    for index in 0..target {
        let size = rest.len().div_ceil_ext(target - index);
        let (group, tail) = rest.split_at(size);
        groups.push(group.to_vec());
        rest = tail;
    }

    GroupStage::from_groups(groups, rings)
}

#[cfg(test)]
mod tests {
    use super::{best_group_size, candidates, coerce_group_count, target_group_count};
    use crate::groups::GroupStage;
    use crate::{Capacity, TimeOfDay};

    fn capacity(rings: u32, minutes: u32, match_minutes: u32) -> Capacity {
        let start = TimeOfDay::new(9, 0).unwrap();
        let end = TimeOfDay::new(9 + minutes / 60, minutes % 60).unwrap();
        Capacity::compute(rings, start, end, match_minutes)
    }

    #[test]
    fn test_candidates() {
        // 13 competitors, 2 rings, 120 minutes at 5 minutes per match: 48 matches.
        let cap = capacity(2, 120, 5);
        assert_eq!(cap.capacity_matches, 48);

        let candidates = candidates(13, 2, &cap, 4, 6);
        let sizes: Vec<_> = candidates
            .iter()
            .map(|c| (c.group_size, c.num_groups, c.matches))
            .collect();
        assert_eq!(sizes, [(4, 4, 15), (5, 3, 22), (6, 3, 22)]);

        assert_eq!(candidates[0].score, 33.0 + 1.5 + 1.0);
        assert_eq!(candidates[1].score, 26.0 + 1.5);
        assert_eq!(candidates[2].score, 26.0 + 1.5);
    }

    #[test]
    fn test_best_group_size() {
        let cap = capacity(2, 120, 5);
        let best = best_group_size(13, 2, &cap, 4, 6).unwrap();
        assert_eq!(best.group_size, 5);
        assert_eq!(best.num_groups, 3);

        // Only groups of 4 fit into 20 matches.
        let cap = capacity(2, 50, 5);
        assert_eq!(cap.capacity_matches, 20);
        let best = best_group_size(13, 2, &cap, 4, 6).unwrap();
        assert_eq!(best.group_size, 4);
        assert_eq!(best.matches, 15);

        // Nothing fits.
        let cap = capacity(1, 30, 5);
        assert_eq!(best_group_size(13, 1, &cap, 4, 6), None);
    }

    #[test]
    fn test_best_group_size_discards_empty() {
        // A single competitor never plays a match.
        let cap = capacity(2, 120, 5);
        assert_eq!(best_group_size(1, 2, &cap, 4, 6), None);
    }

    #[test]
    fn test_target_group_count() {
        assert_eq!(target_group_count(3, 4), 1);
        assert_eq!(target_group_count(8, 4), 2);
        assert_eq!(target_group_count(13, 4), 2);
        assert_eq!(target_group_count(24, 4), 4);
        assert_eq!(target_group_count(32, 4), 8);
        assert_eq!(target_group_count(33, 4), 8);
        assert_eq!(target_group_count(13, 6), 2);
    }

    #[test]
    fn test_coerce_group_count() {
        let stage = GroupStage::new(13, 2, 5);
        assert_eq!(stage.groups().len(), 3);

        let stage = coerce_group_count(stage, 13, 4);
        let groups: Vec<_> = stage.groups().iter().map(|g| g.competitors.clone()).collect();
        assert_eq!(
            groups,
            [
                vec![1, 2, 3, 4, 5, 6, 7],
                vec![8, 9, 10, 11, 12, 13]
            ]
        );
        assert_eq!(stage.len(), 21 + 15);
    }

    #[test]
    fn test_coerce_group_count_unchanged() {
        let stage = GroupStage::new(32, 4, 4);
        let coerced = coerce_group_count(stage.clone(), 32, 4);
        assert_eq!(stage, coerced);
    }
}
