//! # Round Robin Group Stage
//!
//! Competitors are split into groups whose sizes differ by at most one. Every pair within a
//! group plays exactly once. Rings are assigned by a single counter rotating over all matches
//! of all groups.
use crate::utils::{group_label, NumExt};
use crate::{CompetitorId, Error, Match, Phase, Result, Slot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A round robin group.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub index: usize,
    pub competitors: Vec<CompetitorId>,
}

impl Group {
    /// Returns the label of the group (`A`, `B`, ...).
    #[inline]
    pub fn label(&self) -> String {
        group_label(self.index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    /// Returns the number of round robin matches in this group.
    #[inline]
    pub fn match_count(&self) -> usize {
        pair_count(self.len())
    }
}

/// Returns the number of unordered pairs among `n` competitors.
#[inline]
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Returns the sizes of the groups when splitting `competitors` into groups of (at most)
/// `group_size`. The first `competitors % num_groups` groups get one extra competitor.
///
/// # Examples
///
/// ```
/// # use ringplan_core::groups::partition_sizes;
/// assert_eq!(partition_sizes(13, 4), [4, 3, 3, 3]);
/// assert_eq!(partition_sizes(13, 5), [5, 4, 4]);
/// ```
pub fn partition_sizes(competitors: usize, group_size: usize) -> Vec<usize> {
    let num_groups = competitors.div_ceil_ext(group_size.max(1)).max(1);
    let base = competitors / num_groups;
    let extra = competitors % num_groups;

    (0..num_groups)
        .map(|index| if index < extra { base + 1 } else { base })
        .collect()
}

/// Returns the total number of matches when splitting `competitors` into groups of
/// `group_size`.
pub fn expected_matches(competitors: usize, group_size: usize) -> usize {
    partition_sizes(competitors, group_size)
        .into_iter()
        .map(pair_count)
        .sum()
}

/// The groups and matches of a group stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupStage {
    groups: Vec<Group>,
    matches: Vec<Match>,
    rings: u32,
}

impl GroupStage {
    /// Creates a new `GroupStage` splitting the competitors `1..=competitors` into groups of
    /// at most `group_size`.
    pub fn new(competitors: u32, rings: u32, group_size: u32) -> Self {
        log::debug!(
            "Creating new GroupStage with {} competitors and group size {}",
            competitors,
            group_size
        );

        let mut next = 1;
        let groups = partition_sizes(competitors as usize, group_size as usize)
            .into_iter()
            .map(|size| {
                let group: Vec<CompetitorId> = (next..next + size as CompetitorId).collect();
                next += size as CompetitorId;
                group
            })
            .collect();

        Self::from_groups(groups, rings)
    }

    /// Creates a new `GroupStage` from already assigned groups.
    pub fn from_groups(groups: Vec<Vec<CompetitorId>>, rings: u32) -> Self {
        let groups: Vec<Group> = groups
            .into_iter()
            .enumerate()
            .map(|(index, competitors)| Group { index, competitors })
            .collect();

        let matches = Self::generate_matches(&groups, rings);

        log::debug!(
            "Created new GroupStage with {} groups and {} matches",
            groups.len(),
            matches.len()
        );

        Self {
            groups,
            matches,
            rings,
        }
    }

    fn generate_matches(groups: &[Group], rings: u32) -> Vec<Match> {
        let rings = rings.max(1);
        let mut matches = Vec::with_capacity(groups.iter().map(Group::match_count).sum());

        let mut rotation = 0;
        for group in groups {
            let round_name = format!("Group {}", group.label());

            for (index, a) in group.competitors.iter().enumerate() {
                for b in &group.competitors[index + 1..] {
                    matches.push(Match::new(
                        format!("G_{}", matches.len() + 1),
                        Phase::Group(group.index),
                        &round_name,
                        rotation % rings + 1,
                        [Slot::Competitor(*a), Slot::Competitor(*b)],
                    ));

                    rotation += 1;
                }
            }
        }

        matches
    }

    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[inline]
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    #[inline]
    pub fn rings(&self) -> u32 {
        self.rings
    }

    #[inline]
    pub fn into_parts(self) -> (Vec<Group>, Vec<Match>) {
        (self.groups, self.matches)
    }

    /// Returns the number of matches.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Moves `competitor` into the group at index `target` and regenerates all matches.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `target` is out of bounds or `competitor` is not part of any
    /// group.
    pub fn move_competitor(&mut self, competitor: CompetitorId, target: usize) -> Result<()> {
        if target >= self.groups.len() {
            return Err(Error::InvalidGroup {
                group: target,
                length: self.groups.len(),
            });
        }

        let (source, position) = self
            .groups
            .iter()
            .enumerate()
            .find_map(|(index, group)| {
                group
                    .competitors
                    .iter()
                    .position(|id| *id == competitor)
                    .map(|position| (index, position))
            })
            .ok_or(Error::UnknownCompetitor(competitor))?;

        if source == target {
            return Ok(());
        }

        log::debug!(
            "Moving competitor {} from group {} to group {}",
            competitor,
            self.groups[source].label(),
            self.groups[target].label()
        );

        self.groups[source].competitors.remove(position);
        self.groups[target].competitors.push(competitor);
        self.matches = Self::generate_matches(&self.groups, self.rings);

        Ok(())
    }
}
