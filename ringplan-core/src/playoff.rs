//! # Provisional Group Play-off
//!
//! A single elimination bracket seeded from group placements before the group stage has been
//! played. For `G` groups the seed order is `1st A, 2nd B, 1st B, 2nd C, ..., 1st X, 2nd A`,
//! so the winner of a group never meets the runner-up of the same group in the first round.
//! The seeds are padded with empty slots to the next power of two. A seed paired with an empty
//! slot advances without a match.
//!
//! The slots of the play-off refer to placements, not competitors, so the scheduler places no
//! competitor constraints on them.
use crate::bracket::{BracketRound, RoundLabel};
use crate::{Group, Match, Phase, Place, Slot};

/// A provisional play-off bracket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Playoff {
    rounds: Vec<BracketRound>,
}

impl Playoff {
    /// Creates a new `Playoff` for `groups`. With fewer than two groups the play-off is empty.
    pub fn new(groups: &[Group], rings: u32) -> Self {
        if groups.len() < 2 {
            log::debug!(
                "Skipping Playoff with {} groups: at least 2 groups are required",
                groups.len()
            );
            return Self::default();
        }

        let rings = rings.max(1);

        let seeds = Self::seeds(groups.len());
        let size = seeds.len().next_power_of_two();

        log::debug!(
            "Creating new Playoff with {} groups ({} seeds, {} byes)",
            groups.len(),
            seeds.len(),
            size - seeds.len()
        );

        let mut current: Vec<Option<Slot>> = seeds.into_iter().map(Some).collect();
        current.resize(size, None);

        let mut rounds = Vec::new();
        let mut next_id = 1;
        let mut rotation = 0;
        let mut depth = 1;

        while current.len() > 1 {
            let label = RoundLabel::from_slots(current.len(), depth);

            let mut matches = Vec::new();
            let mut next = Vec::with_capacity(current.len() / 2 + 1);

            let mut iter = current.into_iter();
            let mut index = 0;
            while let Some(first) = iter.next() {
                let second = iter.next().flatten();
                let ring = rotation % rings + 1;
                rotation += 1;

                match (first, second) {
                    (Some(first), Some(second)) => {
                        let id = format!("PO_{}", next_id);
                        next_id += 1;

                        next.push(Some(Slot::Winner {
                            round: label,
                            index: index + 1,
                            from: id.clone(),
                        }));

                        matches.push(
                            Match::new(id, Phase::Playoff, label, ring, [first, second])
                                .with_seed(format!("{}-{}", depth, index + 1)),
                        );
                    }
                    (Some(slot), None) | (None, Some(slot)) => next.push(Some(slot)),
                    (None, None) => (),
                }

                index += 1;
            }

            if !matches.is_empty() {
                rounds.push(BracketRound { label, matches });
            }

            current = next;
            depth += 1;
        }

        let this = Self { rounds };

        log::debug!("Created new Playoff with {} matches", this.len());

        this
    }

    /// Returns the cross-group seed order for `groups` groups.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ringplan_core::Playoff;
    /// let seeds: Vec<_> = Playoff::seeds(3).iter().map(|s| s.to_string()).collect();
    /// assert_eq!(seeds, ["1st A", "2nd B", "1st B", "2nd C", "1st C", "2nd A"]);
    /// ```
    pub fn seeds(groups: usize) -> Vec<Slot> {
        (0..groups)
            .flat_map(|group| {
                [
                    Slot::Placement {
                        place: Place::First,
                        group,
                    },
                    Slot::Placement {
                        place: Place::Second,
                        group: (group + 1) % groups,
                    },
                ]
            })
            .collect()
    }

    /// Returns all rounds that contain at least one match.
    #[inline]
    pub fn rounds(&self) -> &[BracketRound] {
        &self.rounds
    }

    #[inline]
    pub fn into_rounds(self) -> Vec<BracketRound> {
        self.rounds
    }

    /// Returns an iterator over all matches in round order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> + '_ {
        self.rounds.iter().flat_map(|round| round.matches.iter())
    }

    pub fn len(&self) -> usize {
        self.rounds.iter().map(|round| round.matches.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
