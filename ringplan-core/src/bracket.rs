//! # Single Elimination Bracket
//!
//! A [`Bracket`] for N competitors consists of an optional preliminary round and the main
//! bracket. The main bracket always has `base` entrants, where `base` is the largest power of
//! two not exceeding N. The `N - base` preliminary matches are played between competitors
//! 1 and 2, 3 and 4 and so on. The remaining competitors enter the main bracket directly,
//! followed by the preliminary winners.
use std::fmt::{self, Display, Formatter};

use crate::utils::NumExt;
use crate::{CompetitorId, Error, Match, Phase, Result, Slot};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name of an elimination round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundLabel {
    Preliminary,
    /// A round without a special name, numbered from 1.
    Round(usize),
    Quarterfinal,
    Semifinal,
    Final,
}

impl RoundLabel {
    /// Returns the label of a round with `slots` entrants at the 1-based `depth` of the
    /// bracket.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ringplan_core::RoundLabel;
    /// assert_eq!(RoundLabel::from_slots(2, 5), RoundLabel::Final);
    /// assert_eq!(RoundLabel::from_slots(8, 3), RoundLabel::Quarterfinal);
    /// assert_eq!(RoundLabel::from_slots(16, 2), RoundLabel::Round(2));
    /// ```
    pub fn from_slots(slots: usize, depth: usize) -> Self {
        match slots {
            2 => Self::Final,
            4 => Self::Semifinal,
            8 => Self::Quarterfinal,
            _ => Self::Round(depth),
        }
    }
}

impl Display for RoundLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preliminary => f.write_str("Preliminary"),
            Self::Round(n) => write!(f, "Round {}", n),
            Self::Quarterfinal => f.write_str("Quarterfinal"),
            Self::Semifinal => f.write_str("Semifinal"),
            Self::Final => f.write_str("Final"),
        }
    }
}

/// The matches of one elimination round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketRound {
    pub label: RoundLabel,
    pub matches: Vec<Match>,
}

/// Returns `(base, preliminary_pairs)` for a field of `competitors`.
///
/// # Examples
///
/// ```
/// # use ringplan_core::bracket::split_field;
/// assert_eq!(split_field(10), (8, 2));
/// assert_eq!(split_field(32), (32, 0));
/// ```
pub fn split_field(competitors: usize) -> (usize, usize) {
    let base = competitors.prev_power_of_two();
    (base, competitors.saturating_sub(base))
}

/// A single elimination bracket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracket {
    competitors: u32,
    rounds: Vec<BracketRound>,
}

impl Bracket {
    /// Creates a new `Bracket` for the competitors `1..=competitors`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughCompetitors`] if fewer than 2 competitors are given.
    pub fn new(competitors: u32, rings: u32) -> Result<Self> {
        if competitors < 2 {
            return Err(Error::NotEnoughCompetitors(competitors));
        }

        let rings = rings.max(1) as usize;
        let (base, pre_round_pairs) = split_field(competitors as usize);

        log::debug!(
            "Creating new Bracket with {} competitors ({} preliminary matches, {} main entrants)",
            competitors,
            pre_round_pairs,
            base
        );

        let mut rounds = Vec::new();
        let mut next_id = 1;

        // Preliminary round: rings are assigned round-robin.
        let mut pre_winners = Vec::with_capacity(pre_round_pairs);
        if pre_round_pairs > 0 {
            let mut matches = Vec::with_capacity(pre_round_pairs);

            for index in 0..pre_round_pairs {
                let first = (index * 2 + 1) as CompetitorId;
                let id = format!("PR_{}", next_id);
                next_id += 1;

                pre_winners.push(Slot::Winner {
                    round: RoundLabel::Preliminary,
                    index: index + 1,
                    from: id.clone(),
                });

                matches.push(
                    Match::new(
                        id,
                        Phase::Playoff,
                        RoundLabel::Preliminary,
                        (index % rings) as u32 + 1,
                        [Slot::Competitor(first), Slot::Competitor(first + 1)],
                    )
                    .with_seed(format!("PR-{}", index + 1)),
                );
            }

            rounds.push(BracketRound {
                label: RoundLabel::Preliminary,
                matches,
            });
        }

        let direct = (pre_round_pairs * 2 + 1) as CompetitorId..=competitors;
        let mut slots: Vec<Slot> = direct
            .map(Slot::Competitor)
            .chain(pre_winners)
            .take(base)
            .collect();

        // Main bracket: rings are assigned in contiguous blocks.
        let mut depth = 1;
        while slots.len() > 1 {
            let label = RoundLabel::from_slots(slots.len(), depth);
            let pairs = slots.len() / 2;
            let per_ring = pairs.div_ceil_ext(rings).max(1);

            let mut matches = Vec::with_capacity(pairs);
            let mut next_slots = Vec::with_capacity(pairs);

            let mut iter = slots.into_iter();
            for index in 0..pairs {
                let (first, second) = match (iter.next(), iter.next()) {
                    (Some(first), Some(second)) => (first, second),
                    _ => break,
                };

                let id = format!("KO_{}", next_id);
                next_id += 1;

                next_slots.push(Slot::Winner {
                    round: label,
                    index: index + 1,
                    from: id.clone(),
                });

                matches.push(
                    Match::new(
                        id,
                        Phase::Playoff,
                        label,
                        ((index / per_ring) % rings) as u32 + 1,
                        [first, second],
                    )
                    .with_seed(format!("{}-{}", depth, index + 1)),
                );
            }

            rounds.push(BracketRound { label, matches });

            slots = next_slots;
            depth += 1;
        }

        let this = Self {
            competitors,
            rounds,
        };

        log::debug!("Created new Bracket with {} matches", this.len());

        Ok(this)
    }

    /// Returns the number of competitors in the bracket.
    #[inline]
    pub fn competitors(&self) -> u32 {
        self.competitors
    }

    /// Returns all rounds, starting with the preliminary round if it exists.
    #[inline]
    pub fn rounds(&self) -> &[BracketRound] {
        &self.rounds
    }

    #[inline]
    pub fn into_rounds(self) -> Vec<BracketRound> {
        self.rounds
    }

    /// Returns the preliminary round, if the number of competitors is not a power of two.
    pub fn preliminary(&self) -> Option<&BracketRound> {
        self.rounds
            .first()
            .filter(|round| round.label == RoundLabel::Preliminary)
    }

    /// Returns the rounds of the main bracket.
    pub fn main_rounds(&self) -> &[BracketRound] {
        match self.preliminary() {
            Some(_) => &self.rounds[1..],
            None => &self.rounds,
        }
    }

    /// Returns an iterator over all matches in round order.
    pub fn matches(&self) -> impl Iterator<Item = &Match> + '_ {
        self.rounds.iter().flat_map(|round| round.matches.iter())
    }

    /// Returns the total number of matches.
    pub fn len(&self) -> usize {
        self.rounds.iter().map(|round| round.matches.len()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{split_field, Bracket, RoundLabel};
    use crate::{Error, Slot};

    macro_rules! round_sizes {
        ($rounds:expr) => {
            $rounds
                .iter()
                .map(|round| round.matches.len())
                .collect::<Vec<_>>()
        };
    }

    fn winner(round: RoundLabel, index: usize, from: &str) -> Slot {
        Slot::Winner {
            round,
            index,
            from: from.to_owned(),
        }
    }

    #[test]
    fn test_round_label() {
        assert_eq!(RoundLabel::from_slots(2, 1), RoundLabel::Final);
        assert_eq!(RoundLabel::from_slots(4, 1), RoundLabel::Semifinal);
        assert_eq!(RoundLabel::from_slots(8, 1), RoundLabel::Quarterfinal);
        assert_eq!(RoundLabel::from_slots(16, 1), RoundLabel::Round(1));
        assert_eq!(RoundLabel::from_slots(3, 2), RoundLabel::Round(2));

        assert_eq!(RoundLabel::Round(2).to_string(), "Round 2");
        assert_eq!(RoundLabel::Quarterfinal.to_string(), "Quarterfinal");
    }

    #[test]
    fn test_split_field() {
        assert_eq!(split_field(2), (2, 0));
        assert_eq!(split_field(3), (2, 1));
        assert_eq!(split_field(13), (8, 5));
        assert_eq!(split_field(16), (16, 0));
    }

    #[test]
    fn test_bracket_invalid() {
        assert_eq!(Bracket::new(1, 4), Err(Error::NotEnoughCompetitors(1)));
        assert_eq!(Bracket::new(0, 4), Err(Error::NotEnoughCompetitors(0)));
    }

    #[test]
    fn test_bracket_power_of_two() {
        let bracket = Bracket::new(32, 4).unwrap();

        assert!(bracket.preliminary().is_none());
        assert_eq!(round_sizes!(bracket.rounds()), [16, 8, 4, 2, 1]);
        assert_eq!(bracket.len(), 31);

        let labels: Vec<_> = bracket.rounds().iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            [
                RoundLabel::Round(1),
                RoundLabel::Round(2),
                RoundLabel::Quarterfinal,
                RoundLabel::Semifinal,
                RoundLabel::Final
            ]
        );

        let first = &bracket.rounds()[0].matches[0];
        assert_eq!(first.id, "KO_1");
        assert_eq!(first.slots, [Slot::Competitor(1), Slot::Competitor(2)]);
        assert_eq!(first.seed_id.as_deref(), Some("1-1"));

        let last = &bracket.rounds()[4].matches[0];
        assert_eq!(last.id, "KO_31");
        assert_eq!(last.round_name, "Final");
        assert_eq!(
            last.slots,
            [
                winner(RoundLabel::Semifinal, 1, "KO_29"),
                winner(RoundLabel::Semifinal, 2, "KO_30"),
            ]
        );
    }

    #[test]
    fn test_bracket_preliminary() {
        let bracket = Bracket::new(10, 2).unwrap();

        let preliminary = bracket.preliminary().unwrap();
        assert_eq!(preliminary.matches.len(), 2);
        assert_eq!(round_sizes!(bracket.main_rounds()), [4, 2, 1]);
        assert_eq!(bracket.len(), 9);

        assert_eq!(
            preliminary.matches[0].slots,
            [Slot::Competitor(1), Slot::Competitor(2)]
        );
        assert_eq!(
            preliminary.matches[1].slots,
            [Slot::Competitor(3), Slot::Competitor(4)]
        );
        assert_eq!(preliminary.matches[1].seed_id.as_deref(), Some("PR-2"));

        // Byes for 5..=10 followed by both preliminary winners.
        let first_round = &bracket.main_rounds()[0];
        assert_eq!(first_round.label, RoundLabel::Quarterfinal);
        let slots: Vec<_> = first_round
            .matches
            .iter()
            .flat_map(|m| m.slots.iter().cloned())
            .collect();
        assert_eq!(
            slots,
            [
                Slot::Competitor(5),
                Slot::Competitor(6),
                Slot::Competitor(7),
                Slot::Competitor(8),
                Slot::Competitor(9),
                Slot::Competitor(10),
                winner(RoundLabel::Preliminary, 1, "PR_1"),
                winner(RoundLabel::Preliminary, 2, "PR_2"),
            ]
        );
        assert_eq!(first_round.matches[0].id, "KO_3");
    }

    #[test]
    fn test_bracket_main_entrants() {
        for competitors in 2..=70 {
            let bracket = Bracket::new(competitors, 3).unwrap();
            let (base, pre_round_pairs) = split_field(competitors as usize);

            let preliminary = bracket.preliminary().map(|r| r.matches.len()).unwrap_or(0);
            assert_eq!(preliminary, pre_round_pairs);

            let entrants = bracket.main_rounds()[0].matches.len() * 2;
            assert_eq!(entrants, base);
            assert_eq!(bracket.len(), competitors as usize - 1);
        }
    }

    #[test]
    fn test_bracket_smallest() {
        let bracket = Bracket::new(2, 1).unwrap();
        assert_eq!(round_sizes!(bracket.rounds()), [1]);
        assert_eq!(bracket.rounds()[0].label, RoundLabel::Final);

        let bracket = Bracket::new(3, 1).unwrap();
        assert_eq!(round_sizes!(bracket.rounds()), [1, 1]);
        assert_eq!(
            bracket.rounds()[1].matches[0].slots,
            [
                Slot::Competitor(3),
                winner(RoundLabel::Preliminary, 1, "PR_1")
            ]
        );
    }

    #[test]
    fn test_bracket_rings() {
        // Preliminary round: round-robin.
        let bracket = Bracket::new(14, 4).unwrap();
        let rings: Vec<_> = bracket.rounds()[0].matches.iter().map(|m| m.ring).collect();
        assert_eq!(rings, [1, 2, 3, 4, 1, 2]);

        // Main bracket: contiguous blocks.
        let bracket = Bracket::new(16, 4).unwrap();
        let rings: Vec<_> = bracket.rounds()[0].matches.iter().map(|m| m.ring).collect();
        assert_eq!(rings, [1, 1, 2, 2, 3, 3, 4, 4]);

        let rings: Vec<_> = bracket.rounds()[1].matches.iter().map(|m| m.ring).collect();
        assert_eq!(rings, [1, 2, 3, 4]);

        let bracket = Bracket::new(16, 3).unwrap();
        let rings: Vec<_> = bracket.rounds()[0].matches.iter().map(|m| m.ring).collect();
        assert_eq!(rings, [1, 1, 1, 2, 2, 2, 3, 3]);
    }
}
