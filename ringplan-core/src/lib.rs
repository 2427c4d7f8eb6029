//! # ringplan-core
//!
//! This crate contains the scheduling and bracket generation engine for competitions held on
//! a fixed number of rings. Given a number of competitors, rings, a time window and an average
//! match duration it builds either a single elimination bracket or a round robin group stage
//! followed by a provisional play-off, and assigns every match a ring and a start time.
//!
//! Important types:
//! - [`Options`]: The primitive inputs of a generation run.
//! - [`Capacity`]: The time window and the number of matches that fit into it.
//! - [`Slot`]: One side of a match. Can be a competitor, the winner of another match, a group
//! placement or empty (a bye).
//! - [`Match`]: An unscheduled match between two [`Slot`]s.
//! - [`ScheduledMatch`]: A [`Match`] with a ring and a start and end time.
//! - [`Plan`]: The complete output of a generation run.
//!
//! The engine is pure: [`generate`] called twice with the same [`Options`] returns the same
//! [`Generation`].
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to almost all types.
//!
pub mod bracket;
pub mod capacity;
pub mod groups;
pub mod optimizer;
pub mod options;
pub mod plan;
pub mod playoff;
pub mod render;
pub mod schedule;
mod utils;

pub use bracket::{Bracket, BracketRound, RoundLabel};
pub use capacity::Capacity;
pub use groups::{Group, GroupStage};
pub use options::{Options, TimeOfDay};
pub use plan::{generate, Generation, Generator, Mode, Plan, Warning};
pub use playoff::Playoff;

use thiserror::Error;

use std::fmt::{self, Display, Formatter};
use std::ops::{Deref, Index};
use std::result;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The identifier of a competitor. Competitors are numbered from 1 to N.
pub type CompetitorId = u32;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("end time {end} must be after start time {start}")]
    InvalidTimeWindow { start: TimeOfDay, end: TimeOfDay },
    #[error("at least 2 competitors are required, found {0}")]
    NotEnoughCompetitors(u32),
    #[error("match duration must be at least one minute")]
    InvalidMatchDuration,
    #[error("match duration of {match_minutes} minutes exceeds the time window of {total_minutes} minutes")]
    MatchLongerThanWindow { match_minutes: u32, total_minutes: u32 },
    #[error("invalid ring count {0}: expected between 1 and 256")]
    InvalidRingCount(u32),
    #[error("invalid group size bounds: {min}..={max}")]
    InvalidGroupSizeBounds { min: u32, max: u32 },
    #[error("unknown match {0}")]
    UnknownMatch(String),
    #[error("invalid ring {ring}: expected a ring between 1 and {rings}")]
    InvalidRing { ring: u32, rings: u32 },
    #[error("invalid group {group}: only {length} groups exist")]
    InvalidGroup { group: usize, length: usize },
    #[error("competitor {0} is not assigned to any group")]
    UnknownCompetitor(CompetitorId),
}

/// A placement within a group.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Place {
    First,
    Second,
}

impl Display for Place {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("1st"),
            Self::Second => f.write_str("2nd"),
        }
    }
}

/// A spot for a competitor in a match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// A known competitor.
    Competitor(CompetitorId),
    /// The winner of the match with the id `from`, which is the `index`-th (1-based) match of
    /// the round `round`.
    Winner {
        round: RoundLabel,
        index: usize,
        from: String,
    },
    /// The competitor finishing at `place` in the group at index `group`.
    Placement { place: Place, group: usize },
    /// Permanently empty. A match with an empty slot is a bye.
    Empty,
}

impl Slot {
    /// Returns the [`CompetitorId`] if the slot refers to a known competitor.
    #[inline]
    pub fn competitor(&self) -> Option<CompetitorId> {
        match self {
            Self::Competitor(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the id of the match feeding this slot.
    #[inline]
    pub fn feeder(&self) -> Option<&str> {
        match self {
            Self::Winner { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Returns `true` if the `Slot` is [`Empty`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use ringplan_core::Slot;
    /// assert!(Slot::Empty.is_empty());
    /// assert!(!Slot::Competitor(1).is_empty());
    /// ```
    ///
    /// [`Empty`]: Self::Empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Competitor(id) => write!(f, "Competitor {}", id),
            Self::Winner { round, index, .. } => write!(f, "Winner of {} {}", round, index),
            Self::Placement { place, group } => {
                write!(f, "{} {}", place, utils::group_label(*group))
            }
            Self::Empty => f.write_str("-"),
        }
    }
}

/// The phase a match belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Any elimination match, including the preliminary round.
    Playoff,
    /// A round robin match in the group at the given index.
    Group(usize),
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playoff => f.write_str("Play-off"),
            Self::Group(index) => write!(f, "Group {}", utils::group_label(*index)),
        }
    }
}

/// A match between two [`Slot`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    pub id: String,
    pub phase: Phase,
    pub round_name: String,
    /// The ring suggested by the builder. The scheduler assigns the final ring.
    pub ring: u32,
    pub slots: [Slot; 2],
    /// The id of the seed rendering this match, if the match is part of a bracket.
    pub seed_id: Option<String>,
}

impl Match {
    #[inline]
    pub fn new<I, R>(id: I, phase: Phase, round_name: R, ring: u32, slots: [Slot; 2]) -> Self
    where
        I: ToString,
        R: ToString,
    {
        Self {
            id: id.to_string(),
            phase,
            round_name: round_name.to_string(),
            ring,
            slots,
            seed_id: None,
        }
    }

    #[inline]
    pub fn with_seed<S>(mut self, seed_id: S) -> Self
    where
        S: ToString,
    {
        self.seed_id = Some(seed_id.to_string());
        self
    }

    /// Returns the competitor ids of both slots.
    #[inline]
    pub fn competitors(&self) -> [Option<CompetitorId>; 2] {
        [self.slots[0].competitor(), self.slots[1].competitor()]
    }

    /// Returns `true` if one of the slots is [`Slot::Empty`]. Byes are never scheduled.
    #[inline]
    pub fn is_bye(&self) -> bool {
        self.slots.iter().any(Slot::is_empty)
    }
}

impl Index<usize> for Match {
    type Output = Slot;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.slots[index]
    }
}

/// A [`Match`] with an assigned ring and time. `start` and `end` are minutes from midnight.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduledMatch {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub inner: Match,
    pub start: u32,
    pub end: u32,
}

impl ScheduledMatch {
    /// Returns `true` if the `[start, end)` ranges of both matches intersect.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns the time range formatted as `HH:MM – HH:MM`.
    pub fn time_range(&self) -> String {
        format!(
            "{} – {}",
            capacity::format_minutes(self.start),
            capacity::format_minutes(self.end)
        )
    }
}

impl Deref for ScheduledMatch {
    type Target = Match;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::{Match, Phase, Place, ScheduledMatch, Slot};
    use crate::RoundLabel;

    /// Asserts that no two matches in `matches` share a ring or a competitor at the same time.
    pub fn assert_feasible(matches: &[ScheduledMatch]) {
        for (index, a) in matches.iter().enumerate() {
            for b in &matches[index + 1..] {
                if !a.overlaps(b) {
                    continue;
                }

                assert_ne!(a.ring, b.ring, "{} and {} share a ring", a.id, b.id);

                for competitor in a.competitors().into_iter().flatten() {
                    assert!(
                        !b.competitors().contains(&Some(competitor)),
                        "{} and {} share competitor {}",
                        a.id,
                        b.id,
                        competitor
                    );
                }
            }
        }
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::Competitor(7).to_string(), "Competitor 7");
        assert_eq!(
            Slot::Winner {
                round: RoundLabel::Semifinal,
                index: 2,
                from: String::from("KO_6"),
            }
            .to_string(),
            "Winner of Semifinal 2"
        );
        assert_eq!(
            Slot::Placement {
                place: Place::Second,
                group: 1
            }
            .to_string(),
            "2nd B"
        );
    }

    #[test]
    fn test_match_bye() {
        let m = Match::new(
            "G_1",
            Phase::Group(0),
            "Group A",
            1,
            [Slot::Competitor(1), Slot::Empty],
        );
        assert!(m.is_bye());
        assert_eq!(m.competitors(), [Some(1), None]);

        let m = Match::new(
            "PO_1",
            Phase::Playoff,
            "Final",
            1,
            [
                Slot::Placement {
                    place: Place::First,
                    group: 0,
                },
                Slot::Competitor(3),
            ],
        );
        assert!(!m.is_bye());
        assert_eq!(m.competitors(), [None, Some(3)]);
    }

    #[test]
    fn test_scheduled_match_overlaps() {
        let m = Match::new("a", Phase::Playoff, "Final", 1, [Slot::Empty, Slot::Empty]);
        let a = ScheduledMatch {
            inner: m.clone(),
            start: 540,
            end: 544,
        };
        let b = ScheduledMatch {
            inner: m,
            start: 544,
            end: 548,
        };

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&a));
        assert_eq!(a.time_range(), "09:00 – 09:04");
    }
}
