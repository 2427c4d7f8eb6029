//! # Plan Rendering
//!
//! The `render` module provides the display shape of elimination rounds and a [`Renderer`]
//! trait to generically render a [`Plan`].
//!
//! A [`Round`] is a titled column of [`Seed`]s. Every seed is one match of the bracket,
//! showing both [`Team`]s, the ring and, once the match has been scheduled, the time range.
//! Seeds are linked to their [`ScheduledMatch`] by the seed id of the match.
use crate::bracket::BracketRound;
use crate::{Plan, ScheduledMatch};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A renderer used to render a [`Plan`].
pub trait Renderer {
    fn render(&mut self, plan: &Plan);
}

/// A titled elimination round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Round {
    pub title: String,
    pub seeds: Vec<Seed>,
}

impl Round {
    /// Annotates every seed of this round with the time and ring of the matching
    /// [`ScheduledMatch`]. Seeds without a scheduled match are left unchanged.
    pub fn annotate(&mut self, matches: &[ScheduledMatch]) {
        for seed in &mut self.seeds {
            let scheduled = matches
                .iter()
                .find(|m| m.seed_id.as_deref() == Some(seed.id.as_str()));

            if let Some(m) = scheduled {
                seed.time = Some(m.time_range());
                seed.ring = m.ring;
            }
        }
    }
}

impl From<&BracketRound> for Round {
    fn from(round: &BracketRound) -> Self {
        let seeds = round
            .matches
            .iter()
            .filter_map(|m| {
                let id = m.seed_id.clone()?;

                Some(Seed {
                    id,
                    ring: m.ring,
                    teams: [Team::new(&m.slots[0]), Team::new(&m.slots[1])],
                    time: None,
                })
            })
            .collect();

        Self {
            title: round.label.to_string(),
            seeds,
        }
    }
}

/// One match within a [`Round`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Seed {
    pub id: String,
    pub ring: u32,
    pub teams: [Team; 2],
    /// The scheduled time as `HH:MM – HH:MM`.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Team {
    pub name: String,
}

impl Team {
    fn new<T>(name: T) -> Self
    where
        T: ToString,
    {
        Self {
            name: name.to_string(),
        }
    }
}

/// Converts `rounds` into render [`Round`]s annotated with the times of `matches`.
pub fn rounds(rounds: &[BracketRound], matches: &[ScheduledMatch]) -> Vec<Round> {
    rounds
        .iter()
        .map(|round| {
            let mut round = Round::from(round);
            round.annotate(matches);
            round
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{rounds, Round};
    use crate::schedule::Scheduler;
    use crate::Bracket;

    #[test]
    fn test_round_from_bracket_round() {
        let bracket = Bracket::new(4, 2).unwrap();
        let round = Round::from(&bracket.rounds()[0]);

        assert_eq!(round.title, "Semifinal");
        assert_eq!(round.seeds.len(), 2);
        assert_eq!(round.seeds[0].id, "1-1");
        assert_eq!(round.seeds[0].teams[0].name, "Competitor 1");
        assert_eq!(round.seeds[1].teams[1].name, "Competitor 4");
        assert_eq!(round.seeds[1].time, None);

        let round = Round::from(&bracket.rounds()[1]);
        assert_eq!(round.title, "Final");
        assert_eq!(round.seeds[0].teams[0].name, "Winner of Semifinal 1");
    }

    #[test]
    fn test_rounds_annotated() {
        let bracket = Bracket::new(4, 1).unwrap();
        let matches: Vec<_> = bracket.matches().cloned().collect();
        let scheduled = Scheduler::new(540, 4, 2).schedule(&matches);

        let rounds = rounds(bracket.rounds(), &scheduled);
        let seeds: Vec<_> = rounds
            .iter()
            .flat_map(|round| round.seeds.iter())
            .map(|seed| (seed.id.as_str(), seed.ring, seed.time.as_deref()))
            .collect();

        assert_eq!(
            seeds,
            [
                ("1-1", 1, Some("09:00 – 09:04")),
                ("1-2", 2, Some("09:00 – 09:04")),
                ("2-1", 1, Some("09:04 – 09:08")),
            ]
        );
    }
}
