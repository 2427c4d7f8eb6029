//! # Generation Pipeline
//!
//! A generation run takes [`Options`] and produces two [`Plan`]s:
//! - The bracket plan: a single elimination [`Bracket`] for all competitors.
//! - The group plan: a round robin [`GroupStage`] followed by a provisional [`Playoff`]. If no
//! group size fits into the capacity, or the group stage and the play-off together need more
//! match slots than the rings provide, the group plan falls back to the bracket plan.
//!
//! Problems that do not prevent a plan from being built are reported as [`Warning`]s on the
//! plan instead of errors.
use std::fmt::{self, Display, Formatter};

use crate::optimizer::{best_group_size, coerce_group_count};
use crate::render::{self, Round};
use crate::schedule::Scheduler;
use crate::{
    Bracket, Capacity, Error, Group, GroupStage, Options, Playoff, Result, ScheduledMatch,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    Bracket,
    Group,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bracket => f.write_str("Bracket"),
            Self::Group => f.write_str("Group"),
        }
    }
}

/// A non-fatal problem found while generating a [`Plan`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Warning {
    /// The plan has more matches than fit into the time window.
    CapacityExceeded { required: usize, available: u32 },
    /// No group size fits into the capacity. The plan is the bracket plan.
    NoGroupSizeFits { capacity: u32 },
    /// The group stage and the play-off need more slots than the rings provide. The plan is the
    /// bracket plan.
    GroupFallback { required: usize, available: u32 },
    /// Fewer than 2 groups exist, so no play-off is held.
    InfeasibleGroupCount { groups: usize },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                required,
                available,
            } => write!(
                f,
                "{} matches exceed the capacity of {} matches",
                required, available
            ),
            Self::NoGroupSizeFits { capacity } => write!(
                f,
                "no group size fits into {} matches, using the bracket instead",
                capacity
            ),
            Self::GroupFallback {
                required,
                available,
            } => write!(
                f,
                "groups and play-off need {} matches but the rings only provide {} slots, using the bracket instead",
                required, available
            ),
            Self::InfeasibleGroupCount { groups } => {
                write!(f, "no play-off is possible with {} group(s)", groups)
            }
        }
    }
}

/// The scheduled result of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plan {
    pub mode: Mode,
    /// All scheduled matches, ordered by their start time.
    pub matches: Vec<ScheduledMatch>,
    /// The number of generated matches, including unscheduled byes.
    pub raw_match_count: usize,
    pub utilization_percent: u32,
    pub overloaded: bool,
    /// The group size selected for a group plan.
    pub group_size: Option<u32>,
    /// The elimination rounds: the bracket of a bracket plan or the play-off of a group plan.
    pub rounds: Vec<Round>,
    pub groups: Vec<Group>,
    pub warnings: Vec<Warning>,
    pub rings: u32,
}

impl Plan {
    fn new(mode: Mode, capacity: &Capacity, matches: Vec<ScheduledMatch>, raw: usize) -> Self {
        let utilization_percent = capacity.utilization(matches.len());
        let overloaded = capacity.is_exceeded_by(matches.len());

        let mut warnings = Vec::new();
        if overloaded {
            log::warn!(
                "{} plan with {} matches exceeds the capacity of {} matches",
                mode,
                matches.len(),
                capacity.capacity_matches
            );

            warnings.push(Warning::CapacityExceeded {
                required: matches.len(),
                available: capacity.capacity_matches,
            });
        }

        Self {
            mode,
            matches,
            raw_match_count: raw,
            utilization_percent,
            overloaded,
            group_size: None,
            rounds: Vec::new(),
            groups: Vec::new(),
            warnings,
            rings: capacity.rings,
        }
    }

    /// Returns the number of scheduled matches.
    #[inline]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Returns the scheduled match with the given `id`.
    pub fn get(&self, id: &str) -> Option<&ScheduledMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Returns the end of the last match.
    pub fn end(&self) -> Option<u32> {
        self.matches.iter().map(|m| m.end).max()
    }

    /// Returns the number of matches on every ring. The first element is ring 1.
    pub fn ring_load(&self) -> Vec<usize> {
        let mut load = vec![0; self.rings as usize];

        for m in &self.matches {
            let index = (m.ring as usize).wrapping_sub(1);
            if let Some(count) = load.get_mut(index) {
                *count += 1;
            }
        }

        load
    }

    /// Returns the highest number of matches on any ring.
    pub fn max_ring_load(&self) -> usize {
        self.ring_load().into_iter().max().unwrap_or(0)
    }

    /// Moves the match `id` onto `ring` without rescheduling. The seed rendering the match is
    /// updated too.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if `ring` does not exist or no match with the id `id` exists.
    pub fn override_ring(&mut self, id: &str, ring: u32) -> Result<()> {
        if ring == 0 || ring > self.rings {
            return Err(Error::InvalidRing {
                ring,
                rings: self.rings,
            });
        }

        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::UnknownMatch(id.to_owned()))?;

        log::debug!("Moving match {} from ring {} to ring {}", id, m.inner.ring, ring);

        m.inner.ring = ring;

        if let Some(seed_id) = &m.inner.seed_id {
            for seed in self.rounds.iter_mut().flat_map(|r| r.seeds.iter_mut()) {
                if seed.id == *seed_id {
                    seed.ring = ring;
                }
            }
        }

        Ok(())
    }
}

/// Both plans of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Generation {
    pub capacity: Capacity,
    pub bracket: Plan,
    pub group: Plan,
}

/// Builds and schedules [`Plan`]s for validated [`Options`].
#[derive(Clone, Debug)]
pub struct Generator {
    options: Options,
    capacity: Capacity,
}

impl Generator {
    /// Creates a new `Generator`.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the `options` are invalid.
    pub fn new(options: Options) -> Result<Self> {
        options.validate()?;

        let capacity = options.capacity();

        Ok(Self { options, capacity })
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[inline]
    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    fn scheduler(&self, start: u32) -> Scheduler {
        Scheduler::new(start, self.options.match_minutes, self.options.rings)
    }

    /// Builds and schedules the bracket plan.
    pub fn bracket(&self) -> Result<Plan> {
        let bracket = Bracket::new(self.options.competitors, self.options.rings)?;

        let matches: Vec<_> = bracket.matches().cloned().collect();
        let scheduled = self.scheduler(self.capacity.start).schedule(&matches);

        let mut plan = Plan::new(Mode::Bracket, &self.capacity, scheduled, matches.len());
        plan.rounds = render::rounds(bracket.rounds(), &plan.matches);

        log::debug!(
            "Created bracket plan with {} matches ({}% utilization)",
            plan.len(),
            plan.utilization_percent
        );

        Ok(plan)
    }

    /// Builds and schedules the group plan, falling back to the bracket plan if the group
    /// stage does not fit.
    pub fn groups(&self) -> Result<Plan> {
        let bracket = self.bracket()?;
        Ok(self.groups_or(bracket))
    }

    /// Builds and schedules both plans.
    pub fn generate(&self) -> Result<Generation> {
        let bracket = self.bracket()?;
        let group = self.groups_or(bracket.clone());

        Ok(Generation {
            capacity: self.capacity,
            bracket,
            group,
        })
    }

    fn groups_or(&self, mut fallback: Plan) -> Plan {
        let options = &self.options;

        let best = match best_group_size(
            options.competitors,
            options.rings,
            &self.capacity,
            options.min_group_size,
            options.max_group_size,
        ) {
            Some(best) => best,
            None => {
                fallback.warnings.push(Warning::NoGroupSizeFits {
                    capacity: self.capacity.capacity_matches,
                });
                return fallback;
            }
        };

        let stage = GroupStage::new(options.competitors, options.rings, best.group_size);
        let stage = coerce_group_count(stage, options.competitors, options.min_group_size);

        let playoff = Playoff::new(stage.groups(), options.rings);

        let required = stage.len() + playoff.len();
        let available = self.capacity.ring_slots();
        if required > available as usize {
            log::warn!(
                "Groups and play-off need {} matches but only {} slots are available",
                required,
                available
            );

            fallback.warnings.push(Warning::GroupFallback {
                required,
                available,
            });
            return fallback;
        }

        let mut scheduled = self.scheduler(self.capacity.start).schedule(stage.matches());

        // Every play-off round starts after everything before it has ended.
        let mut start = scheduled
            .iter()
            .map(|m| m.end)
            .max()
            .unwrap_or(self.capacity.start);

        let mut playoff_scheduled = Vec::with_capacity(playoff.len());
        for round in playoff.rounds() {
            let matches = self.scheduler(start).schedule(&round.matches);
            start = matches.iter().map(|m| m.end).fold(start, u32::max);
            playoff_scheduled.extend(matches);
        }

        let rounds = render::rounds(playoff.rounds(), &playoff_scheduled);
        scheduled.extend(playoff_scheduled);

        let (groups, _) = stage.into_parts();

        let mut plan = Plan::new(Mode::Group, &self.capacity, scheduled, required);
        plan.group_size = Some(best.group_size);
        plan.rounds = rounds;

        if groups.len() < 2 {
            log::warn!("Skipping play-off with {} group(s)", groups.len());
            plan.warnings
                .push(Warning::InfeasibleGroupCount { groups: groups.len() });
        }

        plan.groups = groups;

        log::debug!(
            "Created group plan with {} groups and {} matches ({}% utilization)",
            plan.groups.len(),
            plan.len(),
            plan.utilization_percent
        );

        plan
    }
}

/// Generates both plans for `options`.
///
/// # Errors
///
/// Returns an [`enum@Error`] if the `options` are invalid.
///
/// # Examples
///
/// ```
/// # use ringplan_core::{generate, Mode, Options};
/// let generation = generate(&Options::default()).unwrap();
///
/// assert_eq!(generation.capacity.capacity_matches, 120);
/// assert_eq!(generation.bracket.mode, Mode::Bracket);
/// assert_eq!(generation.bracket.len(), 31);
/// ```
pub fn generate(options: &Options) -> Result<Generation> {
    Generator::new(options.clone())?.generate()
}
