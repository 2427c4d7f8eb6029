//! # Ring Scheduling
//!
//! The [`Scheduler`] assigns a ring and a start time to every match of a batch using a greedy
//! earliest-feasible-start policy:
//!
//! 1. For every unscheduled match compute the earliest time at which both competitors and
//! some ring are free. The lowest numbered ring wins among rings free at the same time.
//! 2. Select the match with the globally earliest start. Ties are broken by the match id.
//! 3. Occupy the ring and both competitors until the end of the match and repeat.
//!
//! Slots without a competitor never constrain the schedule, with one exception: a
//! [`Slot::Winner`] whose feeding match is part of the same batch may not start before the
//! feeding match has ended. Without this, a final could be placed in parallel to its own
//! semifinals. A feeding match outside of the batch does not constrain the slot.
//!
//! Byes are never scheduled.
use std::collections::HashMap;

use crate::{CompetitorId, Match, ScheduledMatch, Slot};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scheduler {
    start: u32,
    match_minutes: u32,
    rings: usize,
}

impl Scheduler {
    /// Creates a new `Scheduler` with all `rings` available from `start` (minutes from
    /// midnight). At least one ring is always used.
    #[inline]
    pub fn new(start: u32, match_minutes: u32, rings: u32) -> Self {
        Self {
            start,
            match_minutes,
            rings: rings.max(1) as usize,
        }
    }

    /// Schedules `matches`. The returned matches are ordered by their start time and carry the
    /// assigned ring.
    pub fn schedule(&self, matches: &[Match]) -> Vec<ScheduledMatch> {
        let pending: Vec<&Match> = matches.iter().filter(|m| !m.is_bye()).collect();

        log::debug!(
            "Scheduling {} matches ({} byes skipped) on {} rings from minute {}",
            pending.len(),
            matches.len() - pending.len(),
            self.rings,
            self.start
        );

        let mut state = State {
            batch: pending
                .iter()
                .enumerate()
                .map(|(index, m)| (m.id.as_str(), index))
                .collect(),
            ends: vec![None; pending.len()],
            rings: vec![self.start; self.rings],
            competitors: HashMap::new(),
        };

        let mut scheduled = Vec::with_capacity(pending.len());

        while scheduled.len() < pending.len() {
            let candidate = match self.select(&pending, &state, false) {
                Some(candidate) => candidate,
                None => {
                    log::warn!("No match is ready to be scheduled, ignoring feeding matches");

                    match self.select(&pending, &state, true) {
                        Some(candidate) => candidate,
                        None => break,
                    }
                }
            };

            let end = candidate.start.saturating_add(self.match_minutes);
            let m = pending[candidate.index];

            state.ends[candidate.index] = Some(end);
            state.rings[candidate.ring] = end;
            for id in m.competitors().into_iter().flatten() {
                state.competitors.insert(id, end);
            }

            let mut inner = m.clone();
            inner.ring = candidate.ring as u32 + 1;

            scheduled.push(ScheduledMatch {
                inner,
                start: candidate.start,
                end,
            });
        }

        scheduled
    }

    /// Selects the next match to schedule. With `relaxed` feeding matches are ignored.
    fn select(&self, pending: &[&Match], state: &State<'_>, relaxed: bool) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;

        for (index, m) in pending.iter().enumerate() {
            if state.ends[index].is_some() {
                continue;
            }

            let earliest = match state.earliest(m, self.start, relaxed) {
                Some(earliest) => earliest,
                None => continue,
            };

            // `rings` is never empty.
            let (ring, start) = state
                .rings
                .iter()
                .enumerate()
                .map(|(ring, next)| (ring, earliest.max(*next)))
                .min_by_key(|(ring, start)| (*start, *ring))
                .unwrap_or((0, earliest));

            let is_better = match &best {
                None => true,
                Some(best) => {
                    start < best.start || (start == best.start && m.id < pending[best.index].id)
                }
            };

            if is_better {
                best = Some(Candidate { index, start, ring });
            }
        }

        best
    }
}

/// Availability counters local to one [`Scheduler::schedule`] call.
#[derive(Debug)]
struct State<'a> {
    /// Index of every match in the batch by its id.
    batch: HashMap<&'a str, usize>,
    /// End of every scheduled match in the batch.
    ends: Vec<Option<u32>>,
    /// Next free minute of every ring.
    rings: Vec<u32>,
    /// Next free minute of every competitor that already played.
    competitors: HashMap<CompetitorId, u32>,
}

impl<'a> State<'a> {
    /// Returns the earliest time both slots of `m` are available, or `None` if a feeding
    /// match has not been scheduled yet.
    fn earliest(&self, m: &Match, start: u32, relaxed: bool) -> Option<u32> {
        let mut earliest = start;

        for slot in &m.slots {
            match slot {
                Slot::Competitor(id) => {
                    if let Some(next) = self.competitors.get(id) {
                        earliest = earliest.max(*next);
                    }
                }
                Slot::Winner { from, .. } => {
                    if let Some(feeder) = self.batch.get(from.as_str()) {
                        match self.ends[*feeder] {
                            Some(end) => earliest = earliest.max(end),
                            None if relaxed => (),
                            None => return None,
                        }
                    }
                }
                Slot::Placement { .. } | Slot::Empty => (),
            }
        }

        Some(earliest)
    }
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    index: usize,
    start: u32,
    ring: usize,
}
