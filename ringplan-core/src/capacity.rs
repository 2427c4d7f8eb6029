//! Time window and match capacity.
use crate::TimeOfDay;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Formats minutes from midnight as `HH:MM`. Hours are not wrapped at midnight.
///
/// # Examples
///
/// ```
/// # use ringplan_core::capacity::format_minutes;
/// assert_eq!(format_minutes(545), "09:05");
/// assert_eq!(format_minutes(1500), "25:00");
/// ```
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// The capacity of a time window on a number of rings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capacity {
    /// Start of the window in minutes from midnight.
    pub start: u32,
    /// End of the window in minutes from midnight.
    pub end: u32,
    pub total_minutes: u32,
    /// The number of matches that fit into the window on all rings combined.
    pub capacity_matches: u32,
    pub rings: u32,
    pub match_minutes: u32,
}

impl Capacity {
    /// Computes the capacity of the window between `start` and `end`. If `end` is not after
    /// `start`, `total_minutes` and `capacity_matches` are 0.
    pub fn compute(rings: u32, start: TimeOfDay, end: TimeOfDay, match_minutes: u32) -> Self {
        let total_minutes = end.minutes().saturating_sub(start.minutes());

        let capacity_matches = match match_minutes {
            0 => 0,
            m => u32::try_from(u64::from(rings) * u64::from(total_minutes) / u64::from(m))
                .unwrap_or(u32::MAX),
        };

        log::debug!(
            "Capacity of {} rings for {} minutes at {} minutes per match: {} matches",
            rings,
            total_minutes,
            match_minutes,
            capacity_matches
        );

        Self {
            start: start.minutes(),
            end: end.minutes(),
            total_minutes,
            capacity_matches,
            rings,
            match_minutes,
        }
    }

    /// Returns `true` if the window is not empty.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.total_minutes > 0
    }

    /// Returns the number of whole match slots on every ring, times the number of rings.
    ///
    /// This can be smaller than `capacity_matches`, which ignores that a match cannot be split
    /// between two rings.
    #[inline]
    pub fn ring_slots(&self) -> u32 {
        match self.match_minutes {
            0 => 0,
            m => (self.total_minutes / m).saturating_mul(self.rings.max(1)),
        }
    }

    /// Returns the share of the capacity used by `matches` in percent, rounded to the
    /// nearest integer. Returns 0 if the capacity is 0.
    #[inline]
    pub fn utilization(&self, matches: usize) -> u32 {
        match u64::from(self.capacity_matches) {
            0 => 0,
            cap => ((200 * matches as u64 + cap) / (2 * cap)) as u32,
        }
    }

    /// Returns `true` if `matches` exceeds the capacity.
    #[inline]
    pub fn is_exceeded_by(&self, matches: usize) -> bool {
        matches > self.capacity_matches as usize
    }
}

#[cfg(test)]
mod tests {
    use super::Capacity;
    use crate::TimeOfDay;

    fn capacity(rings: u32, start: &str, end: &str, match_minutes: u32) -> Capacity {
        Capacity::compute(
            rings,
            start.parse::<TimeOfDay>().unwrap(),
            end.parse::<TimeOfDay>().unwrap(),
            match_minutes,
        )
    }

    #[test]
    fn test_capacity() {
        let cap = capacity(4, "09:00", "11:00", 4);
        assert_eq!(cap.start, 540);
        assert_eq!(cap.end, 660);
        assert_eq!(cap.total_minutes, 120);
        assert_eq!(cap.capacity_matches, 120);
        assert!(cap.is_valid());

        let cap = capacity(3, "09:00", "09:10", 4);
        assert_eq!(cap.capacity_matches, 7);
        assert_eq!(cap.ring_slots(), 6);

        for rings in 1..6 {
            for minutes in 1..10 {
                let cap = capacity(rings, "08:15", "12:40", minutes);
                assert_eq!(cap.capacity_matches, rings * 265 / minutes);
            }
        }
    }

    #[test]
    fn test_capacity_saturates() {
        let cap = capacity(u32::MAX, "00:00", "23:59", 1);
        assert_eq!(cap.capacity_matches, u32::MAX);
        assert_eq!(cap.ring_slots(), u32::MAX);
        assert!(!cap.is_exceeded_by(u32::MAX as usize));
    }

    #[test]
    fn test_capacity_empty_window() {
        let cap = capacity(4, "11:00", "09:00", 4);
        assert_eq!(cap.total_minutes, 0);
        assert_eq!(cap.capacity_matches, 0);
        assert!(!cap.is_valid());
        assert_eq!(cap.utilization(10), 0);
    }

    #[test]
    fn test_capacity_utilization() {
        let cap = capacity(4, "09:00", "11:00", 4);
        assert_eq!(cap.utilization(31), 26);
        assert_eq!(cap.utilization(120), 100);
        assert_eq!(cap.utilization(3), 3);
        // 1/120 = 0.83% rounds up.
        assert_eq!(cap.utilization(1), 1);
        assert!(!cap.is_exceeded_by(120));
        assert!(cap.is_exceeded_by(121));
    }
}
