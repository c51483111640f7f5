//! Bonus tracking: after a correct tossup, the answering side plays a bonus the reader scores.

use indexmap::IndexMap;
use serde::Serialize;

use crate::state::engine::Side;

/// Bonus totals for one side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BonusStats {
    /// Bonuses played.
    pub heard: u32,
    /// Points earned on bonuses.
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BonusAction {
    side: Side,
    previous: Option<BonusStats>,
    // Tossup scoring actions on record when the bonus was scored; ties the bonus to its tossup.
    tossups_scored: usize,
}

/// Bonus stage and bonus totals for one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusTracker {
    enabled: bool,
    pending: Option<Side>,
    totals: IndexMap<Side, BonusStats>,
    history: Vec<BonusAction>,
}

impl BonusTracker {
    /// Whether correct tossups lead into a bonus.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Switch bonus tracking on or off, abandoning any bonus in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.pending = None;
    }

    /// Side whose bonus the reader is waiting to score.
    pub fn pending(&self) -> Option<Side> {
        self.pending
    }

    /// Hand the bonus to `side` after a correct tossup. Returns whether a bonus started.
    pub fn offer(&mut self, side: Side) -> bool {
        if self.enabled {
            self.pending = Some(side);
        }
        self.enabled
    }

    /// Abandon the bonus in progress, if any.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Score the pending bonus, returning the side credited.
    pub fn record(&mut self, points: i32, tossups_scored: usize) -> Option<Side> {
        let side = self.pending.take()?;
        let previous = self.totals.get(&side).copied();
        let stats = previous.unwrap_or_default();
        self.totals.insert(
            side,
            BonusStats {
                heard: stats.heard.saturating_add(1),
                points: stats.points.saturating_add(points),
            },
        );
        self.history.push(BonusAction {
            side,
            previous,
            tossups_scored,
        });
        Some(side)
    }

    /// Reverse the latest bonus if no tossup was scored after it, reopening that bonus.
    pub fn undo_last(&mut self, tossups_scored: usize) -> Option<Side> {
        let last = self.history.last()?;
        if last.tossups_scored != tossups_scored {
            return None;
        }

        let action = self.history.pop()?;
        match action.previous {
            Some(stats) => {
                self.totals.insert(action.side, stats);
            }
            None => {
                self.totals.shift_remove(&action.side);
            }
        }
        self.pending = Some(action.side);
        Some(action.side)
    }

    /// Bonus totals per side, in the order sides first played a bonus.
    pub fn totals(&self) -> &IndexMap<Side, BonusStats> {
        &self.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_tracker_never_starts_a_bonus() {
        let mut bonuses = BonusTracker::default();
        assert!(!bonuses.offer(Side::Team(1)));
        assert_eq!(bonuses.pending(), None);
        assert_eq!(bonuses.record(20, 1), None);
    }

    #[test]
    fn pending_bonus_is_credited_once() {
        let mut bonuses = BonusTracker::default();
        bonuses.set_enabled(true);
        assert!(bonuses.offer(Side::Team(1)));

        assert_eq!(bonuses.record(20, 1), Some(Side::Team(1)));
        assert_eq!(bonuses.record(10, 1), None);
        assert_eq!(
            bonuses.totals()[&Side::Team(1)],
            BonusStats {
                heard: 1,
                points: 20
            }
        );
    }

    #[test]
    fn toggling_abandons_pending_bonus() {
        let mut bonuses = BonusTracker::default();
        bonuses.set_enabled(true);
        bonuses.offer(Side::Solo(4));
        bonuses.set_enabled(true);
        assert_eq!(bonuses.pending(), None);
    }

    #[test]
    fn undo_reopens_latest_bonus() {
        let mut bonuses = BonusTracker::default();
        bonuses.set_enabled(true);
        bonuses.offer(Side::Team(1));
        bonuses.record(10, 1);
        bonuses.offer(Side::Team(1));
        bonuses.record(30, 2);

        assert_eq!(bonuses.undo_last(2), Some(Side::Team(1)));
        assert_eq!(bonuses.pending(), Some(Side::Team(1)));
        assert_eq!(bonuses.totals()[&Side::Team(1)].points, 10);

        bonuses.cancel_pending();
        assert_eq!(bonuses.undo_last(1), Some(Side::Team(1)));
        assert!(bonuses.totals().is_empty());
    }

    #[test]
    fn undo_leaves_bonus_of_an_earlier_tossup() {
        let mut bonuses = BonusTracker::default();
        bonuses.set_enabled(true);
        bonuses.offer(Side::Team(1));
        bonuses.record(10, 1);

        assert_eq!(bonuses.undo_last(2), None);
        assert_eq!(bonuses.totals()[&Side::Team(1)].points, 10);
    }
}
