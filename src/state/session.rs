//! Everything one channel's game tracks, guarded together by the channel lock.

use crate::state::{
    bonus::BonusTracker,
    engine::{Engine, PlayerId, Side},
    teams::TeamRoster,
};

/// What an undo reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undone {
    /// A bonus score; the bonus is open again for this side.
    Bonus(Side),
    /// A tossup score; the player is back in the queue.
    Tossup(PlayerId),
}

/// Tossup engine plus the channel's team roster and bonus tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSession {
    /// Buzz queue, tossup ledger and tossup undo history.
    pub engine: Engine,
    /// Teams set up by the reader.
    pub teams: TeamRoster,
    /// Bonus stage and bonus totals.
    pub bonuses: BonusTracker,
}

impl GameSession {
    /// Restart the current question, abandoning any bonus in progress.
    pub fn clear_current_round(&mut self) {
        self.engine.clear_current_round();
        self.bonuses.cancel_pending();
    }

    /// Move on to a new question, abandoning any bonus in progress.
    pub fn next_question(&mut self) {
        self.engine.next_question();
        self.bonuses.cancel_pending();
    }

    /// Switch bonus tracking, resetting the current cycle like [`GameSession::clear_current_round`].
    pub fn set_bonuses(&mut self, enabled: bool) {
        self.engine.clear_current_round();
        self.bonuses.set_enabled(enabled);
    }

    /// Reverse the most recent score, bonus or tossup.
    pub fn undo(&mut self) -> Option<Undone> {
        if let Some(side) = self.bonuses.undo_last(self.engine.history_len()) {
            return Some(Undone::Bonus(side));
        }

        let player_id = self.engine.undo()?;
        self.bonuses.cancel_pending();
        Some(Undone::Tossup(player_id))
    }

    /// End the game: forget the reader, scores, teams and bonus settings.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_correct_tossup() -> GameSession {
        let mut session = GameSession::default();
        session.set_bonuses(true);
        assert!(session.engine.add_player(1, "P1", Some(7)));
        session.engine.score_player(10);
        assert!(session.bonuses.offer(Side::Team(7)));
        session
    }

    #[test]
    fn undo_reverses_bonus_before_its_tossup() {
        let mut session = with_correct_tossup();
        session.bonuses.record(20, session.engine.history_len());

        assert_eq!(session.undo(), Some(Undone::Bonus(Side::Team(7))));
        assert_eq!(session.bonuses.pending(), Some(Side::Team(7)));
        assert!(session.bonuses.totals().is_empty());

        assert_eq!(session.undo(), Some(Undone::Tossup(1)));
        assert_eq!(session.bonuses.pending(), None);
        assert_eq!(session.engine.next_player(), Some(1));
        assert_eq!(session.undo(), None);
    }

    #[test]
    fn bonus_of_earlier_tossup_survives_later_undo() {
        let mut session = with_correct_tossup();
        session.bonuses.record(20, session.engine.history_len());
        assert!(session.engine.add_player(2, "P2", Some(8)));
        session.engine.score_player(-5);

        assert_eq!(session.undo(), Some(Undone::Tossup(2)));
        assert_eq!(session.bonuses.totals()[&Side::Team(7)].points, 20);
    }

    #[test]
    fn next_question_abandons_pending_bonus() {
        let mut session = with_correct_tossup();
        session.next_question();
        assert_eq!(session.bonuses.pending(), None);
        assert!(session.bonuses.enabled());
    }

    #[test]
    fn toggling_bonuses_resets_the_cycle() {
        let mut session = GameSession::default();
        assert!(session.engine.add_player(1, "P1", None));
        session.engine.score_player(-5);

        session.set_bonuses(true);
        assert!(session.engine.add_player(1, "P1", None));
        assert_eq!(session.engine.next_player(), Some(1));
    }

    #[test]
    fn clear_all_forgets_teams_and_bonuses() {
        let mut session = with_correct_tossup();
        session.teams.add_team("Red");
        session.clear_all();
        assert_eq!(session, GameSession::default());
    }
}
