//! Turn queue and scoring engine for a single channel.
//!
//! The engine is synchronous and in-memory. Every operation is total: failures are reported through
//! `bool`/`Option` return values and leave the state untouched.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use serde::Serialize;

/// Identifier of a participant (reader or player).
pub type PlayerId = u64;
/// Identifier of a team a player buzzes for.
pub type TeamId = u64;

/// One participant's claim on the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buzz {
    /// Player who buzzed.
    pub player_id: PlayerId,
    /// Name shown when the player is prompted.
    pub display_name: String,
    /// Team the player buzzed for, if any.
    pub team_id: Option<TeamId>,
}

impl Buzz {
    /// Key used to exclude the buzzer's side after a missed answer.
    pub fn side(&self) -> Side {
        match self.team_id {
            Some(team_id) => Side::Team(team_id),
            None => Side::Solo(self.player_id),
        }
    }

    /// Ledger key this buzz is scored under.
    pub fn pair(&self) -> PlayerTeamPair {
        PlayerTeamPair {
            player_id: self.player_id,
            team_id: self.team_id,
        }
    }
}

/// Unit of eligibility: a team, or a player without a team acting as their own team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Side {
    /// Every member of this team shares one attempt per question.
    Team(TeamId),
    /// Player buzzing without a team.
    Solo(PlayerId),
}

/// Ledger key: a player scored while buzzing for a given team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PlayerTeamPair {
    /// Player who earned the points.
    pub player_id: PlayerId,
    /// Team the player buzzed for at the time.
    pub team_id: Option<TeamId>,
}

/// Cumulative score for one [`PlayerTeamPair`] over a whole game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoringSplit {
    /// Running point total.
    pub points: i32,
    /// Answers scored below zero.
    pub negs: u32,
    /// Answers scored exactly zero.
    pub no_penalties: u32,
    /// Answers scored 10.
    pub gets: u32,
    /// Answers scored 15.
    pub powers: u32,
    /// Answers scored 20.
    pub superpowers: u32,
}

impl ScoringSplit {
    /// Return a copy of the split with `points` added and the matching tally bumped.
    ///
    /// Point values outside the usual tossup values only move the total. Totals and tallies
    /// saturate instead of overflowing.
    pub fn with_points(mut self, points: i32) -> Self {
        self.points = self.points.saturating_add(points);
        let tally = match points {
            p if p < 0 => &mut self.negs,
            0 => &mut self.no_penalties,
            10 => &mut self.gets,
            15 => &mut self.powers,
            20 => &mut self.superpowers,
            _ => return self,
        };
        *tally = tally.saturating_add(1);
        self
    }
}

/// Everything needed to reverse one resolved scoring event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringAction {
    /// Buzz that was scored.
    pub buzz: Buzz,
    /// Points awarded.
    pub points: i32,
    /// Split for the buzz's pair before the points were added (`None` if it had no entry).
    pub previous_split: Option<ScoringSplit>,
    #[serde(skip)]
    previous_queue: VecDeque<Buzz>,
    #[serde(skip)]
    previous_attempted: HashSet<PlayerId>,
    #[serde(skip)]
    previous_ineligible: HashSet<Side>,
}

/// Ledger export row: the running split plus the most recent action recorded for the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Cumulative split.
    pub split: ScoringSplit,
    /// Latest scoring action for this key.
    pub last_action: ScoringAction,
}

/// Per-channel game state: buzz queue, cycle eligibility, lifetime ledger and undo history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Engine {
    reader_id: Option<PlayerId>,
    queue: VecDeque<Buzz>,
    attempted: HashSet<PlayerId>,
    ineligible: HashSet<Side>,
    ledger: IndexMap<PlayerTeamPair, ScoringSplit>,
    history: Vec<ScoringAction>,
}

/// Index of the first queued buzz whose side has not been excluded this cycle.
fn first_eligible(queue: &VecDeque<Buzz>, ineligible: &HashSet<Side>) -> Option<usize> {
    queue
        .iter()
        .position(|buzz| !ineligible.contains(&buzz.side()))
}

impl Engine {
    /// Create an empty engine with no reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Participant allowed to score; never eligible to buzz.
    pub fn reader_id(&self) -> Option<PlayerId> {
        self.reader_id
    }

    /// Assign (or clear) the reader.
    ///
    /// A reader who is sitting in the queue is withdrawn first.
    pub fn set_reader(&mut self, reader_id: Option<PlayerId>) {
        if let Some(id) = reader_id {
            self.withdraw_player(id);
        }
        self.reader_id = reader_id;
    }

    /// Queue a buzz. Fails for the reader and for anyone who already attempted this cycle.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        display_name: impl Into<String>,
        team_id: Option<TeamId>,
    ) -> bool {
        if self.reader_id == Some(player_id) || self.attempted.contains(&player_id) {
            return false;
        }

        self.queue.push_back(Buzz {
            player_id,
            display_name: display_name.into(),
            team_id,
        });
        self.attempted.insert(player_id);
        true
    }

    /// Pull a queued player out, releasing their attempt for this cycle.
    pub fn withdraw_player(&mut self, player_id: PlayerId) -> bool {
        let Some(index) = self
            .queue
            .iter()
            .position(|buzz| buzz.player_id == player_id)
        else {
            return false;
        };

        self.queue.remove(index);
        self.attempted.remove(&player_id);
        true
    }

    /// Player who would be prompted (and scored) next.
    pub fn next_player(&self) -> Option<PlayerId> {
        self.next_buzz().map(|buzz| buzz.player_id)
    }

    /// Buzz of the player who would be prompted next.
    pub fn next_buzz(&self) -> Option<&Buzz> {
        first_eligible(&self.queue, &self.ineligible).and_then(|index| self.queue.get(index))
    }

    /// Score the current eligible player, returning who was scored.
    ///
    /// Positive points resolve the question; anything else locks the player's side out for the rest of
    /// the cycle. Without an eligible player this is a no-op returning `None`.
    pub fn score_player(&mut self, points: i32) -> Option<PlayerId> {
        let index = first_eligible(&self.queue, &self.ineligible)?;
        let pair = self.queue[index].pair();
        let previous_split = self.ledger.get(&pair).copied();

        let action = ScoringAction {
            buzz: self.queue[index].clone(),
            points,
            previous_split,
            previous_queue: self.queue.clone(),
            previous_attempted: self.attempted.clone(),
            previous_ineligible: self.ineligible.clone(),
        };

        let buzz = self.queue.remove(index)?;
        let split = previous_split.unwrap_or_default().with_points(points);
        self.ledger.insert(pair, split);

        if points > 0 {
            self.reset_cycle();
        } else {
            self.ineligible.insert(buzz.side());
        }

        self.history.push(action);
        Some(buzz.player_id)
    }

    /// Reverse the most recent scoring action, returning the reinstated player.
    ///
    /// The queue and eligibility go back to how they were before the score. Buzzes that arrived
    /// since then stay queued behind the restored ones.
    pub fn undo(&mut self) -> Option<PlayerId> {
        let action = self.history.pop()?;
        let pair = action.buzz.pair();

        match action.previous_split {
            Some(split) => {
                self.ledger.insert(pair, split);
            }
            None => {
                self.ledger.shift_remove(&pair);
            }
        }

        let mut queue = action.previous_queue;
        for buzz in std::mem::take(&mut self.queue) {
            if !queue.iter().any(|queued| queued.player_id == buzz.player_id) {
                queue.push_back(buzz);
            }
        }
        // The reader may have changed since the score.
        queue.retain(|buzz| Some(buzz.player_id) != self.reader_id);

        self.queue = queue;
        self.attempted.extend(action.previous_attempted);
        self.ineligible = action.previous_ineligible;

        Some(action.buzz.player_id)
    }

    /// Restart the current question without touching scores or history.
    pub fn clear_current_round(&mut self) {
        self.reset_cycle();
    }

    /// Move on to a new question. Same transition as [`Engine::clear_current_round`].
    pub fn next_question(&mut self) {
        self.reset_cycle();
    }

    /// End the game: forget everything, including the reader.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Number of scoring actions that can still be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether any scoring action can be undone.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Export the ledger paired with the latest action recorded for each key.
    pub fn ledger_snapshot(&self) -> IndexMap<PlayerTeamPair, LedgerEntry> {
        self.ledger
            .iter()
            .filter_map(|(pair, split)| {
                let last_action = self
                    .history
                    .iter()
                    .rev()
                    .find(|action| action.buzz.pair() == *pair)?;
                Some((
                    *pair,
                    LedgerEntry {
                        split: *split,
                        last_action: last_action.clone(),
                    },
                ))
            })
            .collect()
    }

    fn reset_cycle(&mut self) {
        self.queue.clear();
        self.attempted.clear();
        self.ineligible.clear();
    }
}
