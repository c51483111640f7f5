//! Scoreboard rows derived from a channel's ledger and bonus totals.

use indexmap::IndexMap;
use serde::Serialize;

use crate::state::{
    bonus::BonusStats,
    engine::{LedgerEntry, PlayerId, PlayerTeamPair, ScoringSplit, Side, TeamId},
    session::GameSession,
};

/// Scoreboard row for one player/team pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreLine {
    /// Player the row belongs to.
    pub player_id: PlayerId,
    /// Name the player last buzzed with.
    pub display_name: String,
    /// Team the points were earned for.
    pub team_id: Option<TeamId>,
    /// Cumulative split.
    pub split: ScoringSplit,
}

impl From<(PlayerTeamPair, LedgerEntry)> for ScoreLine {
    fn from((pair, entry): (PlayerTeamPair, LedgerEntry)) -> Self {
        Self {
            player_id: pair.player_id,
            display_name: entry.last_action.buzz.display_name,
            team_id: pair.team_id,
            split: entry.split,
        }
    }
}

/// Bonus row for one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusLine {
    /// Side that played the bonuses.
    pub side: Side,
    /// Roster name of the team, when the side is a roster team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    /// Bonuses played and points earned.
    #[serde(flatten)]
    pub stats: BonusStats,
}

/// Reply to the `score` command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    /// Tossup rows, highest total first.
    pub scores: Vec<ScoreLine>,
    /// Bonus rows, highest total first. Omitted when no bonus was scored.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bonuses: Vec<BonusLine>,
}

impl ScoreSummary {
    /// Summarize a channel's tossup ledger and bonus totals.
    pub fn from_session(session: &GameSession) -> Self {
        let mut bonuses = session
            .bonuses
            .totals()
            .iter()
            .map(|(side, stats)| BonusLine {
                side: *side,
                team_name: match side {
                    Side::Team(team_id) => session.teams.team_name(*team_id).map(str::to_owned),
                    Side::Solo(_) => None,
                },
                stats: *stats,
            })
            .collect::<Vec<_>>();
        bonuses.sort_by(|a, b| b.stats.points.cmp(&a.stats.points));

        Self {
            scores: scoreboard(session.engine.ledger_snapshot()),
            bonuses,
        }
    }
}

/// Build scoreboard rows from a ledger snapshot, highest total first.
///
/// Ties keep the order in which players first scored.
pub fn scoreboard(snapshot: IndexMap<PlayerTeamPair, LedgerEntry>) -> Vec<ScoreLine> {
    let mut lines = snapshot
        .into_iter()
        .map(ScoreLine::from)
        .collect::<Vec<_>>();
    lines.sort_by(|a, b| b.split.points.cmp(&a.split.points));
    lines
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_names_roster_teams_in_bonus_rows() {
        let mut session = GameSession::default();
        let red = session.teams.add_team("Red").unwrap();
        session.teams.join(2, "Red");
        session.set_bonuses(true);

        let team_id = session.teams.resolve(2, None);
        assert!(session.engine.add_player(2, "P2", team_id));
        session.engine.score_player(10);
        session.bonuses.offer(Side::Team(red));
        session.bonuses.record(20, session.engine.history_len());

        let summary = ScoreSummary::from_session(&session);
        assert_eq!(summary.scores.len(), 1);
        assert_eq!(summary.scores[0].team_id, Some(red));
        assert_eq!(
            serde_json::to_value(&summary.bonuses).unwrap(),
            json!([{
                "side": { "kind": "team", "id": red },
                "team_name": "Red",
                "heard": 1,
                "points": 20,
            }])
        );
    }

    #[test]
    fn summary_without_bonuses_omits_them() {
        let summary = ScoreSummary::from_session(&GameSession::default());
        assert_eq!(serde_json::to_value(&summary).unwrap(), json!({ "scores": [] }));
    }
}
