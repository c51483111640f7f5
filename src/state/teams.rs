//! Teams a reader sets up for a channel, and which player plays for which.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::state::engine::{PlayerId, TeamId};

/// Per-channel team roster.
///
/// While the roster is empty, buzzes keep the team the platform reported. Once the reader adds a
/// team, the roster alone decides who plays for whom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    teams: IndexMap<TeamId, String>,
    members: HashMap<PlayerId, TeamId>,
    last_id: TeamId,
}

impl TeamRoster {
    /// Whether no team has been added.
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Add a team. Fails for blank names and names already taken (ignoring case).
    pub fn add_team(&mut self, name: &str) -> Option<TeamId> {
        let name = name.trim();
        if name.is_empty() || self.find(name).is_some() {
            return None;
        }

        self.last_id += 1;
        self.teams.insert(self.last_id, name.to_owned());
        Some(self.last_id)
    }

    /// Remove a team and release its members, returning its id and stored name.
    pub fn remove_team(&mut self, name: &str) -> Option<(TeamId, String)> {
        let team_id = self.find(name)?;
        let name = self.teams.shift_remove(&team_id)?;
        self.members.retain(|_, member_team| *member_team != team_id);
        Some((team_id, name))
    }

    /// Put `player_id` on the named team, moving them off any previous one.
    pub fn join(&mut self, player_id: PlayerId, name: &str) -> Option<TeamId> {
        let team_id = self.find(name)?;
        self.members.insert(player_id, team_id);
        Some(team_id)
    }

    /// Take `player_id` off their team, returning the team they left.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Option<TeamId> {
        self.members.remove(&player_id)
    }

    /// Team `player_id` is on.
    pub fn team_of(&self, player_id: PlayerId) -> Option<TeamId> {
        self.members.get(&player_id).copied()
    }

    /// Name of a team added to the roster.
    pub fn team_name(&self, team_id: TeamId) -> Option<&str> {
        self.teams.get(&team_id).map(String::as_str)
    }

    /// Team a buzz from `player_id` counts for, given the team the platform reported.
    pub fn resolve(&self, player_id: PlayerId, reported: Option<TeamId>) -> Option<TeamId> {
        if self.is_empty() {
            reported
        } else {
            self.team_of(player_id)
        }
    }

    fn find(&self, name: &str) -> Option<TeamId> {
        let name = name.trim();
        self.teams
            .iter()
            .find(|(_, existing)| existing.eq_ignore_ascii_case(name))
            .map(|(team_id, _)| *team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_names_are_unique_ignoring_case() {
        let mut roster = TeamRoster::default();
        assert_eq!(roster.add_team("Red"), Some(1));
        assert_eq!(roster.add_team(" red "), None);
        assert_eq!(roster.add_team("   "), None);
        assert_eq!(roster.add_team("Blue"), Some(2));
        assert_eq!(roster.team_name(2), Some("Blue"));
    }

    #[test]
    fn joining_moves_player_between_teams() {
        let mut roster = TeamRoster::default();
        let red = roster.add_team("Red").unwrap();
        let blue = roster.add_team("Blue").unwrap();

        assert_eq!(roster.join(5, "red"), Some(red));
        assert_eq!(roster.join(5, "BLUE"), Some(blue));
        assert_eq!(roster.team_of(5), Some(blue));
        assert_eq!(roster.join(5, "Green"), None);
        assert_eq!(roster.team_of(5), Some(blue));
    }

    #[test]
    fn removing_team_releases_members() {
        let mut roster = TeamRoster::default();
        let red = roster.add_team("Red").unwrap();
        roster.join(5, "Red");
        roster.join(6, "Red");

        assert_eq!(roster.remove_team("RED"), Some((red, "Red".to_owned())));
        assert_eq!(roster.team_of(5), None);
        assert_eq!(roster.team_of(6), None);
        assert_eq!(roster.remove_team("Red"), None);
    }

    #[test]
    fn removed_team_id_is_not_reused() {
        let mut roster = TeamRoster::default();
        let red = roster.add_team("Red").unwrap();
        roster.remove_team("Red");
        assert_ne!(roster.add_team("Red"), Some(red));
    }

    #[test]
    fn remove_player_reports_their_team() {
        let mut roster = TeamRoster::default();
        let red = roster.add_team("Red").unwrap();
        roster.join(5, "Red");

        assert_eq!(roster.remove_player(5), Some(red));
        assert_eq!(roster.remove_player(5), None);
    }

    #[test]
    fn roster_overrides_reported_team_once_in_use() {
        let mut roster = TeamRoster::default();
        assert_eq!(roster.resolve(5, Some(900)), Some(900));

        let red = roster.add_team("Red").unwrap();
        assert_eq!(roster.resolve(5, Some(900)), None);
        roster.join(5, "Red");
        assert_eq!(roster.resolve(5, Some(900)), Some(red));
    }
}
