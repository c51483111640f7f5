//! Transcript input: chat messages, bot commands and presence updates.

use serde::Deserialize;

use crate::state::{
    engine::{PlayerId, TeamId},
    registry::ChannelId,
};

/// A chat message posted in a channel, stripped of platform types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    /// Channel the message was posted in.
    pub channel_id: ChannelId,
    /// Author of the message.
    pub author_id: PlayerId,
    /// Name to show when the author is prompted.
    pub display_name: String,
    /// Team the author plays for, if teams are in use.
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Raw message text.
    pub content: String,
}

/// Bot commands issued in a channel.
///
/// `read`, `score`, `join_team` and `leave_team` are open to everyone; the rest are reserved for
/// the channel's reader.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ChatCommand {
    /// Start a game with the issuer as reader.
    Read,
    /// Hand the reader role to someone else.
    SetNewReader {
        /// User taking over.
        reader_id: PlayerId,
    },
    /// Nobody got it; move to the next question.
    Next,
    /// Restart the current question.
    Clear,
    /// Reverse the last scoring action.
    Undo,
    /// End the game.
    #[serde(alias = "stop")]
    End,
    /// Show the scoreboard.
    Score,
    /// Add a team to the game.
    AddTeam {
        /// Name of the new team.
        team: String,
    },
    /// Remove a team and release its players.
    RemoveTeam {
        /// Name of the team to remove.
        team: String,
    },
    /// Take a player off their team.
    RemovePlayer {
        /// Player to remove.
        player_id: PlayerId,
    },
    /// Track bonuses after correct tossups. Resets the current cycle.
    EnableBonuses,
    /// Track tossups only. Resets the current cycle.
    DisableBonuses,
    /// Join a team the reader added.
    JoinTeam {
        /// Name of the team to join.
        team: String,
    },
    /// Leave the issuer's team.
    LeaveTeam,
}

/// One line of the transcript fed to the driver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A chat message.
    Message(ChatMessage),
    /// A bot command.
    Command {
        /// Channel the command was issued in.
        channel_id: ChannelId,
        /// User issuing the command.
        author_id: PlayerId,
        /// Command to run.
        command: ChatCommand,
    },
    /// A user's presence changed.
    Presence {
        /// User whose status changed.
        user_id: PlayerId,
        /// Whether the user is still online.
        online: bool,
    },
}

impl InboundEvent {
    /// Parse one JSON transcript line.
    pub fn from_json_str(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_message_without_team() {
        let event = InboundEvent::from_json_str(
            r#"{"type":"message","channel_id":1,"author_id":2,"display_name":"Bo","content":"buzz"}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            InboundEvent::Message(ChatMessage {
                channel_id: 1,
                author_id: 2,
                display_name: "Bo".into(),
                team_id: None,
                content: "buzz".into(),
            })
        );
    }

    #[test]
    fn parses_commands_and_aliases() {
        let event = InboundEvent::from_json_str(
            r#"{"type":"command","channel_id":1,"author_id":2,"command":{"name":"stop"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Command {
                channel_id: 1,
                author_id: 2,
                command: ChatCommand::End,
            }
        );

        let event = InboundEvent::from_json_str(
            r#"{"type":"command","channel_id":1,"author_id":2,"command":{"name":"set_new_reader","reader_id":3}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Command {
                channel_id: 1,
                author_id: 2,
                command: ChatCommand::SetNewReader { reader_id: 3 },
            }
        );
    }

    #[test]
    fn parses_team_commands() {
        let event = InboundEvent::from_json_str(
            r#"{"type":"command","channel_id":1,"author_id":2,"command":{"name":"add_team","team":"Red"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Command {
                channel_id: 1,
                author_id: 2,
                command: ChatCommand::AddTeam { team: "Red".into() },
            }
        );

        let event = InboundEvent::from_json_str(
            r#"{"type":"command","channel_id":1,"author_id":2,"command":{"name":"enable_bonuses"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            InboundEvent::Command {
                channel_id: 1,
                author_id: 2,
                command: ChatCommand::EnableBonuses,
            }
        );
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(InboundEvent::from_json_str(r#"{"type":"reaction"}"#).is_err());
    }
}
