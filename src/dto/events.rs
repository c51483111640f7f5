//! Broadcast events describing what changed in a channel.

use serde::Serialize;

use crate::state::{
    engine::{PlayerId, Side, TeamId},
    registry::ChannelId,
};

/// Event published for a channel after the engine state changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEvent {
    /// Channel the event belongs to.
    pub channel_id: ChannelId,
    /// What happened.
    #[serde(flatten)]
    pub event: GameEvent,
}

/// Game-level notifications consumed by chat, voice and status collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A reader started a game in the channel.
    GameStarted {
        /// Reader running the game.
        reader_id: PlayerId,
    },
    /// The reader role was handed over.
    ReaderChanged {
        /// New reader.
        reader_id: PlayerId,
    },
    /// A player should now answer.
    PlayerPrompted {
        /// Player being prompted.
        player_id: PlayerId,
        /// Name to display for the player.
        display_name: String,
    },
    /// Nobody is eligible to answer right now.
    QueueCleared,
    /// A player withdrew their buzz.
    PlayerWithdrawn {
        /// Player who withdrew.
        player_id: PlayerId,
    },
    /// The reader scored a buzz.
    ScoreRecorded {
        /// Player who was scored.
        player_id: PlayerId,
        /// Team the player buzzed for.
        team_id: Option<TeamId>,
        /// Points awarded.
        points: i32,
    },
    /// The last scoring action was reversed.
    ScoreUndone {
        /// Player whose buzz was reinstated.
        player_id: PlayerId,
    },
    /// A correct tossup earned `side` a bonus.
    BonusStarted {
        /// Side playing the bonus.
        side: Side,
    },
    /// The reader scored the bonus.
    BonusRecorded {
        /// Side credited.
        side: Side,
        /// Bonus points awarded.
        points: i32,
    },
    /// The last bonus score was reversed.
    BonusUndone {
        /// Side whose bonus is open again.
        side: Side,
    },
    /// Bonus tracking was switched on or off.
    BonusesToggled {
        /// Whether correct tossups now lead into a bonus.
        enabled: bool,
    },
    /// The reader added a team.
    TeamAdded {
        /// Id assigned to the team.
        team_id: TeamId,
        /// Team name.
        name: String,
    },
    /// The reader removed a team.
    TeamRemoved {
        /// Id of the removed team.
        team_id: TeamId,
        /// Team name.
        name: String,
    },
    /// A player joined a team.
    PlayerJoinedTeam {
        /// Player who joined.
        player_id: PlayerId,
        /// Team joined.
        team_id: TeamId,
    },
    /// A player left a team or was removed from it.
    PlayerLeftTeam {
        /// Player who left.
        player_id: PlayerId,
        /// Team left.
        team_id: TeamId,
    },
    /// The game in this channel is over.
    GameEnded {
        /// Why the game ended.
        reason: EndReason,
    },
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The reader ended the game.
    ReaderCommand,
    /// The reader left and did not come back.
    ReaderLeft,
}
