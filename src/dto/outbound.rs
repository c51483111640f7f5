//! Lines written by the transcript driver.

use serde::Serialize;

use crate::{
    dto::{events::ChannelEvent, score::ScoreSummary},
    state::registry::ChannelId,
};

/// One line written by the transcript driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DriverOutput {
    /// A broadcast channel event.
    Event(ChannelEvent),
    /// A reader command was refused.
    CommandFailed {
        /// Channel the command targeted.
        channel_id: ChannelId,
        /// Why it was refused.
        message: String,
    },
    /// Reply to the `score` command.
    Scoreboard {
        /// Channel the scoreboard belongs to.
        channel_id: ChannelId,
        /// Tossup and bonus rows.
        #[serde(flatten)]
        summary: ScoreSummary,
    },
}
