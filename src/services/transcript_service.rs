//! Line-oriented driver: reads JSON [`InboundEvent`]s, routes them to the services and writes every
//! resulting event or reply as one JSON line.

use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    sync::broadcast::{Receiver, error::TryRecvError},
};
use tracing::{debug, info, warn};

use crate::{
    dto::{
        events::ChannelEvent,
        inbound::{ChatCommand, InboundEvent},
        outbound::DriverOutput,
    },
    error::ServiceError,
    services::{message_service, presence_service, reader_service, team_service},
    state::{SharedState, engine::PlayerId, registry::ChannelId},
};

/// Errors that stop the driver.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Reading input or writing output failed.
    #[error("transcript i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// An output line could not be serialized.
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Process `input` until end of stream, writing outputs to `output`.
///
/// Malformed lines are logged and skipped.
pub async fn run<R, W>(state: SharedState, input: R, mut output: W) -> Result<(), TranscriptError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = state.subscribe();
    let mut lines = input.lines();
    let mut processed = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let inbound = match InboundEvent::from_json_str(line) {
            Ok(inbound) => inbound,
            Err(err) => {
                warn!(error = %err, payload = %line, "failed to parse transcript line");
                continue;
            }
        };

        let reply = dispatch(&state, inbound);
        processed += 1;

        drain_events(&mut events, &mut output).await?;
        if let Some(reply) = reply {
            write_line(&mut output, &reply).await?;
        }
    }

    output.flush().await?;
    info!(processed, "transcript finished");
    Ok(())
}

/// Route one inbound event, returning a direct reply for commands that produce one.
pub fn dispatch(state: &SharedState, inbound: InboundEvent) -> Option<DriverOutput> {
    match inbound {
        InboundEvent::Message(message) => {
            message_service::handle_message(state, message);
            None
        }
        InboundEvent::Command {
            channel_id,
            author_id,
            command,
        } => run_command(state, channel_id, author_id, command),
        InboundEvent::Presence { user_id, online } => {
            if online {
                debug!(user_id, "user online");
            } else {
                presence_service::end_games_for_reader(state, user_id);
            }
            None
        }
    }
}

fn run_command(
    state: &SharedState,
    channel_id: ChannelId,
    author_id: PlayerId,
    command: ChatCommand,
) -> Option<DriverOutput> {
    debug!(channel_id, author_id, command = ?command, "running command");
    let result = match command {
        ChatCommand::Read => reader_service::start_game(state, channel_id, author_id),
        ChatCommand::SetNewReader { reader_id } => {
            reader_service::set_new_reader(state, channel_id, author_id, reader_id)
        }
        ChatCommand::Next => reader_service::next_question(state, channel_id, author_id),
        ChatCommand::Clear => reader_service::clear_round(state, channel_id, author_id),
        ChatCommand::Undo => reader_service::undo(state, channel_id, author_id).map(|_| ()),
        ChatCommand::End => reader_service::end_game(state, channel_id, author_id),
        ChatCommand::EnableBonuses => {
            reader_service::set_bonuses(state, channel_id, author_id, true)
        }
        ChatCommand::DisableBonuses => {
            reader_service::set_bonuses(state, channel_id, author_id, false)
        }
        ChatCommand::AddTeam { team } => {
            team_service::add_team(state, channel_id, author_id, &team)
        }
        ChatCommand::RemoveTeam { team } => {
            team_service::remove_team(state, channel_id, author_id, &team)
        }
        ChatCommand::RemovePlayer { player_id } => {
            team_service::remove_player(state, channel_id, author_id, player_id)
        }
        ChatCommand::JoinTeam { team } => {
            team_service::join_team(state, channel_id, author_id, &team)
        }
        ChatCommand::LeaveTeam => team_service::leave_team(state, channel_id, author_id),
        ChatCommand::Score => {
            return Some(match reader_service::score_summary(state, channel_id) {
                Ok(summary) => DriverOutput::Scoreboard {
                    channel_id,
                    summary,
                },
                Err(err) => command_failed(channel_id, err),
            });
        }
    };

    result.err().map(|err| command_failed(channel_id, err))
}

fn command_failed(channel_id: ChannelId, err: ServiceError) -> DriverOutput {
    warn!(channel_id, error = %err, "command refused");
    DriverOutput::CommandFailed {
        channel_id,
        message: err.to_string(),
    }
}

async fn drain_events<W>(
    events: &mut Receiver<ChannelEvent>,
    output: &mut W,
) -> Result<(), TranscriptError>
where
    W: AsyncWrite + Unpin,
{
    loop {
        match events.try_recv() {
            Ok(event) => write_line(output, &DriverOutput::Event(event)).await?,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "event feed lagged; some events were dropped");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return Ok(()),
        }
    }
}

async fn write_line<W>(output: &mut W, value: &DriverOutput) -> Result<(), TranscriptError>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_vec(value)?;
    payload.push(b'\n');
    output.write_all(&payload).await?;
    Ok(())
}
