//! Reader commands: starting and ending games, moving between questions, bonus tracking, undo
//! and the scoreboard.
//!
//! Every command except [`start_game`] and [`score_summary`] is gated on the issuer being the
//! channel's reader.

use tracing::{info, warn};

use crate::{
    dto::{
        events::{EndReason, GameEvent},
        score::ScoreSummary,
    },
    error::ServiceError,
    services::message_service::prompt_event,
    state::{
        SharedState,
        engine::PlayerId,
        registry::{ChannelId, SharedGame},
        session::{GameSession, Undone},
    },
};

/// Start a game in `channel_id` read by `reader_id`.
pub fn start_game(
    state: &SharedState,
    channel_id: ChannelId,
    reader_id: PlayerId,
) -> Result<(), ServiceError> {
    let game = state.games().get_or_create(channel_id);
    game.with_engine_mut(|engine| match engine.reader_id() {
        Some(current) if current == reader_id => Err(ServiceError::InvalidState(
            "you are already reading this game".into(),
        )),
        Some(current) => Err(ServiceError::InvalidState(format!(
            "user `{current}` is already reading in this channel"
        ))),
        None => {
            engine.set_reader(Some(reader_id));
            Ok(())
        }
    })?;

    info!(channel_id, reader_id, "game started");
    state.publish(channel_id, GameEvent::GameStarted { reader_id });
    Ok(())
}

/// Hand the reader role from `issuer` to `new_reader`.
pub fn set_new_reader(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
    new_reader: PlayerId,
) -> Result<(), ServiceError> {
    if issuer == new_reader {
        return Err(ServiceError::InvalidInput(
            "the new reader must be someone else".into(),
        ));
    }

    let game = require_game(state, channel_id)?;
    let prompt = with_reader_session(&game, issuer, |session| {
        let engine = &mut session.engine;
        let was_next = engine.next_player() == Some(new_reader);
        engine.set_reader(Some(new_reader));
        was_next.then(|| prompt_event(engine))
    })?;

    info!(channel_id, reader_id = new_reader, "reader changed");
    state.publish(
        channel_id,
        GameEvent::ReaderChanged {
            reader_id: new_reader,
        },
    );
    if let Some(event) = prompt {
        state.publish(channel_id, event);
    }
    Ok(())
}

/// Nobody answered correctly: drop the queue and move to a new question.
pub fn next_question(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    with_reader_session(&game, issuer, GameSession::next_question)?;
    state.publish(channel_id, GameEvent::QueueCleared);
    Ok(())
}

/// Restart the current question without touching anyone's score.
pub fn clear_round(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    with_reader_session(&game, issuer, GameSession::clear_current_round)?;
    state.publish(channel_id, GameEvent::QueueCleared);
    Ok(())
}

/// Switch bonus tracking on or off. Either way the current cycle starts over.
pub fn set_bonuses(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
    enabled: bool,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    with_reader_session(&game, issuer, |session| session.set_bonuses(enabled))?;

    info!(channel_id, enabled, "bonus tracking toggled");
    state.publish(channel_id, GameEvent::BonusesToggled { enabled });
    state.publish(channel_id, GameEvent::QueueCleared);
    Ok(())
}

/// Reverse the last score, bonus or tossup, and re-announce what is open again.
pub fn undo(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
) -> Result<Undone, ServiceError> {
    let game = require_game(state, channel_id)?;
    let (undone, prompt) = with_reader_session(&game, issuer, |session| {
        session
            .undo()
            .map(|undone| (undone, prompt_event(&session.engine)))
    })?
    .ok_or_else(|| ServiceError::InvalidState("there is no scoring action to undo".into()))?;

    match undone {
        Undone::Bonus(side) => {
            info!(channel_id, side = ?side, "bonus undone");
            state.publish(channel_id, GameEvent::BonusUndone { side });
            state.publish(channel_id, GameEvent::BonusStarted { side });
        }
        Undone::Tossup(player_id) => {
            info!(channel_id, player_id, "score undone");
            state.publish(channel_id, GameEvent::ScoreUndone { player_id });
            state.publish(channel_id, prompt);
        }
    }
    Ok(undone)
}

/// End the game, clearing all scores and freeing the channel for another reader.
pub fn end_game(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    with_reader_session(&game, issuer, GameSession::clear_all)?;

    if !state.games().remove_game(channel_id, &game) {
        warn!(channel_id, "game was already replaced while ending it");
    }

    info!(channel_id, "game ended by reader");
    state.publish(
        channel_id,
        GameEvent::GameEnded {
            reason: EndReason::ReaderCommand,
        },
    );
    Ok(())
}

/// Scoreboard for the channel's game. Anyone in the channel may ask for it.
pub fn score_summary(
    state: &SharedState,
    channel_id: ChannelId,
) -> Result<ScoreSummary, ServiceError> {
    let game = require_game(state, channel_id)?;
    Ok(game.with_session(ScoreSummary::from_session))
}

pub(crate) fn require_game(
    state: &SharedState,
    channel_id: ChannelId,
) -> Result<SharedGame, ServiceError> {
    state
        .games()
        .try_get(channel_id)
        .ok_or_else(|| ServiceError::no_game(channel_id))
}

/// Check the reader and run `f` under the same lock acquisition.
pub(crate) fn with_reader_session<F, T>(
    game: &SharedGame,
    issuer: PlayerId,
    f: F,
) -> Result<T, ServiceError>
where
    F: FnOnce(&mut GameSession) -> T,
{
    game.with_session_mut(|session| {
        if session.engine.reader_id() != Some(issuer) {
            return Err(ServiceError::not_reader(game.channel_id(), issuer));
        }
        Ok(f(session))
    })
}
