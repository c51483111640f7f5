//! Team management: the reader sets up teams, players join and leave them.

use tracing::info;

use crate::{
    dto::events::GameEvent,
    error::ServiceError,
    services::reader_service::{require_game, with_reader_session},
    state::{SharedState, engine::PlayerId, registry::ChannelId},
};

/// Add a team to the channel's game.
pub fn add_team(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
    name: &str,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    let team_id = with_reader_session(&game, issuer, |session| session.teams.add_team(name))?
        .ok_or_else(|| {
            ServiceError::InvalidInput(format!("team name `{}` is blank or taken", name.trim()))
        })?;

    info!(channel_id, team_id, "team added");
    state.publish(
        channel_id,
        GameEvent::TeamAdded {
            team_id,
            name: name.trim().to_owned(),
        },
    );
    Ok(())
}

/// Remove a team. Its players go back to playing on their own.
pub fn remove_team(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
    name: &str,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    let (team_id, name) =
        with_reader_session(&game, issuer, |session| session.teams.remove_team(name))?
            .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", name.trim())))?;

    info!(channel_id, team_id, "team removed");
    state.publish(channel_id, GameEvent::TeamRemoved { team_id, name });
    Ok(())
}

/// Take `player_id` off their team on the reader's behalf.
pub fn remove_player(
    state: &SharedState,
    channel_id: ChannelId,
    issuer: PlayerId,
    player_id: PlayerId,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    let team_id =
        with_reader_session(&game, issuer, |session| session.teams.remove_player(player_id))?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("player `{player_id}` is not on a team"))
            })?;

    info!(channel_id, player_id, team_id, "player removed from team");
    state.publish(channel_id, GameEvent::PlayerLeftTeam { player_id, team_id });
    Ok(())
}

/// Put the issuer on the named team.
pub fn join_team(
    state: &SharedState,
    channel_id: ChannelId,
    player_id: PlayerId,
    name: &str,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    let team_id = game
        .with_session_mut(|session| {
            if session.engine.reader_id() == Some(player_id) {
                return Err(ServiceError::InvalidState(
                    "the reader cannot join a team".into(),
                ));
            }
            Ok(session.teams.join(player_id, name))
        })?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", name.trim())))?;

    info!(channel_id, player_id, team_id, "player joined team");
    state.publish(channel_id, GameEvent::PlayerJoinedTeam { player_id, team_id });
    Ok(())
}

/// Take the issuer off their team.
pub fn leave_team(
    state: &SharedState,
    channel_id: ChannelId,
    player_id: PlayerId,
) -> Result<(), ServiceError> {
    let game = require_game(state, channel_id)?;
    let team_id = game
        .with_session_mut(|session| session.teams.remove_player(player_id))
        .ok_or_else(|| ServiceError::InvalidState("you are not on a team".into()))?;

    info!(channel_id, player_id, team_id, "player left team");
    state.publish(channel_id, GameEvent::PlayerLeftTeam { player_id, team_id });
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::{Receiver, error::TryRecvError};

    use super::*;
    use crate::{
        config::AppConfig,
        dto::{events::ChannelEvent, inbound::ChatMessage},
        services::{message_service::handle_message, reader_service::start_game},
        state::AppState,
    };

    const CHANNEL: ChannelId = 3;
    const READER: PlayerId = 1;

    fn started() -> SharedState {
        let state = AppState::new(AppConfig::default());
        start_game(&state, CHANNEL, READER).unwrap();
        state
    }

    fn say(state: &SharedState, author_id: PlayerId, content: &str) {
        handle_message(
            state,
            ChatMessage {
                channel_id: CHANNEL,
                author_id,
                display_name: format!("Player {author_id}"),
                team_id: None,
                content: content.into(),
            },
        );
    }

    fn drain(rx: &mut Receiver<ChannelEvent>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event.event),
                Err(TryRecvError::Empty) => return events,
                Err(err) => panic!("unexpected receive error: {err}"),
            }
        }
    }

    #[test]
    fn reader_manages_teams() {
        let state = started();
        let mut rx = state.subscribe();

        add_team(&state, CHANNEL, READER, " Red ").unwrap();
        assert!(matches!(
            add_team(&state, CHANNEL, READER, "red"),
            Err(ServiceError::InvalidInput(_))
        ));
        assert_eq!(
            add_team(&state, CHANNEL, 2, "Blue"),
            Err(ServiceError::not_reader(CHANNEL, 2))
        );
        remove_team(&state, CHANNEL, READER, "RED").unwrap();
        assert!(matches!(
            remove_team(&state, CHANNEL, READER, "Red"),
            Err(ServiceError::NotFound(_))
        ));

        assert_eq!(
            drain(&mut rx),
            vec![
                GameEvent::TeamAdded {
                    team_id: 1,
                    name: "Red".into()
                },
                GameEvent::TeamRemoved {
                    team_id: 1,
                    name: "Red".into()
                },
            ]
        );
    }

    #[test]
    fn players_join_and_leave() {
        let state = started();
        add_team(&state, CHANNEL, READER, "Red").unwrap();

        assert!(matches!(
            join_team(&state, CHANNEL, 2, "Green"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            join_team(&state, CHANNEL, READER, "Red"),
            Err(ServiceError::InvalidState(_))
        ));

        let mut rx = state.subscribe();
        join_team(&state, CHANNEL, 2, "red").unwrap();
        leave_team(&state, CHANNEL, 2).unwrap();
        assert!(matches!(
            leave_team(&state, CHANNEL, 2),
            Err(ServiceError::InvalidState(_))
        ));
        assert_eq!(
            drain(&mut rx),
            vec![
                GameEvent::PlayerJoinedTeam {
                    player_id: 2,
                    team_id: 1
                },
                GameEvent::PlayerLeftTeam {
                    player_id: 2,
                    team_id: 1
                },
            ]
        );
    }

    #[test]
    fn reader_removes_player_from_team() {
        let state = started();
        add_team(&state, CHANNEL, READER, "Red").unwrap();
        join_team(&state, CHANNEL, 2, "Red").unwrap();

        assert_eq!(
            remove_player(&state, CHANNEL, 3, 2),
            Err(ServiceError::not_reader(CHANNEL, 3))
        );
        remove_player(&state, CHANNEL, READER, 2).unwrap();
        assert!(matches!(
            remove_player(&state, CHANNEL, READER, 2),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn teammates_share_one_attempt() {
        let state = started();
        add_team(&state, CHANNEL, READER, "Red").unwrap();
        add_team(&state, CHANNEL, READER, "Blue").unwrap();
        join_team(&state, CHANNEL, 2, "Red").unwrap();
        join_team(&state, CHANNEL, 3, "Red").unwrap();
        join_team(&state, CHANNEL, 4, "Blue").unwrap();

        say(&state, 2, "buzz");
        say(&state, 3, "buzz");
        say(&state, 4, "buzz");
        let mut rx = state.subscribe();
        say(&state, READER, "-5");

        assert_eq!(
            drain(&mut rx),
            vec![
                GameEvent::ScoreRecorded {
                    player_id: 2,
                    team_id: Some(1),
                    points: -5
                },
                GameEvent::PlayerPrompted {
                    player_id: 4,
                    display_name: "Player 4".into(),
                },
            ]
        );
    }

    #[test]
    fn team_commands_need_a_game() {
        let state = AppState::new(AppConfig::default());
        assert_eq!(
            join_team(&state, CHANNEL, 2, "Red"),
            Err(ServiceError::no_game(CHANNEL))
        );
    }
}
