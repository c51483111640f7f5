//! Turns free-text chat messages into buzz, withdraw, tossup and bonus score intents and applies
//! them to the channel's session.

use tracing::{debug, info};

use crate::{
    config::AppConfig,
    dto::{events::GameEvent, inbound::ChatMessage},
    state::{
        SharedState,
        engine::{Engine, PlayerId, Side},
        session::GameSession,
    },
};

const WITHDRAW_TEXT: &str = "wd";
const NO_PENALTY_TEXT: &str = "no penalty";

/// What a chat message asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageIntent {
    /// Author wants to answer.
    Buzz,
    /// Author takes their buzz back.
    Withdraw,
    /// Reader scores the prompted player.
    Score(i32),
    /// Reader scores the bonus in progress.
    Bonus(i32),
}

/// How a chat message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not a game message, no game in the channel, or refused by the engine.
    Ignored,
    /// The author joined the queue.
    Buzzed,
    /// The author left the queue.
    Withdrew,
    /// The prompted player was scored.
    Scored {
        /// Player who received the points.
        player_id: PlayerId,
        /// Points awarded.
        points: i32,
    },
    /// The bonus in progress was scored.
    BonusScored {
        /// Side credited.
        side: Side,
        /// Bonus points awarded.
        points: i32,
    },
}

/// Parse a reader's message as a score.
///
/// Only configured point values (or "no penalty") count; anything else is ordinary chat.
pub fn parse_score(config: &AppConfig, content: &str) -> Option<i32> {
    let content = content.trim();
    if content == NO_PENALTY_TEXT {
        return Some(0);
    }

    content
        .parse::<i32>()
        .ok()
        .filter(|points| config.accepts_points(*points))
}

/// Parse a reader's message as a bonus total.
pub fn parse_bonus(config: &AppConfig, content: &str) -> Option<i32> {
    content
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|points| config.accepts_bonus_points(*points))
}

/// Classify a message. Readers' score messages take precedence over buzz and withdraw text.
///
/// While a bonus is being played, the reader's numbers score the bonus and nobody can buzz.
pub fn parse_intent(
    config: &AppConfig,
    content: &str,
    from_reader: bool,
    awaiting_bonus: bool,
) -> Option<MessageIntent> {
    if awaiting_bonus {
        return if from_reader {
            parse_bonus(config, content).map(MessageIntent::Bonus)
        } else {
            None
        };
    }

    if from_reader {
        if let Some(points) = parse_score(config, content) {
            return Some(MessageIntent::Score(points));
        }
    }

    if config.is_buzz(content) {
        Some(MessageIntent::Buzz)
    } else if content.trim().eq_ignore_ascii_case(WITHDRAW_TEXT) {
        Some(MessageIntent::Withdraw)
    } else {
        None
    }
}

/// Apply a chat message to its channel's game and publish the resulting events.
pub fn handle_message(state: &SharedState, message: ChatMessage) -> MessageOutcome {
    let Some(game) = state.games().try_get(message.channel_id) else {
        return MessageOutcome::Ignored;
    };

    let (outcome, events) = game.with_session_mut(|session| {
        let from_reader = session.engine.reader_id() == Some(message.author_id);
        let awaiting_bonus = session.bonuses.pending().is_some();
        match parse_intent(state.config(), &message.content, from_reader, awaiting_bonus) {
            Some(MessageIntent::Score(points)) => score(session, points),
            Some(MessageIntent::Bonus(points)) => bonus(session, points),
            Some(MessageIntent::Buzz) => buzz(session, &message),
            Some(MessageIntent::Withdraw) => withdraw(&mut session.engine, message.author_id),
            None => (MessageOutcome::Ignored, Vec::new()),
        }
    });

    match outcome {
        MessageOutcome::Ignored => {
            debug!(
                channel_id = message.channel_id,
                author_id = message.author_id,
                "message ignored"
            );
        }
        MessageOutcome::Scored { player_id, points } => {
            info!(channel_id = message.channel_id, player_id, points, "player scored");
        }
        MessageOutcome::BonusScored { side, points } => {
            info!(channel_id = message.channel_id, side = ?side, points, "bonus scored");
        }
        _ => {}
    }

    for event in events {
        state.publish(message.channel_id, event);
    }

    outcome
}

/// Event announcing who answers next, or that nobody can.
pub(crate) fn prompt_event(engine: &Engine) -> GameEvent {
    match engine.next_buzz() {
        Some(buzz) => GameEvent::PlayerPrompted {
            player_id: buzz.player_id,
            display_name: buzz.display_name.clone(),
        },
        None => GameEvent::QueueCleared,
    }
}

fn score(session: &mut GameSession, points: i32) -> (MessageOutcome, Vec<GameEvent>) {
    let Some((team_id, side)) = session
        .engine
        .next_buzz()
        .map(|buzz| (buzz.team_id, buzz.side()))
    else {
        return (MessageOutcome::Ignored, Vec::new());
    };
    let Some(player_id) = session.engine.score_player(points) else {
        return (MessageOutcome::Ignored, Vec::new());
    };

    let mut events = vec![
        GameEvent::ScoreRecorded {
            player_id,
            team_id,
            points,
        },
        prompt_event(&session.engine),
    ];
    if points > 0 && session.bonuses.offer(side) {
        events.push(GameEvent::BonusStarted { side });
    }
    (MessageOutcome::Scored { player_id, points }, events)
}

fn bonus(session: &mut GameSession, points: i32) -> (MessageOutcome, Vec<GameEvent>) {
    let tossups_scored = session.engine.history_len();
    let Some(side) = session.bonuses.record(points, tossups_scored) else {
        return (MessageOutcome::Ignored, Vec::new());
    };

    (
        MessageOutcome::BonusScored { side, points },
        vec![GameEvent::BonusRecorded { side, points }],
    )
}

fn buzz(session: &mut GameSession, message: &ChatMessage) -> (MessageOutcome, Vec<GameEvent>) {
    let team_id = session.teams.resolve(message.author_id, message.team_id);
    let engine = &mut session.engine;
    if !engine.add_player(message.author_id, message.display_name.clone(), team_id) {
        return (MessageOutcome::Ignored, Vec::new());
    }

    // Only the player who becomes the front of the eligible queue needs a prompt.
    let events = if engine.next_player() == Some(message.author_id) {
        vec![prompt_event(engine)]
    } else {
        Vec::new()
    };
    (MessageOutcome::Buzzed, events)
}

fn withdraw(engine: &mut Engine, player_id: PlayerId) -> (MessageOutcome, Vec<GameEvent>) {
    let was_prompted = engine.next_player() == Some(player_id);
    if !engine.withdraw_player(player_id) {
        return (MessageOutcome::Ignored, Vec::new());
    }

    let mut events = vec![GameEvent::PlayerWithdrawn { player_id }];
    if was_prompted {
        events.push(prompt_event(engine));
    }
    (MessageOutcome::Withdrew, events)
}
