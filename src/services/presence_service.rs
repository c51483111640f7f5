//! Ending games when their reader disappears.

use tracing::info;

use crate::{
    dto::events::{EndReason, GameEvent},
    state::{SharedState, engine::PlayerId, registry::ChannelId},
};

/// End every game read by `reader_id`, returning the affected channels.
///
/// Called once a reader is considered gone for good; how long to wait for a rejoin is up to the
/// caller.
pub fn end_games_for_reader(state: &SharedState, reader_id: PlayerId) -> Vec<ChannelId> {
    let mut ended = state
        .games()
        .list_all()
        .into_iter()
        .filter_map(|(channel_id, game)| {
            // Re-check under the lock: the reader may have changed since the sweep started.
            let cleared = game.with_session_mut(|session| {
                if session.engine.reader_id() == Some(reader_id) {
                    session.clear_all();
                    true
                } else {
                    false
                }
            });
            if !cleared {
                return None;
            }

            state.games().remove_game(channel_id, &game);
            info!(channel_id, reader_id, "reader left; ending game");
            state.publish(
                channel_id,
                GameEvent::GameEnded {
                    reason: EndReason::ReaderLeft,
                },
            );
            Some(channel_id)
        })
        .collect::<Vec<_>>();

    ended.sort_unstable();
    ended
}
