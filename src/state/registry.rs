//! Channel to engine registry.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use crate::state::{engine::Engine, session::GameSession};

/// Identifier of the channel a game is played in.
pub type ChannelId = u64;

/// Shared handle to one channel's game.
pub type SharedGame = Arc<ChannelGame>;

/// One channel's session behind its own lock, so channels never contend with each other.
#[derive(Debug)]
pub struct ChannelGame {
    channel_id: ChannelId,
    session: Mutex<GameSession>,
}

impl ChannelGame {
    fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            session: Mutex::new(GameSession::default()),
        }
    }

    /// Channel this game belongs to.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Run `f` against the engine while holding the channel lock.
    pub fn with_engine<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Engine) -> T,
    {
        self.with_session(|session| f(&session.engine))
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Engine) -> T,
    {
        self.with_session_mut(|session| f(&mut session.engine))
    }

    /// Run `f` against the whole session while holding the channel lock.
    pub fn with_session<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&GameSession) -> T,
    {
        let guard = self.session.lock();
        f(&*guard)
    }

    /// Run `f` with exclusive access to the session. All mutations of a channel serialize here.
    pub fn with_session_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut GameSession) -> T,
    {
        let mut guard = self.session.lock();
        f(&mut *guard)
    }
}

/// Channel to game mapping shared by every inbound event path.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    games: DashMap<ChannelId, SharedGame>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the game running in `channel_id`.
    pub fn try_get(&self, channel_id: ChannelId) -> Option<SharedGame> {
        self.games.get(&channel_id).map(|entry| entry.value().clone())
    }

    /// Return the channel's game, creating an empty one on first reference.
    ///
    /// Concurrent callers for the same unseen channel all receive the same instance.
    pub fn get_or_create(&self, channel_id: ChannelId) -> SharedGame {
        self.games
            .entry(channel_id)
            .or_insert_with(|| {
                debug!(channel_id, "creating game for channel");
                Arc::new(ChannelGame::new(channel_id))
            })
            .value()
            .clone()
    }

    /// Drop the channel's game, returning it if one existed.
    pub fn remove(&self, channel_id: ChannelId) -> Option<SharedGame> {
        self.games.remove(&channel_id).map(|(_, game)| game)
    }

    /// Drop the channel's game only if it is still `game`, returning whether it was removed.
    pub fn remove_game(&self, channel_id: ChannelId, game: &SharedGame) -> bool {
        self.games
            .remove_if(&channel_id, |_, current| Arc::ptr_eq(current, game))
            .is_some()
    }

    /// Snapshot every registered game for maintenance sweeps.
    pub fn list_all(&self) -> Vec<(ChannelId, SharedGame)> {
        self.games
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Number of channels with a game.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no channel has a game.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
