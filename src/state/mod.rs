//! Shared application state and the per-channel game session.

pub mod bonus;
pub mod engine;
mod events;
pub mod registry;
pub mod session;
pub mod teams;

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{
    config::AppConfig,
    dto::events::{ChannelEvent, GameEvent},
};

pub use self::events::EventHub;
use self::registry::{ChannelId, SessionRegistry};

/// Cheaply clonable handle to [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, per-channel games and the event feed.
pub struct AppState {
    config: AppConfig,
    games: SessionRegistry,
    events: EventHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        let events = EventHub::new(config.event_capacity());
        Arc::new(Self {
            config,
            games: SessionRegistry::new(),
            events,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of running games keyed by channel.
    pub fn games(&self) -> &SessionRegistry {
        &self.games
    }

    /// Broadcast hub carrying [`ChannelEvent`]s.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Subscribe to every channel event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChannelEvent> {
        self.events.subscribe()
    }

    /// Publish `event` for `channel_id`.
    pub fn publish(&self, channel_id: ChannelId, event: GameEvent) {
        self.events.broadcast(ChannelEvent { channel_id, event });
    }
}
