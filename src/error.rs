//! Service-layer error type.

use thiserror::Error;

use crate::state::{engine::PlayerId, registry::ChannelId};

/// Errors that can occur in service layer operations.
///
/// The engine never fails; these describe why a collaborator request was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Issuer is not allowed to run the command.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    /// No game is running in the channel.
    pub fn no_game(channel_id: ChannelId) -> Self {
        ServiceError::NotFound(format!("no game is running in channel `{channel_id}`"))
    }

    /// Issuer is not the channel's reader.
    pub fn not_reader(channel_id: ChannelId, issuer: PlayerId) -> Self {
        ServiceError::Unauthorized(format!(
            "user `{issuer}` is not the reader in channel `{channel_id}`"
        ))
    }
}
