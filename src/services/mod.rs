/// Chat message parsing and buzz/withdraw/score handling.
pub mod message_service;
/// Ending games whose reader left.
pub mod presence_service;
/// Reader-issued game commands.
pub mod reader_service;
/// Team roster commands.
pub mod team_service;
/// JSON-lines driver feeding inbound events to the services.
pub mod transcript_service;
