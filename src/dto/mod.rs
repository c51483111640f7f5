//! Serializable values crossing the crate boundary: inbound transcript lines, broadcast events and
//! scoreboard rows.

pub mod events;
pub mod inbound;
pub mod outbound;
pub mod score;
