//! Library crate for quizbowl-tracker, exposing the buzz engine and its services for the binary and
//! integration tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
