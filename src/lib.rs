//! Squad arena: squad scoring, ranked matchmaking, outcome resolution and
//! reward settlement for a three-agent team battle game.

pub mod arena;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
pub mod http;
pub mod matchmaking;
pub mod metrics;
