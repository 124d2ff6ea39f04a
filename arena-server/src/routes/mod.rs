//! HTTP API route handlers

pub mod games;
pub mod leaderboard;
pub mod replay;
pub mod status;
