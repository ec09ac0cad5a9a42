//! reflexboard - reaction-timer leaderboard backend
//!
//! Registers and authenticates users and records per-user reaction timers,
//! exposing ranked best-N leaderboard queries over HTTP.

pub mod api;
pub mod auth;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod server;
pub mod timers;
pub mod users;

pub use context::AppContext;
