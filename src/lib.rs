//! Relax Mode: a grid snake simulation with a persisted top-10 leaderboard.

pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
