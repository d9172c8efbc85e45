pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod state;
