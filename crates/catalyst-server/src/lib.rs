pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod import;
pub mod logging;
pub mod state;
pub mod webhook;
