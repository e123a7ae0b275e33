//! Types shared by the storage layer, the notifier and the HTTP server.

pub mod icon;
pub mod id;
pub mod settings;
pub mod types;
