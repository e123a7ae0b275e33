//! Persistence for the site: relational content tables behind
//! [`store::ContentStore`] and media blobs behind [`media::MediaLibrary`].

pub mod auth;
pub mod entities;
pub mod error;
pub mod media;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{Result, StorageError};
pub use media::MediaLibrary;
pub use store::ContentStore;
