//! Client for the BunnyCDN Edge Storage API: list a storage zone and download
//! files from it.
//!
//! Operations never fail with an `Err`; every call yields an
//! [`OperationResult`] carrying the HTTP status (0 when no response was
//! received) and a message.

pub mod adapters;
pub mod client;
pub mod endpoint;
pub mod model;

pub use client::BunnyStorage;
pub use model::error::StorageError;
pub use model::storage::{ClientConfig, EntryKind, OperationResult, StorageEntry};
