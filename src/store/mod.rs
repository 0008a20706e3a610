//! Durable storage for trained models.

pub mod kv;
pub mod models;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use models::{ModelStore, SavedModel};
