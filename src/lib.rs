//! Portfolio Cache - ephemeral in-process state for a content backend
//!
//! Provides an expiring, bounded record store and the two consumers built on
//! it: a response cache with invalidation, and a login abuse guard.

pub mod api;
pub mod cache;
pub mod config;
pub mod content;
pub mod error;
pub mod guard;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
