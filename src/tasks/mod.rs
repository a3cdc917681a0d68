//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: purges expired records from a store at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
