//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Sweeper: removes expired entries, then evicts overflow by policy

mod sweeper;

pub use sweeper::{run_sweep, spawn_sweeper, spawn_sweeper_task, SweepReport};
