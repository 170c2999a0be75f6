//! Organisa: Personal Item Organizer
//!
//! Per-user collections of folders, notes, links and files kept in an
//! embedded key-value store, with account registration, a persisted session
//! and optional generated note content.

pub mod auth;
pub mod concurrency;
pub mod config;
pub mod error;
pub mod generation;
pub mod item;
pub mod kv;
pub mod logging;
pub mod tooling;
pub mod types;
