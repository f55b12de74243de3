//! # skillswap-store
//!
//! Persistence for SkillSwap. Three independent collections (users, swap
//! requests, notifications) are exposed through the [`UserStore`],
//! [`RequestStore`] and [`NotificationStore`] traits so the marketplace logic
//! never sees the backend.
//!
//! Two backends ship with the crate:
//! - [`SqliteStore`], a `rusqlite::Connection` behind a mutex with schema
//!   migrations and one transaction per mutation
//! - [`MemoryStore`], plain vectors with one mutex per collection, used by
//!   tests and throwaway instances

pub mod database;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod requests;
pub mod stores;
pub mod users;

mod codec;
mod error;
#[cfg(test)]
mod fixtures;

pub use database::Database;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use models::*;
pub use stores::{Decision, NotificationStore, RequestStore, SqliteStore, UserStore};
