//! Common library for the Joy Kunga application
//!
//! This crate provides shared functionality used across the services of the
//! Joy Kunga application: database connectivity and migrations, error
//! handling, and the user credential store.

pub mod database;
pub mod error;
pub mod models;
pub mod repositories;

pub use models::{AccountUpdate, NewUser, User, UserProfile};
pub use repositories::{MemoryUserStore, PgUserStore, UserStore};
