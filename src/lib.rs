//! Chalobus - a community bus-tracking board
//!
//! Passengers, conductors and admins report the live status of local buses
//! and browse the board filtered by search text and date availability.
//! Structural changes to the bus list are limited to admins and conductors;
//! status reports are open to anyone signed in.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod dictation;
pub mod logging;
pub mod storage;
pub mod utils;

// Re-export core types and traits for easier use
pub use crate::core::{
    data::{BusInput, BusRecord, BusRegistry, BusStatus, Role, UserProfile},
    operations::{BoardOptions, BusBoard},
    policy::{AccessPolicy, Action},
    query::{DateFilter, SearchEngine},
    session::{ProfileUpdate, RegistrationForm, SessionStore},
    traits::{Dictation, KvStore},
};
pub use storage::{FileKvStore, MemoryKvStore};
pub use utils::error::{AppError, AppResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
