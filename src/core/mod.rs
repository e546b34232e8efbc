//! Core business logic layer
//!
//! Bus records and their registry, the role policy, the visible-list query,
//! the session store, and the board controller that ties them together.

pub mod data;
pub mod operations;
pub mod policy;
pub mod query;
pub mod session;
pub mod traits;
