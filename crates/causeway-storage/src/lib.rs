//! # causeway-storage
//!
//! SQLite persistence for pipeline runs. One serialized connection,
//! `PRAGMA user_version` migrations, and plain query functions per table.

pub mod connection;
pub mod migrations;
pub mod persist;
pub mod queries;

pub use connection::ResultStore;
pub use persist::persist_if_configured;
pub use queries::runs::RunRow;
