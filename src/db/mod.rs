//! Reference storage collaborator: SQLite persistence for frozen sessions and
//! their analysis records. Nothing in the recording or metrics path depends on
//! this module.

mod connection;
mod helpers;
mod migrations;
mod repositories;

pub use connection::Database;
