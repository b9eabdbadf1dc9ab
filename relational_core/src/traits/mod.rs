//! Traits for statement execution
//!
//! The renderer produces [`PreparedStatement`](crate::render::PreparedStatement)s;
//! these traits define how they reach a database.

pub mod executor;

pub use executor::StatementExecutor;
