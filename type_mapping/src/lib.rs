//! Typed bind values shared across the queryhaus ecosystem
//!
//! `SqlValue` is the wrapper every rendered statement uses for its positional
//! bind parameters, independent of the driver that eventually executes it.

pub mod serialize;
pub mod types;

pub use serialize::json_to_sql_value;
pub use types::SqlValue;
