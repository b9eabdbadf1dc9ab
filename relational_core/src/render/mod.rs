//! Statement rendering
//!
//! Turns a [`SelectSpec`] into SQL text for a [`Dialect`] with positional
//! bind values.

pub mod bind_markers;
pub mod dialect;
pub mod sql_generation;
pub mod statement;


pub use bind_markers::{BindMarker, BindMarkers, MarkerStyle};
pub use dialect::Dialect;
pub use sql_generation::StatementMapper;
pub use statement::{Binding, PreparedStatement, SelectSpec};
