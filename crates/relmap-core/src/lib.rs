//! Relational metadata model.
//!
//! Given a logical entity model ([`schema::app`]), the [`schema::Builder`]
//! derives the physical schema graph ([`schema::db`]): tables, views, store
//! functions, stored procedures and SQL queries with their columns and
//! constraints, plus the [`schema::mapping`] layer binding entity types and
//! properties to those objects. Every collection in the graph has a canonical
//! order, so building the same logical model twice yields structurally equal
//! graphs.

mod cache;

pub mod driver;
pub use driver::Capability;

mod error;
pub use error::{Error, ForeignKeyMismatch, IndexMismatch, IntoError};

pub mod row;

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses relmap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
