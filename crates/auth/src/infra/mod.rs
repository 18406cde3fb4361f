//! Infrastructure Layer
//!
//! Store implementations of the domain repository traits.

pub mod postgres;

pub use postgres::PgAuthStore;
