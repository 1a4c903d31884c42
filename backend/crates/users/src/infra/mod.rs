//! Infrastructure Layer
//!
//! PostgreSQL repository and the listing query builder.

pub mod postgres;
pub mod query_builder;

pub use postgres::PgUserRepository;
