//! Infrastructure layer: SQLite persistence for products.

pub mod sqlite;

pub use sqlite::SqliteProductStore;
