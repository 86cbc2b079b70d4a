pub mod postgres;

pub use self::postgres::*;

use crate::error::SeedError;
use crate::parser::InsertStatement;
use crate::schema::TableSchema;

/// Destination of a load: DDL, one insert per record, one commit at the end
pub trait Sink {
    /// Execute a table's idempotent `CREATE TABLE IF NOT EXISTS`
    fn create_table(&mut self, schema: &TableSchema) -> Result<(), SeedError>;

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), SeedError>;

    fn commit(&mut self) -> Result<(), SeedError>;

    /// Whether the table exists and holds at least one row
    fn has_rows(&mut self, table: &str) -> Result<bool, SeedError>;
}
