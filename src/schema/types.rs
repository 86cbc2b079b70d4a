use serde_json::Value;
use std::collections::HashSet;

use crate::error::SeedError;
use crate::parser::InsertStatement;

/// A flat record mapped from one PokeAPI resource.
///
/// Records are immutable value objects: built once from a payload, turned
/// into an insert, then dropped.
pub trait Entity: Sized {
    /// Table the record is inserted into
    const TABLE: &'static str;
    /// Idempotent `CREATE TABLE IF NOT EXISTS` statement
    const SCHEMA: &'static str;

    fn schema() -> &'static str {
        Self::SCHEMA
    }

    fn insert_statement(&self) -> InsertStatement;
}

/// Entities whose detail payload maps to exactly one record.
///
/// Join and chain tables (`PokemonMove`, `EvolutionChain`) flatten a nested
/// list into many records and expose an inherent `from_json` returning a `Vec`.
pub trait FromJson: Entity {
    /// Map a detail payload. Only a missing `id` is an error; every other
    /// field degrades to its sentinel.
    fn from_json(payload: &Value) -> Result<Self, SeedError>;
}

/// Maps one detail payload to the inserts it produces
pub type RecordMapper = fn(&Value) -> Result<Vec<InsertStatement>, SeedError>;

/// One loadable table: how to create it, where its data lives, and what it depends on
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    /// Collection path on the source API (e.g. `pokemon-species`)
    pub resource: &'static str,
    pub create_sql: &'static str,
    /// Tables referenced by foreign keys
    pub foreign_keys: &'static [&'static str],
    pub records: RecordMapper,
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys.iter().copied().collect()
    }
}

/// Mapper for resources that yield exactly one record
pub fn single<E: FromJson>(payload: &Value) -> Result<Vec<InsertStatement>, SeedError> {
    Ok(vec![E::from_json(payload)?.insert_statement()])
}

/// Required integer field; absence is a mapping error
pub(crate) fn required_id(
    payload: &Value,
    table: &'static str,
    field: &'static str,
) -> Result<i64, SeedError> {
    payload
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(SeedError::Mapping { table, field })
}
