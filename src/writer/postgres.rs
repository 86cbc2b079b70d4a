use postgres::types::ToSql;
use postgres::Client;

use super::Sink;
use crate::error::SeedError;
use crate::parser::InsertStatement;
use crate::schema::TableSchema;

/// Writes the load into PostgreSQL inside one transaction.
///
/// The transaction opens with the first statement and ends at `commit`.
/// Dropping the writer without committing closes the connection, which rolls
/// back everything executed so far.
pub struct PgWriter {
    client: Client,
    in_transaction: bool,
}

impl PgWriter {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            in_transaction: false,
        }
    }

    fn begin(&mut self) -> Result<(), SeedError> {
        if !self.in_transaction {
            self.client
                .batch_execute("BEGIN")
                .map_err(|source| statement_error("BEGIN", source))?;
            self.in_transaction = true;
        }
        Ok(())
    }

    fn table_exists(&mut self, table: &str) -> Result<bool, SeedError> {
        let row = self
            .client
            .query_one(
                "SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public' AND table_name = $1
                )",
                &[&table],
            )
            .map_err(|source| statement_error(table, source))?;
        Ok(row.get(0))
    }
}

impl Sink for PgWriter {
    fn create_table(&mut self, schema: &TableSchema) -> Result<(), SeedError> {
        self.begin()?;
        self.client
            .batch_execute(schema.create_sql)
            .map_err(|source| statement_error(schema.name, source))
    }

    fn insert(&mut self, statement: &InsertStatement) -> Result<(), SeedError> {
        self.begin()?;
        let (sql, values) = statement.positional()?;
        let params: Vec<&(dyn ToSql + Sync)> = values
            .iter()
            .map(|value| *value as &(dyn ToSql + Sync))
            .collect();

        self.client
            .execute(sql.as_str(), &params)
            .map_err(|source| statement_error(statement.table, source))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), SeedError> {
        if self.in_transaction {
            self.client
                .batch_execute("COMMIT")
                .map_err(|source| statement_error("COMMIT", source))?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn has_rows(&mut self, table: &str) -> Result<bool, SeedError> {
        if !self.table_exists(table)? {
            return Ok(false);
        }
        // Table names come from the static registry, never from input
        let row = self
            .client
            .query_one(&format!("SELECT EXISTS (SELECT 1 FROM {})", table), &[])
            .map_err(|source| statement_error(table, source))?;
        Ok(row.get(0))
    }
}

fn statement_error(table: &str, source: postgres::Error) -> SeedError {
    SeedError::Insert {
        table: table.to_string(),
        source,
    }
}
