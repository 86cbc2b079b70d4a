use std::error::Error;

use bytes::BytesMut;
use postgres_types::{to_sql_checked, IsNull, ToSql, Type};

use crate::error::SeedError;

/// A value bound to an insert parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
    Boolean(bool),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Boolean(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Null => Ok(IsNull::Yes),
            // INTEGER columns are INT4 on the wire; narrow only when the server asks for it
            SqlValue::Integer(i) => match *ty {
                Type::INT8 => i.to_sql(ty, out),
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                _ => i32::try_from(*i)?.to_sql(ty, out),
            },
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Boolean(b) => b.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2 | Type::INT4 | Type::INT8 | Type::TEXT | Type::VARCHAR | Type::BOOL
        )
    }

    to_sql_checked!();
}

/// A parameterized insert: SQL with `:name` placeholders plus the values for them.
///
/// Parameter keys match the placeholder names exactly; column names may
/// differ (reserved words are quoted columns bound under their own name).
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: &'static str,
    pub sql: &'static str,
    pub params: Vec<(&'static str, SqlValue)>,
}

impl InsertStatement {
    pub fn new(table: &'static str, sql: &'static str) -> Self {
        Self {
            table,
            sql,
            params: Vec::new(),
        }
    }

    /// Bind a value under a placeholder name
    pub fn bind(mut self, name: &'static str, value: impl Into<SqlValue>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Rewrite `:name` placeholders to `$n` and collect values in bind order.
    /// A name used twice reuses its first position.
    pub fn positional(&self) -> Result<(String, Vec<&SqlValue>), SeedError> {
        let mut sql = String::with_capacity(self.sql.len());
        let mut order: Vec<&str> = Vec::new();
        let mut values: Vec<&SqlValue> = Vec::new();

        for segment in scan(self.sql) {
            match segment {
                Segment::Raw(raw) => sql.push_str(raw),
                Segment::Placeholder(name) => {
                    let position = match order.iter().position(|n| *n == name) {
                        Some(existing) => existing + 1,
                        None => {
                            let value = self.get(name).ok_or_else(|| SeedError::Bind {
                                table: self.table.to_string(),
                                parameter: name.to_string(),
                            })?;
                            order.push(name);
                            values.push(value);
                            order.len()
                        }
                    };
                    sql.push('$');
                    sql.push_str(&position.to_string());
                }
            }
        }

        Ok((sql, values))
    }

    /// Placeholder names in the order they appear in the SQL
    pub fn placeholders(&self) -> Vec<&'static str> {
        scan(self.sql)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name),
                Segment::Raw(_) => None,
            })
            .collect()
    }
}

enum Segment<'a> {
    Raw(&'a str),
    Placeholder(&'a str),
}

/// Split SQL into raw text and `:name` placeholders, ignoring quoted text and `::` casts
fn scan(sql: &str) -> Vec<Segment<'_>> {
    let bytes = sql.as_bytes();
    let mut segments = Vec::new();
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' | b'\'' => {
                quote = Some(c);
                i += 1;
            }
            b':' if i + 1 < bytes.len() && bytes[i + 1] == b':' => i += 2,
            b':' if i + 1 < bytes.len() && is_ident_start(bytes[i + 1]) => {
                let mut end = i + 1;
                while end < bytes.len() && is_ident(bytes[end]) {
                    end += 1;
                }
                segments.push(Segment::Raw(&sql[start..i]));
                segments.push(Segment::Placeholder(&sql[i + 1..end]));
                start = end;
                i = end;
            }
            _ => i += 1,
        }
    }
    segments.push(Segment::Raw(&sql[start..]));
    segments
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_rewrite() {
        let stmt = InsertStatement::new(
            "evolution_chain",
            "INSERT INTO evolution_chain (id, \"from\", \"to\") VALUES (:id, :from, :to);",
        )
        .bind("id", 2i64)
        .bind("from", 1i64)
        .bind("to", 2i64);

        let (sql, values) = stmt.positional().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO evolution_chain (id, \"from\", \"to\") VALUES ($1, $2, $3);"
        );
        assert_eq!(
            values,
            vec![
                &SqlValue::Integer(2),
                &SqlValue::Integer(1),
                &SqlValue::Integer(2)
            ]
        );
    }

    #[test]
    fn test_repeated_placeholder_reuses_position() {
        let stmt = InsertStatement::new("t", "SELECT :a, :b, :a").bind("a", 1i64).bind("b", "x");
        let (sql, values) = stmt.positional().unwrap();
        assert_eq!(sql, "SELECT $1, $2, $1");
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_quoted_text_and_casts_are_not_placeholders() {
        let stmt = InsertStatement::new("t", "SELECT ':x', \":y\", 1::int, :z").bind("z", true);
        assert_eq!(stmt.placeholders(), vec!["z"]);
        let (sql, _) = stmt.positional().unwrap();
        assert_eq!(sql, "SELECT ':x', \":y\", 1::int, $1");
    }

    #[test]
    fn test_missing_parameter_is_bind_error() {
        let stmt = InsertStatement::new("ability", "INSERT INTO ability (id) VALUES (:id)");
        match stmt.positional() {
            Err(SeedError::Bind { table, parameter }) => {
                assert_eq!(table, "ability");
                assert_eq!(parameter, "id");
            }
            other => panic!("expected bind error, got {:?}", other),
        }
    }

    #[test]
    fn test_option_into_sql_value() {
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some("fire".to_string())), SqlValue::Text("fire".into()));
    }
}
