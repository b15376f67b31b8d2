use crate::error::{LeadsError, Result};
use crate::schema::{ColumnType, Field};
use rusqlite::types::{ToSql, ToSqlOutput};
use serde_json::Value;

/// A row value coerced to its column's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
}

impl Cell {
    pub fn coerce(entity: &str, field: &Field, value: Option<&Value>) -> Result<Self> {
        let invalid = |reason: String| LeadsError::InvalidValue {
            entity: entity.to_string(),
            column: field.name.to_string(),
            reason,
        };

        let Some(value) = value else {
            return Ok(Cell::Null);
        };

        match (field.column_type, value) {
            (_, Value::Null) => Ok(Cell::Null),
            (ColumnType::Text { .. }, Value::String(s)) => Ok(Cell::Text(s.clone())),
            (ColumnType::Text { .. }, Value::Number(n)) => Ok(Cell::Text(n.to_string())),
            (ColumnType::Text { .. }, Value::Bool(b)) => Ok(Cell::Text(b.to_string())),
            (ColumnType::Integer, Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map(Cell::Integer)
                .ok_or_else(|| invalid(format!("{n} is not an integer"))),
            (ColumnType::Integer, Value::String(s)) => s
                .trim()
                .parse()
                .map(Cell::Integer)
                .map_err(|_| invalid(format!("`{s}` is not an integer"))),
            (_, other) => Err(invalid(format!("cannot store {other} in a scalar column"))),
        }
    }

    /// CSV field for `COPY ... WITH (FORMAT csv)`: quoted text, bare
    /// integers, an empty unquoted field for null.
    pub fn to_csv(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            Cell::Integer(i) => i.to_string(),
        }
    }

    /// SQL literal for `INSERT` statements.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Cell::Null => "NULL".to_string(),
            Cell::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Cell::Integer(i) => i.to_string(),
        }
    }
}

impl ToSql for Cell {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Cell::Null => rusqlite::types::Null.to_sql(),
            Cell::Text(s) => s.to_sql(),
            Cell::Integer(i) => i.to_sql(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text() -> Field {
        Field { name: "slug", column_type: ColumnType::Text { max_len: Some(50) }, nullable: false }
    }

    fn integer() -> Field {
        Field { name: "distance", column_type: ColumnType::Integer, nullable: true }
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(Cell::coerce("t", &text(), Some(&json!("a"))).unwrap(), Cell::Text("a".into()));
        assert_eq!(Cell::coerce("t", &text(), Some(&json!(2020))).unwrap(), Cell::Text("2020".into()));
        assert_eq!(Cell::coerce("t", &text(), None).unwrap(), Cell::Null);
        assert!(Cell::coerce("t", &text(), Some(&json!({"a": 1}))).is_err());
    }

    #[test]
    fn test_coerce_integer() {
        assert_eq!(Cell::coerce("t", &integer(), Some(&json!(10))).unwrap(), Cell::Integer(10));
        assert_eq!(Cell::coerce("t", &integer(), Some(&json!(" 12 "))).unwrap(), Cell::Integer(12));
        assert_eq!(Cell::coerce("t", &integer(), Some(&json!(null))).unwrap(), Cell::Null);

        let err = Cell::coerce("t", &integer(), Some(&json!("ten"))).unwrap_err();
        assert!(matches!(err, LeadsError::InvalidValue { ref column, .. } if column == "distance"));
        assert!(Cell::coerce("t", &integer(), Some(&json!(1.5))).is_err());
        assert_eq!(Cell::coerce("t", &integer(), Some(&json!(4.0))).unwrap(), Cell::Integer(4));
        assert!(Cell::coerce("t", &integer(), Some(&json!(1e30))).is_err());
        assert!(Cell::coerce("t", &integer(), Some(&json!(-1e30))).is_err());
        assert!(Cell::coerce("t", &integer(), Some(&json!(9223372036854775808.0))).is_err());
        assert!(Cell::coerce("t", &integer(), Some(&json!(true))).is_err());
    }

    #[test]
    fn test_null_rendering_is_never_a_string() {
        assert_eq!(Cell::Null.to_csv(), "");
        assert_eq!(Cell::Null.to_sql_literal(), "NULL");
        assert_eq!(Cell::Text(String::new()).to_csv(), "\"\"");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(Cell::Text("say \"hi\"".into()).to_csv(), "\"say \"\"hi\"\"\"");
        assert_eq!(Cell::Text("O'Brien".into()).to_sql_literal(), "'O''Brien'");
        assert_eq!(Cell::Integer(-3).to_csv(), "-3");
    }
}
