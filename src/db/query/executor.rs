use oracle::sql_type::{OracleType, ToSql};
use oracle::{Connection, Error as OracleError, ResultSet, Row};
use serde_json::{Number, Value};

use super::{JsonRow, StatementOutcome};

pub struct QueryExecutor;

impl QueryExecutor {
    /// Execute one statement on `conn` without committing.
    ///
    /// Queries return their rows; everything else returns the affected row count.
    pub fn execute(conn: &Connection, sql: &str) -> Result<StatementOutcome, OracleError> {
        let sql_trimmed = sql.trim();

        if Self::is_select_statement(sql_trimmed) {
            let rows = Self::query_rows(conn, sql_trimmed, &[])?;
            return Ok(StatementOutcome {
                rows_affected: None,
                rows: Some(rows),
            });
        }

        let stmt = conn.execute(sql_trimmed, &[])?;
        Ok(StatementOutcome {
            rows_affected: Some(stmt.row_count()?),
            rows: None,
        })
    }

    pub fn leading_keyword(sql: &str) -> Option<String> {
        sql.split(|c: char| c.is_whitespace() || c == '(')
            .find(|word| !word.is_empty())
            .map(|word| word.to_uppercase())
    }

    pub fn is_select_statement(sql: &str) -> bool {
        matches!(
            Self::leading_keyword(sql).as_deref(),
            Some("SELECT") | Some("WITH")
        )
    }

    pub fn query_rows(
        conn: &Connection,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<JsonRow>, OracleError> {
        let result_set = conn.query(sql, params)?;
        Self::collect_rows(result_set)
    }

    pub fn query_rows_named(
        conn: &Connection,
        sql: &str,
        params: &[(&str, &dyn ToSql)],
    ) -> Result<Vec<JsonRow>, OracleError> {
        let result_set = conn.query_named(sql, params)?;
        Self::collect_rows(result_set)
    }

    fn collect_rows(result_set: ResultSet<'_, Row>) -> Result<Vec<JsonRow>, OracleError> {
        let columns: Vec<(String, bool)> = result_set
            .column_info()
            .iter()
            .map(|col| (col.name().to_string(), Self::is_numeric(col.oracle_type())))
            .collect();

        let mut rows: Vec<JsonRow> = Vec::new();
        for row_result in result_set {
            let row: Row = row_result?;
            let mut object = JsonRow::new();
            for (i, (name, numeric)) in columns.iter().enumerate() {
                let text: Option<String> = row.get(i)?;
                object.insert(name.clone(), Self::json_value(text, *numeric));
            }
            rows.push(object);
        }

        Ok(rows)
    }

    fn is_numeric(oracle_type: &OracleType) -> bool {
        matches!(
            oracle_type,
            OracleType::Number(_, _)
                | OracleType::Float(_)
                | OracleType::BinaryFloat
                | OracleType::BinaryDouble
                | OracleType::Int64
                | OracleType::UInt64
        )
    }

    /// Convert a column's text form to JSON. Numeric columns become JSON
    /// numbers when they parse; dates arrive already formatted by the session
    /// NLS settings.
    pub(crate) fn json_value(text: Option<String>, numeric: bool) -> Value {
        let Some(text) = text else {
            return Value::Null;
        };

        if numeric {
            if let Ok(int) = text.parse::<i64>() {
                return Value::from(int);
            }
            if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(number);
            }
        }

        Value::String(text)
    }
}
